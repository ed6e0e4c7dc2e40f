use anyhow::Result;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

const PORTS_MARKER: &str = "Ports:";

/// Open ports per host from nmap's grepable (`-oG`/`.gnmap`) output.
///
/// A line counts only when it carries the `Ports:` marker and a `Host: <token>`
/// label. Each comma-separated entry looks like `80/open/tcp//http///`; only
/// entries whose state field is `open` contribute. Hosts without open ports are
/// left out, and a later line for the same host replaces an earlier one.
pub fn parse_grepable(content: &str) -> Result<BTreeMap<String, BTreeSet<u16>>> {
    let host_re = Regex::new(r"Host:\s+(\S+)")?;
    let mut results = BTreeMap::new();

    for line in content.lines() {
        let Some((_, ports_section)) = line.split_once(PORTS_MARKER) else {
            continue;
        };
        let Some(host) = host_re.captures(line).map(|cap| cap[1].to_string()) else {
            tracing::debug!("Skipping ports line without host: {}", line);
            continue;
        };

        // Later fields ("Ignored State: ...") are tab separated
        let ports_section = ports_section.split('\t').next().unwrap_or_default();

        let open: BTreeSet<u16> = ports_section
            .split(',')
            .filter_map(|entry| open_port(entry.trim()))
            .collect();

        if !open.is_empty() {
            results.insert(host, open);
        }
    }

    Ok(results)
}

fn open_port(entry: &str) -> Option<u16> {
    let mut fields = entry.split('/');
    let port = fields.next()?.trim();
    if fields.next()? != "open" {
        return None;
    }
    port.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(ports: &[u16]) -> BTreeSet<u16> {
        ports.iter().copied().collect()
    }

    #[test]
    fn test_only_open_entries_count() {
        let parsed = parse_grepable("Host: 10.0.0.5 () Ports: 80/open/tcp//http///, 22/closed/tcp//ssh///").unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["10.0.0.5"], set(&[80]));
    }

    #[test]
    fn test_real_nmap_lines() {
        let gnmap = "\
# Nmap 7.94 scan initiated as: nmap -Pn -iL targets.txt -T4 --top-ports 1000 -n --open -oA scan
Host: 192.168.1.10 ()\tStatus: Up
Host: 192.168.1.10 ()\tPorts: 22/open/tcp//ssh//OpenSSH 8.9/, 443/open/tcp//https///, 8080/open/tcp//http-proxy///\tIgnored State: closed (997)
Host: 192.168.1.11 ()\tStatus: Up
Host: 192.168.1.11 ()\tPorts: 3306/filtered/tcp//mysql///\tIgnored State: closed (999)
# Nmap done at Mon Oct 19 12:00:00 2026 -- 2 IP addresses (2 hosts up) scanned in 4.20 seconds
";
        let parsed = parse_grepable(gnmap).unwrap();
        assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["192.168.1.10"]);
        assert_eq!(parsed["192.168.1.10"], set(&[22, 443, 8080]));
    }

    #[test]
    fn test_lines_without_host_or_marker_are_skipped() {
        let parsed = parse_grepable("Ports: 80/open/tcp//http///\nHost: 10.0.0.1 ()\tStatus: Up\ngarbage").unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_malformed_entries_are_ignored() {
        let parsed = parse_grepable("Host: a.example.com ()\tPorts: http/open/tcp, 443, 8443/open/tcp//https-alt///").unwrap();
        assert_eq!(parsed["a.example.com"], set(&[8443]));
    }

    #[test]
    fn test_later_line_replaces_earlier() {
        let parsed = parse_grepable(
            "Host: 10.0.0.9 ()\tPorts: 80/open/tcp//http///\nHost: 10.0.0.9 ()\tPorts: 443/open/tcp//https///",
        )
        .unwrap();
        assert_eq!(parsed["10.0.0.9"], set(&[443]));
    }
}
