use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use crate::config::{GlobalConfig, PortCategoryIndex};
use crate::core::{errors::ExecError, events::Event, models::{InterestingHost, PortScanDirs}, parser, state::RunState};
use crate::executors::{command::execute, toolchain};
use crate::utils::scratch::ScratchFile;

/// Broad, cheap scan of every target: top ports, fast timing, open ports only.
pub struct QuickScan;

impl QuickScan {
    pub const NAME: &'static str = "quick scan";

    pub fn command_line(config: &GlobalConfig, targets_file: &Path, prefix: &Path) -> String {
        let scan = &config.port_scan;
        let top_ports = scan.top_ports.to_string();
        let timing = format!("-{}", scan.timing);
        config.tools.nmap.command_line(&[
            "-Pn",
            "-iL",
            &targets_file.to_string_lossy(),
            &timing,
            "--top-ports",
            &top_ports,
            "-n",
            "--open",
            "-oA",
            &prefix.to_string_lossy(),
        ])
    }

    /// Scans all targets in one invocation and returns the hosts worth a deep scan.
    pub async fn run(
        &self,
        targets: &[String],
        dirs: &PortScanDirs,
        config: &GlobalConfig,
        index: &PortCategoryIndex,
        state: &mut RunState,
    ) -> Result<Vec<InterestingHost>> {
        if let Err(e) = toolchain::require(Self::NAME, &[&config.tools.nmap.command]) {
            state.on_event(Event::TaskFailed(e));
            return Ok(Vec::new());
        }

        let grepable = dirs.quick_grepable();
        if grepable.exists() {
            // A stale file would be mistaken for this run's output
            std::fs::remove_file(&grepable)
                .with_context(|| format!("Failed to remove stale scan output {:?}", grepable))?;
        }

        let result = {
            let scratch = ScratchFile::with_lines_in(dirs.scratch(), targets)?;
            let cmd = Self::command_line(config, scratch.path(), &dirs.quick_prefix());
            execute(Self::NAME, &cmd).await
        };

        let succeeded = match result {
            Ok(result) => match result.into_failure() {
                None => true,
                Some(failure) => {
                    state.on_event(Event::TaskFailed(failure));
                    false
                }
            },
            Err(e) => {
                state.on_event(Event::TaskFailed(ExecError::new(Self::NAME, "", None, &e.to_string())));
                false
            }
        };

        if !grepable.exists() {
            if succeeded {
                state.on_event(Event::TaskFailed(ExecError::new(
                    Self::NAME,
                    "",
                    None,
                    &format!("grepable output {:?} was not written", grepable),
                )));
            }
            return Ok(Vec::new());
        }
        if succeeded {
            state.on_event(Event::TaskCompleted(Self::NAME.to_string()));
        }

        let content = std::fs::read_to_string(&grepable)
            .with_context(|| format!("Failed to read {:?}", grepable))?;
        let parsed = parser::parse_grepable(&content)?;
        tracing::info!("Quick scan found open ports on {} hosts", parsed.len());

        Ok(classify(parsed, index))
    }
}

/// Keeps hosts whose open ports intersect the interesting set, recording
/// exactly that intersection.
pub fn classify(parsed: BTreeMap<String, BTreeSet<u16>>, index: &PortCategoryIndex) -> Vec<InterestingHost> {
    let interesting = index.interesting_ports();

    parsed
        .into_iter()
        .filter_map(|(host, open)| {
            let interesting_ports: BTreeSet<u16> = open.intersection(interesting).copied().collect();
            if interesting_ports.is_empty() {
                tracing::debug!("{} needs no deeper scan", host);
                return None;
            }
            Some(InterestingHost { host, interesting_ports })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::PortScanConfig;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn index() -> PortCategoryIndex {
        PortCategoryIndex::from_config(&PortScanConfig::default())
    }

    #[test]
    fn test_example_line_yields_port_80() {
        let parsed = parser::parse_grepable("Host: 10.0.0.5 () Ports: 80/open/tcp//http///, 22/closed/tcp//ssh///").unwrap();
        let hosts = classify(parsed, &index());
        assert_eq!(
            hosts,
            vec![InterestingHost {
                host: "10.0.0.5".to_string(),
                interesting_ports: [80].into_iter().collect(),
            }]
        );
    }

    #[test]
    fn test_uninteresting_hosts_are_dropped() {
        let mut parsed = BTreeMap::new();
        parsed.insert("ssh-only".to_string(), [22].into_iter().collect());
        parsed.insert("mixed".to_string(), [22, 3306, 9418].into_iter().collect());
        let hosts = classify(parsed, &index());

        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].host, "mixed");
        assert_eq!(hosts[0].port_list(), "3306,9418");
    }

    #[test]
    fn test_command_line_flags() {
        let config = GlobalConfig::default();
        let cmd = QuickScan::command_line(&config, Path::new("/tmp/t.txt"), Path::new("out/quick_scan/scan"));
        assert_eq!(
            shell_words::split(&cmd).unwrap(),
            vec!["nmap", "-Pn", "-iL", "/tmp/t.txt", "-T4", "--top-ports", "1000", "-n", "--open", "-oA", "out/quick_scan/scan"]
        );
    }

    proptest! {
        #[test]
        fn prop_interesting_iff_intersection(open in proptest::collection::btree_set(1u16..12000, 0..20)) {
            let index = index();
            let mut parsed = BTreeMap::new();
            parsed.insert("h".to_string(), open.clone());
            let hosts = classify(parsed, &index);

            let expected: BTreeSet<u16> = open.intersection(index.interesting_ports()).copied().collect();
            if expected.is_empty() {
                prop_assert!(hosts.is_empty());
            } else {
                prop_assert_eq!(hosts.len(), 1);
                prop_assert_eq!(&hosts[0].interesting_ports, &expected);
            }
        }
    }
}
