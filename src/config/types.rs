use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub tools: ToolsConfig,
    pub port_scan: PortScanConfig,
    pub subdomains: SubdomainConfig,
}

/// An external collaborator: the command to run and the flags it always gets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToolConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ToolConfig {
    pub fn new(command: &str, args: &[&str]) -> Self {
        Self {
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Renders `command args... extra...` with every argument shell-quoted.
    /// The command itself is inserted verbatim so it may carry its own flags.
    pub fn command_line(&self, extra: &[&str]) -> String {
        let mut words = vec![self.command.clone()];
        words.extend(self.args.iter().map(|a| crate::executors::command::quote(a)));
        words.extend(extra.iter().map(|a| crate::executors::command::quote(a)));
        words.join(" ")
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub nmap: ToolConfig,
    pub subfinder: ToolConfig,
    pub amass: ToolConfig,
    pub assetfinder: ToolConfig,
    pub httpx: ToolConfig,
    pub anew: ToolConfig,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            nmap: ToolConfig::new("nmap", &[]),
            subfinder: ToolConfig::new("subfinder", &["-silent"]),
            amass: ToolConfig::new("amass", &["enum", "-passive", "-silent"]),
            assetfinder: ToolConfig::new("assetfinder", &["-subs-only"]),
            httpx: ToolConfig::new("httpx", &["-silent"]),
            anew: ToolConfig::new("anew", &["-q"]),
        }
    }
}

impl ToolsConfig {
    pub fn all(&self) -> [(&'static str, &ToolConfig); 6] {
        [
            ("nmap", &self.nmap),
            ("subfinder", &self.subfinder),
            ("amass", &self.amass),
            ("assetfinder", &self.assetfinder),
            ("httpx", &self.httpx),
            ("anew", &self.anew),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PortScanConfig {
    pub base_dir: String,
    pub top_ports: u32,
    pub timing: String,
    pub fallback_probes: String,
    pub categories: Vec<CategoryConfig>,
}

impl Default for PortScanConfig {
    fn default() -> Self {
        Self {
            base_dir: "port_enumeration".to_string(),
            top_ports: 1000,
            timing: "T4".to_string(),
            fallback_probes: "default".to_string(),
            categories: default_categories(),
        }
    }
}

/// One port category. Ports may repeat across categories; a category without
/// probes still marks its ports as interesting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategoryConfig {
    pub name: String,
    pub ports: Vec<u16>,
    #[serde(default)]
    pub probes: Option<String>,
}

impl CategoryConfig {
    fn new(name: &str, ports: &[u16], probes: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            ports: ports.to_vec(),
            probes: probes.map(str::to_string),
        }
    }
}

fn default_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig::new(
            "web",
            &[80, 81, 443, 3000, 3001, 5000, 8000, 8080, 8081, 8443, 8888, 9000],
            Some("http-title,http-headers,http-methods,http-enum"),
        ),
        CategoryConfig::new(
            "database",
            &[1433, 1521, 3306, 5432, 6379, 27017, 9200],
            Some("mysql-info,mongodb-info,redis-info"),
        ),
        CategoryConfig::new("cloud", &[2375, 2376, 6443, 10250], Some("docker-info,kubernetes-info")),
        CategoryConfig::new("cms", &[2082, 2083, 2222, 7001, 7002], None),
        CategoryConfig::new("ci/cd", &[8080, 9000, 7990, 3000], None),
        CategoryConfig::new("version control", &[9418, 3690], None),
        CategoryConfig::new("debug", &[5005, 9222, 5858], Some("banner")),
    ]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SubdomainConfig {
    pub base_dir: String,
    pub final_file: String,
}

impl Default for SubdomainConfig {
    fn default() -> Self {
        Self {
            base_dir: "subdomain_enumeration".to_string(),
            final_file: "found_subdomains.txt".to_string(),
        }
    }
}
