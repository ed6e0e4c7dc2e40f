use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use super::types::GlobalConfig;
use crate::core::errors::ReconError;

const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "./surfacerecon.yaml",
    "./config/surfacerecon.yaml",
];

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from an explicit path, else the default locations,
    /// else built-in defaults
    pub fn load_with_custom_path(custom_path: Option<&Path>) -> Result<GlobalConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(ReconError::Config(format!("config file not found: {}", path.display())).into());
            }
            return Self::load_from_file(path)
                .with_context(|| format!("Failed to load config from custom path: {:?}", path));
        }

        for path in Self::candidate_paths() {
            if path.exists() {
                let config = Self::load_from_file(&path)
                    .with_context(|| format!("Failed to load config from {:?}", path))?;
                tracing::info!("Loaded configuration from: {:?}", path);
                return Ok(config);
            }
        }

        tracing::info!("No configuration file found, using default settings");
        Ok(GlobalConfig::default())
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from).collect();
        if let Some(dirs) = ProjectDirs::from("", "", "surfacerecon") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }
        paths
    }

    fn load_from_file(path: &Path) -> Result<GlobalConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: GlobalConfig = serde_yaml::from_str(&content)
            .map_err(ReconError::from)
            .with_context(|| format!("Failed to parse YAML config: {:?}", path))?;

        Self::validate_config(&config)?;

        Ok(config)
    }

    pub fn validate_config(config: &GlobalConfig) -> Result<(), ReconError> {
        let invalid = |msg: String| Err(ReconError::Config(msg));

        for (name, tool) in config.tools.all() {
            if tool.command.trim().is_empty() {
                return invalid(format!("{} command cannot be empty", name));
            }
        }

        let scan = &config.port_scan;
        if scan.top_ports == 0 {
            return invalid("top_ports must be greater than 0".to_string());
        }
        if scan.fallback_probes.trim().is_empty() {
            return invalid("fallback_probes cannot be empty".to_string());
        }
        if scan.categories.is_empty() {
            return invalid("at least one port category is required".to_string());
        }

        let mut seen = HashSet::new();
        for category in &scan.categories {
            if category.name.trim().is_empty() {
                return invalid("category names cannot be empty".to_string());
            }
            if !seen.insert(category.name.as_str()) {
                return invalid(format!("duplicate category: {}", category.name));
            }
            if category.ports.is_empty() {
                return invalid(format!("category '{}' has no ports", category.name));
            }
            if category.ports.contains(&0) {
                return invalid(format!("category '{}': port 0 is not valid", category.name));
            }
        }

        for (name, dir) in [("port_scan", &scan.base_dir), ("subdomains", &config.subdomains.base_dir)] {
            if dir.trim().is_empty() {
                return invalid(format!("{} base_dir cannot be empty", name));
            }
        }
        if config.subdomains.final_file.trim().is_empty() {
            return invalid("subdomains final_file cannot be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = GlobalConfig::default();
        ConfigLoader::validate_config(&config).unwrap();
        assert_eq!(config.port_scan.top_ports, 1000);
        assert_eq!(config.tools.nmap.command, "nmap");
        assert_eq!(config.subdomains.final_file, "found_subdomains.txt");
    }

    #[test]
    fn test_load_partial_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let config_content = r#"
tools:
  amass:
    command: /opt/amass/amass
    args: [enum, -passive]
port_scan:
  top_ports: 100
  categories:
    - name: web
      ports: [80, 443]
      probes: http-title
"#;
        fs::write(&temp_file, config_content).unwrap();

        let config = ConfigLoader::load_with_custom_path(Some(temp_file.path())).unwrap();
        assert_eq!(config.tools.amass.command, "/opt/amass/amass");
        assert_eq!(config.tools.amass.args, vec!["enum", "-passive"]);
        assert_eq!(config.tools.subfinder.command, "subfinder");
        assert_eq!(config.port_scan.top_ports, 100);
        assert_eq!(config.port_scan.timing, "T4");
        assert_eq!(config.port_scan.categories.len(), 1);
        assert_eq!(config.subdomains.base_dir, "subdomain_enumeration");
    }

    #[test]
    fn test_validation_errors() {
        let temp_file = NamedTempFile::new().unwrap();
        let invalid_config = r#"
port_scan:
  categories:
    - name: web
      ports: [80]
    - name: web
      ports: [443]
"#;
        fs::write(&temp_file, invalid_config).unwrap();

        let result = ConfigLoader::load_with_custom_path(Some(temp_file.path()));
        let err = format!("{:#}", result.unwrap_err());
        assert!(err.contains("duplicate category: web"), "{}", err);
    }

    #[test]
    fn test_empty_command_rejected() {
        let mut config = GlobalConfig::default();
        config.tools.httpx.command = " ".to_string();
        let err = ConfigLoader::validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("httpx command cannot be empty"));
    }

    #[test]
    fn test_missing_custom_path_is_an_error() {
        let result = ConfigLoader::load_with_custom_path(Some(Path::new("/nonexistent/surfacerecon.yaml")));
        assert!(result.is_err());
    }
}
