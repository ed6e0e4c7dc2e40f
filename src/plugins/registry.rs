use std::sync::Arc;
use crate::config::GlobalConfig;
use crate::plugins::{amass::Amass, assetfinder::Assetfinder, subfinder::Subfinder, types::SubdomainSource};

/// The fixed set of passive sources, built from the tool config.
pub struct SourceRegistry {
    pub sources: Vec<Arc<dyn SubdomainSource>>,
}

impl SourceRegistry {
    pub fn from_config(config: &GlobalConfig) -> Self {
        let tools = &config.tools;
        Self {
            sources: vec![
                Arc::new(Subfinder { tool: tools.subfinder.clone() }),
                Arc::new(Amass { tool: tools.amass.clone() }),
                Arc::new(Assetfinder { tool: tools.assetfinder.clone() }),
            ],
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn log_summary(&self) {
        tracing::info!("Source registry: {} passive sources", self.sources.len());
        for source in &self.sources {
            tracing::info!("  - {} ({})", source.name(), source.tool().command);
        }
    }
}
