use async_trait::async_trait;
use anyhow::Result;
use crate::config::ToolConfig;
use crate::executors::command::{execute_pipeline, quote, CommandResult};
use crate::plugins::types::{joined_domains, SourceEnv, SubdomainSource};

#[derive(Debug, Clone)]
pub struct Amass {
    pub tool: ToolConfig,
}

#[async_trait]
impl SubdomainSource for Amass {
    fn name(&self) -> &'static str {
        "amass"
    }

    fn tool(&self) -> &ToolConfig {
        &self.tool
    }

    async fn invoke(&self, targets: &[String], env: &SourceEnv) -> Result<CommandResult> {
        // amass takes the whole list inline, no scratch file needed
        let producer = format!("{} -d {}", self.tool.command_line(&[]), quote(&joined_domains(targets)));
        Ok(execute_pipeline(self.name(), &producer, &env.dedup_filter()).await?)
    }
}
