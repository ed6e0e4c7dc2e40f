use async_trait::async_trait;
use anyhow::Result;
use crate::config::ToolConfig;
use crate::executors::command::{execute_pipeline, CommandResult};
use crate::plugins::types::{quoted_path, SourceEnv, SubdomainSource};
use crate::utils::scratch::ScratchFile;

/// Batch invocation over a target list file (`-dL`).
#[derive(Debug, Clone)]
pub struct Subfinder {
    pub tool: ToolConfig,
}

#[async_trait]
impl SubdomainSource for Subfinder {
    fn name(&self) -> &'static str {
        "subfinder"
    }

    fn tool(&self) -> &ToolConfig {
        &self.tool
    }

    async fn invoke(&self, targets: &[String], env: &SourceEnv) -> Result<CommandResult> {
        let scratch = ScratchFile::with_lines_in(&env.scratch_dir, targets)?;
        let producer = format!("{} -dL {}", self.tool.command_line(&[]), quoted_path(scratch.path()));
        Ok(execute_pipeline(self.name(), &producer, &env.dedup_filter()).await?)
    }
}
