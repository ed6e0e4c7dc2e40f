use async_trait::async_trait;
use anyhow::Result;
use crate::config::ToolConfig;
use crate::executors::command::{execute_pipeline, CommandResult};
use crate::plugins::types::{quoted_path, SourceEnv, SubdomainSource};
use crate::utils::scratch::ScratchFile;

/// One tool run per target, driven by a shell loop over the scratch file.
#[derive(Debug, Clone)]
pub struct Assetfinder {
    pub tool: ToolConfig,
}

#[async_trait]
impl SubdomainSource for Assetfinder {
    fn name(&self) -> &'static str {
        "assetfinder"
    }

    fn tool(&self) -> &ToolConfig {
        &self.tool
    }

    async fn invoke(&self, targets: &[String], env: &SourceEnv) -> Result<CommandResult> {
        let scratch = ScratchFile::with_lines_in(&env.scratch_dir, targets)?;
        // The loop exits with the last failing run's status, so one bad domain fails the source
        let producer = format!(
            "status=0; while IFS= read -r domain; do {} \"$domain\" < /dev/null || status=$?; done < {}; exit $status",
            self.tool.command_line(&[]),
            quoted_path(scratch.path())
        );
        Ok(execute_pipeline(self.name(), &producer, &env.dedup_filter()).await?)
    }
}
