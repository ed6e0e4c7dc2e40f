use async_trait::async_trait;
use anyhow::Result;
use std::path::PathBuf;
use crate::config::ToolConfig;
use crate::executors::command::{quote, CommandResult};

/// Everything an adapter needs besides the targets: where its deduplicated
/// output goes, where scratch files may live, and the dedup filter to pipe into.
#[derive(Debug, Clone)]
pub struct SourceEnv {
    pub output: PathBuf,
    pub scratch_dir: PathBuf,
    pub dedup: ToolConfig,
}

impl SourceEnv {
    /// `anew -q <output>`: appends only lines the output file has not seen.
    /// Runs as its own process downstream of the tool.
    pub fn dedup_filter(&self) -> String {
        self.dedup.command_line(&[&self.output.to_string_lossy()])
    }
}

/// A passive subdomain source. Variants differ only in how they shape the
/// command line around their tool; the exit status recorded is the tool's
/// own, never the dedup filter's.
#[async_trait]
pub trait SubdomainSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn tool(&self) -> &ToolConfig;

    /// Commands the invocation pipes through, checked before spawning.
    fn required_tools(&self, env: &SourceEnv) -> Vec<String> {
        vec![self.tool().command.clone(), env.dedup.command.clone()]
    }

    async fn invoke(&self, targets: &[String], env: &SourceEnv) -> Result<CommandResult>;
}

/// `-d a.com,b.com` style argument for tools taking a comma-joined domain list.
pub fn joined_domains(targets: &[String]) -> String {
    targets.join(",")
}

pub fn quoted_path(path: &std::path::Path) -> String {
    quote(&path.to_string_lossy())
}
