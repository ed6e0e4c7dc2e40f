use std::path::PathBuf;
use thiserror::Error;

/// A failed external invocation, kept per item instead of aborting the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecError {
    pub name: String,
    pub command: String,
    pub exit_code: Option<i32>,
    pub stderr_tail: String,
}

impl ExecError {
    pub fn new(name: impl Into<String>, command: impl Into<String>, exit_code: Option<i32>, stderr: &str) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            exit_code,
            stderr_tail: tail(stderr, 10),
        }
    }

    pub fn message(&self) -> String {
        match (self.exit_code, self.stderr_tail.is_empty()) {
            (Some(code), true) => format!("exited with status {}", code),
            (Some(code), false) => format!("exited with status {}: {}", code, last_line(&self.stderr_tail)),
            (None, _) => self.stderr_tail.clone(),
        }
    }
}

impl std::fmt::Display for ExecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.message())
    }
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

fn last_line(text: &str) -> &str {
    text.lines().last().unwrap_or_default()
}

#[derive(Error, Debug)]
pub enum ReconError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("could not read input file '{}': {source}", path.display())]
    InputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
