use crate::core::errors::ExecError;
use std::collections::BTreeSet;
use which::which;

/// Binary name of a configured command, e.g. `/opt/bin/amass` for `"/opt/bin/amass -v"`.
pub fn binary_of(command: &str) -> Option<String> {
    shell_words::split(command)
        .ok()
        .and_then(|words| words.into_iter().next())
}

/// Returns the tools that cannot be found, in a stable order.
pub fn missing<'a, I>(tools: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut missing = BTreeSet::new();

    for tool in tools {
        let Some(binary) = binary_of(tool) else {
            missing.insert(tool.to_string());
            continue;
        };
        match which(&binary) {
            Ok(path) => {
                tracing::debug!("Found {}: {:?}", binary, path);
            }
            Err(_) => {
                missing.insert(binary);
            }
        }
    }

    missing.into_iter().collect()
}

/// Per-item check run right before an invocation; a missing binary becomes
/// that item's failure instead of a shell "not found" buried in a pipe.
pub fn require(item: &str, commands: &[&str]) -> Result<(), ExecError> {
    let missing = missing(commands.iter().copied());
    if missing.is_empty() {
        return Ok(());
    }
    Err(ExecError::new(item, commands.join(" | "), None, &format!("missing tool: {}", missing.join(", "))))
}

/// Preflight: warns about missing tools without stopping the run; the items
/// that need them fail individually later.
pub fn warn_missing<'a, I>(tools: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let missing = missing(tools);
    if missing.is_empty() {
        tracing::info!("All required tools found");
    } else {
        tracing::warn!(
            "Missing tools: {}. Steps that depend on them will be reported as failed",
            missing.join(", ")
        );
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_of_takes_first_word() {
        assert_eq!(binary_of("amass"), Some("amass".to_string()));
        assert_eq!(binary_of("'/opt/my tools/httpx' -v"), Some("/opt/my tools/httpx".to_string()));
        assert_eq!(binary_of(""), None);
    }

    #[test]
    fn test_missing_reports_unknown_binaries() {
        let missing = missing(["sh", "definitely-not-a-real-tool-3f9a"]);
        assert_eq!(missing, vec!["definitely-not-a-real-tool-3f9a".to_string()]);
    }

    #[test]
    fn test_require_names_the_item() {
        assert!(require("aggregate", &["sh", "cat"]).is_ok());
        let err = require("amass", &["definitely-not-a-real-tool-3f9a enum", "sh"]).unwrap_err();
        assert_eq!(err.name, "amass");
        assert_eq!(err.exit_code, None);
        assert_eq!(err.message(), "missing tool: definitely-not-a-real-tool-3f9a");
    }
}
