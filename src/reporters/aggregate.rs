use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use crate::config::GlobalConfig;
use crate::core::{errors::ExecError, models::Outcome};
use crate::executors::{command::{execute_pipeline, quote}, toolchain};
use crate::utils::fs::existing_files;

pub const NAME: &str = "aggregate";

/// `cat <files> | sort -u | httpx`: the producer half of the merge. httpx is
/// its last stage, so the producer's exit status is the liveness filter's.
pub fn liveness_command(config: &GlobalConfig, files: &[PathBuf]) -> String {
    let inputs: Vec<String> = files.iter().map(|f| quote(&f.to_string_lossy())).collect();
    format!(
        "cat {} | sort -u | {}",
        inputs.join(" "),
        config.tools.httpx.command_line(&[])
    )
}

/// `anew <final>`: appends only hosts the final file has not seen.
pub fn dedup_command(config: &GlobalConfig, final_file: &Path) -> String {
    config.tools.anew.command_line(&[&final_file.to_string_lossy()])
}

/// Merges whichever source outputs exist, keeps the live ones and appends the
/// unseen survivors to `final_file`. Sources that produced no file are skipped.
pub async fn run(source_outputs: &[PathBuf], final_file: &Path, config: &GlobalConfig) -> Result<Outcome> {
    let existing = existing_files(source_outputs);

    if existing.is_empty() {
        tracing::warn!("No source produced output; nothing to aggregate");
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(final_file)
            .with_context(|| format!("Failed to create {:?}", final_file))?;
        return Ok(Outcome::succeeded(NAME));
    }

    tracing::info!("Aggregating {} of {} source outputs", existing.len(), source_outputs.len());

    if let Err(e) = toolchain::require(NAME, &[&config.tools.httpx.command, &config.tools.anew.command]) {
        return Ok(Outcome::failed(e));
    }

    let producer = liveness_command(config, &existing);
    let consumer = dedup_command(config, final_file);
    let outcome = match execute_pipeline(NAME, &producer, &consumer).await {
        Ok(result) => match result.into_failure() {
            None => Outcome::succeeded(NAME),
            Some(failure) => Outcome::failed(failure),
        },
        Err(e) => Outcome::failed(ExecError::new(NAME, format!("{} | {}", producer, consumer), None, &e.to_string())),
    };

    Ok(outcome)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::models::OutcomeStatus;
    use crate::testutil;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn config(dir: &Path, httpx_body: &str) -> GlobalConfig {
        let mut config = GlobalConfig::default();
        config.tools.httpx = testutil::tool(dir, "httpx", httpx_body);
        config.tools.anew = testutil::anew(dir);
        config
    }

    #[tokio::test]
    async fn test_merge_dedup_and_liveness_filter() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), "grep -vxF b.example.com || true");

        let subfinder = dir.path().join("subfinder.txt");
        let amass = dir.path().join("amass.txt");
        let assetfinder = dir.path().join("assetfinder.txt");
        std::fs::write(&subfinder, "a.example.com\nb.example.com\n").unwrap();
        std::fs::write(&amass, "b.example.com\n").unwrap();
        let final_file = dir.path().join("found_subdomains.txt");

        let outcome = run(&[subfinder, amass, assetfinder], &final_file, &config).await.unwrap();

        assert!(outcome.is_success(), "{:?}", outcome);
        assert_eq!(testutil::lines_of(&final_file), vec!["a.example.com"]);
    }

    #[tokio::test]
    async fn test_every_live_line_survives_and_reruns_add_nothing() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), "cat");

        let one = dir.path().join("one.txt");
        let two = dir.path().join("two.txt");
        std::fs::write(&one, "c.example.com\na.example.com\n").unwrap();
        std::fs::write(&two, "b.example.com\na.example.com\n").unwrap();
        let final_file = dir.path().join("final.txt");

        run(&[one.clone(), two.clone()], &final_file, &config).await.unwrap();
        run(&[one, two], &final_file, &config).await.unwrap();

        assert_eq!(
            testutil::lines_of(&final_file),
            vec!["a.example.com", "b.example.com", "c.example.com"]
        );
    }

    #[tokio::test]
    async fn test_no_source_files_is_not_an_error() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), "cat");
        let final_file = dir.path().join("found_subdomains.txt");

        let outcome = run(
            &[dir.path().join("x/output.txt"), dir.path().join("y/output.txt")],
            &final_file,
            &config,
        )
        .await
        .unwrap();

        assert!(outcome.is_success());
        assert!(final_file.exists());
        assert!(testutil::lines_of(&final_file).is_empty());
    }

    #[tokio::test]
    async fn test_crashed_liveness_filter_is_a_recorded_failure() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), "cat > /dev/null; echo crashed >&2; exit 5");
        let input = dir.path().join("in.txt");
        std::fs::write(&input, "a.example.com\n").unwrap();
        let final_file = dir.path().join("final.txt");

        let outcome = run(&[input], &final_file, &config).await.unwrap();

        let OutcomeStatus::Failed(failure) = outcome.status else {
            panic!("expected aggregate to fail, got {:?}", outcome);
        };
        assert_eq!(failure.exit_code, Some(5));
        assert_eq!(failure.stderr_tail, "crashed");
        assert!(testutil::lines_of(&final_file).is_empty());
    }

    #[tokio::test]
    async fn test_missing_liveness_tool_is_a_recorded_failure() {
        let dir = tempdir().unwrap();
        let mut config = config(dir.path(), "cat");
        config.tools.httpx.command = "definitely-not-httpx-7c1e".to_string();
        let input = dir.path().join("in.txt");
        std::fs::write(&input, "a.example.com\n").unwrap();

        let outcome = run(&[input], &dir.path().join("final.txt"), &config).await.unwrap();
        assert!(!outcome.is_success());
    }
}
