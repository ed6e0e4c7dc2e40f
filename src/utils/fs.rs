use std::path::{Path, PathBuf};
use regex::Regex;
use anyhow::Result;

/// Keeps only the paths that exist on disk; absent ones are skipped silently.
pub fn existing_files<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    paths
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| {
            let exists = p.is_file();
            if !exists {
                tracing::debug!("Skipping absent file {:?}", p);
            }
            exists
        })
        .map(Path::to_path_buf)
        .collect()
}

/// Replace characters that aren't safe for filenames
pub fn sanitize_filename(name: &str) -> Result<String> {
    let re = Regex::new(r"[^a-zA-Z0-9\-_\.]")?;
    Ok(re.replace_all(name, "_").to_string())
}

pub fn count_lines(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .map(|content| content.lines().filter(|l| !l.trim().is_empty()).count())
        .unwrap_or(0)
}
