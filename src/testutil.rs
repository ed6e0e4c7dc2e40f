//! Stand-ins for the external tools, written as small shell scripts.
//! Scripts are run as `sh <script>` so the test never execs a file it just wrote.

use std::fs;
use std::path::{Path, PathBuf};
use crate::config::ToolConfig;

const ANEW: &str = r#"
[ "$1" = "-q" ] && shift
out="$1"
touch "$out"
while IFS= read -r line; do
  [ -z "$line" ] && continue
  grep -qxF -- "$line" "$out" || printf '%s\n' "$line" >> "$out"
done
"#;

pub fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

pub fn tool(dir: &Path, name: &str, body: &str) -> ToolConfig {
    let path = script(dir, name, body);
    ToolConfig {
        command: format!("sh {}", path.display()),
        args: Vec::new(),
    }
}

/// Appends unseen stdin lines to the file named by its last argument.
pub fn anew(dir: &Path) -> ToolConfig {
    let mut tool = tool(dir, "anew", ANEW);
    tool.args = vec!["-q".to_string()];
    tool
}

/// Prints `lines` regardless of its arguments.
pub fn lister(dir: &Path, name: &str, lines: &[&str]) -> ToolConfig {
    let body: String = lines.iter().map(|l| format!("echo '{}'\n", l)).collect();
    tool(dir, name, &body)
}

pub fn lines_of(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Files left behind by `ScratchFile` in `dir`.
pub fn leftover_scratch(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().starts_with(".targets-"))
                .unwrap_or(false)
        })
        .collect()
}
