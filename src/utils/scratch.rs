use std::io::Write;
use std::path::Path;
use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// A newline-delimited target list on disk for tools that read `-iL`/`-dL`
/// style input files. The file is deleted when the value is dropped, which
/// covers success, error returns and unwinding alike.
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    pub fn with_lines_in<S: AsRef<str>>(dir: &Path, lines: &[S]) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(".targets-")
            .suffix(".txt")
            .tempfile_in(dir)
            .with_context(|| format!("Failed to create scratch file in {:?}", dir))?;

        for line in lines {
            writeln!(file, "{}", line.as_ref())
                .with_context(|| format!("Failed to write scratch file {:?}", file.path()))?;
        }
        file.flush()?;

        tracing::debug!("Scratch file {:?} holds {} lines", file.path(), lines.len());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
