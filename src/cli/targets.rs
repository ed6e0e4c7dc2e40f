use std::io::BufRead;
use std::path::Path;
use crate::cli::args::TargetArgs;
use crate::core::errors::ReconError;

/// Resolves `--target` / `--file` (or stdin for `-f -`) into the target list.
pub fn load(args: &TargetArgs) -> Result<Vec<String>, ReconError> {
    let targets = match (&args.target, &args.file) {
        (Some(target), _) => from_lines(std::io::Cursor::new(target.as_bytes()))?,
        (None, Some(file)) if file.as_os_str() == "-" => from_lines(std::io::stdin().lock())?,
        (None, Some(file)) => from_file(file)?,
        (None, None) => return Err(ReconError::Config("either --target or --file is required".to_string())),
    };

    if targets.is_empty() {
        return Err(ReconError::Config("no targets given".to_string()));
    }

    tracing::info!("Loaded {} targets", targets.len());
    Ok(targets)
}

fn from_file(path: &Path) -> Result<Vec<String>, ReconError> {
    let file = std::fs::File::open(path).map_err(|source| ReconError::InputFile {
        path: path.to_path_buf(),
        source,
    })?;
    from_lines(std::io::BufReader::new(file)).map_err(|e| match e {
        ReconError::Io(source) => ReconError::InputFile { path: path.to_path_buf(), source },
        other => other,
    })
}

/// One target per line, trimmed; blank lines dropped.
pub fn from_lines<R: BufRead>(reader: R) -> Result<Vec<String>, ReconError> {
    let mut targets = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            targets.push(line.to_string());
        }
    }
    Ok(targets)
}
