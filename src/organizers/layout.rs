use crate::core::models::{PortScanDirs, SubdomainDirs};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn prepare_port_dirs(output: &Path, base_dir: &str) -> Result<PortScanDirs> {
    let root = output.join(base_dir);

    let dirs = PortScanDirs {
        root: root.clone(),
        quick: root.join("quick_scan"),
        intensive: root.join("intensive_scan"),
    };

    create_all(&[&dirs.root, &dirs.quick, &dirs.intensive])?;
    verify_writable(&dirs.root)?;

    Ok(dirs)
}

pub fn prepare_subdomain_dirs(
    output: &Path,
    base_dir: &str,
    final_file: &str,
    sources: &[&str],
) -> Result<SubdomainDirs> {
    let root = output.join(base_dir);

    let dirs = SubdomainDirs {
        root: root.clone(),
        final_file: root.join(final_file),
    };

    let mut all = vec![dirs.root.clone()];
    all.extend(sources.iter().map(|s| dirs.source_dir(s)));
    create_all(&all)?;
    verify_writable(&dirs.root)?;

    Ok(dirs)
}

fn create_all<P: AsRef<Path>>(dirs: &[P]) -> Result<()> {
    for dir in dirs {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {:?}", dir))?;
    }
    Ok(())
}

fn verify_writable(path: &Path) -> Result<()> {
    let test_file = path.join(".write_test");
    fs::write(&test_file, b"test")
        .with_context(|| format!("Directory not writable: {:?}", path))?;
    fs::remove_file(&test_file)
        .with_context(|| format!("Failed to remove test file: {:?}", test_file))?;
    Ok(())
}
