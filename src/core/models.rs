use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use crate::core::errors::ExecError;

#[derive(Clone, Debug)]
pub struct PortScanDirs {
    pub root: PathBuf,    // <out>/port_enumeration
    pub quick: PathBuf,
    pub intensive: PathBuf,
}

impl PortScanDirs {
    /// Output prefix handed to `-oA`; nmap appends `.gnmap`, `.nmap` and `.xml`.
    pub fn quick_prefix(&self) -> PathBuf {
        self.quick.join("scan")
    }

    pub fn quick_grepable(&self) -> PathBuf {
        self.quick.join("scan.gnmap")
    }

    pub fn intensive_report(&self, file_stem: &str) -> PathBuf {
        self.intensive.join(format!("{}.nmap", file_stem))
    }

    pub fn scratch(&self) -> &Path {
        &self.root
    }
}

#[derive(Clone, Debug)]
pub struct SubdomainDirs {
    pub root: PathBuf,    // <out>/subdomain_enumeration
    pub final_file: PathBuf,
}

impl SubdomainDirs {
    pub fn source_dir(&self, source: &str) -> PathBuf {
        self.root.join(source)
    }

    pub fn source_output(&self, source: &str) -> PathBuf {
        self.source_dir(source).join("output.txt")
    }

    pub fn scratch(&self) -> &Path {
        &self.root
    }
}

/// A host worth a deep scan, with its open ports that fall in at least one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterestingHost {
    pub host: String,
    pub interesting_ports: BTreeSet<u16>,
}

impl InterestingHost {
    pub fn port_list(&self) -> String {
        self.interesting_ports
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutcomeStatus {
    Succeeded,
    Failed(ExecError),
}

/// Result of one external invocation (a source, a scan, the aggregation).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub name: String,
    pub status: OutcomeStatus,
}

impl Outcome {
    pub fn succeeded(name: impl Into<String>) -> Self {
        Self { name: name.into(), status: OutcomeStatus::Succeeded }
    }

    pub fn failed(error: ExecError) -> Self {
        Self { name: error.name.clone(), status: OutcomeStatus::Failed(error) }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Succeeded)
    }
}
