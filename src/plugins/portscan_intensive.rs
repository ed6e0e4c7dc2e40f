use anyhow::Result;
use std::path::Path;
use crate::config::{GlobalConfig, PortCategoryIndex};
use crate::core::{errors::ExecError, models::{InterestingHost, Outcome, PortScanDirs}};
use crate::executors::{command::execute, toolchain};
use crate::utils::fs::sanitize_filename;

/// Deep scan of one interesting host, restricted to its interesting ports and
/// probing with the script sets of the categories those ports belong to.
pub struct IntensiveScan;

impl IntensiveScan {
    pub fn task_name(host: &InterestingHost) -> String {
        format!("intensive scan - {}", host.host)
    }

    pub fn command_line(config: &GlobalConfig, host: &InterestingHost, probes: &str, report: &Path) -> String {
        let script = format!("--script={}", probes);
        config.tools.nmap.command_line(&[
            "-Pn",
            "-sV",
            "-sC",
            &script,
            "-p",
            &host.port_list(),
            &host.host,
            "-oN",
            &report.to_string_lossy(),
        ])
    }

    pub async fn run(
        &self,
        host: &InterestingHost,
        dirs: &PortScanDirs,
        config: &GlobalConfig,
        index: &PortCategoryIndex,
    ) -> Result<Outcome> {
        let name = Self::task_name(host);

        if let Err(e) = toolchain::require(&name, &[&config.tools.nmap.command]) {
            return Ok(Outcome::failed(e));
        }

        let probes = index.select_probes(&host.interesting_ports);
        let matched: Vec<&str> = index.matching_categories(&host.interesting_ports).collect();
        tracing::info!("{}: categories [{}], probes {}", host.host, matched.join(", "), probes);

        let report = dirs.intensive_report(&sanitize_filename(&host.host)?);
        let cmd = Self::command_line(config, host, &probes, &report);

        let outcome = match execute(&name, &cmd).await {
            Ok(result) => match result.into_failure() {
                None => Outcome::succeeded(name),
                Some(failure) => Outcome::failed(failure),
            },
            Err(e) => Outcome::failed(ExecError::new(name, cmd, None, &e.to_string())),
        };

        Ok(outcome)
    }
}
