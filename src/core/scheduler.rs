use std::sync::Arc;
use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use super::{errors::ExecError, events::Event, models::{Outcome, PortScanDirs, SubdomainDirs}, state::RunState};
use crate::config::{GlobalConfig, PortCategoryIndex};
use crate::executors::toolchain;
use crate::plugins::{portscan_intensive::IntensiveScan, portscan_quick::QuickScan, registry::SourceRegistry, types::SourceEnv};
use crate::reporters::aggregate;
use crate::ui::progress::ProgressManager;

tokio::task_local! {
    static ISOLATED_SOURCE: &'static str;
}

/// Name of the source whose worker is running on the current task, if any.
/// A panic raised there is caught and recorded by `run_sources`, so the panic
/// hook can log it instead of treating it as a crash of the whole run.
pub fn isolated_source() -> Option<&'static str> {
    ISOLATED_SOURCE.try_with(|name| *name).ok()
}

/// Runs every source at once, one worker per source, and waits for all of
/// them. A failing, missing or panicking source only affects its own outcome.
pub async fn run_sources(
    registry: &SourceRegistry,
    targets: Arc<Vec<String>>,
    dirs: &SubdomainDirs,
    config: &GlobalConfig,
    progress: &ProgressManager,
) -> Vec<Outcome> {
    let workers = Arc::new(Semaphore::new(registry.sources.len().max(1)));
    let mut running = FuturesUnordered::new();

    tracing::info!("Starting {} sources in parallel", registry.sources.len());

    for source in &registry.sources {
        let source = Arc::clone(source);
        let targets = Arc::clone(&targets);
        let workers = Arc::clone(&workers);
        let name = source.name();
        let env = SourceEnv {
            output: dirs.source_output(name),
            scratch_dir: dirs.scratch().to_path_buf(),
            dedup: config.tools.anew.clone(),
        };

        let handle = tokio::spawn(ISOLATED_SOURCE.scope(name, async move {
            let _permit = workers
                .acquire_owned()
                .await
                .map_err(|e| ExecError::new(name, "", None, &e.to_string()))?;

            let tools = source.required_tools(&env);
            let tools: Vec<&str> = tools.iter().map(String::as_str).collect();
            toolchain::require(name, &tools)?;

            tracing::info!("Starting source: {}", name);
            let result = source
                .invoke(&targets, &env)
                .await
                .map_err(|e| ExecError::new(name, "", None, &format!("{:#}", e)))?;

            match result.into_failure() {
                None => Ok::<(), ExecError>(()),
                Some(failure) => Err(failure),
            }
        }));

        running.push(async move { (name, handle.await) });
    }

    // Barrier: nothing is returned until every source has finished
    let mut outcomes = Vec::with_capacity(registry.sources.len());
    while let Some((name, joined)) = running.next().await {
        let outcome = match joined {
            Ok(Ok(())) => Outcome::succeeded(name),
            Ok(Err(failure)) => Outcome::failed(failure),
            Err(join_err) => Outcome::failed(ExecError::new(name, "", None, &format!("worker aborted: {}", join_err))),
        };
        progress.report(&outcome);
        outcomes.push(outcome);
    }

    outcomes
}

pub async fn run_subdomain_pipeline(
    registry: &SourceRegistry,
    targets: Vec<String>,
    dirs: &SubdomainDirs,
    config: &GlobalConfig,
    state: &mut RunState,
    progress: &ProgressManager,
) -> Result<()> {
    registry.log_summary();

    state.on_event(Event::StageStarted("enumerate"));
    progress.stage("Enumerating subdomains");
    for outcome in run_sources(registry, Arc::new(targets), dirs, config, progress).await {
        state.record(outcome);
    }

    state.on_event(Event::StageStarted("aggregate"));
    progress.stage("Aggregating results");
    let outputs: Vec<_> = registry.names().iter().map(|name| dirs.source_output(name)).collect();
    let outcome = aggregate::run(&outputs, &dirs.final_file, config).await?;
    progress.report(&outcome);
    state.record(outcome);

    Ok(())
}

/// Why the port pipeline stops after the quick scan: either the scan ran and
/// found nothing worth escalating, or it failed and there is nothing to read.
pub fn no_hosts_message(quick_outcomes: &[Outcome]) -> &'static str {
    if quick_outcomes.iter().any(|o| !o.is_success()) {
        "Quick scan failed - no hosts to escalate"
    } else {
        "No interesting hosts found - quick scan is sufficient"
    }
}

/// Quick scan of everything, then one intensive scan per interesting host, in order.
pub async fn run_port_pipeline(
    targets: &[String],
    dirs: &PortScanDirs,
    config: &GlobalConfig,
    index: &PortCategoryIndex,
    state: &mut RunState,
    progress: &ProgressManager,
) -> Result<()> {
    state.on_event(Event::StageStarted("quick scan"));
    progress.stage("Performing initial quick scan");

    let before = state.outcomes.len();
    let hosts = match QuickScan.run(targets, dirs, config, index, state).await {
        Ok(hosts) => hosts,
        Err(e) => {
            state.on_event(Event::TaskFailed(ExecError::new(QuickScan::NAME, "", None, &format!("{:#}", e))));
            Vec::new()
        }
    };
    let quick_outcomes = &state.outcomes[before..];
    for outcome in quick_outcomes {
        progress.report(outcome);
    }

    if hosts.is_empty() {
        progress.stage(no_hosts_message(quick_outcomes));
        return Ok(());
    }

    state.on_event(Event::StageStarted("intensive scan"));
    progress.stage("Performing intensive scan on interesting hosts");

    for host in hosts {
        progress.update(&IntensiveScan::task_name(&host));
        let outcome = IntensiveScan
            .run(&host, dirs, config, index)
            .await
            .unwrap_or_else(|e| Outcome::failed(ExecError::new(IntensiveScan::task_name(&host), "", None, &format!("{:#}", e))));
        progress.report(&outcome);
        state.on_event(Event::HostEscalated(host));
        state.record(outcome);
    }

    Ok(())
}
