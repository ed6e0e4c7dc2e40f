use crate::{
    cli::{args::{Cli, Commands}, targets},
    config::{ConfigLoader, GlobalConfig, PortCategoryIndex},
    core::{scheduler, state::RunState},
    executors::toolchain,
    organizers::layout,
    plugins::registry::SourceRegistry,
    ui::{printer, progress::ProgressManager},
    utils::logging,
};
use anyhow::Result;

pub async fn run(cli: Cli) -> Result<()> {
    let level = logging::level_from_flags(cli.verbose, cli.debug);
    logging::init(level)?;

    let config = ConfigLoader::load_with_custom_path(cli.config.as_deref())?;

    match &cli.command {
        Commands::Ports(args) => {
            let targets = targets::load(args)?;
            run_ports(&cli, &config, targets).await
        }
        Commands::Subdomains(args) => {
            let targets = targets::load(args)?;
            run_subdomains(&cli, &config, targets).await
        }
    }
}

async fn run_ports(cli: &Cli, config: &GlobalConfig, targets: Vec<String>) -> Result<()> {
    let index = PortCategoryIndex::from_config(&config.port_scan);
    for name in index.category_names() {
        let ports = index.ports_for(name).map(|p| p.len()).unwrap_or(0);
        tracing::debug!("Category {}: {} ports, probes {}", name, ports, index.probes_for(name));
    }
    tracing::info!("{} interesting ports across all categories", index.interesting_ports().len());

    let dirs = layout::prepare_port_dirs(&cli.output, &config.port_scan.base_dir)?;
    toolchain::warn_missing([config.tools.nmap.command.as_str()]);

    let mut state = RunState::new("ports", targets.len());
    let progress = ProgressManager::new();
    scheduler::run_port_pipeline(&targets, &dirs, config, &index, &mut state, &progress).await?;
    progress.finish();

    printer::print_port_summary(&state, &dirs.intensive);
    Ok(())
}

async fn run_subdomains(cli: &Cli, config: &GlobalConfig, targets: Vec<String>) -> Result<()> {
    let registry = SourceRegistry::from_config(config);
    let names = registry.names();
    let dirs = layout::prepare_subdomain_dirs(
        &cli.output,
        &config.subdomains.base_dir,
        &config.subdomains.final_file,
        &names,
    )?;
    toolchain::warn_missing(
        config
            .tools
            .all()
            .into_iter()
            .filter(|(name, _)| *name != "nmap")
            .map(|(_, tool)| tool.command.as_str()),
    );

    let mut state = RunState::new("subdomains", targets.len());
    let progress = ProgressManager::new();
    scheduler::run_subdomain_pipeline(&registry, targets, &dirs, config, &mut state, &progress).await?;
    progress.finish();

    printer::print_subdomain_summary(&state, &dirs.final_file);
    Ok(())
}
