mod app;
mod cli;
mod config;
mod core;
mod executors;
mod organizers;
mod plugins;
mod reporters;
mod ui;
mod utils;

#[cfg(test)]
mod testutil;

use clap::Parser;

/// Crash reports for the run itself. A panic inside a source worker is caught
/// and recorded as that source's failure, so it is only logged.
fn install_panic_hook() {
    human_panic::setup_panic!();
    let report = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| match crate::core::scheduler::isolated_source() {
        Some(source) => tracing::error!("{} panicked: {}", source, info),
        None => report(info),
    }));
}

#[tokio::main]
async fn main() {
    install_panic_hook();

    let cli = cli::args::Cli::parse();
    if let Err(err) = app::run(cli).await {
        eprintln!("fatal: {:#}", err);
        std::process::exit(1);
    }
}
