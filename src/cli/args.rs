use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "surfacerecon", version, about = "Staged port triage and passive subdomain enumeration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose human output
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Debug logs (implies verbose)
    #[arg(short = 'd', long = "debug", global = true, action = ArgAction::SetTrue)]
    pub debug: bool,

    /// YAML configuration file
    #[arg(short = 'c', long = "config", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory the pipeline's output folder is created in
    #[arg(short = 'o', long = "output", global = true, value_name = "DIR", default_value = ".")]
    pub output: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Quick scan every target, then deep scan hosts with interesting ports
    Ports(TargetArgs),

    /// Enumerate subdomains from passive sources and keep the live ones
    Subdomains(TargetArgs),
}

#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("input").required(true).args(["target", "file"])))]
pub struct TargetArgs {
    /// Single host or domain
    #[arg(short = 't', long = "target", value_name = "TARGET")]
    pub target: Option<String>,

    /// File with one host or domain per line; use '-' to read from stdin
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,
}
