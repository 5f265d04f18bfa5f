mod cli;

use clap::{Parser, Subcommand};
use dockscout::client::{ClientConfig, DEFAULT_API_BASE};
use std::time::Duration;
use tracing::Level;

/// Contact analysis for docking poses
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the docking backend
    #[arg(long, global = true, env = "DOCKSCOUT_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Timeout for each backend request, in seconds
    #[arg(long, global = true, default_value_t = 15)]
    timeout: u64,

    /// Verbosity of the program:
    /// -v for info, -vv for debug, and -vvv for trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize the contacts between a receptor and a ligand pose
    Contacts(cli::contacts::Args),
    /// Fetch a run's best result from the backend and summarize every pose
    Fetch(cli::fetch::Args),
    /// Poll the status of a run or batch until it finishes
    Watch(cli::watch::Args),
}

fn main() {
    let args = Cli::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig {
        api_base: args.api_base.clone(),
        timeout: Duration::from_secs(args.timeout),
    };

    match &args.command {
        Commands::Contacts(sub_args) => cli::contacts::run(sub_args),
        Commands::Fetch(sub_args) => cli::fetch::run(sub_args, &config),
        Commands::Watch(sub_args) => cli::watch::run(sub_args, &config),
    }
}
