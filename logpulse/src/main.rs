use clap::{Parser, Subcommand};
use logpulse_core::cli;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "logpulse",
    version,
    about = "logpulse: access-log ingestion and per-customer request statistics"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: cli::conf::ConfigCmd,
    },

    /// Tail the access log into the store (default)
    Run {
        /// Path to the logpulse config file
        #[arg(long, default_value = "logpulse.hcl")]
        config: PathBuf,
    },

    /// Print request statistics for a customer or for everyone
    Stats(cli::StatsArgs),

    /// Append synthetic access-log lines to a file
    Generate(cli::GenerateArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Config { cmd }) => cli::conf::run(cmd),
        Some(Command::Run { config }) => cli::run(&config),
        Some(Command::Stats(args)) => cli::stats(args),
        Some(Command::Generate(args)) => cli::generate(args),
        None => cli::run(&PathBuf::from("logpulse.hcl")),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
