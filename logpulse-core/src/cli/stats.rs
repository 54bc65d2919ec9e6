use crate::conf::load_config;
use crate::logging::{LogTarget, init_logging};
use crate::runtime::{build_runtime, open_store};
use crate::stats::{LookupError, StatsEngine, StatsResult, parse_from_date};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// Path to the config file
    #[arg(long, default_value = "logpulse.hcl")]
    pub config: PathBuf,

    /// Customer to report on
    #[arg(long, required_unless_present = "all", conflicts_with = "all")]
    pub customer: Option<String>,

    /// Report on every customer
    #[arg(long)]
    pub all: bool,

    /// First day of the window, YYYY-MM-DD
    #[arg(long)]
    pub from_date: String,
}

/// Exit code for a rejected `--from-date`.
pub const EXIT_INVALID_DATE: i32 = 2;

/// Exit code for an unknown customer selector.
pub const EXIT_NOT_FOUND: i32 = 1;

/// Print statistics as JSON on stdout. Logs go to stderr.
pub fn stats(args: StatsArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let guard = init_logging(&config.logging, LogTarget::Stderr)?;

    let from_date = match parse_from_date(&args.from_date, Utc::now().date_naive()) {
        Ok(date) => date,
        Err(err) => {
            eprintln!("error: {err}");
            drop(guard);
            std::process::exit(EXIT_INVALID_DATE);
        }
    };

    let store = open_store(&config.store)?;
    let engine = StatsEngine::new(store, config.store.measurement.clone(), config.stats.window);

    let runtime = build_runtime().context("failed to build Tokio runtime")?;
    let result = runtime.block_on(async {
        match &args.customer {
            Some(customer) if !args.all => engine.get_stats(customer, from_date).await,
            _ => engine.get_all_stats(from_date).await,
        }
    });

    match result {
        Ok(stats) => {
            println!("{}", render(&stats)?);
            Ok(())
        }
        Err(err) => {
            eprintln!("not found: {}", not_found_reason(&err));
            drop(runtime);
            drop(guard);
            std::process::exit(EXIT_NOT_FOUND);
        }
    }
}

pub fn render(stats: &StatsResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(stats)
}

fn not_found_reason(err: &LookupError) -> String {
    match err {
        LookupError::InvalidCustomer { input } => format!("no such customer '{input}'"),
        other => other.to_string(),
    }
}
