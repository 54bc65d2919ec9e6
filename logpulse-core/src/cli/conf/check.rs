use crate::conf::{ConfigError, LogpulseConfig, StoreKind, ValidationReport, load_config, validate_config};
use std::path::PathBuf;

pub fn check(path: PathBuf, plain: bool) -> anyhow::Result<()> {
    match load_config(&path) {
        Ok(cfg) => {
            println!("✔ Config loaded successfully");
            print_summary(&cfg);

            let report = validate_config(&cfg);
            if !report.warnings.is_empty() {
                println!();
                print_report(&report, plain);
            }
            Ok(())
        }
        Err(err) => {
            print_config_error(err, plain);
            std::process::exit(1);
        }
    }
}

fn print_summary(cfg: &LogpulseConfig) {
    println!("✔ tailing {}", cfg.source.path.display());
    println!(
        "✔ batches of up to {} events or {} ms",
        cfg.batch.max_size, cfg.batch.max_latency_ms
    );
    println!(
        "✔ {} writers, chunks of {} events, {} retries",
        cfg.writer.concurrency, cfg.writer.chunk_size, cfg.writer.retry.max_retries
    );
    match (cfg.store.kind, &cfg.store.path) {
        (StoreKind::File, Some(path)) => println!("✔ file store at {}", path.display()),
        _ => println!("✔ memory store"),
    }
}

fn print_report(report: &ValidationReport, plain: bool) {
    if plain {
        eprint!("{}", report.render_plain());
    } else {
        eprint!("{}", report.render_pretty());
    }
}

fn print_config_error(err: ConfigError, plain: bool) {
    let hint = config_error_hint(&err);

    match &err {
        ConfigError::Validation { report } => {
            eprintln!("{err}");
            eprintln!();
            print_report(report, plain);
        }
        _ => eprintln!("{err}"),
    }

    if let Some(hint) = hint {
        eprintln!();
        eprintln!("{hint}");
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::ReadFile { .. } => Some(
            "No config file was found at that path.\n\
             \n\
             Create one with every default filled in:\n\
             \n\
             logpulse config init logpulse.hcl",
        ),

        ConfigError::Parse { .. } => Some(
            "Settings are grouped in blocks and unknown fields are rejected.\n\
             \n\
             Example:\n\
             \n\
             batch {\n\
             \x20 max_size       = 100000\n\
             \x20 max_latency_ms = 1000\n\
             }",
        ),

        ConfigError::Validation { .. } => None,
    }
}
