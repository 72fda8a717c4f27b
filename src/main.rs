//! rigcascade CLI
//!
//! Usage: rigcascade <COMMAND>
//!
//! Commands:
//!   trigger  Run after a publish; republish stale dependents
//!   worker   Republish a batch of dependents (launched by `trigger`)
//!   stale    List stale dependents without launching anything

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rigcascade::presentation::{Cli, Commands};
use rigcascade::Config;

mod commands;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let loaded = Config::discover(cli.config.as_deref())?;
    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }

    match cli.command {
        Commands::Trigger {
            asset,
            subset,
            version,
        } => commands::trigger::cmd_trigger(&loaded, &asset, &subset, version, cli.json),
        Commands::Worker { payload, args } => {
            commands::worker::cmd_worker(&loaded.config, payload, &args, cli.json)
        }
        Commands::Stale {
            asset,
            subset,
            version,
        } => commands::stale::cmd_stale(&loaded, &asset, &subset, version, cli.json),
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the level from `warn`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rigcascade={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
