mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use playwatch_core::config::{self, AppConfig};
use playwatch_core::startup::build_monitors;
use playwatch_detect::RegistryStore;

use crate::output::{PlayerReport, VariantRow};

#[derive(Debug, Parser)]
#[command(name = "playwatch", version, about)]
struct Cli {
    /// Config file to use instead of the per-user one.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show known players and whether they can be polled here.
    List,
    /// Poll each active player once and print its status.
    Probe {
        /// Only these players (default: all active).
        players: Vec<String>,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "playwatch=debug"
    } else {
        "playwatch=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, playwatch_core::error::PlaywatchError> {
    let (app_config, db) = match &cli.config {
        Some(path) => (
            AppConfig::load_from(path)?,
            config::load_variants_from(&config::variants_path_beside(path))?,
        ),
        None => (AppConfig::load()?, config::load_variants()?),
    };
    let set = build_monitors(&db, &app_config, &RegistryStore);

    match cli.command {
        Command::List => {
            let mut rows: Vec<VariantRow> = set
                .monitors
                .iter()
                .map(|m| VariantRow::active(m.name(), &m.endpoint().url))
                .collect();
            rows.extend(
                set.skipped
                    .iter()
                    .map(|s| VariantRow::skipped(&s.name, &s.error.to_string())),
            );
            output::print_variants(&rows);
            Ok(ExitCode::SUCCESS)
        }
        Command::Probe { players, json } => {
            let mut monitors = set.monitors;
            if !players.is_empty() {
                monitors.retain(|m| players.iter().any(|p| p.eq_ignore_ascii_case(m.name())));
            }

            let mut reports = Vec::with_capacity(monitors.len());
            let mut failed = false;
            for monitor in &mut monitors {
                let result = monitor.update_status().await;
                failed |= result.is_err();
                reports.push(PlayerReport::new(monitor, result.err()));
            }

            if json {
                output::print_json(&reports);
            } else {
                output::print_reports(&reports);
            }

            Ok(if failed || reports.is_empty() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
    }
}
