pub mod booking_file;
pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tariff_core::config::{AppConfig, LoadOptions};
use tariff_core::DocumentKind;

#[derive(Debug, Parser)]
#[command(
    name = "tariff",
    about = "Rental booking pricing CLI",
    long_about = "Price bookings, issue frozen invoice/estimate snapshots, resolve degressive rates, and inspect configuration.",
    after_help = "Examples:\n  tariff price booking.json\n  tariff price booking.toml --days 5\n  tariff issue invoice booking.json --number 2024-0042\n  tariff degressive 7\n  tariff config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a tariff.toml configuration file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Price a booking file and print the computed totals")]
    Price {
        file: PathBuf,
        #[arg(long, help = "Booking duration in days, resolved against the degressive tiers")]
        days: Option<u32>,
    },
    #[command(about = "Price a booking file and freeze the result into an invoice or estimate")]
    Issue {
        kind: DocumentKind,
        file: PathBuf,
        #[arg(long, help = "Document number printed on the invoice or estimate")]
        number: String,
        #[arg(long, help = "Booking duration in days, resolved against the degressive tiers")]
        days: Option<u32>,
    },
    #[command(about = "Resolve the degressive multiplier for a duration from the configured tiers")]
    Degressive { days: u32 },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config;

    let result = match cli.command {
        Command::Price { file, days } => with_config(config_path, "price", |config| {
            commands::price::run(config, &file, days)
        }),
        Command::Issue { kind, file, number, days } => {
            with_config(config_path, "issue", |config| {
                commands::issue::run(config, kind, &file, &number, days)
            })
        }
        Command::Degressive { days } => with_config(config_path, "degressive", |config| {
            commands::degressive::run(config, days)
        }),
        Command::Config => commands::config::run(config_path.as_deref()),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn with_config(
    config_path: Option<PathBuf>,
    command: &str,
    run_command: impl FnOnce(&AppConfig) -> commands::CommandResult,
) -> commands::CommandResult {
    match AppConfig::load(LoadOptions { config_path, ..LoadOptions::default() }) {
        Ok(config) => {
            logging::init(&config);
            run_command(&config)
        }
        Err(error) => commands::CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            2,
        ),
    }
}
