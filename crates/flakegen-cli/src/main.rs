#![doc = include_str!("../README.md")]

mod cli;

use std::io::{self, Write};

use clap::Parser;
use cli::commands;
use cli::config::{CliArgs, CliConfig, Command};
use cli::telemetry::init_telemetry;
use flakegen::{BasicIdGenerator, MonotonicClock};

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_telemetry(config.log_format)?;

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    run(&config, &mut out)
}

fn run(config: &CliConfig, out: &mut impl Write) -> anyhow::Result<()> {
    tracing::debug!(config = ?config.generator, "starting flakegen");

    // Immune to NTP steps for the lifetime of the process.
    let generator = BasicIdGenerator::new(config.generator, MonotonicClock::new())?;

    match &config.command {
        Command::Generate { count, format } => {
            commands::generate(&generator, *count, *format, out)
        }
        Command::Decode { ids, format } => commands::decode(&generator, ids, *format, out),
    }
}
