use core::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use flakegen::{DEFAULT_EPOCH, GeneratorConfig};

/// Command-line arguments for the `flakegen` binary.
///
/// The generator options apply to every subcommand and can also be supplied
/// through environment variables (or a `.env` file), which is the usual way
/// to pin the datacenter and machine IDs of a host.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flakegen",
    version,
    about = "Generate and decode Snowflake-style 64-bit IDs"
)]
pub struct CliArgs {
    /// Epoch the timestamp field counts from, in milliseconds since the Unix
    /// epoch. Must be identical on every node sharing an ID space.
    ///
    /// Environment variable: `FLAKE_EPOCH`
    #[arg(long, env = "FLAKE_EPOCH", default_value_t = DEFAULT_EPOCH, global = true)]
    pub epoch: u64,

    /// Datacenter ID embedded in generated IDs (0-31).
    ///
    /// Environment variable: `FLAKE_DATACENTER_ID`
    #[arg(long, env = "FLAKE_DATACENTER_ID", default_value_t = 0, global = true)]
    pub datacenter_id: u64,

    /// Machine ID embedded in generated IDs (0-31).
    ///
    /// Environment variable: `FLAKE_MACHINE_ID`
    #[arg(long, env = "FLAKE_MACHINE_ID", default_value_t = 0, global = true)]
    pub machine_id: u64,

    /// How long to wait for the clock to advance once a millisecond's
    /// sequence is used up before giving up.
    ///
    /// Environment variable: `FLAKE_STALL_TIMEOUT_MS`
    #[arg(long, env = "FLAKE_STALL_TIMEOUT_MS", default_value_t = 1_000, global = true)]
    pub stall_timeout_ms: u64,

    /// Format of the diagnostics written to stderr. Verbosity follows
    /// `RUST_LOG`.
    ///
    /// Environment variable: `FLAKE_LOG_FORMAT`
    #[arg(
        long,
        env = "FLAKE_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty,
        global = true
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate new IDs, one per line.
    Generate {
        /// Number of IDs to generate.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u64,

        #[arg(long, value_enum, default_value_t = IdFormat::Decimal)]
        format: IdFormat,
    },
    /// Split IDs into their timestamp, datacenter, machine and sequence.
    Decode {
        /// Decimal IDs to decode.
        #[arg(required = true)]
        ids: Vec<String>,

        #[arg(long, value_enum, default_value_t = DecodeFormat::Text)]
        format: DecodeFormat,
    },
}

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
pub enum IdFormat {
    /// Plain decimal integer.
    Decimal,
    /// Decimal zero-padded to 20 digits, so lexicographic order matches
    /// numeric order.
    Padded,
    /// One JSON object per line with the decoded fields.
    Json,
}

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DecodeFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub generator: GeneratorConfig,
    pub log_format: LogFormat,
    pub command: Command,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.stall_timeout_ms == 0 {
            bail!("FLAKE_STALL_TIMEOUT_MS must be greater than 0");
        }

        if let Command::Generate { count: 0, .. } = args.command {
            bail!("--count must be greater than 0");
        }

        let generator = GeneratorConfig::default()
            .with_epoch(args.epoch)
            .with_datacenter_id(args.datacenter_id)
            .with_machine_id(args.machine_id)
            .with_stall_timeout(Duration::from_millis(args.stall_timeout_ms));
        generator
            .validate()
            .context("invalid generator configuration")?;

        Ok(Self {
            generator,
            log_format: args.log_format,
            command: args.command,
        })
    }
}
