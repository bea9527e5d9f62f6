//! Diagnostics for the command-line tool.
//!
//! Everything is written to stderr so stdout stays reserved for IDs. The
//! filter comes from `RUST_LOG` and defaults to `warn`, which still surfaces
//! clock regressions and stalls reported by the generator.
//!
//! ```bash
//! RUST_LOG=flakegen=trace flakegen generate -n 5
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use super::config::LogFormat;

pub fn init_telemetry(format: LogFormat) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()));

    match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_target(false)
                    .with_file(true)
                    .pretty(),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .with_current_span(true),
            )
            .try_init()?,
    }

    Ok(())
}
