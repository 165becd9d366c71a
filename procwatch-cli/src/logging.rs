//! Logging initialization for the procwatch binary.
//!
//! Configures `tracing-subscriber` from the `[general]` section of
//! `ProcwatchConfig`. Logs always go to stderr so stdout carries only
//! alert lines and command reports.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use procwatch_core::config::GeneralConfig;

use crate::error::CliError;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`.
/// Must be called at most once per process.
pub fn init_tracing(config: &GeneralConfig) -> Result<(), CliError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| {
            CliError::Config(format!("invalid log level '{}': {e}", config.log_level))
        })?,
    };

    let result = match config.log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        "pretty" => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        other => {
            return Err(CliError::Config(format!(
                "unknown log format '{other}', expected 'json' or 'pretty'"
            )));
        }
    };

    result.map_err(|e| CliError::Command(format!("failed to initialize tracing: {e}")))
}
