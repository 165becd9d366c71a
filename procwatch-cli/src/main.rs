//! procwatch -- scan process-execution logs for indicators of compromise.
//!
//! ```text
//! procwatch scan -f exec.csv            # alerts as JSON lines on stdout
//! procwatch scan -f exec.csv -o out.jsonl
//! procwatch rules --output json
//! procwatch config show --section detector
//! ```

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;

use procwatch_core::config::ProcwatchConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);

    // `config` reports its own load errors; other commands need a valid config.
    let loaded = load_config(&cli).await;
    let general = match &loaded {
        Ok(config) => config.general.clone(),
        Err(_) => {
            let mut general = ProcwatchConfig::default().general;
            if let Some(level) = &cli.log_level {
                general.log_level = level.clone();
            }
            general
        }
    };
    logging::init_tracing(&general)?;

    tracing::debug!(config = %cli.config.display(), "procwatch starting");

    match cli.command {
        Commands::Scan(args) => {
            let config = loaded?;
            commands::scan::execute(args, &config).await?;
            Ok(())
        }
        Commands::Rules(args) => commands::rules::execute(args, &writer),
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}

/// Load the effective configuration.
///
/// A missing file at the default path falls back to built-in defaults with env
/// overrides; an explicitly given path must exist.
async fn load_config(cli: &Cli) -> Result<ProcwatchConfig, CliError> {
    let mut config = if cli.uses_default_config() && !cli.config.exists() {
        ProcwatchConfig::from_env()?
    } else {
        ProcwatchConfig::load(&cli.config).await?
    };

    if let Some(level) = &cli.log_level {
        config.general.log_level = level.clone();
        config.validate()?;
    }
    Ok(config)
}
