//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "procwatch.toml";

/// procwatch -- detect indicators of compromise in process-execution logs.
///
/// Use `procwatch <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "procwatch", version, about, long_about = None)]
pub struct Cli {
    /// Path to the procwatch.toml configuration file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format for reports (alerts are always JSON lines).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether `--config` was left at its default value.
    pub fn uses_default_config(&self) -> bool {
        self.config == PathBuf::from(DEFAULT_CONFIG_PATH)
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a process-execution CSV log and emit alerts.
    Scan(ScanArgs),

    /// List the built-in detection rules.
    Rules(RulesArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- scan ----

/// Run the detection pipeline over a CSV log file.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// CSV log file to scan (falls back to `detector.input_path`).
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Write alerts to this file instead of `detector.output_path` ("-" for stdout).
    #[arg(short = 'o', long = "out")]
    pub out: Option<PathBuf>,
}

// ---- rules ----

/// List the built-in detection rules.
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Only show rules whose base severity is at least this level
    /// (info, low, medium, high, critical).
    #[arg(long)]
    pub min_severity: Option<String>,
}

// ---- config ----

/// Manage procwatch configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, detector).
        #[arg(long)]
        section: Option<String>,
    },
}
