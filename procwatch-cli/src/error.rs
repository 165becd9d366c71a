//! CLI-specific error types and exit code mapping

use std::path::PathBuf;

use procwatch_core::error::{ConfigError, ProcwatchError};
use procwatch_detector::DetectorError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The input log file does not exist.
    #[error("file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Detection pipeline failure (malformed input, sink write, ...).
    #[error("{0}")]
    Detector(#[from] DetectorError),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from procwatch-core.
    #[error("{0}")]
    Core(#[from] ProcwatchError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                        |
    /// |------|------------------------------------------------|
    /// | 0    | Success                                        |
    /// | 1    | Command / input error (missing or bad input)   |
    /// | 2    | Configuration error                            |
    /// | 10   | IO error                                       |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Io(_) => 10,
            Self::Detector(e) => match e {
                DetectorError::Config { .. } => 2,
                DetectorError::Sink(_) => 10,
                _ => 1,
            },
            Self::Core(e) => match e {
                ProcwatchError::Config(_) => 2,
                ProcwatchError::Io(_) => 10,
                _ => 1,
            },
            Self::InputNotFound(_) | Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Core(ProcwatchError::Config(e))
    }
}
