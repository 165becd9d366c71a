//! `procwatch config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use procwatch_core::config::ProcwatchConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Load and validate the configuration file, reporting any errors.
///
/// Returns `CliError::Config` after rendering the report when validation fails.
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = match ProcwatchConfig::load(config_path).await {
        Ok(_) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }
    Ok(())
}

/// Display the effective configuration (file + env overrides + defaults).
async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = ProcwatchConfig::load(config_path).await?;
    let report = build_report(&config, config_path, section)?;
    writer.render(&report)
}

fn build_report(
    config: &ProcwatchConfig,
    config_path: &Path,
    section: Option<String>,
) -> Result<ConfigReport, CliError> {
    let serialized = match section.as_deref() {
        None => toml::to_string_pretty(config),
        Some("general") => toml::to_string_pretty(&config.general),
        Some("detector") => toml::to_string_pretty(&config.detector),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {other} (expected: general, detector)"
            )));
        }
    };

    Ok(ConfigReport {
        source: config_path.display().to_string(),
        section,
        config_toml: serialized
            .map_err(|e| CliError::Config(format!("cannot serialize configuration: {e}")))?,
    })
}

/// Configuration display report.
///
/// `config_toml` is only used for text rendering.
#[derive(Serialize)]
pub struct ConfigReport {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        match &self.section {
            Some(section) => writeln!(
                w,
                "Configuration {} (source: {})",
                format!("[{section}]").bold(),
                self.source
            )?,
            None => writeln!(w, "Configuration (source: {})", self.source.bold())?,
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    pub source: String,
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_report_full_config() {
        let report = build_report(&ProcwatchConfig::default(), Path::new("procwatch.toml"), None)
            .expect("should build report");
        assert!(report.section.is_none());
        assert!(report.config_toml.contains("[general]"));
        assert!(report.config_toml.contains("[detector]"));
        assert!(report.config_toml.contains("channel_capacity = 1"));
    }

    #[test]
    fn test_build_report_section() {
        let report = build_report(
            &ProcwatchConfig::default(),
            Path::new("procwatch.toml"),
            Some("detector".to_owned()),
        )
        .expect("should build report");
        assert_eq!(report.section.as_deref(), Some("detector"));
        assert!(report.config_toml.contains("output_path = \"-\""));
        assert!(!report.config_toml.contains("log_level"));
    }

    #[test]
    fn test_build_report_unknown_section() {
        let err = build_report(
            &ProcwatchConfig::default(),
            Path::new("procwatch.toml"),
            Some("network".to_owned()),
        )
        .err()
        .expect("unknown section should fail");
        assert!(err.to_string().contains("unknown section"));
    }

    #[test]
    fn test_config_report_render_text() {
        let report = ConfigReport {
            source: "/etc/procwatch.toml".to_owned(),
            section: Some("general".to_owned()),
            config_toml: "log_level = \"info\"\n".to_owned(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("[general]"));
        assert!(output.contains("/etc/procwatch.toml"));
        assert!(output.contains("log_level"));
    }

    #[test]
    fn test_config_report_json_skips_toml() {
        let report = ConfigReport {
            source: "test.toml".to_owned(),
            section: None,
            config_toml: "[general]".to_owned(),
        };
        let parsed = serde_json::to_value(&report).expect("JSON serialization should succeed");
        assert_eq!(parsed["source"], "test.toml");
        assert!(parsed.get("section").is_none());
        assert!(parsed.get("config_toml").is_none());
    }

    #[test]
    fn test_config_validation_report_invalid() {
        let report = ConfigValidationReport {
            source: "bad.toml".to_owned(),
            valid: false,
            errors: vec!["invalid config value for 'detector.channel_capacity'".to_owned()],
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("INVALID"));
        assert!(output.contains("channel_capacity"));
    }
}
