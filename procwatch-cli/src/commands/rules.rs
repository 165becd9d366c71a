//! `procwatch rules` command handler

use std::io::Write;

use serde::Serialize;

use procwatch_core::types::Severity;
use procwatch_detector::IndicatorSet;

use crate::cli::RulesArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `rules` command.
pub fn execute(args: RulesArgs, writer: &OutputWriter) -> Result<(), CliError> {
    let min_severity = args
        .min_severity
        .as_deref()
        .map(|s| {
            Severity::from_str_loose(s).ok_or_else(|| {
                CliError::Command(format!(
                    "unknown severity: {s} (expected: info, low, medium, high, critical)"
                ))
            })
        })
        .transpose()?;

    let report = build_report(&IndicatorSet::default(), min_severity);
    writer.render(&report)
}

fn build_report(set: &IndicatorSet, min_severity: Option<Severity>) -> RuleListReport {
    let rules: Vec<RuleEntry> = set
        .iter()
        .filter(|rule| min_severity.is_none_or(|min| rule.base_severity() >= min))
        .map(|rule| RuleEntry {
            name: rule.name().to_owned(),
            technique: rule.technique().to_owned(),
            severity: rule.base_severity().to_string(),
            description: rule.description().to_owned(),
        })
        .collect();

    RuleListReport {
        total: rules.len(),
        rules,
    }
}

#[derive(Serialize)]
pub struct RuleListReport {
    pub total: usize,
    pub rules: Vec<RuleEntry>,
}

#[derive(Serialize)]
pub struct RuleEntry {
    pub name: String,
    pub technique: String,
    pub severity: String,
    pub description: String,
}

impl Render for RuleListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Detection Rules ({} total)",
            self.total.to_string().bold()
        )?;
        writeln!(w)?;
        writeln!(
            w,
            "{:<26} {:<22} {:<10} Description",
            "Name", "Technique", "Severity"
        )?;
        writeln!(w, "{}", "-".repeat(90))?;

        for r in &self.rules {
            let severity_colored = match r.severity.as_str() {
                "Critical" | "High" => r.severity.red(),
                "Medium" => r.severity.yellow(),
                _ => r.severity.normal(),
            };
            writeln!(
                w,
                "{:<26} {:<22} {:<10} {}",
                r.name, r.technique, severity_colored, r.description
            )?;
        }

        Ok(())
    }
}
