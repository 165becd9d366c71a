//! Output formatting for command reports (text vs JSON)
//!
//! Reports from `rules` and `config` flow through [`OutputWriter`].
//! Alert lines from `scan` bypass it and are written by the detection pipeline.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Writes command reports in the selected format.
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a payload to stdout.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.render_to(&mut handle, payload)
    }

    /// Render a payload to an arbitrary writer.
    ///
    /// `Text` delegates to [`Render::render_text`]; `Json` pretty-prints via `serde_json`.
    pub fn render_to<T: Render + Serialize>(
        &self,
        w: &mut dyn Write,
        payload: &T,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Text => payload.render_text(w)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, payload)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }
}

/// Human-readable text rendering, implemented by every report alongside `Serialize`.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Summary {
        records: u64,
        alerts: u64,
    }

    impl Render for Summary {
        fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
            writeln!(w, "Records: {}", self.records)?;
            writeln!(w, "Alerts: {}", self.alerts)
        }
    }

    fn render(format: OutputFormat) -> String {
        let payload = Summary {
            records: 12,
            alerts: 3,
        };
        let mut buffer = Vec::new();
        OutputWriter::new(format)
            .render_to(&mut buffer, &payload)
            .expect("rendering should succeed");
        String::from_utf8(buffer).expect("valid UTF-8")
    }

    #[test]
    fn test_text_format_uses_render_trait() {
        let output = render(OutputFormat::Text);
        assert!(output.contains("Records: 12"));
        assert!(output.contains("Alerts: 3"));
    }

    #[test]
    fn test_json_format_is_pretty_and_parseable() {
        let output = render(OutputFormat::Json);
        assert!(output.contains('\n'), "pretty JSON should span lines");
        let parsed: serde_json::Value =
            serde_json::from_str(&output).expect("should parse back to JSON");
        assert_eq!(parsed["records"].as_u64(), Some(12));
        assert_eq!(parsed["alerts"].as_u64(), Some(3));
    }
}
