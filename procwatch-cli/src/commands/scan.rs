//! `procwatch scan` command handler

use std::path::{Path, PathBuf};

use tracing::info;

use procwatch_core::config::ProcwatchConfig;
use procwatch_detector::{DetectionPipelineBuilder, PipelineConfig, RunSummary};

use crate::cli::ScanArgs;
use crate::error::CliError;

/// Execute the `scan` command.
///
/// Alerts go to stdout unless an output file is configured; the run summary
/// is only logged so stdout stays a clean JSON-lines stream.
pub async fn execute(args: ScanArgs, config: &ProcwatchConfig) -> Result<RunSummary, CliError> {
    let pipeline_config = resolve_config(&args, config)?;
    let input_path = PathBuf::from(&pipeline_config.input_path);
    let input = open_input(&input_path)?;

    let pipeline = DetectionPipelineBuilder::new()
        .config(pipeline_config.clone())
        .build()?;

    info!(
        input = %input_path.display(),
        output = %pipeline_config.output_path,
        "scanning process-execution log"
    );

    let summary = if pipeline_config.writes_to_stdout() {
        pipeline.run(input, tokio::io::stdout()).await?
    } else {
        let sink = tokio::fs::File::create(&pipeline_config.output_path).await?;
        pipeline.run(input, sink).await?
    };

    info!(
        records = summary.records,
        alerts = summary.alerts,
        suppressed = summary.suppressed,
        "scan complete"
    );
    Ok(summary)
}

/// Merge command-line arguments over the `[detector]` section.
fn resolve_config(args: &ScanArgs, config: &ProcwatchConfig) -> Result<PipelineConfig, CliError> {
    let mut pipeline_config = PipelineConfig::from_core(&config.detector);

    if let Some(file) = &args.file {
        pipeline_config.input_path = file.display().to_string();
    }
    if let Some(out) = &args.out {
        pipeline_config.output_path = out.display().to_string();
    }

    if pipeline_config.input_path.is_empty() {
        return Err(CliError::Command(
            "no input file given (use -f <FILE> or set detector.input_path)".to_owned(),
        ));
    }
    Ok(pipeline_config)
}

fn open_input(path: &Path) -> Result<std::fs::File, CliError> {
    if !path.is_file() {
        return Err(CliError::InputNotFound(path.to_path_buf()));
    }
    std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CliError::InputNotFound(path.to_path_buf()),
        _ => CliError::Io(e),
    })
}
