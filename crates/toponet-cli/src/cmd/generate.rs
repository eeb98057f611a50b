//! Implementation of `toponet generate`.
//!
//! Generates random networks, labels each with its synthesized topology and
//! writes the labeled records as a space-delimited dataset CSV, to `--output`
//! or stdout. Networks without a complete topology are discarded and
//! replaced; the discard counts are logged and reported in the summary.
//!
//! When the CSV goes to a file, a summary is printed to stdout (a JSON object
//! in `--format json` mode). When it goes to stdout, nothing else is printed
//! there.
//!
//! Exit codes: 0 = success, 1 = generation failure, 2 = invalid argument or
//! write failure.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use toponet_core::SynthesisConfig;
use toponet_dataset::{DatasetError, DatasetRecord, write_dataset};
use toponet_gen::{DatasetRun, GenerateError, GeneratorConfig, Preset, RunReport};

use crate::cli::{GenerateArgs, OutputFormat};
use crate::cmd::stdout_error;
use crate::error::CliError;

/// Runs the `generate` command.
///
/// # Errors
///
/// See the module documentation for the exit code of each failure.
pub fn run(args: &GenerateArgs, format: &OutputFormat) -> Result<(), CliError> {
    let dataset = dataset_run(args);
    dataset.generator.validate().map_err(|e| CliError::InvalidArgument {
        detail: e.to_string(),
    })?;

    let report = dataset
        .run(args.records)
        .map_err(|e| generation_error(&e))?;
    let records = report
        .records
        .iter()
        .map(|labeled| DatasetRecord::from_topology(&labeled.network, &labeled.topology))
        .collect::<Result<Vec<_>, DatasetError>>()
        .map_err(|e| CliError::GenerationFailed {
            detail: e.to_string(),
        })?;

    match &args.output {
        Some(path) => {
            write_file(path, &records)?;
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            print_summary(&mut out, format, &report, path)
        }
        None => {
            let stdout = std::io::stdout();
            write_dataset(stdout.lock(), &records).map_err(|e| CliError::IoError {
                source: "stdout".to_owned(),
                detail: e.to_string(),
            })
        }
    }
}

/// Builds the run settings: preset first, then each explicit override.
fn dataset_run(args: &GenerateArgs) -> DatasetRun {
    let base = Preset::from(args.preset).config(args.seed);
    let generator = GeneratorConfig {
        num_agents: args.agents.unwrap_or(base.num_agents),
        zone_range: args.zone_range.unwrap_or(base.zone_range),
        connectivity_threshold: args.threshold.unwrap_or(base.connectivity_threshold),
        epsilon: args.epsilon.unwrap_or(base.epsilon),
        scale_factor: args.scale.unwrap_or(base.scale_factor),
        max_attempts: args.max_attempts.unwrap_or(base.max_attempts),
        ..base
    };
    let synthesis = SynthesisConfig {
        fallback: args.fallback.into(),
    };
    DatasetRun {
        max_retries: args.max_retries,
        ..DatasetRun::new(generator, synthesis)
    }
}

fn generation_error(e: &GenerateError) -> CliError {
    match e {
        GenerateError::InvalidConfig(_) | GenerateError::Id(_) => CliError::InvalidArgument {
            detail: e.to_string(),
        },
        GenerateError::PlacementExhausted { .. }
        | GenerateError::RetriesExhausted { .. }
        | GenerateError::Build(_) => CliError::GenerationFailed {
            detail: e.to_string(),
        },
    }
}

fn write_file(path: &Path, records: &[DatasetRecord]) -> Result<(), CliError> {
    let file = File::create(path).map_err(|e| crate::io::io_error_to_cli(&e, path))?;
    write_dataset(BufWriter::new(file), records).map_err(|e| CliError::IoError {
        source: path.display().to_string(),
        detail: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), records = records.len(), "dataset written");
    Ok(())
}

fn print_summary<W: Write>(
    w: &mut W,
    format: &OutputFormat,
    report: &RunReport,
    path: &Path,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Human => writeln!(
            w,
            "wrote {} records to {} ({} networks discarded: {} without backbone, {} unresolved)",
            report.records.len(),
            path.display(),
            report.discarded(),
            report.discarded_no_backbone,
            report.discarded_unresolved
        ),
        OutputFormat::Json => writeln!(
            w,
            "{}",
            serde_json::json!({
                "records": report.records.len(),
                "output": path.display().to_string(),
                "discarded_no_backbone": report.discarded_no_backbone,
                "discarded_unresolved": report.discarded_unresolved,
            })
        ),
    }
    .map_err(|e| stdout_error(&e))
}
