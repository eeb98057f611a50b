//! Implementation of `toponet preprocess <file>`.
//!
//! Reads a dataset written by `generate`, shifts its labels from one-based
//! agent ids to zero-based classes, shuffles it and writes the train,
//! validation and test partitions as `<stem>_train.csv`, `<stem>_valid.csv`
//! and `<stem>_test.csv` in `--out-dir`.
//!
//! With `--agent K` each partition keeps the coordinates plus agent K's
//! label only, as a class column or, with `--one-hot`, one column per class.
//! Those files are named `<stem>_c<K>_train.csv` and so on.
//!
//! Exit codes: 0 = success, 1 = labels cannot be re-indexed or agent K does
//! not exist, 2 = read, parse or write failure, or a ratio out of range.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use toponet_dataset::{
    DatasetError, DatasetRecord, SplitFiles, SplitRatios, Target, TargetEncoding, read_dataset,
    reindex, split, write_dataset, write_split, write_split_targets,
};

use crate::cli::{OutputFormat, PathOrStdin, PreprocessArgs};
use crate::cmd::stdout_error;
use crate::error::CliError;

/// Paths and sizes produced by one preprocessing run.
struct PreprocessOutcome {
    records: usize,
    files: SplitFiles,
    sizes: [usize; 3],
    reindexed: Option<PathBuf>,
    target: Option<Target>,
}

/// Runs the `preprocess` command on already-read `content`.
///
/// # Errors
///
/// See the module documentation for the exit code of each failure.
pub fn run(args: &PreprocessArgs, content: &str, format: &OutputFormat) -> Result<(), CliError> {
    let source = args.file.label();
    let ratios = SplitRatios {
        test: args.test_ratio,
        validation: args.validation_ratio,
    };
    ratios.validate().map_err(|e| CliError::InvalidArgument {
        detail: e.to_string(),
    })?;

    let records = read_dataset(content.as_bytes()).map_err(|e| read_error(&source, &e))?;
    let records = reindex(records).map_err(|e| read_error(&source, &e))?;
    let total = records.len();
    let target = args.target();
    if let Some(target) = target {
        target.cells(&records).map_err(|e| read_error(&source, &e))?;
    }

    let stem = args.stem.clone().unwrap_or_else(|| default_stem(&args.file));
    let out_dir = args.out_dir.as_path();

    let reindexed = if args.write_reindexed {
        std::fs::create_dir_all(out_dir).map_err(|e| crate::io::io_error_to_cli(&e, out_dir))?;
        let path = out_dir.join(format!("{stem}_reindexed.csv"));
        write_file(&path, &records)?;
        Some(path)
    } else {
        None
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    let parts = split(records, ratios, &mut rng).map_err(|e| read_error(&source, &e))?;
    let written = match target {
        Some(target) => write_split_targets(out_dir, &stem, &parts, target),
        None => write_split(out_dir, &stem, &parts),
    };
    let files = written.map_err(|e| CliError::IoError {
        source: out_dir.display().to_string(),
        detail: e.to_string(),
    })?;
    tracing::info!(
        records = total,
        agent = target.map(|t| t.agent),
        train = parts.train.len(),
        validation = parts.validation.len(),
        test = parts.test.len(),
        "dataset split written"
    );

    let outcome = PreprocessOutcome {
        records: total,
        files,
        sizes: [parts.train.len(), parts.validation.len(), parts.test.len()],
        reindexed,
        target,
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Human => print_human(&mut out, &outcome),
        OutputFormat::Json => print_json(&mut out, &outcome),
    }
}

/// Input file stem, or `dataset` for stdin and unnamed paths.
fn default_stem(file: &PathOrStdin) -> String {
    match file {
        PathOrStdin::Path(path) => path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("dataset")
            .to_owned(),
        PathOrStdin::Stdin => "dataset".to_owned(),
    }
}

/// Maps a failure on the input side.
///
/// Malformed CSV is an input failure; well-formed data whose labels cannot
/// be prepared is a logical one.
fn read_error(source: &str, e: &DatasetError) -> CliError {
    match e {
        DatasetError::Csv(_)
        | DatasetError::Header { .. }
        | DatasetError::RaggedRow { .. }
        | DatasetError::InvalidCell { .. }
        | DatasetError::AgentCount { .. } => CliError::InvalidDataset {
            source: source.to_owned(),
            detail: e.to_string(),
        },
        DatasetError::Io(_) => CliError::IoError {
            source: source.to_owned(),
            detail: e.to_string(),
        },
        DatasetError::InvalidRatio(_) => CliError::InvalidArgument {
            detail: e.to_string(),
        },
        DatasetError::MissingLabel { .. }
        | DatasetError::ZeroLabel { .. }
        | DatasetError::LabelOutOfRange { .. }
        | DatasetError::NoSuchAgent { .. } => CliError::DatasetRejected {
            detail: e.to_string(),
        },
    }
}

fn encoding_name(target: &Target) -> &'static str {
    match target.encoding {
        TargetEncoding::Class => "class",
        TargetEncoding::OneHot => "one_hot",
    }
}

fn write_file(path: &Path, records: &[DatasetRecord]) -> Result<(), CliError> {
    let file = File::create(path).map_err(|e| crate::io::io_error_to_cli(&e, path))?;
    write_dataset(BufWriter::new(file), records).map_err(|e| CliError::IoError {
        source: path.display().to_string(),
        detail: e.to_string(),
    })
}

fn print_human<W: Write>(w: &mut W, outcome: &PreprocessOutcome) -> Result<(), CliError> {
    let write = |w: &mut W| -> std::io::Result<()> {
        writeln!(w, "records:    {}", outcome.records)?;
        let [train, validation, test] = outcome.sizes;
        writeln!(w, "train:      {train} -> {}", outcome.files.train.display())?;
        writeln!(
            w,
            "validation: {validation} -> {}",
            outcome.files.validation.display()
        )?;
        writeln!(w, "test:       {test} -> {}", outcome.files.test.display())?;
        if let Some(path) = &outcome.reindexed {
            writeln!(w, "reindexed:  {}", path.display())?;
        }
        if let Some(target) = &outcome.target {
            writeln!(w, "target:     C{} ({})", target.agent, encoding_name(target))?;
        }
        Ok(())
    };
    write(w).map_err(|e| stdout_error(&e))
}

fn print_json<W: Write>(w: &mut W, outcome: &PreprocessOutcome) -> Result<(), CliError> {
    let [train, validation, test] = outcome.sizes;
    let doc = serde_json::json!({
        "records": outcome.records,
        "train": { "records": train, "path": outcome.files.train.display().to_string() },
        "validation": {
            "records": validation,
            "path": outcome.files.validation.display().to_string(),
        },
        "test": { "records": test, "path": outcome.files.test.display().to_string() },
        "reindexed": outcome.reindexed.as_ref().map(|p| p.display().to_string()),
        "target": outcome.target.as_ref().map(|t| serde_json::json!({
            "agent": t.agent,
            "encoding": encoding_name(t),
        })),
    });
    writeln!(w, "{doc}").map_err(|e| stdout_error(&e))
}
