//! Training-set preparation: zero-based labels, shuffled splits and one-hot
//! targets.
use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::DatasetError;
use crate::record::DatasetRecord;
use crate::table::{write_dataset, write_targets};

/// Shifts every label from a one-based agent id to a zero-based class index.
///
/// # Errors
///
/// [`DatasetError::ZeroLabel`] if a label is already zero.
pub fn reindex(mut records: Vec<DatasetRecord>) -> Result<Vec<DatasetRecord>, DatasetError> {
    for (r, record) in records.iter_mut().enumerate() {
        for (k, label) in record.labels.iter_mut().enumerate() {
            *label = label.checked_sub(1).ok_or(DatasetError::ZeroLabel {
                record: r + 1,
                agent: k + 1,
            })?;
        }
    }
    Ok(records)
}

/// Fractions of a dataset held out for testing and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitRatios {
    /// Fraction of all records held out for testing.
    pub test: f64,
    /// Fraction of the non-test records held out for validation.
    pub validation: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            test: 0.1,
            validation: 0.2,
        }
    }
}

impl SplitRatios {
    /// Checks that both ratios lie in `[0, 1)`.
    ///
    /// # Errors
    ///
    /// [`DatasetError::InvalidRatio`] naming the offending ratio.
    pub fn validate(&self) -> Result<(), DatasetError> {
        if !(0.0..1.0).contains(&self.test) {
            return Err(DatasetError::InvalidRatio("test ratio must lie in [0, 1)"));
        }
        if !(0.0..1.0).contains(&self.validation) {
            return Err(DatasetError::InvalidRatio(
                "validation ratio must lie in [0, 1)",
            ));
        }
        Ok(())
    }
}

/// Train, validation and test partitions of one dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSplit {
    /// Records to train on.
    pub train: Vec<DatasetRecord>,
    /// Records for validation during training.
    pub validation: Vec<DatasetRecord>,
    /// Records held out for the final evaluation.
    pub test: Vec<DatasetRecord>,
}

impl DatasetSplit {
    /// Total records across the three partitions.
    pub fn len(&self) -> usize {
        self.train.len() + self.validation.len() + self.test.len()
    }

    /// Returns `true` if all three partitions are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shuffles `records` and partitions them.
///
/// The test partition takes `ceil(n · ratios.test)` records; validation then
/// takes `ceil(m · ratios.validation)` of the `m` that remain; the rest is
/// the training partition.
///
/// # Errors
///
/// [`DatasetError::InvalidRatio`] if `ratios` fails validation.
pub fn split(
    mut records: Vec<DatasetRecord>,
    ratios: SplitRatios,
    rng: &mut StdRng,
) -> Result<DatasetSplit, DatasetError> {
    ratios.validate()?;
    records.shuffle(rng);

    let test_len = held_out(records.len(), ratios.test);
    let mut rest = records.split_off(test_len);
    let test = records;

    let validation_len = held_out(rest.len(), ratios.validation);
    let train = rest.split_off(validation_len);
    let validation = rest;

    tracing::debug!(
        train = train.len(),
        validation = validation.len(),
        test = test.len(),
        "dataset split"
    );
    Ok(DatasetSplit {
        train,
        validation,
        test,
    })
}

fn held_out(n: usize, ratio: f64) -> usize {
    ((n as f64 * ratio).ceil() as usize).min(n)
}

/// Labels of agent `agent` (one-based) across `records`.
///
/// # Errors
///
/// [`DatasetError::NoSuchAgent`] if a record has fewer than `agent` labels
/// or `agent` is zero.
pub fn label_column(records: &[DatasetRecord], agent: usize) -> Result<Vec<u32>, DatasetError> {
    records
        .iter()
        .map(|record| {
            agent
                .checked_sub(1)
                .and_then(|k| record.labels.get(k))
                .copied()
                .ok_or(DatasetError::NoSuchAgent {
                    agent,
                    agents: record.agents(),
                })
        })
        .collect()
}

/// One-hot encodes zero-based class labels into rows of width `classes`.
///
/// # Errors
///
/// [`DatasetError::LabelOutOfRange`] if a label is not below `classes`.
pub fn one_hot(labels: &[u32], classes: usize) -> Result<Vec<Vec<u8>>, DatasetError> {
    labels
        .iter()
        .map(|&label| {
            let index = usize::try_from(label)
                .ok()
                .filter(|&i| i < classes)
                .ok_or(DatasetError::LabelOutOfRange { label, classes })?;
            let mut row = vec![0u8; classes];
            row[index] = 1;
            Ok(row)
        })
        .collect()
}

/// How the target of one agent is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetEncoding {
    /// One `Ck` column holding the class index.
    Class,
    /// One `Ck_j` column per class, exactly one of them set.
    OneHot,
}

/// One agent's label taken as the learning target of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    /// One-based agent column `k`.
    pub agent: usize,
    /// Column layout of the target.
    pub encoding: TargetEncoding,
}

impl Target {
    /// Header names of the target columns in a dataset of `agents` agents.
    ///
    /// One-hot targets have one class per agent.
    pub fn columns(&self, agents: usize) -> Vec<String> {
        let k = self.agent;
        match self.encoding {
            TargetEncoding::Class => vec![format!("C{k}")],
            TargetEncoding::OneHot => (0..agents).map(|j| format!("C{k}_{j}")).collect(),
        }
    }

    /// Target cells of every record, one row per record.
    ///
    /// Labels must already be zero-based (see [`reindex`]).
    ///
    /// # Errors
    ///
    /// - [`DatasetError::NoSuchAgent`] if a record has no column `k`.
    /// - [`DatasetError::LabelOutOfRange`] if a one-hot label is not below the
    ///   agent count.
    pub fn cells(&self, records: &[DatasetRecord]) -> Result<Vec<Vec<u32>>, DatasetError> {
        let labels = label_column(records, self.agent)?;
        match self.encoding {
            TargetEncoding::Class => Ok(labels.into_iter().map(|l| vec![l]).collect()),
            TargetEncoding::OneHot => {
                let classes = records.first().map_or(0, DatasetRecord::agents);
                let rows = one_hot(&labels, classes)?;
                Ok(rows
                    .into_iter()
                    .map(|row| row.into_iter().map(u32::from).collect())
                    .collect())
            }
        }
    }
}

/// Paths written by [`write_split`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitFiles {
    /// `<stem>_train.csv`.
    pub train: PathBuf,
    /// `<stem>_valid.csv`.
    pub validation: PathBuf,
    /// `<stem>_test.csv`.
    pub test: PathBuf,
}

/// Writes the three partitions of `split` into `dir`, creating it if needed.
///
/// # Errors
///
/// [`DatasetError::Io`] or [`DatasetError::Csv`] on write failure.
pub fn write_split(
    dir: &Path,
    stem: &str,
    split: &DatasetSplit,
) -> Result<SplitFiles, DatasetError> {
    write_parts(dir, stem, split, write_dataset)
}

/// Writes the coordinates and `target` columns of each partition into `dir`
/// as `<stem>_c<k>_train.csv`, `<stem>_c<k>_valid.csv` and
/// `<stem>_c<k>_test.csv`.
///
/// # Errors
///
/// As [`write_split`], plus the errors of [`Target::cells`].
pub fn write_split_targets(
    dir: &Path,
    stem: &str,
    split: &DatasetSplit,
    target: Target,
) -> Result<SplitFiles, DatasetError> {
    let stem = format!("{stem}_c{}", target.agent);
    write_parts(dir, &stem, split, |file, records| {
        write_targets(file, records, target)
    })
}

fn write_parts<F>(
    dir: &Path,
    stem: &str,
    split: &DatasetSplit,
    mut write: F,
) -> Result<SplitFiles, DatasetError>
where
    F: FnMut(fs::File, &[DatasetRecord]) -> Result<(), DatasetError>,
{
    fs::create_dir_all(dir)?;
    let files = SplitFiles {
        train: dir.join(format!("{stem}_train.csv")),
        validation: dir.join(format!("{stem}_valid.csv")),
        test: dir.join(format!("{stem}_test.csv")),
    };
    for (path, records) in [
        (&files.train, &split.train),
        (&files.validation, &split.validation),
        (&files.test, &split.test),
    ] {
        write(fs::File::create(path)?, records)?;
    }
    Ok(files)
}
