/// Errors produced while writing, reading or preparing a dataset.
use thiserror::Error;

/// All error conditions of the dataset crate.
///
/// Row numbers are one-based and count data rows only, not the header.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Underlying CSV reader or writer failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying I/O failure outside the CSV layer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The header is not `X1 Y1 … Xn Yn C1 … Cn` for any `n`.
    #[error("invalid header: {detail}")]
    Header {
        /// What was wrong with it.
        detail: String,
    },

    /// A data row has a different number of cells than the header.
    #[error("row {row}: expected {expected} cells, found {found}")]
    RaggedRow {
        /// Offending row.
        row: usize,
        /// Cells in the header.
        expected: usize,
        /// Cells in the row.
        found: usize,
    },

    /// A cell could not be parsed.
    #[error("row {row}, column {column}: {value:?} is not a valid {expected}")]
    InvalidCell {
        /// Offending row.
        row: usize,
        /// Header name of the column.
        column: String,
        /// Raw cell text.
        value: String,
        /// Expected kind of value.
        expected: &'static str,
    },

    /// A record's positions and labels describe different agent counts, or
    /// records in one dataset disagree on the agent count.
    #[error("record {record}: {found} agents, expected {expected}")]
    AgentCount {
        /// One-based record index.
        record: usize,
        /// Agents expected.
        expected: usize,
        /// Agents found.
        found: usize,
    },

    /// A topology has no anchor for one of the network's agents.
    #[error("agent {agent} has no cluster label")]
    MissingLabel {
        /// The unlabeled agent.
        agent: u32,
    },

    /// A label of zero cannot be shifted to a zero-based class.
    #[error("record {record}, agent {agent}: label 0 cannot be re-indexed")]
    ZeroLabel {
        /// One-based record index.
        record: usize,
        /// One-based agent column.
        agent: usize,
    },

    /// A label does not fit the requested number of classes.
    #[error("label {label} is out of range for {classes} classes")]
    LabelOutOfRange {
        /// The label.
        label: u32,
        /// Number of classes.
        classes: usize,
    },

    /// An agent column index outside `1..=agents`.
    #[error("agent column {agent} out of range 1..={agents}")]
    NoSuchAgent {
        /// Requested column.
        agent: usize,
        /// Agents per record.
        agents: usize,
    },

    /// Split ratios outside `[0, 1)`.
    #[error("invalid split ratio: {0}")]
    InvalidRatio(&'static str),
}
