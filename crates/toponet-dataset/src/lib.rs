#![deny(clippy::print_stdout, clippy::print_stderr)]
//! Dataset export and preprocessing for `toponet` topology labels.
//!
//! Each labeled network becomes one space-delimited CSV row: the agents'
//! coordinates `X1 Y1 … Xn Yn` followed by their cluster labels `C1 … Cn`,
//! agent 1 first. Preprocessing turns such a file into zero-based
//! train/validation/test partitions, optionally reduced to one agent's
//! class or one-hot target.

pub mod error;
pub mod preprocess;
pub mod record;
pub mod table;

#[cfg(test)]
mod test_helpers;

pub use error::DatasetError;
pub use preprocess::{
    DatasetSplit, SplitFiles, SplitRatios, Target, TargetEncoding, label_column, one_hot, reindex,
    split, write_split, write_split_targets,
};
pub use record::{DatasetRecord, header};
pub use table::{DELIMITER, read_dataset, write_dataset, write_targets};
