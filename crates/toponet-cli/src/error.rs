/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `toponet` binary. Every
/// variant maps to a stable exit code (1 or 2) via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. The input could not be read, decoded or
///   turned into a valid network, or an argument is out of range.
/// - Exit code **1**: logical failure. The input was well formed but the
///   topology or dataset could not be produced from it.
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `toponet` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read a file.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes; `None` for stdin.
        actual: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The byte offset of the first invalid byte sequence.
        byte_offset: usize,
    },

    /// An I/O error occurred while reading from stdin.
    StdinReadError {
        /// The underlying I/O error message.
        detail: String,
    },

    /// Any other I/O error, on input or output.
    IoError {
        /// The file, stream or directory involved.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// The input is not a well-formed network document.
    ParseFailed {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// Decoder message, including line and column.
        detail: String,
    },

    /// The network document is well formed but not a valid network.
    InvalidNetwork {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// What was wrong with it.
        detail: String,
    },

    /// The input is not a well-formed dataset CSV.
    InvalidDataset {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// Reader message.
        detail: String,
    },

    /// A command-line value is out of range.
    InvalidArgument {
        /// What was wrong with it.
        detail: String,
    },

    // --- Exit code 1: logical failures ---
    /// The reliable graph has no cycle to serve as backbone.
    NoBackbone {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
    },

    /// An agent has no route to the backbone.
    UnresolvedOrphan {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// Id of the unattached agent.
        agent: u32,
    },

    /// The generator could not produce the requested records.
    GenerationFailed {
        /// Generator message.
        detail: String,
    },

    /// The dataset was read but its contents cannot be prepared.
    DatasetRejected {
        /// What was wrong with it.
        detail: String,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    ///
    /// - `2`: input failure (file not found, parse error, invalid network).
    /// - `1`: logical failure (no backbone, unresolved orphan, bad labels).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::ParseFailed { .. }
            | Self::InvalidNetwork { .. }
            | Self::InvalidDataset { .. }
            | Self::InvalidArgument { .. } => 2,

            Self::NoBackbone { .. }
            | Self::UnresolvedOrphan { .. }
            | Self::GenerationFailed { .. }
            | Self::DatasetRejected { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::ParseFailed { source, detail } => {
                format!("error: cannot parse {source}: {detail}")
            }
            Self::InvalidNetwork { source, detail } => {
                format!("error: invalid network in {source}: {detail}")
            }
            Self::InvalidDataset { source, detail } => {
                format!("error: invalid dataset in {source}: {detail}")
            }
            Self::InvalidArgument { detail } => {
                format!("error: invalid argument: {detail}")
            }
            Self::NoBackbone { source } => {
                format!("error: no backbone in {source}: the reliable graph contains no cycle")
            }
            Self::UnresolvedOrphan { source, agent } => {
                format!(
                    "error: agent {agent} in {source} has no reliable or critical route to the backbone"
                )
            }
            Self::GenerationFailed { detail } => {
                format!("error: generation failed: {detail}")
            }
            Self::DatasetRejected { detail } => {
                format!("error: dataset rejected: {detail}")
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
