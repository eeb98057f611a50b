//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use toponet_core::FallbackPolicy;
use toponet_dataset::{Target, TargetEncoding};
use toponet_gen::Preset;

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

impl PathOrStdin {
    /// Label used in messages: the path, or `-` for stdin.
    pub fn label(&self) -> String {
        match self {
            PathOrStdin::Stdin => "-".to_owned(),
            PathOrStdin::Path(path) => path.display().to_string(),
        }
    }
}

/// Output format for CLI commands.
#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Plain text (default).
    Human,
    /// A single JSON document.
    Json,
}

/// Anchor selection for orphans whose reliable peers give no route.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FallbackArg {
    /// Lowest-id backbone agent at nonzero distance (default).
    LowestId,
    /// Geometrically nearest backbone agent.
    Nearest,
}

impl From<FallbackArg> for FallbackPolicy {
    fn from(arg: FallbackArg) -> Self {
        match arg {
            FallbackArg::LowestId => FallbackPolicy::LowestId,
            FallbackArg::Nearest => FallbackPolicy::Nearest,
        }
    }
}

/// Base parameter set for `generate`.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PresetArg {
    /// Six agents per network.
    Sparse,
    /// Ten agents per network (default).
    Default,
    /// Fourteen agents per network.
    Dense,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Sparse => Preset::Sparse,
            PresetArg::Default => Preset::Default,
            PresetArg::Dense => Preset::Dense,
        }
    }
}

/// Generator overrides for `generate`. Unset values come from the preset.
#[derive(Clone, Debug, clap::Args)]
pub struct GenerateArgs {
    /// Number of labeled networks to produce.
    #[arg(long, default_value = "100")]
    pub records: usize,
    /// Base parameter set.
    #[arg(long, default_value = "default", value_enum)]
    pub preset: PresetArg,
    /// Seed for the whole run.
    #[arg(long, default_value = "0")]
    pub seed: u64,
    /// Agents per network.
    #[arg(long)]
    pub agents: Option<usize>,
    /// Side length of the square deployment zone.
    #[arg(long)]
    pub zone_range: Option<f64>,
    /// Reliable link distance, before scaling.
    #[arg(long)]
    pub threshold: Option<f64>,
    /// Width of the critical band beyond the threshold, before scaling.
    #[arg(long)]
    pub epsilon: Option<f64>,
    /// Factor applied to threshold and band.
    #[arg(long)]
    pub scale: Option<f64>,
    /// Draws allowed per agent before placement gives up.
    #[arg(long)]
    pub max_attempts: Option<usize>,
    /// Networks generated per record before the run gives up.
    #[arg(long, default_value = "10000")]
    pub max_retries: usize,
    /// Anchor selection for orphans without a reliable route.
    #[arg(long, default_value = "lowest-id", value_enum)]
    pub fallback: FallbackArg,
    /// Output CSV path (default: stdout).
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Split settings for `preprocess`.
#[derive(Clone, Debug, clap::Args)]
pub struct PreprocessArgs {
    /// Dataset CSV written by `generate`, or `-` for stdin.
    #[arg(value_name = "FILE")]
    pub file: PathOrStdin,
    /// Directory receiving the partition files.
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub out_dir: PathBuf,
    /// File name prefix (default: the input file stem, or `dataset` for stdin).
    #[arg(long)]
    pub stem: Option<String>,
    /// Fraction of all records held out for testing.
    #[arg(long, default_value = "0.1")]
    pub test_ratio: f64,
    /// Fraction of the remaining records held out for validation.
    #[arg(long, default_value = "0.2")]
    pub validation_ratio: f64,
    /// Seed for the shuffle.
    #[arg(long, default_value = "0")]
    pub seed: u64,
    /// Also write the full re-indexed dataset as `<stem>_reindexed.csv`.
    #[arg(long)]
    pub write_reindexed: bool,
    /// Keep only the label of agent K as the target, writing
    /// `<stem>_c<K>_{train,valid,test}.csv`.
    #[arg(long, value_name = "K")]
    pub agent: Option<usize>,
    /// Encode the `--agent` target as one column per class.
    #[arg(long, requires = "agent")]
    pub one_hot: bool,
}

impl PreprocessArgs {
    /// The per-agent target selected by `--agent` and `--one-hot`, if any.
    pub fn target(&self) -> Option<Target> {
        let encoding = if self.one_hot {
            TargetEncoding::OneHot
        } else {
            TargetEncoding::Class
        };
        self.agent.map(|agent| Target { agent, encoding })
    }
}

/// All top-level subcommands exposed by the `toponet` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Generate random networks and write their labeled topologies as CSV.
    Generate(GenerateArgs),

    /// Synthesize the backbone and clusters of a JSON network.
    Synthesize {
        /// Path to a network JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Anchor selection for orphans without a reliable route.
        #[arg(long, default_value = "lowest-id", value_enum)]
        fallback: FallbackArg,
    },

    /// List every simple cycle of a network's reliable graph.
    Cycles {
        /// Path to a network JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
    },

    /// Re-index labels and split a dataset into train, validation and test files.
    Preprocess(PreprocessArgs),

    /// Print the tool and library versions.
    Version,
}

/// Root CLI struct for the `toponet` binary.
///
/// Global flags are marked `global = true` so clap propagates them to every
/// subcommand.
#[derive(Parser)]
#[command(
    name = "toponet",
    version,
    about = "Agent network topology synthesis",
    long_about = "Generates agent proximity networks, finds their backbone cycle,\n\
                  assigns every other agent to a backbone cluster, and prepares\n\
                  the resulting labels as training datasets."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Only log errors to stderr (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log debug events to stderr (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `TOPONET_MAX_FILE_SIZE` environment variable.
    /// Default: 268435456 (256 MB).
    #[arg(
        long,
        global = true,
        env = "TOPONET_MAX_FILE_SIZE",
        default_value = "268435456"
    )]
    pub max_file_size: u64,
}

#[cfg(test)]
mod tests;
