//! Proximity network generator and labeled-topology runs for `toponet`.
//!
//! This crate produces random agent networks the way the training datasets
//! were built, labels each one with `toponet-core`'s topology synthesis, and
//! carries the invariant checkers shared by integration tests and benchmarks.

pub mod correctness;
pub mod generator;
pub mod run;

pub use generator::{GenerateError, GeneratorConfig, Preset, generate_network, generate_seeded};
pub use run::{DEFAULT_MAX_RETRIES, DatasetRun, LabeledNetwork, RunReport};
