//! Batch production of labeled networks.
//!
//! A [`DatasetRun`] keeps generating networks and synthesizing their
//! topologies until it has the requested number of labeled records. A
//! network whose synthesis fails is discarded and replaced; the failure is
//! logged and counted, never written out.
use rand::SeedableRng;
use rand::rngs::StdRng;
use toponet_core::{Network, SynthesisConfig, Topology, TopologyError, synthesize_topology};

use crate::generator::{GenerateError, GeneratorConfig, generate_network};

/// Networks generated per record before the run gives up.
pub const DEFAULT_MAX_RETRIES: usize = 10_000;

/// Records between two progress log lines.
const PROGRESS_EVERY: usize = 10;

/// A generated network together with its synthesized topology.
#[derive(Debug, Clone)]
pub struct LabeledNetwork {
    /// The network, with degrees assigned.
    pub network: Network,
    /// Its backbone and cluster map.
    pub topology: Topology,
}

/// Outcome of [`DatasetRun::run`].
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Labeled records, in production order.
    pub records: Vec<LabeledNetwork>,
    /// Networks discarded because their reliable graph had no cycle.
    pub discarded_no_backbone: usize,
    /// Networks discarded because an agent could not be attached.
    pub discarded_unresolved: usize,
}

impl RunReport {
    /// Total networks discarded.
    pub fn discarded(&self) -> usize {
        self.discarded_no_backbone + self.discarded_unresolved
    }
}

/// Settings for one labeled-dataset run.
#[derive(Debug, Clone)]
pub struct DatasetRun {
    /// Network generator settings; `generator.seed` seeds the whole run.
    pub generator: GeneratorConfig,
    /// Topology synthesis settings.
    pub synthesis: SynthesisConfig,
    /// Networks generated per record before giving up.
    pub max_retries: usize,
}

impl DatasetRun {
    /// Creates a run with [`DEFAULT_MAX_RETRIES`].
    pub fn new(generator: GeneratorConfig, synthesis: SynthesisConfig) -> Self {
        Self {
            generator,
            synthesis,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Produces `count` labeled records from a generator seeded with
    /// `self.generator.seed`.
    ///
    /// # Errors
    ///
    /// - [`GenerateError::InvalidConfig`] or
    ///   [`GenerateError::PlacementExhausted`] from the generator.
    /// - [`GenerateError::RetriesExhausted`] if `max_retries` consecutive
    ///   networks fail synthesis.
    pub fn run(&self, count: usize) -> Result<RunReport, GenerateError> {
        let mut rng = StdRng::seed_from_u64(self.generator.seed);
        self.run_with_rng(count, &mut rng)
    }

    /// Like [`DatasetRun::run`], drawing from a caller-provided generator.
    ///
    /// # Errors
    ///
    /// See [`DatasetRun::run`].
    pub fn run_with_rng(
        &self,
        count: usize,
        rng: &mut StdRng,
    ) -> Result<RunReport, GenerateError> {
        self.generator.validate()?;
        let mut report = RunReport {
            records: Vec::with_capacity(count),
            ..RunReport::default()
        };

        for record in 1..=count {
            let labeled = self.next_record(record, rng, &mut report)?;
            report.records.push(labeled);
            if record % PROGRESS_EVERY == 0 {
                tracing::info!(record, total = count, "record added to dataset");
            }
        }

        tracing::info!(
            records = report.records.len(),
            discarded_no_backbone = report.discarded_no_backbone,
            discarded_unresolved = report.discarded_unresolved,
            "dataset run finished"
        );
        Ok(report)
    }

    fn next_record(
        &self,
        record: usize,
        rng: &mut StdRng,
        report: &mut RunReport,
    ) -> Result<LabeledNetwork, GenerateError> {
        for attempt in 1..=self.max_retries {
            let mut network = generate_network(&self.generator, rng)?;
            match synthesize_topology(&mut network, &self.synthesis) {
                Ok(topology) => return Ok(LabeledNetwork { network, topology }),
                Err(err @ TopologyError::NoBackboneCycle) => {
                    report.discarded_no_backbone += 1;
                    tracing::warn!(record, attempt, %err, "discarding network");
                }
                Err(err @ TopologyError::UnresolvedOrphan { .. }) => {
                    report.discarded_unresolved += 1;
                    tracing::warn!(record, attempt, %err, "discarding network");
                }
            }
        }
        Err(GenerateError::RetriesExhausted {
            record,
            attempts: self.max_retries,
        })
    }
}
