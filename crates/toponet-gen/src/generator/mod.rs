//! Random proximity network generator.
//!
//! Agents are dropped one at a time, uniformly inside a square zone, and kept
//! only if they land within communication range of an agent already placed.
//! Once every agent is placed, each one gets its reliable and critical
//! neighbor sets from the pairwise distances.

pub mod placement;
pub mod proximity;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use toponet_core::{IdError, Network, NetworkBuildError, from_agents};

use placement::place_agents;
use proximity::{ProximityBands, assign_neighbor_sets};

/// Errors produced while generating a network or a labeled run.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A configuration value is outside its valid range.
    #[error("invalid generator config: {0}")]
    InvalidConfig(&'static str),

    /// No draw landed in range of the agents placed so far.
    #[error("could not place agent {agent} after {attempts} draws")]
    PlacementExhausted {
        /// One-based id of the agent being placed.
        agent: usize,
        /// Draws spent on that agent.
        attempts: usize,
    },

    /// Every network generated for one record failed synthesis.
    #[error("record {record}: no network with a complete topology after {attempts} attempts")]
    RetriesExhausted {
        /// One-based index of the record being produced.
        record: usize,
        /// Networks generated for that record.
        attempts: usize,
    },

    /// More agents were requested than the id space holds.
    #[error("agent id out of range: {0}")]
    Id(#[from] IdError),

    /// The generated agents did not form a valid network.
    #[error("generated network is invalid: {0}")]
    Build(#[from] NetworkBuildError),
}

/// Configuration for the network generator.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Seed for the random number generator (deterministic).
    pub seed: u64,
    /// Number of agents per network.
    pub num_agents: usize,
    /// Side length of the square deployment zone.
    pub zone_range: f64,
    /// Maximum distance of a reliable link, before scaling.
    pub connectivity_threshold: f64,
    /// Width of the critical band beyond the threshold, before scaling.
    pub epsilon: f64,
    /// Factor applied to threshold and band.
    pub scale_factor: f64,
    /// Draws allowed for a single agent before placement gives up.
    pub max_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Preset::Default.config(0)
    }
}

impl GeneratorConfig {
    /// Radius within which two agents are reliably linked.
    pub fn reliable_radius(&self) -> f64 {
        self.scale_factor * self.connectivity_threshold
    }

    /// Radius within which two agents are linked at all.
    pub fn critical_radius(&self) -> f64 {
        self.scale_factor * (self.connectivity_threshold + self.epsilon)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`GenerateError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.num_agents == 0 {
            return Err(GenerateError::InvalidConfig("num_agents must be at least 1"));
        }
        if !(self.zone_range.is_finite() && self.zone_range > 0.0) {
            return Err(GenerateError::InvalidConfig("zone_range must be positive"));
        }
        if !(self.connectivity_threshold.is_finite() && self.connectivity_threshold > 0.0) {
            return Err(GenerateError::InvalidConfig(
                "connectivity_threshold must be positive",
            ));
        }
        if !(self.epsilon.is_finite() && self.epsilon >= 0.0) {
            return Err(GenerateError::InvalidConfig("epsilon must not be negative"));
        }
        if !(self.scale_factor.is_finite() && self.scale_factor > 0.0) {
            return Err(GenerateError::InvalidConfig("scale_factor must be positive"));
        }
        if self.max_attempts == 0 {
            return Err(GenerateError::InvalidConfig("max_attempts must be at least 1"));
        }
        Ok(())
    }
}

/// Named generator presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Fewer agents; cycles are rarer and retries more frequent.
    Sparse,
    /// The parameters the historical ten-agent datasets were built with.
    Default,
    /// More agents in the same zone; cycle counts grow quickly.
    Dense,
}

impl Preset {
    /// Returns the `GeneratorConfig` for this preset.
    pub fn config(self, seed: u64) -> GeneratorConfig {
        match self {
            Preset::Sparse => GeneratorConfig {
                seed,
                num_agents: 6,
                zone_range: 1.0,
                connectivity_threshold: 0.5,
                epsilon: 0.1,
                scale_factor: 0.1,
                max_attempts: 100_000,
            },
            Preset::Default => GeneratorConfig {
                seed,
                num_agents: 10,
                zone_range: 1.0,
                connectivity_threshold: 0.5,
                epsilon: 0.1,
                scale_factor: 0.1,
                max_attempts: 100_000,
            },
            Preset::Dense => GeneratorConfig {
                seed,
                num_agents: 14,
                zone_range: 1.0,
                connectivity_threshold: 0.5,
                epsilon: 0.1,
                scale_factor: 0.1,
                max_attempts: 100_000,
            },
        }
    }
}

/// Generates one network, drawing from `rng`.
///
/// Agents get ids `1..=num_agents` in placement order.
///
/// # Errors
///
/// - [`GenerateError::InvalidConfig`] if `config` fails validation.
/// - [`GenerateError::PlacementExhausted`] if an agent cannot be placed.
pub fn generate_network(
    config: &GeneratorConfig,
    rng: &mut StdRng,
) -> Result<Network, GenerateError> {
    config.validate()?;
    let positions = place_agents(config, rng)?;
    let agents = assign_neighbor_sets(&positions, ProximityBands::from_config(config))?;
    Ok(from_agents(agents)?)
}

/// Generates one network from a fresh generator seeded with `config.seed`.
///
/// # Errors
///
/// See [`generate_network`].
pub fn generate_seeded(config: &GeneratorConfig) -> Result<Network, GenerateError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    generate_network(config, &mut rng)
}
