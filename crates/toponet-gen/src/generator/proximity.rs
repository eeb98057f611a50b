//! Distance bands and per-agent neighbor sets.
use toponet_core::{Agent, AgentId, NeighborSet, Position};

use super::{GenerateError, GeneratorConfig};

/// Scaled radii separating reliable, critical and absent links.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityBands {
    /// Upper bound (inclusive) of a reliable link.
    pub reliable: f64,
    /// Upper bound (inclusive) of a critical link.
    pub critical: f64,
}

impl ProximityBands {
    /// Bands for `config`.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            reliable: config.reliable_radius(),
            critical: config.critical_radius(),
        }
    }

    /// Classifies a pairwise distance.
    pub fn classify(&self, distance: f64) -> Option<NeighborSet> {
        if distance <= self.reliable {
            Some(NeighborSet::Reliable)
        } else if distance <= self.critical {
            Some(NeighborSet::Critical)
        } else {
            None
        }
    }
}

/// Builds agents `1..=positions.len()` with neighbor sets ordered by id.
///
/// # Errors
///
/// [`GenerateError::Id`] if there are more positions than agent ids.
pub fn assign_neighbor_sets(
    positions: &[Position],
    bands: ProximityBands,
) -> Result<Vec<Agent>, GenerateError> {
    let ids = (1..=positions.len())
        .map(AgentId::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let mut agents: Vec<Agent> = ids
        .iter()
        .zip(positions)
        .map(|(&id, &position)| Agent::new(id, position))
        .collect();

    for (i, agent) in agents.iter_mut().enumerate() {
        for (j, (&peer, other)) in ids.iter().zip(positions).enumerate() {
            if i == j {
                continue;
            }
            match bands.classify(agent.position.distance(other)) {
                Some(NeighborSet::Reliable) => agent.reliable_ids.push(peer),
                Some(NeighborSet::Critical) => agent.critical_ids.push(peer),
                None => {}
            }
        }
    }

    Ok(agents)
}
