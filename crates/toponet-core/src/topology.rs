//! End-to-end topology synthesis for one network instance.
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::backbone::select_backbone;
use crate::cluster::{AttachmentRule, ClusterAssigner, ClusterMap, FallbackPolicy};
use crate::network::{Cycle, Network, enumerate_cycles};
use crate::newtypes::AgentId;

/// Errors that stop a synthesis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// The reliable graph is acyclic, so no backbone exists.
    NoBackboneCycle,
    /// No attachment rule applies to this agent.
    UnresolvedOrphan {
        /// The agent left without an anchor.
        id: AgentId,
    },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoBackboneCycle => {
                f.write_str("no backbone: the reliable graph contains no cycle")
            }
            Self::UnresolvedOrphan { id } => {
                write!(f, "agent {id} has no reliable or critical route to the backbone")
            }
        }
    }
}

impl std::error::Error for TopologyError {}

/// Tunables for [`synthesize_topology`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SynthesisConfig {
    /// Selection used when an orphan's reliable peers give no route.
    pub fallback: FallbackPolicy,
}

/// Result of a synthesis run: the backbone plus every agent's anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Topology {
    /// The selected backbone cycle.
    pub backbone: Cycle,
    /// Anchor of every agent, backbone members included.
    pub clusters: ClusterMap,
}

impl Topology {
    /// Anchors in ascending agent id order; the per-agent training labels.
    pub fn labels(&self) -> Vec<AgentId> {
        self.clusters.targets().map(|(_, target)| target).collect()
    }

    /// Number of agents that are not on the backbone.
    pub fn orphan_count(&self) -> usize {
        self.clusters
            .iter()
            .filter(|(_, a)| a.rule != AttachmentRule::Backbone)
            .count()
    }

    /// Cluster size per backbone agent, counting the anchor itself.
    pub fn cluster_sizes(&self) -> BTreeMap<AgentId, usize> {
        let mut sizes = BTreeMap::new();
        for (_, target) in self.clusters.targets() {
            *sizes.entry(target).or_insert(0) += 1;
        }
        sizes
    }
}

/// Runs the full pipeline on `network`.
///
/// Writes every agent's degree, enumerates the simple cycles of the reliable
/// graph, picks the longest as backbone and attaches the remaining agents.
/// Degrees stay written on `network` after the call, whatever the outcome.
///
/// # Errors
///
/// - [`TopologyError::NoBackboneCycle`] if the reliable graph has no cycle.
/// - [`TopologyError::UnresolvedOrphan`] for the first agent that cannot be
///   attached.
pub fn synthesize_topology(
    network: &mut Network,
    config: &SynthesisConfig,
) -> Result<Topology, TopologyError> {
    network.assign_degrees();

    let cycles = enumerate_cycles(network.reliable_edges());
    let backbone = select_backbone(&cycles)?.clone();
    let clusters = ClusterAssigner::new(network, &backbone, config.fallback).assign()?;

    tracing::debug!(
        agents = network.len(),
        cycles = cycles.len(),
        backbone_len = backbone.len(),
        "topology synthesized"
    );

    Ok(Topology { backbone, clusters })
}
