#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod backbone;
pub mod cluster;
pub mod file;
pub mod network;
pub mod newtypes;
pub mod structures;
pub mod topology;

#[cfg(test)]
mod test_helpers;

pub use backbone::select_backbone;
pub use cluster::{
    Attachment, AttachmentRule, ClusterAssigner, ClusterMap, FallbackPolicy, orphan_order,
    priority_key,
};
pub use file::{NetworkDecodeError, NetworkFile, parse_network};
pub use network::{
    Cycle, CycleEnumerator, Network, NetworkBuildError, NeighborSet, build_network,
    canonical_form, canonical_inverse, count_degrees, enumerate_cycles, from_agents, link_graph,
};
pub use newtypes::{AgentId, IdError};
pub use structures::{Agent, Edge, Position};
pub use topology::{SynthesisConfig, Topology, TopologyError, synthesize_topology};

/// Returns the current version of the toponet-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
