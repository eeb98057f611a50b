/// Reliable-connectivity graph construction from a [`NetworkFile`].
///
/// A [`Network`] owns the agents of one generated instance, an id index and
/// the derived reliable-edge list. Adjacency lookups go through
/// [`link_graph`], which builds a `petgraph` graph over an edge list.
///
/// # Two-Pass Construction
///
/// [`build_network`] runs two passes over the file:
/// 1. **Agent pass.** Indexes every agent by id. Fails on duplicate ids.
/// 2. **Neighbor pass.** Checks every reliable and critical reference and
///    derives the reliable-edge list. Fails on self references, repeated
///    neighbors within one set, and ids not present in the agent index.
///
/// # Edge Order
///
/// Agents are walked in [`priority_key`] order: most reliable peers first,
/// then most critical peers, then lowest id. Each agent emits its links in
/// `reliable_ids` order. A link listed by both endpoints is kept once, at its
/// first occurrence. Cycle enumeration order, and therefore backbone
/// tie-breaking, follows this order.
///
/// [`priority_key`]: crate::cluster::priority_key
///
/// # Submodules
///
/// See [`cycles`] for exhaustive simple-cycle enumeration and [`degree`] for
/// the endpoint-count load metric.
pub mod cycles;
pub mod degree;

pub use cycles::{
    Cycle, CycleEnumerator, canonical_form, canonical_inverse, enumerate_cycles, link_graph,
};
pub use degree::count_degrees;

use std::collections::{HashMap, HashSet};

use crate::cluster::priority_key;
use crate::file::NetworkFile;
use crate::newtypes::AgentId;
use crate::structures::{Agent, Edge};

/// Which neighbor set of an agent an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborSet {
    /// The `reliable_ids` set.
    Reliable,
    /// The `critical_ids` set.
    Critical,
}

impl std::fmt::Display for NeighborSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NeighborSet::Reliable => f.write_str("reliable"),
            NeighborSet::Critical => f.write_str("critical"),
        }
    }
}

/// Errors that can occur while building a [`Network`] from a [`NetworkFile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkBuildError {
    /// Two agents share the same id.
    DuplicateAgentId(AgentId),
    /// An agent lists itself as a neighbor.
    SelfReference {
        /// The offending agent.
        agent: AgentId,
        /// The set containing the self reference.
        set: NeighborSet,
    },
    /// An agent lists the same neighbor twice in one set.
    RepeatedNeighbor {
        /// The offending agent.
        agent: AgentId,
        /// The repeated neighbor id.
        neighbor: AgentId,
        /// The set containing the repetition.
        set: NeighborSet,
    },
    /// A neighbor set references an id that no agent carries.
    UnknownNeighbor {
        /// The agent holding the dangling reference.
        agent: AgentId,
        /// The id that could not be resolved.
        missing: AgentId,
        /// The set containing the reference.
        set: NeighborSet,
    },
}

impl std::fmt::Display for NetworkBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkBuildError::DuplicateAgentId(id) => write!(f, "duplicate agent id: {id}"),
            NetworkBuildError::SelfReference { agent, set } => {
                write!(f, "agent {agent} lists itself in its {set} set")
            }
            NetworkBuildError::RepeatedNeighbor {
                agent,
                neighbor,
                set,
            } => write!(
                f,
                "agent {agent} lists neighbor {neighbor} more than once in its {set} set"
            ),
            NetworkBuildError::UnknownNeighbor {
                agent,
                missing,
                set,
            } => write!(
                f,
                "agent {agent} references unknown agent {missing} in its {set} set"
            ),
        }
    }
}

impl std::error::Error for NetworkBuildError {}

/// The agents of one network instance plus their reliable links.
///
/// Construct with [`build_network`]. The only mutable state is each agent's
/// `degree`, written by [`Network::assign_degrees`].
#[derive(Debug, Clone)]
pub struct Network {
    agents: Vec<Agent>,
    id_to_index: HashMap<AgentId, usize>,
    reliable_edges: Vec<Edge>,
}

impl Network {
    /// Returns the number of agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Returns `true` if the network has no agents.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Returns all agents in file order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Looks up an agent by id.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.id_to_index.get(&id).map(|&i| &self.agents[i])
    }

    /// Returns `true` if an agent with this id exists.
    pub fn contains(&self, id: AgentId) -> bool {
        self.id_to_index.contains_key(&id)
    }

    /// Iterates agent ids in file order.
    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.iter().map(|a| a.id)
    }

    /// Returns the derived reliable-edge list (see the module docs for order).
    pub fn reliable_edges(&self) -> &[Edge] {
        &self.reliable_edges
    }

    /// Euclidean distance between two agents, or `None` if either is unknown.
    pub fn distance(&self, a: AgentId, b: AgentId) -> Option<f64> {
        let pa = self.agent(a)?.position;
        let pb = self.agent(b)?.position;
        Some(pa.distance(&pb))
    }

    /// Writes each agent's reliable-edge endpoint count into `Agent::degree`.
    ///
    /// Counts over the full reliable-edge list, not just backbone links.
    /// Agents without reliable links get zero.
    pub fn assign_degrees(&mut self) {
        let degrees = count_degrees(&self.reliable_edges);
        for agent in &mut self.agents {
            agent.degree = degrees.get(&agent.id).copied().unwrap_or(0);
        }
    }

    /// Consumes the network and returns its agents.
    pub fn into_agents(self) -> Vec<Agent> {
        self.agents
    }

    /// Returns a [`NetworkFile`] describing the current agents.
    pub fn to_file(&self) -> NetworkFile {
        NetworkFile {
            agents: self.agents.clone(),
        }
    }
}

/// Constructs a [`Network`] from a decoded [`NetworkFile`].
///
/// # Errors
///
/// - [`NetworkBuildError::DuplicateAgentId`]: two agents share an id.
/// - [`NetworkBuildError::SelfReference`]: an agent lists itself.
/// - [`NetworkBuildError::RepeatedNeighbor`]: a neighbor appears twice in
///   one set.
/// - [`NetworkBuildError::UnknownNeighbor`]: a neighbor id has no agent.
pub fn build_network(file: &NetworkFile) -> Result<Network, NetworkBuildError> {
    from_agents(file.agents.clone())
}

/// Constructs a [`Network`] directly from owned agents.
///
/// Same checks as [`build_network`].
///
/// # Errors
///
/// See [`build_network`].
pub fn from_agents(agents: Vec<Agent>) -> Result<Network, NetworkBuildError> {
    let mut id_to_index: HashMap<AgentId, usize> = HashMap::with_capacity(agents.len());
    for (i, agent) in agents.iter().enumerate() {
        if id_to_index.insert(agent.id, i).is_some() {
            return Err(NetworkBuildError::DuplicateAgentId(agent.id));
        }
    }

    for agent in &agents {
        check_neighbors(agent, &agent.reliable_ids, NeighborSet::Reliable, &id_to_index)?;
        check_neighbors(agent, &agent.critical_ids, NeighborSet::Critical, &id_to_index)?;
    }

    let reliable_edges = derive_reliable_edges(&agents);

    Ok(Network {
        agents,
        id_to_index,
        reliable_edges,
    })
}

fn check_neighbors(
    agent: &Agent,
    ids: &[AgentId],
    set: NeighborSet,
    index: &HashMap<AgentId, usize>,
) -> Result<(), NetworkBuildError> {
    let mut seen: HashSet<AgentId> = HashSet::with_capacity(ids.len());
    for &neighbor in ids {
        if neighbor == agent.id {
            return Err(NetworkBuildError::SelfReference {
                agent: agent.id,
                set,
            });
        }
        if !seen.insert(neighbor) {
            return Err(NetworkBuildError::RepeatedNeighbor {
                agent: agent.id,
                neighbor,
                set,
            });
        }
        if !index.contains_key(&neighbor) {
            return Err(NetworkBuildError::UnknownNeighbor {
                agent: agent.id,
                missing: neighbor,
                set,
            });
        }
    }
    Ok(())
}

/// Derives the reliable-edge list in priority order, keeping each unordered
/// link once.
fn derive_reliable_edges(agents: &[Agent]) -> Vec<Edge> {
    let mut ordered: Vec<&Agent> = agents.iter().collect();
    ordered.sort_by_key(|a| priority_key(a));

    let mut seen: HashSet<(AgentId, AgentId)> = HashSet::new();
    let mut edges = Vec::new();
    for agent in ordered {
        for &peer in &agent.reliable_ids {
            let key = if agent.id < peer {
                (agent.id, peer)
            } else {
                (peer, agent.id)
            };
            if seen.insert(key) {
                edges.push(Edge::new(agent.id, peer));
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::test_helpers::{agent, aid, ids, square_agents};

    #[test]
    fn empty_file_builds() {
        let net = build_network(&NetworkFile::default()).expect("empty network");
        assert!(net.is_empty());
        assert!(net.reliable_edges().is_empty());
    }

    #[test]
    fn mutual_listing_yields_one_edge() {
        let net = from_agents(square_agents()).expect("square");
        assert_eq!(net.reliable_edges().len(), 4);
        let graph = link_graph(net.reliable_edges());
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.node_count(), 4);
    }

    fn edge_pairs(net: &Network) -> Vec<(u32, u32)> {
        net.reliable_edges()
            .iter()
            .map(|e| (e.a.get(), e.b.get()))
            .collect()
    }

    #[test]
    fn equal_priority_edges_follow_ids_then_reliable_sets() {
        let net = from_agents(square_agents()).expect("square");
        assert_eq!(edge_pairs(&net), vec![(1, 2), (1, 4), (2, 3), (3, 4)]);
    }

    #[test]
    fn better_connected_agents_emit_their_edges_first() {
        let agents = vec![
            agent(1, (0.0, 0.0), &[2], &[]),
            agent(2, (0.1, 0.0), &[1, 3], &[]),
            agent(3, (0.2, 0.0), &[2, 4], &[5]),
            agent(4, (0.3, 0.0), &[3], &[]),
            agent(5, (0.4, 0.0), &[], &[3]),
        ];
        let net = from_agents(agents).expect("builds");
        assert_eq!(edge_pairs(&net), vec![(3, 2), (3, 4), (2, 1)]);
    }

    /// Two disjoint triangles tie for longest; the one holding the agent with
    /// the most reliable peers is enumerated first and becomes the backbone.
    #[test]
    fn priority_order_breaks_backbone_ties() {
        let agents = vec![
            agent(1, (0.0, 0.0), &[2, 3], &[]),
            agent(2, (0.1, 0.0), &[1, 3], &[]),
            agent(3, (0.0, 0.1), &[1, 2], &[]),
            agent(4, (1.0, 0.0), &[5, 6, 7], &[]),
            agent(5, (1.1, 0.0), &[4, 6], &[]),
            agent(6, (1.0, 0.1), &[4, 5], &[]),
            agent(7, (0.9, 0.0), &[4], &[]),
        ];
        let net = from_agents(agents).expect("builds");
        assert_eq!(
            edge_pairs(&net),
            vec![(4, 5), (4, 6), (4, 7), (1, 2), (1, 3), (2, 3), (5, 6)]
        );

        let cycles = enumerate_cycles(net.reliable_edges());
        assert_eq!(cycles.len(), 2);
        let backbone = crate::select_backbone(&cycles).expect("cycles exist");
        assert_eq!(backbone.ids(), ids(&[4, 5, 6]).as_slice());
    }

    #[test]
    fn one_sided_listing_still_creates_edge() {
        let agents = vec![
            agent(1, (0.0, 0.0), &[2], &[]),
            agent(2, (0.01, 0.0), &[], &[]),
        ];
        let net = from_agents(agents).expect("builds");
        assert_eq!(net.reliable_edges(), &[Edge::new(aid(1), aid(2))]);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let agents = vec![agent(1, (0.0, 0.0), &[], &[]), agent(1, (1.0, 0.0), &[], &[])];
        let err = from_agents(agents).expect_err("duplicate");
        assert_eq!(err, NetworkBuildError::DuplicateAgentId(aid(1)));
    }

    #[test]
    fn unknown_neighbor_is_rejected() {
        let agents = vec![agent(1, (0.0, 0.0), &[], &[9])];
        let err = from_agents(agents).expect_err("dangling");
        assert_eq!(
            err,
            NetworkBuildError::UnknownNeighbor {
                agent: aid(1),
                missing: aid(9),
                set: NeighborSet::Critical,
            }
        );
        assert!(err.to_string().contains("critical"));
    }

    #[test]
    fn self_reference_is_rejected() {
        let agents = vec![agent(1, (0.0, 0.0), &[1], &[])];
        let err = from_agents(agents).expect_err("self loop");
        assert!(matches!(err, NetworkBuildError::SelfReference { .. }));
    }

    #[test]
    fn repeated_neighbor_is_rejected() {
        let agents = vec![
            agent(1, (0.0, 0.0), &[2, 2], &[]),
            agent(2, (0.0, 0.0), &[], &[]),
        ];
        let err = from_agents(agents).expect_err("repeat");
        assert!(matches!(err, NetworkBuildError::RepeatedNeighbor { .. }));
    }

    #[test]
    fn assign_degrees_counts_all_reliable_links() {
        let mut agents = square_agents();
        agents.push(agent(5, (0.5, 0.5), &[2], &[]));
        let mut net = from_agents(agents).expect("builds");
        net.assign_degrees();
        let degree = |id: u32| net.agent(aid(id)).expect("agent").degree;
        assert_eq!(degree(1), 2);
        assert_eq!(degree(2), 3);
        assert_eq!(degree(5), 1);
    }

    #[test]
    fn distance_uses_positions() {
        let net = from_agents(vec![
            agent(1, (0.0, 0.0), &[], &[]),
            agent(2, (0.3, 0.4), &[], &[]),
        ])
        .expect("builds");
        let d = net.distance(aid(1), aid(2)).expect("both known");
        assert!((d - 0.5).abs() < 1e-12);
        assert!(net.distance(aid(1), aid(3)).is_none());
    }
}
