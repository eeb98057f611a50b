//! Post-operation invariant checkers for correctness validation.

use std::collections::HashSet;

use petgraph::algo::connected_components;
use petgraph::graphmap::UnGraphMap;
use toponet_core::{AgentId, AttachmentRule, Cycle, Network, Topology, link_graph};

use crate::generator::GeneratorConfig;

/// Verifies that every agent reaches every other over reliable or critical
/// links, and that ids run `1..=n` in order.
pub fn check_generated_network(network: &Network) -> Result<(), String> {
    for (i, id) in network.ids().enumerate() {
        if id.get() as usize != i + 1 {
            return Err(format!("agent at position {i} has id {id}, expected {}", i + 1));
        }
    }

    let mut graph: UnGraphMap<AgentId, ()> = UnGraphMap::new();
    for agent in network.agents() {
        graph.add_node(agent.id);
        for &peer in agent.reliable_ids.iter().chain(&agent.critical_ids) {
            graph.add_edge(agent.id, peer, ());
        }
    }
    let components = connected_components(&graph);
    if !network.is_empty() && components != 1 {
        return Err(format!("network splits into {components} components"));
    }
    Ok(())
}

/// Verifies that neighbor sets agree with pairwise distances.
pub fn check_neighbor_sets(network: &Network, config: &GeneratorConfig) -> Result<(), String> {
    let reliable = config.reliable_radius();
    let critical = config.critical_radius();
    for agent in network.agents() {
        for &peer in &agent.reliable_ids {
            let d = network
                .distance(agent.id, peer)
                .ok_or_else(|| format!("agent {}: unknown reliable peer {peer}", agent.id))?;
            if d > reliable {
                return Err(format!("{}-{peer}: reliable at distance {d}", agent.id));
            }
        }
        for &peer in &agent.critical_ids {
            let d = network
                .distance(agent.id, peer)
                .ok_or_else(|| format!("agent {}: unknown critical peer {peer}", agent.id))?;
            if d <= reliable || d > critical {
                return Err(format!("{}-{peer}: critical at distance {d}", agent.id));
            }
        }
        let listed = agent.reliable_ids.len() + agent.critical_ids.len();
        let expected = network
            .agents()
            .iter()
            .filter(|other| {
                other.id != agent.id && agent.position.distance(&other.position) <= critical
            })
            .count();
        if listed != expected {
            return Err(format!(
                "agent {}: {listed} peers listed, {expected} within range",
                agent.id
            ));
        }
    }
    Ok(())
}

/// Verifies that every cycle is simple, canonical and closed in `network`.
pub fn check_cycles(network: &Network, cycles: &[Cycle]) -> Result<(), String> {
    let graph = link_graph(network.reliable_edges());
    for cycle in cycles {
        let ids = cycle.ids();
        if ids.len() < 3 {
            return Err(format!("cycle {cycle} has fewer than three agents"));
        }
        let unique: HashSet<_> = ids.iter().collect();
        if unique.len() != ids.len() {
            return Err(format!("cycle {cycle} repeats an agent"));
        }
        if ids.iter().min() != ids.first() {
            return Err(format!("cycle {cycle} does not start at its minimum id"));
        }
        for (a, b) in cycle.links() {
            if !graph.contains_edge(a, b) {
                return Err(format!("cycle {cycle} uses missing link {a}-{b}"));
            }
        }
    }
    for (i, a) in cycles.iter().enumerate() {
        if let Some(b) = cycles[i + 1..].iter().find(|b| a.is_equivalent(b)) {
            return Err(format!("cycles {a} and {b} are the same cycle"));
        }
    }
    Ok(())
}

/// Verifies backbone maximality and cluster completeness.
pub fn check_topology(
    network: &Network,
    cycles: &[Cycle],
    topology: &Topology,
) -> Result<(), String> {
    if let Some(longer) = cycles.iter().find(|c| c.len() > topology.backbone.len()) {
        return Err(format!(
            "cycle {longer} is longer than backbone {}",
            topology.backbone
        ));
    }
    if !cycles.contains(&topology.backbone) {
        return Err(format!("backbone {} was not enumerated", topology.backbone));
    }
    if topology.clusters.len() != network.len() {
        return Err(format!(
            "{} agents clustered, network has {}",
            topology.clusters.len(),
            network.len()
        ));
    }
    for id in network.ids() {
        let attachment = topology
            .clusters
            .get(id)
            .ok_or_else(|| format!("agent {id} has no cluster"))?;
        let on_backbone = topology.backbone.contains(id);
        if on_backbone != (attachment.rule == AttachmentRule::Backbone) {
            return Err(format!(
                "agent {id}: rule {} disagrees with backbone membership",
                attachment.rule.as_str()
            ));
        }
        if on_backbone && attachment.target != id {
            return Err(format!("backbone agent {id} anchored to {}", attachment.target));
        }
        if !topology.backbone.contains(attachment.target) {
            return Err(format!(
                "agent {id} anchored to {}, which is off the backbone",
                attachment.target
            ));
        }
    }
    Ok(())
}
