//! Shared constructors for unit test fixtures.
//!
//! Compiled only in test builds. Integration tests under
//! `crates/toponet-core/tests/` carry their own helpers because they link
//! against the non-test library build.
#![allow(clippy::expect_used)]

use crate::newtypes::AgentId;
use crate::structures::{Agent, Edge, Position};

/// Creates an [`AgentId`], panicking on zero.
pub fn aid(n: u32) -> AgentId {
    AgentId::try_from(n).expect("valid AgentId")
}

/// Maps raw ids to [`AgentId`]s, preserving order.
pub fn ids(ns: &[u32]) -> Vec<AgentId> {
    ns.iter().map(|&n| aid(n)).collect()
}

/// Builds an edge list from `(a, b)` pairs, preserving order.
pub fn edges(pairs: &[(u32, u32)]) -> Vec<Edge> {
    pairs.iter().map(|&(a, b)| Edge::new(aid(a), aid(b))).collect()
}

/// Builds an agent with the given position and neighbor sets.
pub fn agent(id: u32, (x, y): (f64, f64), reliable: &[u32], critical: &[u32]) -> Agent {
    let mut agent = Agent::new(aid(id), Position::new(x, y));
    agent.reliable_ids = ids(reliable);
    agent.critical_ids = ids(critical);
    agent
}

/// Unit square 1-2-3-4, each corner reliably linked to its two neighbors.
pub fn square_agents() -> Vec<Agent> {
    vec![
        agent(1, (0.0, 0.0), &[2, 4], &[]),
        agent(2, (1.0, 0.0), &[1, 3], &[]),
        agent(3, (1.0, 1.0), &[2, 4], &[]),
        agent(4, (0.0, 1.0), &[3, 1], &[]),
    ]
}

/// Regular hexagon 1..=6 on the unit circle, 1 at `(1, 0)`, counterclockwise.
pub fn hexagon_agents() -> Vec<Agent> {
    let h = 3f64.sqrt() / 2.0;
    vec![
        agent(1, (1.0, 0.0), &[2, 6], &[]),
        agent(2, (0.5, h), &[1, 3], &[]),
        agent(3, (-0.5, h), &[2, 4], &[]),
        agent(4, (-1.0, 0.0), &[3, 5], &[]),
        agent(5, (-0.5, -h), &[4, 6], &[]),
        agent(6, (0.5, -h), &[5, 1], &[]),
    ]
}
