//! Plain data types shared by every stage of topology synthesis.
use serde::{Deserialize, Serialize};

use crate::newtypes::AgentId;

/// 2D coordinate of an agent inside the deployment zone.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Creates a position from its two coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One mobile agent and its precomputed neighborhood.
///
/// `reliable_ids` and `critical_ids` are ordered: the cluster heuristic scans
/// them front to back, so their order is part of the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique positive identifier.
    pub id: AgentId,
    /// Location inside the deployment zone.
    pub position: Position,
    /// Peers within the tight connectivity threshold.
    #[serde(default)]
    pub reliable_ids: Vec<AgentId>,
    /// Peers in the outer tension band: still connected, but at risk.
    #[serde(default)]
    pub critical_ids: Vec<AgentId>,
    /// Count of this agent's endpoints in the reliable-edge list.
    ///
    /// Zero until [`crate::network::Network::assign_degrees`] runs.
    #[serde(default)]
    pub degree: usize,
}

impl Agent {
    /// Creates an agent with empty neighbor sets.
    pub fn new(id: AgentId, position: Position) -> Self {
        Self {
            id,
            position,
            reliable_ids: Vec::new(),
            critical_ids: Vec::new(),
            degree: 0,
        }
    }
}

/// Unordered reliable link between two agents.
///
/// `a` is the agent whose reliable set introduced the link, `b` the listed
/// peer. Equality is positional; use [`Edge::same_link`] for unordered
/// comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// First endpoint.
    pub a: AgentId,
    /// Second endpoint.
    pub b: AgentId,
}

impl Edge {
    /// Creates an edge between `a` and `b`.
    pub fn new(a: AgentId, b: AgentId) -> Self {
        Self { a, b }
    }

    /// Returns both endpoints in stored order.
    pub fn endpoints(&self) -> [AgentId; 2] {
        [self.a, self.b]
    }

    /// Returns `true` if `id` is one of the endpoints.
    pub fn touches(&self, id: AgentId) -> bool {
        self.a == id || self.b == id
    }

    /// Returns `true` if both edges join the same pair of agents.
    pub fn same_link(&self, other: &Edge) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}
