/// Exhaustive simple-cycle enumeration over an undirected edge list.
///
/// # Algorithm Overview
///
/// Every node touching an edge seeds a depth-first path-extension search.
/// A path grows one neighbor at a time from its frontier; a neighbor already
/// on the path is skipped unless it is the seed and the path holds more than
/// two nodes, in which case the path closes into a cycle.
///
/// Each closed path is rotated to start at its minimum id (its canonical
/// form). It is recorded only if neither that form nor the canonical form of
/// its reversal has been recorded before, so a cycle and its mirror image
/// are stored once.
///
/// The search is seed- and direction-sensitive, which is why every endpoint
/// seeds its own search; the resulting rediscoveries are absorbed by the
/// canonical dedup step.
///
/// # Limits
///
/// Running time grows with the number of simple paths in the graph and is
/// exponential in the worst case. This is fine for the small sparse
/// proximity graphs produced by the generator; dense graphs with hundreds of
/// cycles will be slow.
use std::collections::HashSet;
use std::fmt;

use petgraph::graphmap::UnGraphMap;
use serde::Serialize;

use crate::newtypes::AgentId;
use crate::structures::Edge;

// ---------------------------------------------------------------------------
// Canonical forms
// ---------------------------------------------------------------------------

/// Rotates `path` so that it starts at its minimum id.
///
/// Returns an empty vector for an empty path.
pub fn canonical_form(path: &[AgentId]) -> Vec<AgentId> {
    let Some(start) = path
        .iter()
        .enumerate()
        .min_by_key(|&(_, id)| *id)
        .map(|(i, _)| i)
    else {
        return Vec::new();
    };
    let mut rotated = Vec::with_capacity(path.len());
    rotated.extend_from_slice(&path[start..]);
    rotated.extend_from_slice(&path[..start]);
    rotated
}

/// Canonical form of the reversal of `path`.
pub fn canonical_inverse(path: &[AgentId]) -> Vec<AgentId> {
    let reversed: Vec<AgentId> = path.iter().rev().copied().collect();
    canonical_form(&reversed)
}

// ---------------------------------------------------------------------------
// Cycle
// ---------------------------------------------------------------------------

/// A simple cycle stored in canonical form.
///
/// Holds at least three distinct ids; consecutive ids (and the last/first
/// pair) are joined by an edge of the graph it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Cycle(Vec<AgentId>);

impl Cycle {
    /// Builds a cycle from a closed path, canonicalizing it.
    ///
    /// Returns `None` if the path has fewer than three ids or repeats an id.
    pub fn from_path(path: &[AgentId]) -> Option<Self> {
        if path.len() < 3 {
            return None;
        }
        let distinct: HashSet<AgentId> = path.iter().copied().collect();
        if distinct.len() != path.len() {
            return None;
        }
        Some(Self(canonical_form(path)))
    }

    /// Returns the ids in canonical order.
    pub fn ids(&self) -> &[AgentId] {
        &self.0
    }

    /// Number of agents on the cycle.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a constructed cycle; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if `id` lies on the cycle.
    pub fn contains(&self, id: AgentId) -> bool {
        self.0.contains(&id)
    }

    /// Returns the same cycle traversed in the opposite direction.
    pub fn inverse(&self) -> Cycle {
        Cycle(canonical_inverse(&self.0))
    }

    /// Returns `true` if `other` is a rotation or a reflected rotation of
    /// this cycle.
    pub fn is_equivalent(&self, other: &Cycle) -> bool {
        self.0 == other.0 || self.0 == canonical_inverse(&other.0)
    }

    /// Returns the cycle's links, closing the last id back to the first.
    pub fn links(&self) -> impl Iterator<Item = (AgentId, AgentId)> + '_ {
        self.0
            .iter()
            .copied()
            .zip(self.0.iter().copied().cycle().skip(1))
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for id in &self.0 {
            if !first {
                f.write_str(" - ")?;
            }
            write!(f, "{id}")?;
            first = false;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Enumerator
// ---------------------------------------------------------------------------

/// Accumulator for one enumeration run.
///
/// [`CycleEnumerator::run`] consumes the enumerator, so discovered cycles can
/// never leak from one network instance into the next.
#[derive(Debug, Default)]
pub struct CycleEnumerator {
    cycles: Vec<Cycle>,
    recorded: HashSet<Vec<AgentId>>,
    extensions: u64,
}

/// One level of the explicit DFS stack.
///
/// Every frame owns its path; sibling branches never share a buffer.
struct Frame {
    path: Vec<AgentId>,
    neighbors: Vec<AgentId>,
    next: usize,
}

impl Frame {
    /// Root frame: the path holds only `seed`.
    fn seed(seed: AgentId, graph: &UnGraphMap<AgentId, ()>) -> Self {
        Self::at(vec![seed], seed, graph)
    }

    /// `frontier` must be the last id of `path`.
    fn at(path: Vec<AgentId>, frontier: AgentId, graph: &UnGraphMap<AgentId, ()>) -> Self {
        let neighbors = graph.neighbors(frontier).collect();
        Self {
            path,
            neighbors,
            next: 0,
        }
    }
}

/// Builds an undirected graph over `edges` for adjacency lookups.
///
/// Each node's neighbors are listed in edge-list order. Repeated edges
/// collapse into one; self-loops are dropped.
pub fn link_graph(edges: &[Edge]) -> UnGraphMap<AgentId, ()> {
    UnGraphMap::from_edges(
        edges
            .iter()
            .filter(|e| e.a != e.b)
            .map(|e| (e.a, e.b)),
    )
}

impl CycleEnumerator {
    /// Creates an empty enumerator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enumerates all simple cycles of length three or more in `edges`.
    ///
    /// Cycles are returned in first-discovery order. Repeated edges are
    /// ignored. Self-loops never close a cycle of length three and are
    /// skipped.
    pub fn run(mut self, edges: &[Edge]) -> Vec<Cycle> {
        let graph = link_graph(edges);

        // Re-seeding a node that already seeded a search replays the same
        // discoveries, so each distinct endpoint seeds once, in edge order.
        let mut seeded: HashSet<AgentId> = HashSet::new();
        for edge in edges {
            for seed in edge.endpoints() {
                if graph.contains_node(seed) && seeded.insert(seed) {
                    self.search_from(seed, &graph);
                }
            }
        }

        tracing::debug!(
            edges = edges.len(),
            seeds = seeded.len(),
            extensions = self.extensions,
            cycles = self.cycles.len(),
            "cycle enumeration finished"
        );
        self.cycles
    }

    /// Iterative DFS from `seed`, preserving recursive visiting order.
    fn search_from(&mut self, seed: AgentId, graph: &UnGraphMap<AgentId, ()>) {
        let mut stack: Vec<Frame> = vec![Frame::seed(seed, graph)];

        while let Some(frame) = stack.last_mut() {
            let Some(&neighbor) = frame.neighbors.get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;

            if !frame.path.contains(&neighbor) {
                let mut path = Vec::with_capacity(frame.path.len() + 1);
                path.extend_from_slice(&frame.path);
                path.push(neighbor);
                self.extensions += 1;
                stack.push(Frame::at(path, neighbor, graph));
            } else if frame.path.len() > 2 && neighbor == seed {
                let closed = frame.path.clone();
                self.record(&closed);
            }
        }
    }

    /// Records `path` unless it or its mirror image is already known.
    fn record(&mut self, path: &[AgentId]) {
        let canonical = canonical_form(path);
        let inverse = canonical_inverse(&canonical);
        if self.recorded.contains(&canonical) || self.recorded.contains(&inverse) {
            return;
        }
        self.recorded.insert(canonical.clone());
        self.cycles.push(Cycle(canonical));
    }
}

/// Enumerates all simple cycles in `edges` with a fresh [`CycleEnumerator`].
pub fn enumerate_cycles(edges: &[Edge]) -> Vec<Cycle> {
    CycleEnumerator::new().run(edges)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
