//! Endpoint-count load metric over the reliable-edge list.
//!
//! The count is taken over the whole reliable graph, not the backbone, and is
//! only ever used to break ties when an orphan has several candidate anchors.
use std::collections::BTreeMap;

use crate::newtypes::AgentId;
use crate::structures::Edge;

/// Counts how many times each id appears as an endpoint in `edges`.
///
/// Ids that appear in no edge are absent from the result.
pub fn count_degrees(edges: &[Edge]) -> BTreeMap<AgentId, usize> {
    let mut degrees: BTreeMap<AgentId, usize> = BTreeMap::new();
    for id in edges.iter().flat_map(Edge::endpoints) {
        *degrees.entry(id).or_insert(0) += 1;
    }
    degrees
}
