//! Backbone selection: the longest enumerated cycle.
use crate::network::Cycle;
use crate::topology::TopologyError;

/// Returns the cycle with the most agents.
///
/// Ties go to the cycle enumerated first; no other criterion is applied.
///
/// # Errors
///
/// [`TopologyError::NoBackboneCycle`] if `cycles` is empty.
pub fn select_backbone(cycles: &[Cycle]) -> Result<&Cycle, TopologyError> {
    let mut best: Option<&Cycle> = None;
    for cycle in cycles {
        match best {
            Some(current) if current.len() >= cycle.len() => {}
            Some(_) | None => best = Some(cycle),
        }
    }
    best.ok_or(TopologyError::NoBackboneCycle)
}
