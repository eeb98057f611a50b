//! Greedy attachment of orphan agents to the backbone cycle.
//!
//! Backbone agents anchor themselves. Every other agent (an *orphan*) is
//! processed once, in [`priority_key`] order, and attached to a backbone
//! agent by the first rule below that yields a target:
//!
//! 1. **Reliable on backbone.** Among reliable peers lying on the backbone,
//!    the least loaded one (lowest degree) wins, then the nearest.
//! 2. **Reliable already clustered.** The first reliable peer that already
//!    has an anchor lends it.
//! 3. **Critical already clustered.** As 2, over the critical peers.
//! 4. **Nearest backbone.** An orphan with reliable peers but no route
//!    through them falls back to a backbone agent picked by the
//!    [`FallbackPolicy`].
//! 5. **Critical on backbone.** An orphan with only critical peers uses
//!    rule 1 over those peers, then rule 3.
//!
//! Rules 2 and 3 read anchors resolved for earlier orphans, so the
//! processing order is part of the result.
use std::cmp::Reverse;
use std::collections::btree_map;
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::network::{Cycle, Network};
use crate::newtypes::AgentId;
use crate::structures::Agent;
use crate::topology::TopologyError;

// ---------------------------------------------------------------------------
// Policy and result types
// ---------------------------------------------------------------------------

/// How rule 4 picks a backbone agent for an orphan with no usable peers.
///
/// The historical datasets were labelled with [`FallbackPolicy::LowestId`]:
/// despite being described as "nearest", that selection takes the lowest
/// backbone id among agents at non-zero distance and ignores geometry.
/// [`FallbackPolicy::Nearest`] takes the geometrically closest backbone agent
/// instead. The default keeps labels comparable with the historical data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Lowest backbone id at non-zero distance.
    #[default]
    LowestId,
    /// Smallest Euclidean distance; ties go to the lower id.
    Nearest,
}

/// The rule that produced an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentRule {
    /// The agent is on the backbone and anchors itself.
    Backbone,
    /// Rule 1.
    ReliableOnBackbone,
    /// Rule 2.
    ReliableClustered,
    /// Rule 3, or the second half of rule 5.
    CriticalClustered,
    /// Rule 4.
    NearestBackbone,
    /// First half of rule 5.
    CriticalOnBackbone,
}

impl AttachmentRule {
    /// Stable snake-case name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            AttachmentRule::Backbone => "backbone",
            AttachmentRule::ReliableOnBackbone => "reliable_on_backbone",
            AttachmentRule::ReliableClustered => "reliable_clustered",
            AttachmentRule::CriticalClustered => "critical_clustered",
            AttachmentRule::NearestBackbone => "nearest_backbone",
            AttachmentRule::CriticalOnBackbone => "critical_on_backbone",
        }
    }
}

/// Anchor of one agent plus the rule that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Backbone agent the agent is clustered under.
    pub target: AgentId,
    /// Rule that produced the attachment.
    pub rule: AttachmentRule,
}

impl Attachment {
    fn new(target: AgentId, rule: AttachmentRule) -> Self {
        Self { target, rule }
    }
}

/// Agent id → attachment, ordered by agent id.
///
/// Entries are only ever added, never replaced or removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterMap(BTreeMap<AgentId, Attachment>);

impl ClusterMap {
    /// Returns the attachment of `id`, if resolved.
    pub fn get(&self, id: AgentId) -> Option<&Attachment> {
        self.0.get(&id)
    }

    /// Returns the backbone anchor of `id`, if resolved.
    pub fn target(&self, id: AgentId) -> Option<AgentId> {
        self.0.get(&id).map(|a| a.target)
    }

    /// Returns `true` if `id` has been resolved.
    pub fn contains(&self, id: AgentId) -> bool {
        self.0.contains_key(&id)
    }

    /// Number of resolved agents.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing has been resolved.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(agent, attachment)` in ascending agent id order.
    pub fn iter(&self) -> btree_map::Iter<'_, AgentId, Attachment> {
        self.0.iter()
    }

    /// Iterates `(agent, anchor)` in ascending agent id order.
    pub fn targets(&self) -> impl Iterator<Item = (AgentId, AgentId)> + '_ {
        self.0.iter().map(|(&id, a)| (id, a.target))
    }

    fn insert(&mut self, id: AgentId, attachment: Attachment) {
        self.0.entry(id).or_insert(attachment);
    }
}

impl<'a> IntoIterator for &'a ClusterMap {
    type Item = (&'a AgentId, &'a Attachment);
    type IntoIter = btree_map::Iter<'a, AgentId, Attachment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// Orphan ordering
// ---------------------------------------------------------------------------

/// Sort key for orphan processing: larger reliable set first, then larger
/// critical set, then lower id.
pub fn priority_key(agent: &Agent) -> (Reverse<usize>, Reverse<usize>, AgentId) {
    (
        Reverse(agent.reliable_ids.len()),
        Reverse(agent.critical_ids.len()),
        agent.id,
    )
}

/// Returns the agents not on `backbone`, in processing order.
pub fn orphan_order<'a>(network: &'a Network, backbone: &Cycle) -> Vec<&'a Agent> {
    let mut orphans: Vec<&Agent> = network
        .agents()
        .iter()
        .filter(|a| !backbone.contains(a.id))
        .collect();
    orphans.sort_by_key(|a| priority_key(a));
    orphans
}

// ---------------------------------------------------------------------------
// ClusterAssigner
// ---------------------------------------------------------------------------

/// Single-use state for attaching the orphans of one network.
///
/// Reads each agent's `degree`, so [`Network::assign_degrees`] must have run.
#[derive(Debug)]
pub struct ClusterAssigner<'a> {
    network: &'a Network,
    backbone: &'a Cycle,
    on_backbone: HashSet<AgentId>,
    fallback: FallbackPolicy,
    clusters: ClusterMap,
}

impl<'a> ClusterAssigner<'a> {
    /// Prepares an assigner for `network` around `backbone`.
    pub fn new(network: &'a Network, backbone: &'a Cycle, fallback: FallbackPolicy) -> Self {
        Self {
            network,
            backbone,
            on_backbone: backbone.ids().iter().copied().collect(),
            fallback,
            clusters: ClusterMap::default(),
        }
    }

    /// Seeds the backbone, attaches every orphan, and returns the full map.
    ///
    /// # Errors
    ///
    /// [`TopologyError::UnresolvedOrphan`] for the first orphan no rule can
    /// place: one with neither reliable nor critical peers, or one with only
    /// critical peers of which none is on the backbone or already clustered.
    pub fn assign(mut self) -> Result<ClusterMap, TopologyError> {
        for &id in self.backbone.ids() {
            self.clusters
                .insert(id, Attachment::new(id, AttachmentRule::Backbone));
        }

        for orphan in orphan_order(self.network, self.backbone) {
            let attachment = self
                .resolve(orphan)
                .ok_or(TopologyError::UnresolvedOrphan { id: orphan.id })?;
            tracing::trace!(
                agent = %orphan.id,
                anchor = %attachment.target,
                rule = attachment.rule.as_str(),
                "orphan attached"
            );
            self.clusters.insert(orphan.id, attachment);
        }

        Ok(self.clusters)
    }

    fn resolve(&self, orphan: &Agent) -> Option<Attachment> {
        if !orphan.reliable_ids.is_empty() {
            let anchors = self.backbone_members(&orphan.reliable_ids);
            if !anchors.is_empty() {
                return self
                    .least_loaded_nearest(orphan, &anchors)
                    .map(|t| Attachment::new(t, AttachmentRule::ReliableOnBackbone));
            }
            if let Some(t) = self.first_clustered(&orphan.reliable_ids) {
                return Some(Attachment::new(t, AttachmentRule::ReliableClustered));
            }
            if let Some(t) = self.first_clustered(&orphan.critical_ids) {
                return Some(Attachment::new(t, AttachmentRule::CriticalClustered));
            }
            return self
                .fallback_anchor(orphan)
                .map(|t| Attachment::new(t, AttachmentRule::NearestBackbone));
        }

        if !orphan.critical_ids.is_empty() {
            let anchors = self.backbone_members(&orphan.critical_ids);
            if !anchors.is_empty() {
                return self
                    .least_loaded_nearest(orphan, &anchors)
                    .map(|t| Attachment::new(t, AttachmentRule::CriticalOnBackbone));
            }
            return self
                .first_clustered(&orphan.critical_ids)
                .map(|t| Attachment::new(t, AttachmentRule::CriticalClustered));
        }

        None
    }

    /// Members of `ids` on the backbone, in `ids` order.
    fn backbone_members(&self, ids: &[AgentId]) -> Vec<AgentId> {
        ids.iter()
            .copied()
            .filter(|id| self.on_backbone.contains(id))
            .collect()
    }

    /// Anchor of the first id in `ids` that already has one.
    fn first_clustered(&self, ids: &[AgentId]) -> Option<AgentId> {
        ids.iter().find_map(|&id| self.clusters.target(id))
    }

    /// Lowest-degree candidate; ties broken by distance to `orphan`, then by
    /// candidate order.
    fn least_loaded_nearest(&self, orphan: &Agent, candidates: &[AgentId]) -> Option<AgentId> {
        let degree = |id: AgentId| self.network.agent(id).map_or(usize::MAX, |a| a.degree);
        let min_degree = candidates.iter().map(|&id| degree(id)).min()?;
        let tied: Vec<AgentId> = candidates
            .iter()
            .copied()
            .filter(|&id| degree(id) == min_degree)
            .collect();
        if let [only] = tied.as_slice() {
            return Some(*only);
        }

        let mut best: Option<(AgentId, f64)> = None;
        for id in tied {
            let d = self.distance(orphan.id, id);
            match best {
                Some((_, best_d)) if best_d <= d => {}
                Some(_) | None => best = Some((id, d)),
            }
        }
        best.map(|(id, _)| id)
    }

    fn fallback_anchor(&self, orphan: &Agent) -> Option<AgentId> {
        let candidates = self.backbone.ids().iter().copied();
        let target = match self.fallback {
            FallbackPolicy::LowestId => candidates
                .filter(|&id| self.distance(orphan.id, id) > 0.0)
                .min(),
            FallbackPolicy::Nearest => candidates.min_by(|&a, &b| {
                self.distance(orphan.id, a)
                    .total_cmp(&self.distance(orphan.id, b))
                    .then(a.cmp(&b))
            }),
        };
        tracing::debug!(
            agent = %orphan.id,
            policy = ?self.fallback,
            anchor = ?target.map(AgentId::get),
            "no peer route to the backbone; using fallback anchor"
        );
        target
    }

    fn distance(&self, a: AgentId, b: AgentId) -> f64 {
        self.network.distance(a, b).unwrap_or(f64::INFINITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
