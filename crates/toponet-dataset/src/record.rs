//! One dataset row: agent positions followed by their cluster labels.
use toponet_core::{AgentId, Network, Position, Topology};

use crate::error::DatasetError;

/// Positions and cluster labels of one network, both in agent id order.
///
/// Before re-indexing a label is the id of the agent's backbone anchor;
/// after [`crate::reindex`] it is that id minus one.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRecord {
    /// Agent positions, agent 1 first.
    pub positions: Vec<Position>,
    /// Cluster labels, agent 1 first.
    pub labels: Vec<u32>,
}

impl DatasetRecord {
    /// Builds a record from a network and its synthesized topology.
    ///
    /// # Errors
    ///
    /// [`DatasetError::MissingLabel`] if the topology has no anchor for one of
    /// the network's agents.
    pub fn from_topology(network: &Network, topology: &Topology) -> Result<Self, DatasetError> {
        let mut ids: Vec<AgentId> = network.ids().collect();
        ids.sort_unstable();

        let mut positions = Vec::with_capacity(ids.len());
        let mut labels = Vec::with_capacity(ids.len());
        for id in ids {
            let (Some(agent), Some(target)) = (network.agent(id), topology.clusters.target(id))
            else {
                return Err(DatasetError::MissingLabel { agent: id.get() });
            };
            positions.push(agent.position);
            labels.push(target.get());
        }
        Ok(Self { positions, labels })
    }

    /// Number of agents described.
    pub fn agents(&self) -> usize {
        self.positions.len()
    }

    /// Flattened coordinates `x1, y1, …, xn, yn`.
    pub fn features(&self) -> Vec<f64> {
        self.positions.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// Cells of this record in column order.
    pub fn to_row(&self) -> Vec<String> {
        self.positions
            .iter()
            .flat_map(|p| [p.x.to_string(), p.y.to_string()])
            .chain(self.labels.iter().map(u32::to_string))
            .collect()
    }
}

/// Column names for `agents` agents: `X1 Y1 … Xn Yn C1 … Cn`.
pub fn header(agents: usize) -> Vec<String> {
    (1..=agents)
        .flat_map(|k| [format!("X{k}"), format!("Y{k}")])
        .chain((1..=agents).map(|k| format!("C{k}")))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use toponet_core::{SynthesisConfig, from_agents, synthesize_topology};

    use super::*;
    use crate::test_helpers::square_with_tail;

    #[test]
    fn header_interleaves_coordinates_then_labels() {
        assert_eq!(header(2), vec!["X1", "Y1", "X2", "Y2", "C1", "C2"]);
        assert!(header(0).is_empty());
    }

    #[test]
    fn record_follows_id_order() {
        let mut network = from_agents(square_with_tail()).expect("valid network");
        let topology =
            synthesize_topology(&mut network, &SynthesisConfig::default()).expect("synthesizes");
        let record = DatasetRecord::from_topology(&network, &topology).expect("complete");
        assert_eq!(record.labels, vec![1, 2, 3, 4, 2]);
        assert_eq!(record.positions[4], Position::new(1.5, 0.0));
        assert_eq!(record.agents(), 5);
    }

    #[test]
    fn row_matches_header_width() {
        let record = DatasetRecord {
            positions: vec![Position::new(0.25, 0.5), Position::new(1.0, 0.0)],
            labels: vec![2, 2],
        };
        let row = record.to_row();
        assert_eq!(row, vec!["0.25", "0.5", "1", "0", "2", "2"]);
        assert_eq!(row.len(), header(record.agents()).len());
        assert_eq!(record.features(), vec![0.25, 0.5, 1.0, 0.0]);
    }
}
