//! Shared constructors for unit test fixtures.
#![allow(clippy::expect_used)]

use toponet_core::{Agent, AgentId, Position};

use crate::record::DatasetRecord;

fn aid(n: u32) -> AgentId {
    AgentId::try_from(n).expect("valid AgentId")
}

fn agent(id: u32, (x, y): (f64, f64), reliable: &[u32]) -> Agent {
    let mut agent = Agent::new(aid(id), Position::new(x, y));
    agent.reliable_ids = reliable.iter().map(|&n| aid(n)).collect();
    agent
}

/// Unit square 1-2-3-4 plus agent 5 hanging off agent 2, listed out of id
/// order.
pub fn square_with_tail() -> Vec<Agent> {
    vec![
        agent(5, (1.5, 0.0), &[2]),
        agent(1, (0.0, 0.0), &[2, 4]),
        agent(2, (1.0, 0.0), &[1, 3]),
        agent(3, (1.0, 1.0), &[2, 4]),
        agent(4, (0.0, 1.0), &[3, 1]),
    ]
}

/// `count` two-agent records; record `i` has labels `[1, 2]` and
/// coordinates derived from `i` so records are distinguishable.
pub fn numbered_records(count: usize) -> Vec<DatasetRecord> {
    (0..count)
        .map(|i| {
            let x = i as f64;
            DatasetRecord {
                positions: vec![Position::new(x, 0.5), Position::new(x, 1.5)],
                labels: vec![1, 2],
            }
        })
        .collect()
}
