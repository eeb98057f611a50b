//! Serialized form of a proximity network and its JSON decoder.
//!
//! A network file is a single JSON object with an `agents` array. Each agent
//! carries its id, position and precomputed reliable/critical neighbor sets:
//!
//! ```json
//! {"agents": [
//!   {"id": 1, "position": {"x": 0.1, "y": 0.2}, "reliable_ids": [2], "critical_ids": []}
//! ]}
//! ```
//!
//! Decoding only checks the shape of the document. Referential checks (unique
//! ids, neighbors that exist) happen in [`crate::network::build_network`].
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::structures::Agent;

/// Top-level document describing one generated network instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkFile {
    /// Agents in generation order.
    pub agents: Vec<Agent>,
}

/// Error returned when a network document cannot be decoded.
#[derive(Debug)]
pub struct NetworkDecodeError {
    line: usize,
    column: usize,
    detail: String,
}

impl NetworkDecodeError {
    /// One-based line of the offending input, or 0 when unknown.
    pub fn line(&self) -> usize {
        self.line
    }

    /// One-based column of the offending input, or 0 when unknown.
    pub fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for NetworkDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {}: {}",
            self.line, self.column, self.detail
        )
    }
}

impl std::error::Error for NetworkDecodeError {}

/// Decodes a [`NetworkFile`] from JSON text.
///
/// # Errors
///
/// Returns [`NetworkDecodeError`] with the line and column reported by
/// `serde_json` when the input is not valid JSON, is missing required
/// fields, or contains an agent id of zero.
pub fn parse_network(input: &str) -> Result<NetworkFile, NetworkDecodeError> {
    serde_json::from_str(input).map_err(|e| NetworkDecodeError {
        line: e.line(),
        column: e.column(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn parses_minimal_document() {
        let json = r#"{"agents": [
            {"id": 1, "position": {"x": 0.0, "y": 0.0}, "reliable_ids": [2]},
            {"id": 2, "position": {"x": 0.01, "y": 0.0}, "reliable_ids": [1], "critical_ids": []}
        ]}"#;
        let file = parse_network(json).expect("valid document");
        assert_eq!(file.agents.len(), 2);
        assert!(file.agents[0].critical_ids.is_empty());
        assert_eq!(file.agents[0].degree, 0);
    }

    #[test]
    fn zero_id_is_a_decode_error() {
        let json = r#"{"agents": [{"id": 0, "position": {"x": 0.0, "y": 0.0}}]}"#;
        let err = parse_network(json).expect_err("zero id");
        assert_eq!(err.line(), 1);
        assert!(err.to_string().contains("positive integer"), "{err}");
    }

    #[test]
    fn truncated_input_reports_position() {
        let err = parse_network("{\n  \"agents\": [").expect_err("truncated");
        assert_eq!(err.line(), 2);
        assert!(err.column() > 0);
    }
}
