/// Command modules for the `toponet` CLI.
///
/// Each submodule implements one subcommand. Its `run` function takes the
/// parsed arguments and returns `Ok(())` on success or a
/// [`crate::error::CliError`] on failure.
use toponet_core::{Network, TopologyError, build_network, parse_network};

use crate::error::CliError;

pub mod cycles;
pub mod generate;
pub mod preprocess;
pub mod synthesize;
pub mod version;

/// Decodes a JSON network document and validates it into a [`Network`].
///
/// `source` labels the input in error messages.
///
/// # Errors
///
/// [`CliError::ParseFailed`] for malformed JSON and
/// [`CliError::InvalidNetwork`] for broken neighbor references.
pub fn load_network(content: &str, source: &str) -> Result<Network, CliError> {
    let file = parse_network(content).map_err(|e| CliError::ParseFailed {
        source: source.to_owned(),
        detail: e.to_string(),
    })?;
    let network = build_network(&file).map_err(|e| CliError::InvalidNetwork {
        source: source.to_owned(),
        detail: e.to_string(),
    })?;
    tracing::debug!(
        source,
        agents = network.len(),
        reliable_links = network.reliable_edges().len(),
        "network loaded"
    );
    Ok(network)
}

/// Maps a synthesis failure on `source` to its exit-code-1 [`CliError`].
pub fn topology_error(source: &str, err: TopologyError) -> CliError {
    match err {
        TopologyError::NoBackboneCycle => CliError::NoBackbone {
            source: source.to_owned(),
        },
        TopologyError::UnresolvedOrphan { id } => CliError::UnresolvedOrphan {
            source: source.to_owned(),
            agent: id.get(),
        },
    }
}

/// Maps a stdout write failure.
pub fn stdout_error(e: &std::io::Error) -> CliError {
    CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::wildcard_enum_match_arm)]

    use toponet_core::AgentId;

    use super::*;

    #[test]
    fn load_network_reports_parse_failures() {
        let err = load_network("{\"agents\": [", "net.json").expect_err("truncated");
        assert_eq!(err.exit_code(), 2);
        match err {
            CliError::ParseFailed { source, detail } => {
                assert_eq!(source, "net.json");
                assert!(detail.contains("line 1"), "{detail}");
            }
            other => panic!("expected ParseFailed, got {other:?}"),
        }
    }

    #[test]
    fn load_network_reports_dangling_neighbors() {
        let json = r#"{"agents": [
            {"id": 1, "position": {"x": 0.0, "y": 0.0}, "reliable_ids": [2]}
        ]}"#;
        let err = load_network(json, "-").expect_err("agent 2 is missing");
        assert!(matches!(err, CliError::InvalidNetwork { .. }), "{err:?}");
    }

    #[test]
    fn orphan_error_keeps_agent_id() {
        let id = AgentId::try_from(9u32).expect("nonzero");
        let err = topology_error("x.json", TopologyError::UnresolvedOrphan { id });
        match err {
            CliError::UnresolvedOrphan { agent, .. } => assert_eq!(agent, 9),
            other => panic!("expected UnresolvedOrphan, got {other:?}"),
        }
    }
}
