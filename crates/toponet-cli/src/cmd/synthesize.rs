//! Implementation of `toponet synthesize <file>`.
//!
//! Loads a JSON network, runs topology synthesis and prints the backbone and
//! every agent's anchor. In `--format json` mode a single object is emitted
//! carrying the topology plus per-agent positions and degrees, enough to plot
//! the clusters externally.
//!
//! Exit codes: 0 = success, 1 = no backbone or unresolved orphan,
//! 2 = read or parse failure.
use std::io::Write;

use toponet_core::{FallbackPolicy, Network, SynthesisConfig, Topology, synthesize_topology};

use crate::cli::OutputFormat;
use crate::cmd::{load_network, stdout_error, topology_error};
use crate::error::CliError;

/// Runs the `synthesize` command on already-read `content`.
///
/// # Errors
///
/// See the module documentation for the exit code of each failure.
pub fn run(
    content: &str,
    source: &str,
    fallback: FallbackPolicy,
    format: &OutputFormat,
) -> Result<(), CliError> {
    let mut network = load_network(content, source)?;
    let config = SynthesisConfig { fallback };
    let topology =
        synthesize_topology(&mut network, &config).map_err(|e| topology_error(source, e))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Human => print_human(&mut out, &network, &topology),
        OutputFormat::Json => print_json(&mut out, &network, &topology),
    }
}

fn print_human<W: Write>(
    w: &mut W,
    network: &Network,
    topology: &Topology,
) -> Result<(), CliError> {
    write_human(w, network, topology).map_err(|e| stdout_error(&e))
}

fn write_human<W: Write>(
    w: &mut W,
    network: &Network,
    topology: &Topology,
) -> std::io::Result<()> {
    writeln!(
        w,
        "backbone: {} ({} agents)",
        topology.backbone,
        topology.backbone.len()
    )?;
    writeln!(w, "agents:   {}", network.len())?;
    writeln!(w, "orphans:  {}", topology.orphan_count())?;
    writeln!(w, "clusters:")?;
    for (anchor, size) in topology.cluster_sizes() {
        writeln!(w, "  {anchor}: {size}")?;
    }
    writeln!(w, "attachments:")?;
    for (id, attachment) in &topology.clusters {
        let degree = network.agent(*id).map_or(0, |a| a.degree);
        writeln!(
            w,
            "  {id} -> {} [{}] degree {degree}",
            attachment.target,
            attachment.rule.as_str()
        )?;
    }
    Ok(())
}

fn print_json<W: Write>(
    w: &mut W,
    network: &Network,
    topology: &Topology,
) -> Result<(), CliError> {
    let agents: Vec<serde_json::Value> = network
        .agents()
        .iter()
        .map(|agent| {
            serde_json::json!({
                "id": agent.id,
                "position": agent.position,
                "degree": agent.degree,
            })
        })
        .collect();
    let doc = serde_json::json!({
        "backbone": topology.backbone,
        "clusters": topology.clusters,
        "labels": topology.labels(),
        "agents": agents,
    });
    let json = serde_json::to_string_pretty(&doc).map_err(|e| CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    })?;
    writeln!(w, "{json}").map_err(|e| stdout_error(&e))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    const SQUARE_TAIL: &str = r#"{"agents": [
        {"id": 1, "position": {"x": 0.0, "y": 0.0}, "reliable_ids": [2, 4]},
        {"id": 2, "position": {"x": 1.0, "y": 0.0}, "reliable_ids": [1, 3, 5]},
        {"id": 3, "position": {"x": 1.0, "y": 1.0}, "reliable_ids": [2, 4]},
        {"id": 4, "position": {"x": 0.0, "y": 1.0}, "reliable_ids": [3, 1]},
        {"id": 5, "position": {"x": 2.0, "y": 0.0}, "reliable_ids": [2]}
    ]}"#;

    /// Agent 2 has the most reliable peers, so the square is walked from 2
    /// towards 1 first.
    fn synthesized() -> (Network, Topology) {
        let mut network = load_network(SQUARE_TAIL, "test").expect("valid network");
        let topology = synthesize_topology(&mut network, &SynthesisConfig::default())
            .expect("square has a backbone");
        (network, topology)
    }

    #[test]
    fn human_output_lists_backbone_and_attachments() {
        let (network, topology) = synthesized();
        let mut buf = Vec::new();
        print_human(&mut buf, &network, &topology).expect("write to buffer");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("backbone: 1 - 4 - 3 - 2 (4 agents)"), "{text}");
        assert!(text.contains("orphans:  1"), "{text}");
        assert!(text.contains("5 -> 2 [reliable_on_backbone]"), "{text}");
    }

    #[test]
    fn json_output_carries_labels_and_positions() {
        let (network, topology) = synthesized();
        let mut buf = Vec::new();
        print_json(&mut buf, &network, &topology).expect("write to buffer");
        let value: serde_json::Value = serde_json::from_slice(&buf).expect("valid JSON");
        assert_eq!(value["labels"], serde_json::json!([1, 2, 3, 4, 2]));
        assert_eq!(value["backbone"], serde_json::json!([1, 4, 3, 2]));
        assert_eq!(value["agents"][4]["position"]["x"], serde_json::json!(2.0));
        assert_eq!(value["agents"][1]["degree"], serde_json::json!(3));
        assert_eq!(value["clusters"]["5"]["rule"], "reliable_on_backbone");
    }
}
