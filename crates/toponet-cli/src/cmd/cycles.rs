//! Implementation of `toponet cycles <file>`.
//!
//! Lists every simple cycle of the network's reliable graph in canonical
//! form, in discovery order, and marks the one synthesis would pick as
//! backbone. An acyclic network is not an error here: it prints zero cycles.
use std::io::Write;

use toponet_core::{Cycle, enumerate_cycles, select_backbone};

use crate::cli::OutputFormat;
use crate::cmd::{load_network, stdout_error};
use crate::error::CliError;

/// Runs the `cycles` command on already-read `content`.
///
/// # Errors
///
/// [`CliError::ParseFailed`] or [`CliError::InvalidNetwork`] for bad input,
/// [`CliError::IoError`] if stdout cannot be written.
pub fn run(content: &str, source: &str, format: &OutputFormat) -> Result<(), CliError> {
    let network = load_network(content, source)?;
    let cycles = enumerate_cycles(network.reliable_edges());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Human => print_human(&mut out, &cycles),
        OutputFormat::Json => print_json(&mut out, &cycles),
    }
}

fn print_human<W: Write>(w: &mut W, cycles: &[Cycle]) -> Result<(), CliError> {
    let backbone = select_backbone(cycles).ok();
    let write = |w: &mut W| -> std::io::Result<()> {
        writeln!(w, "cycles: {}", cycles.len())?;
        for cycle in cycles {
            let marker = if backbone.is_some_and(|b| std::ptr::eq(b, cycle)) {
                "  (backbone)"
            } else {
                ""
            };
            writeln!(w, "  [{}] {cycle}{marker}", cycle.len())?;
        }
        Ok(())
    };
    write(w).map_err(|e| stdout_error(&e))
}

fn print_json<W: Write>(w: &mut W, cycles: &[Cycle]) -> Result<(), CliError> {
    let backbone_index = select_backbone(cycles)
        .ok()
        .and_then(|b| cycles.iter().position(|c| std::ptr::eq(c, b)));
    let doc = serde_json::json!({
        "count": cycles.len(),
        "backbone": backbone_index,
        "cycles": cycles,
    });
    let json = serde_json::to_string_pretty(&doc).map_err(|e| CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    })?;
    writeln!(w, "{json}").map_err(|e| stdout_error(&e))
}
