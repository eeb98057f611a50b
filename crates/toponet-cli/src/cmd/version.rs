//! Implementation of `toponet version`.
use std::io::Write;

use crate::cli::OutputFormat;
use crate::cmd::stdout_error;
use crate::error::CliError;

/// Prints the binary and core library versions.
///
/// # Errors
///
/// [`CliError::IoError`] if stdout cannot be written.
pub fn run(format: &OutputFormat) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    print(&mut out, format)
}

fn print<W: Write>(w: &mut W, format: &OutputFormat) -> Result<(), CliError> {
    let cli = env!("CARGO_PKG_VERSION");
    let core = toponet_core::version();
    match format {
        OutputFormat::Human => writeln!(w, "toponet {cli} (toponet-core {core})"),
        OutputFormat::Json => writeln!(
            w,
            "{}",
            serde_json::json!({ "toponet": cli, "toponet_core": core })
        ),
    }
    .map_err(|e| stdout_error(&e))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn json_version_names_both_crates() {
        let mut buf = Vec::new();
        print(&mut buf, &OutputFormat::Json).expect("write to buffer");
        let value: serde_json::Value = serde_json::from_slice(&buf).expect("valid JSON");
        assert_eq!(value["toponet"], env!("CARGO_PKG_VERSION"));
        assert!(value["toponet_core"].is_string());
    }
}
