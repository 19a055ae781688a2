//! # Diagnostic Rendering
//!
//! Turns a contract failure into the one- or two-line stderr payload the
//! CI gate emits. Rendering is pure; writing to stderr and choosing the
//! exit status stay in the binary.

use crate::error::ContractError;

/// Prefix of every contract diagnostic line.
pub const DIAGNOSTIC_PREFIX: &str = "error: schema: ";

/// Remediation line for failures that regenerating the artifact fixes.
pub const UPDATE_SCHEMA_HINT: &str = "hint: run make update-schema";

/// Render `error` as the exact text to write to stderr.
///
/// One `error: schema: `-prefixed line, plus the update hint on a second
/// line when the failure is repaired by regenerating the canonical
/// artifact.
pub fn diagnostic(error: &ContractError) -> String {
    let mut rendered = format!("{DIAGNOSTIC_PREFIX}{error}");
    if error.suggests_update_schema() {
        rendered.push('\n');
        rendered.push_str(UPDATE_SCHEMA_HINT);
    }
    rendered
}
