//! # Envelope Validation
//!
//! Runs the tool's informational subcommand in JSON mode against the
//! repository fixture and inspects the output envelope. Three checks, in
//! order: the `$schema` value must equal the version-derived URL, it must
//! independently satisfy the released-schema URL grammar, and the
//! deprecated `schema_version` key must be gone. The first failing check
//! wins; simultaneous failures are not aggregated.

use std::path::Path;

use serde_json::Value;

use crate::error::ContractError;
use crate::runner::{run_tool, ToolRunner};
use crate::version::url_matches_schema_grammar;

/// Envelope key carrying the schema reference.
const SCHEMA_KEY: &str = "$schema";

/// Deprecated envelope key that must no longer appear.
const LEGACY_VERSION_KEY: &str = "schema_version";

/// Invoke `wavepeek info --waves <fixture> --json` and check its envelope
/// against `expected_url`.
///
/// Stdout that is not a JSON object means the collaborator broke the
/// output protocol; that is an infrastructure failure, not a contract
/// violation, and no envelope check runs.
pub fn validate_envelope(
    runner: &dyn ToolRunner,
    fixture_path: &Path,
    expected_url: &str,
) -> Result<(), ContractError> {
    let fixture = fixture_path.to_string_lossy();
    let stdout = run_tool(runner, &["info", "--waves", fixture.as_ref(), "--json"])?;

    let root: Value =
        serde_json::from_slice(&stdout).map_err(|e| ContractError::Infrastructure {
            detail: format!("'wavepeek info' stdout is not valid JSON: {e}"),
        })?;
    let envelope = root.as_object().ok_or_else(|| ContractError::Infrastructure {
        detail: "'wavepeek info' stdout is not a JSON object".to_string(),
    })?;

    // Absent renders as a missing value; a non-string renders in its JSON
    // form so the mismatch diagnostic shows what was actually there.
    let observed = match envelope.get(SCHEMA_KEY) {
        None => None,
        Some(Value::String(url)) => Some(url.clone()),
        Some(other) => Some(other.to_string()),
    };

    match observed {
        Some(url) if url == expected_url => {
            // The grammar check still runs on the observed value so that a
            // template and an envelope wrong in the same way cannot wave
            // each other through.
            if !url_matches_schema_grammar(&url) {
                return Err(ContractError::EnvelopeUrlMalformed { url });
            }
            tracing::debug!(%url, "envelope schema URL matches expected reference");
        }
        actual => {
            return Err(ContractError::EnvelopeUrlMismatch {
                expected: expected_url.to_string(),
                actual,
            });
        }
    }

    if envelope.contains_key(LEGACY_VERSION_KEY) {
        return Err(ContractError::LegacySchemaVersionKey);
    }

    Ok(())
}
