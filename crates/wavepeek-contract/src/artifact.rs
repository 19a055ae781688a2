//! # Canonical Schema Artifact
//!
//! Loads the schema file checked into the target repository and enforces
//! its well-formedness: the file must exist, parse as UTF-8 JSON, and end
//! with a trailing newline. Checks run in that order and the first failure
//! aborts the load.

use std::path::Path;

use crate::error::ContractError;

/// Raw bytes of the canonical schema artifact, validated on load.
///
/// Later gates compare against these bytes exactly, so the artifact is
/// never re-read or normalized after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalSchema {
    bytes: Vec<u8>,
}

impl CanonicalSchema {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Load and validate the canonical schema artifact at `path`.
pub fn load_canonical_schema(path: &Path) -> Result<CanonicalSchema, ContractError> {
    if !path.exists() {
        return Err(ContractError::MissingArtifact {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| ContractError::Infrastructure {
        detail: format!("failed to read {}: {e}", path.display()),
    })?;

    if let Err(e) = serde_json::from_slice::<serde_json::Value>(&bytes) {
        return Err(ContractError::ArtifactNotJson {
            detail: e.to_string(),
        });
    }

    if bytes.last() != Some(&b'\n') {
        return Err(ContractError::ArtifactMissingNewline);
    }

    tracing::debug!(path = %path.display(), size = bytes.len(), "canonical schema artifact loaded");
    Ok(CanonicalSchema { bytes })
}
