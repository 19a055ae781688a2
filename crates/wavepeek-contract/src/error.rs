//! # Contract Error Taxonomy
//!
//! Structured errors for every way the schema contract can fail. Each
//! variant is terminal: the first one produced aborts the run and is
//! reported exactly once.

use std::path::PathBuf;

use thiserror::Error;

/// Failures detected by the schema contract gates.
#[derive(Error, Debug)]
pub enum ContractError {
    /// The canonical schema artifact does not exist on disk.
    #[error("missing canonical schema artifact at {}", .path.display())]
    MissingArtifact { path: PathBuf },

    /// The canonical schema artifact is not valid UTF-8 JSON.
    #[error("canonical schema is not valid JSON: {detail}")]
    ArtifactNotJson { detail: String },

    /// The canonical schema artifact does not end with a newline byte.
    #[error("canonical schema must end with trailing newline")]
    ArtifactMissingNewline,

    /// The schema emitted by the tool at runtime differs from the artifact.
    #[error("canonical schema mismatch between {} and 'wavepeek schema' output", .path.display())]
    RuntimeSchemaMismatch { path: PathBuf },

    /// The package descriptor is unreadable, unparseable, or its version
    /// is not a strict semver string.
    #[error("invalid package version metadata: {detail}")]
    VersionMetadata { detail: String },

    /// The envelope's `$schema` URL differs from the version-derived URL.
    /// `actual` is `None` when the envelope carries no `$schema` at all.
    #[error("envelope $schema URL mismatch: expected {expected}, got {}", .actual.as_deref().unwrap_or("missing"))]
    EnvelopeUrlMismatch {
        expected: String,
        actual: Option<String>,
    },

    /// The envelope's `$schema` URL fails the released-schema URL grammar.
    #[error("envelope $schema URL does not match required pattern: {url}")]
    EnvelopeUrlMalformed { url: String },

    /// The deprecated `schema_version` key is present in the envelope.
    #[error("legacy schema_version key is still present in JSON envelope")]
    LegacySchemaVersionKey,

    /// The tool could not be launched, exited unsuccessfully, or broke the
    /// envelope protocol in a way that prevents any contract judgement.
    #[error("{detail}")]
    Infrastructure { detail: String },
}

impl ContractError {
    /// Whether the diagnostic should carry the `make update-schema` hint.
    ///
    /// True for the failures that regenerating the canonical artifact is
    /// expected to fix; false for everything that needs a different repair.
    pub fn suggests_update_schema(&self) -> bool {
        matches!(
            self,
            Self::MissingArtifact { .. }
                | Self::ArtifactMissingNewline
                | Self::RuntimeSchemaMismatch { .. }
        )
    }
}
