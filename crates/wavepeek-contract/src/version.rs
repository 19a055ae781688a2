//! # Version Resolution
//!
//! Reads the release version from the target repository's package
//! descriptor and derives the `$schema` URL that a build of that version
//! must stamp into its JSON envelopes. Also owns the independent URL
//! grammar used to validate the *observed* envelope URL, so a bug in the
//! template cannot hide behind the equality check.

use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::error::ContractError;

/// Strict semantic-versioning grammar (semver.org): numeric identifiers
/// without leading zeros, optional pre-release and build-metadata suffixes.
const SEMVER_GRAMMAR: &str = r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$";

/// Grammar for released-schema URLs: the fixed host, org, repo, and schema
/// path around a `v<semver>` tag, with optional `-` pre-release and `+`
/// build-metadata suffixes.
const SCHEMA_URL_GRAMMAR: &str = r"^https://github\.com/kleverhq/wavepeek/blob/v[0-9]+\.[0-9]+\.[0-9]+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?/schema/wavepeek\.json$";

/// Slice of the package descriptor the resolver needs.
#[derive(Debug, Deserialize)]
struct PackageManifest {
    package: PackageSection,
}

#[derive(Debug, Deserialize)]
struct PackageSection {
    version: String,
}

/// Read the package descriptor at `manifest_path` and derive the schema
/// URL a release of that version must reference.
///
/// An unreadable or unparsable descriptor, a missing version field, and a
/// version that fails the strict semver grammar are all
/// [`ContractError::VersionMetadata`].
pub fn resolve_expected_schema_url(manifest_path: &Path) -> Result<String, ContractError> {
    let text =
        std::fs::read_to_string(manifest_path).map_err(|e| ContractError::VersionMetadata {
            detail: format!("failed to read {}: {e}", manifest_path.display()),
        })?;
    let manifest: PackageManifest =
        toml::from_str(&text).map_err(|e| ContractError::VersionMetadata {
            detail: format!("failed to parse {}: {e}", manifest_path.display()),
        })?;

    let version = manifest.package.version;
    if !is_strict_semver(&version) {
        return Err(ContractError::VersionMetadata {
            detail: format!("package version '{version}' is not a strict semver string"),
        });
    }

    let url = expected_schema_url(&version);
    tracing::debug!(%version, %url, "resolved expected schema URL");
    Ok(url)
}

/// Substitute `version` into the released-schema URL template.
fn expected_schema_url(version: &str) -> String {
    format!("https://github.com/kleverhq/wavepeek/blob/v{version}/schema/wavepeek.json")
}

/// Whether `version` satisfies the strict semver grammar.
///
/// A grammar that fails to compile counts as a non-match rather than a
/// panic; the caller then rejects the version.
pub fn is_strict_semver(version: &str) -> bool {
    Regex::new(SEMVER_GRAMMAR)
        .map(|grammar| grammar.is_match(version))
        .unwrap_or(false)
}

/// Whether `url` is an acceptable released-schema URL.
///
/// Applied to the observed envelope value after the equality check, so
/// that a malformed expected URL cannot wave through an equally malformed
/// observed one.
pub fn url_matches_schema_grammar(url: &str) -> bool {
    Regex::new(SCHEMA_URL_GRAMMAR)
        .map(|grammar| grammar.is_match(url))
        .unwrap_or(false)
}
