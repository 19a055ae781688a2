//! # wavepeek-contract — Schema Contract Gates
//!
//! Verifies that the schema published by the wavepeek CLI stays consistent
//! across its three independently maintained representations:
//!
//! - the canonical artifact checked into the repository
//!   (`schema/wavepeek.json`),
//! - the schema the built tool emits at runtime (`wavepeek schema`),
//! - the version-stamped `$schema` URL in the tool's JSON envelopes
//!   (`wavepeek info --json`).
//!
//! ## Gates
//!
//! [`verify_schema_contract`] runs five gates in a fixed order and stops at
//! the first failure:
//!
//! 1. load and validate the canonical artifact ([`artifact`]);
//! 2. byte-compare it to the runtime schema output ([`runtime`]);
//! 3. derive the expected schema URL from the package version ([`version`]);
//! 4. check the JSON envelope against that URL ([`envelope`]);
//! 5. render the failure, if any, for the CI log ([`report`]).
//!
//! The library never prints and never exits. Failures come back as
//! [`ContractError`] values; the `wavepeek-schema-check` binary renders
//! them with [`report::diagnostic`] and maps them to exit status 1. The
//! wavepeek binary itself is reached only through the [`runner::ToolRunner`]
//! seam, so tests substitute in-process fakes for the two subprocess
//! invocations.

pub mod artifact;
pub mod envelope;
pub mod error;
pub mod report;
pub mod runner;
pub mod runtime;
pub mod version;

use std::path::{Path, PathBuf};

pub use error::ContractError;
pub use runner::{CommandToolRunner, ToolOutput, ToolRunner};

/// Repository-relative path of the canonical schema artifact.
pub const DEFAULT_SCHEMA_PATH: &str = "schema/wavepeek.json";

/// Repository-relative path of the package descriptor.
pub const PACKAGE_MANIFEST_PATH: &str = "Cargo.toml";

/// Repository-relative waveform fixture handed to `wavepeek info`.
pub const DEFAULT_FIXTURE_PATH: &str = "tests/fixtures/hand/m2_core.vcd";

/// Paths consumed by one verification run.
#[derive(Debug, Clone)]
pub struct ContractConfig {
    /// Root of the target repository; the tool runs with this as its
    /// working directory.
    pub repo_root: PathBuf,
    /// Canonical schema artifact.
    pub schema_path: PathBuf,
    /// Package descriptor carrying the release version.
    pub manifest_path: PathBuf,
    /// Waveform fixture for the informational subcommand, resolved by the
    /// tool against its own working directory.
    pub fixture_path: PathBuf,
}

impl ContractConfig {
    /// Default paths for a run rooted at `repo_root`.
    pub fn new(repo_root: &Path) -> Self {
        Self {
            repo_root: repo_root.to_path_buf(),
            schema_path: repo_root.join(DEFAULT_SCHEMA_PATH),
            manifest_path: repo_root.join(PACKAGE_MANIFEST_PATH),
            fixture_path: PathBuf::from(DEFAULT_FIXTURE_PATH),
        }
    }
}

/// Run the schema contract gates in order, stopping at the first failure.
///
/// On success every representation agrees and `Ok(())` comes back with no
/// other observable effect. The error carries the first failure only;
/// later gates do not run once one has failed.
pub fn verify_schema_contract(
    config: &ContractConfig,
    runner: &dyn ToolRunner,
) -> Result<(), ContractError> {
    let canonical = artifact::load_canonical_schema(&config.schema_path)?;
    runtime::compare_runtime_schema(runner, &config.schema_path, &canonical)?;
    let expected_url = version::resolve_expected_schema_url(&config.manifest_path)?;
    envelope::validate_envelope(runner, &config.fixture_path, &expected_url)?;
    tracing::debug!("schema contract holds");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::runner::ToolOutput;

    const SCHEMA_JSON: &[u8] = b"{\"type\":\"object\"}\n";

    /// Fake wavepeek answering the two production invocations.
    struct ScriptedTool {
        schema_stdout: Vec<u8>,
        info_stdout: Vec<u8>,
        invocations: RefCell<Vec<Vec<String>>>,
    }

    impl ScriptedTool {
        fn new(schema_stdout: &[u8], info_stdout: &str) -> Self {
            Self {
                schema_stdout: schema_stdout.to_vec(),
                info_stdout: info_stdout.as_bytes().to_vec(),
                invocations: RefCell::new(Vec::new()),
            }
        }

        fn invocation_count(&self) -> usize {
            self.invocations.borrow().len()
        }
    }

    impl ToolRunner for ScriptedTool {
        fn invoke(&self, args: &[&str]) -> Result<ToolOutput, ContractError> {
            self.invocations
                .borrow_mut()
                .push(args.iter().map(|a| a.to_string()).collect());
            let stdout = match args.first() {
                Some(&"schema") => self.schema_stdout.clone(),
                Some(&"info") => self.info_stdout.clone(),
                _ => Vec::new(),
            };
            Ok(ToolOutput {
                stdout,
                code: Some(0),
            })
        }
    }

    /// Target repository on disk: schema artifact plus package descriptor.
    fn test_repo(version: &str, schema: &[u8]) -> (tempfile::TempDir, ContractConfig) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("schema")).unwrap();
        std::fs::write(dir.path().join(DEFAULT_SCHEMA_PATH), schema).unwrap();
        std::fs::write(
            dir.path().join(PACKAGE_MANIFEST_PATH),
            format!("[package]\nname = \"wavepeek\"\nversion = \"{version}\"\n"),
        )
        .unwrap();
        let config = ContractConfig::new(dir.path());
        (dir, config)
    }

    fn envelope_for(version: &str) -> String {
        format!(
            "{{\"$schema\":\"https://github.com/kleverhq/wavepeek/blob/v{version}/schema/wavepeek.json\",\"command\":\"info\",\"data\":{{}},\"warnings\":[]}}\n"
        )
    }

    #[test]
    fn consistent_repository_passes() {
        let (_dir, config) = test_repo("0.3.1", SCHEMA_JSON);
        let tool = ScriptedTool::new(SCHEMA_JSON, &envelope_for("0.3.1"));

        verify_schema_contract(&config, &tool).unwrap();
        assert_eq!(tool.invocation_count(), 2);
    }

    #[test]
    fn default_config_paths_are_rooted_at_the_repo() {
        let root = Path::new("/repo");
        let config = ContractConfig::new(root);
        assert_eq!(config.repo_root, root);
        assert_eq!(config.schema_path, root.join("schema/wavepeek.json"));
        assert_eq!(config.manifest_path, root.join("Cargo.toml"));
        assert_eq!(
            config.fixture_path,
            PathBuf::from("tests/fixtures/hand/m2_core.vcd")
        );
    }

    #[test]
    fn missing_artifact_fails_before_any_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let config = ContractConfig::new(dir.path());
        let tool = ScriptedTool::new(SCHEMA_JSON, &envelope_for("0.3.1"));

        let err = verify_schema_contract(&config, &tool).unwrap_err();
        assert!(matches!(err, ContractError::MissingArtifact { .. }));
        assert_eq!(tool.invocation_count(), 0);
    }

    #[test]
    fn runtime_mismatch_fails_before_version_resolution() {
        // The descriptor version is junk, but gate 2 must fail first.
        let (_dir, config) = test_repo("not-a-version", SCHEMA_JSON);
        let tool = ScriptedTool::new(b"{\"type\":\"object\"}  \n", &envelope_for("0.3.1"));

        let err = verify_schema_contract(&config, &tool).unwrap_err();
        assert!(matches!(err, ContractError::RuntimeSchemaMismatch { .. }));
        assert_eq!(tool.invocation_count(), 1);
    }

    #[test]
    fn loose_version_fails_before_the_envelope_runs() {
        let (_dir, config) = test_repo("1.2", SCHEMA_JSON);
        let tool = ScriptedTool::new(SCHEMA_JSON, "definitely not json");

        let err = verify_schema_contract(&config, &tool).unwrap_err();
        assert!(matches!(err, ContractError::VersionMetadata { .. }));
        // Only the schema invocation happened; the envelope never ran.
        assert_eq!(tool.invocation_count(), 1);
    }

    #[test]
    fn legacy_key_fails_a_repository_that_is_otherwise_consistent() {
        let (_dir, config) = test_repo("0.3.1", SCHEMA_JSON);
        let envelope = "{\"$schema\":\"https://github.com/kleverhq/wavepeek/blob/v0.3.1/schema/wavepeek.json\",\"schema_version\":\"1\"}";
        let tool = ScriptedTool::new(SCHEMA_JSON, envelope);

        let err = verify_schema_contract(&config, &tool).unwrap_err();
        assert!(matches!(err, ContractError::LegacySchemaVersionKey));
    }

    #[test]
    fn envelope_pinned_to_previous_release_is_a_mismatch() {
        let (_dir, config) = test_repo("0.3.1", SCHEMA_JSON);
        let tool = ScriptedTool::new(SCHEMA_JSON, &envelope_for("0.3.0"));

        let err = verify_schema_contract(&config, &tool).unwrap_err();
        match err {
            ContractError::EnvelopeUrlMismatch { expected, actual } => {
                assert!(expected.contains("v0.3.1"));
                assert!(actual.unwrap().contains("v0.3.0"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn schema_path_override_is_honored() {
        let (dir, mut config) = test_repo("0.3.1", SCHEMA_JSON);
        let alt = dir.path().join("alt-schema.json");
        std::fs::write(&alt, b"{\"alt\":true}\n").unwrap();
        config.schema_path = alt.clone();

        let tool = ScriptedTool::new(b"{\"alt\":true}\n", &envelope_for("0.3.1"));
        verify_schema_contract(&config, &tool).unwrap();

        // The default-path artifact no longer matters.
        std::fs::remove_file(dir.path().join(DEFAULT_SCHEMA_PATH)).unwrap();
        let tool = ScriptedTool::new(b"{\"alt\":true}\n", &envelope_for("0.3.1"));
        verify_schema_contract(&config, &tool).unwrap();
    }

    #[test]
    fn repeated_runs_produce_identical_outcomes() {
        let (_dir, config) = test_repo("0.3.1", SCHEMA_JSON);
        let envelope = envelope_for("0.3.0");

        let first = {
            let tool = ScriptedTool::new(SCHEMA_JSON, &envelope);
            verify_schema_contract(&config, &tool).unwrap_err()
        };
        let second = {
            let tool = ScriptedTool::new(SCHEMA_JSON, &envelope);
            verify_schema_contract(&config, &tool).unwrap_err()
        };
        assert_eq!(format!("{first}"), format!("{second}"));
        assert_eq!(report::diagnostic(&first), report::diagnostic(&second));
    }
}
