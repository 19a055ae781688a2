//! # wavepeek-schema-check entry point
//!
//! CI gate verifying the wavepeek schema contract: the canonical artifact
//! checked into the repository, the schema the built tool emits, and the
//! version-stamped `$schema` URL in its JSON envelopes must all agree.
//! Runs from the target repository root. Silent with exit status 0 when
//! the contract holds; one `error: schema: ` diagnostic on stderr (plus an
//! optional hint line) and exit status 1 otherwise.
//!
//! The tool is exercised through `cargo run --quiet -- <args>` by default,
//! so the check always reflects the current working tree. Setting
//! `WAVEPEEK_BIN` to a prebuilt binary skips the nested build.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wavepeek_contract::{
    report, verify_schema_contract, CommandToolRunner, ContractConfig,
};

/// Verify the wavepeek schema contract.
///
/// Checks that schema/wavepeek.json, the output of `wavepeek schema`, and
/// the `$schema` URL in `wavepeek info --json` envelopes agree with each
/// other and with the package version in Cargo.toml.
#[derive(Parser, Debug)]
#[command(name = "wavepeek-schema-check", version, about, long_about = None)]
struct Cli {
    /// Override path to the canonical schema artifact.
    schema_path: Option<PathBuf>,

    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level. Diagnostics never go
    // through tracing, so the default run stays silent on success.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let repo_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    tracing::debug!(repo_root = %repo_root.display(), "checking schema contract");

    let mut config = ContractConfig::new(&repo_root);
    if let Some(path) = cli.schema_path {
        config.schema_path = path;
    }

    let runner = match std::env::var_os("WAVEPEEK_BIN") {
        Some(bin) => CommandToolRunner::prebuilt(PathBuf::from(bin), &repo_root),
        None => CommandToolRunner::cargo(&repo_root),
    };

    match verify_schema_contract(&config, &runner) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", report::diagnostic(&error));
            ExitCode::from(1)
        }
    }
}
