//! # Tool Invocation Seam
//!
//! The contract gates observe the wavepeek binary only through
//! [`ToolRunner`]: arguments in, stdout bytes and an exit status out.
//! Production runs go through [`CommandToolRunner`]; tests substitute
//! in-process fakes.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::ContractError;

/// Captured output of a single tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Raw bytes the tool wrote to stdout.
    pub stdout: Vec<u8>,
    /// Exit code, or `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

/// Black-box interface to the wavepeek binary.
pub trait ToolRunner {
    /// Run the tool with `args` and wait for it to finish.
    ///
    /// `Err` means the tool could not be launched at all. An unsuccessful
    /// exit is reported through [`ToolOutput::code`], not as `Err`.
    fn invoke(&self, args: &[&str]) -> Result<ToolOutput, ContractError>;
}

/// Invoke the tool and require a successful exit.
///
/// Launch failures, non-zero exits, and signal deaths all become
/// [`ContractError::Infrastructure`] naming the attempted invocation.
pub fn run_tool(runner: &dyn ToolRunner, args: &[&str]) -> Result<Vec<u8>, ContractError> {
    let output = runner.invoke(args)?;
    match output.code {
        Some(0) => Ok(output.stdout),
        Some(code) => Err(ContractError::Infrastructure {
            detail: format!("'wavepeek {}' exited with status {code}", args.join(" ")),
        }),
        None => Err(ContractError::Infrastructure {
            detail: format!("'wavepeek {}' was terminated by a signal", args.join(" ")),
        }),
    }
}

/// Production runner for the wavepeek binary.
///
/// Two shapes: `cargo run --quiet -- <args>` inside the target repository
/// (the default, so the check always exercises the current working tree),
/// or a prebuilt binary named through the `WAVEPEEK_BIN` environment
/// variable when the caller wants to skip the nested build. Child stderr
/// is inherited either way so compiler and tool noise lands in the CI log.
#[derive(Debug, Clone)]
pub struct CommandToolRunner {
    program: PathBuf,
    prefix_args: Vec<String>,
    current_dir: PathBuf,
}

impl CommandToolRunner {
    /// Build-and-run shape: `cargo run --quiet -- <args>` in `repo_root`.
    pub fn cargo(repo_root: &Path) -> Self {
        Self {
            program: PathBuf::from("cargo"),
            prefix_args: vec!["run".to_string(), "--quiet".to_string(), "--".to_string()],
            current_dir: repo_root.to_path_buf(),
        }
    }

    /// Prebuilt shape: `<bin> <args>` in `repo_root`.
    pub fn prebuilt(bin: PathBuf, repo_root: &Path) -> Self {
        Self {
            program: bin,
            prefix_args: Vec::new(),
            current_dir: repo_root.to_path_buf(),
        }
    }
}

impl ToolRunner for CommandToolRunner {
    fn invoke(&self, args: &[&str]) -> Result<ToolOutput, ContractError> {
        tracing::debug!(program = %self.program.display(), ?args, "invoking wavepeek");
        let output = Command::new(&self.program)
            .args(&self.prefix_args)
            .args(args)
            .current_dir(&self.current_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| ContractError::Infrastructure {
                detail: format!("failed to launch {}: {e}", self.program.display()),
            })?;
        Ok(ToolOutput {
            stdout: output.stdout,
            code: output.status.code(),
        })
    }
}
