//! # Runtime Schema Comparison
//!
//! Asks the running tool for its schema and requires the answer to be
//! byte-for-byte identical to the canonical artifact. Whitespace and key
//! ordering count; there is no normalization on either side.

use std::path::Path;

use crate::artifact::CanonicalSchema;
use crate::error::ContractError;
use crate::runner::{run_tool, ToolRunner};

/// Invoke `wavepeek schema` and compare its stdout to the canonical bytes.
///
/// A launch failure or unsuccessful exit propagates as
/// [`ContractError::Infrastructure`]; any byte difference is
/// [`ContractError::RuntimeSchemaMismatch`] naming the configured
/// artifact path.
pub fn compare_runtime_schema(
    runner: &dyn ToolRunner,
    schema_path: &Path,
    canonical: &CanonicalSchema,
) -> Result<(), ContractError> {
    let runtime = run_tool(runner, &["schema"])?;
    if runtime != canonical.as_bytes() {
        return Err(ContractError::RuntimeSchemaMismatch {
            path: schema_path.to_path_buf(),
        });
    }
    tracing::debug!(bytes = runtime.len(), "runtime schema matches canonical artifact");
    Ok(())
}
