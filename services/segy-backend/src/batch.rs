//! One-shot batch extraction.

use std::io::Write;

use serde_json::{json, Value};
use tracing::{error, info};

use extraction::{run_batch, write_batch_output, BatchRequest, ExtractionError};

use crate::config::BackendConfig;

fn execute(config: &BackendConfig, input: &str) -> Result<Value, ExtractionError> {
    let value: Value =
        serde_json::from_str(input).map_err(|e| ExtractionError::Input(format!("Invalid JSON input: {}", e)))?;
    let batch = BatchRequest::from_value(value)?;
    let results = run_batch(&batch, &config.limits)?;
    Ok(serde_json::to_value(results)?)
}

/// Run a batch request given as JSON text. The outcome (mapping or error
/// object) is printed to `output` and written to the audit file. Returns
/// `false` when the request itself was rejected.
pub fn run_batch_command<W: Write>(config: &BackendConfig, input: &str, output: &mut W) -> anyhow::Result<bool> {
    let (body, success) = match execute(config, input) {
        Ok(results) => {
            info!(files = results.as_object().map_or(0, |m| m.len()), "Batch complete");
            (results, true)
        }
        Err(e) => {
            error!(error = %e, "Batch request rejected");
            (json!({ "error": e.to_record() }), false)
        }
    };

    write_batch_output(&config.batch_output, &body)?;
    serde_json::to_writer_pretty(&mut *output, &body)?;
    writeln!(output)?;
    Ok(success)
}
