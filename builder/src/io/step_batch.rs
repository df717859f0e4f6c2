//! Intake of step batches produced by the external step parser.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde_json::Value;
use tracing::debug;

use crate::step::Step;

const STEP_BATCH_SCHEMA: &str = include_str!("../../schemas/step_batch.schema.json");

/// Parse a JSON array of step records.
///
/// The batch is validated against the step batch schema, and every step is
/// reset to `pending`: arriving steps have not been folded yet, whatever
/// status the producer attached.
pub fn parse_step_batch(raw: &str) -> Result<Vec<Step>> {
    let mut batch: Value = serde_json::from_str(raw).context("parse step batch")?;
    validate_schema(&batch)?;

    if let Value::Array(items) = &mut batch {
        for item in items {
            if let Value::Object(fields) = item {
                fields.insert("status".to_string(), Value::from("pending"));
            }
        }
    }

    let steps: Vec<Step> = serde_json::from_value(batch).context("deserialize step batch")?;
    debug!(count = steps.len(), "parsed step batch");
    Ok(steps)
}

/// Read and parse a step batch file.
pub fn load_step_batch(path: &Path) -> Result<Vec<Step>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read step batch {}", path.display()))?;
    parse_step_batch(&raw).with_context(|| format!("load step batch {}", path.display()))
}

fn validate_schema(batch: &Value) -> Result<()> {
    let schema: Value =
        serde_json::from_str(STEP_BATCH_SCHEMA).context("parse step batch schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(batch) {
        let messages = compiled
            .iter_errors(batch)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "step batch schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}
