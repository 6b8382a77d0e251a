//! Metadata contract validation
//!
//! Runs before registration. A failure here is a data-quality problem:
//! the loader logs it against the candidate's source label and moves on.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::metadata::ToolMetadata;

/// Whether a schema can report its top-level field names.
pub fn is_introspectable(schema: &Value) -> bool {
    schema
        .get("properties")
        .map(Value::is_object)
        .unwrap_or(false)
}

/// Enforce the metadata contract.
///
/// `source_label` identifies the candidate in logs — metadata that fails
/// validation may not even have a usable name.
pub fn validate(metadata: &ToolMetadata, source_label: &str) -> Result<()> {
    let mut problems = Vec::new();

    if metadata.name.trim().is_empty() {
        problems.push("name must be non-empty".to_string());
    }
    if metadata.description.trim().is_empty() {
        problems.push("description must be non-empty".to_string());
    }
    if let Some(0) = metadata.max_batch_size {
        problems.push("max_batch_size must be greater than zero".to_string());
    }

    // A non-introspectable schema is accepted; the manifest entry just
    // loses its parameter names.
    if let Some(schema) = &metadata.parameter_schema
        && !is_introspectable(schema)
    {
        tracing::debug!(
            source = source_label,
            "parameter schema is not introspectable; manifest params will be empty"
        );
    }

    if problems.is_empty() {
        Ok(())
    } else {
        tracing::warn!(
            source = source_label,
            problems = ?problems,
            "tool metadata failed validation"
        );
        Err(Error::Validation {
            source_label: source_label.to_string(),
            problems,
        })
    }
}
