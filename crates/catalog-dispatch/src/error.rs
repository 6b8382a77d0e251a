//! Error types for the dispatch framework
//!
//! Two distinct error surfaces live here. [`Error`] covers the
//! registration pipeline (validation, binding); the loader decides per
//! variant whether to skip a candidate or abort startup. [`ToolError`] is
//! what tool executions produce; it is always caught at the dispatch
//! boundary, classified, and formatted before reaching a caller.

use thiserror::Error;

use crate::classify::ErrorKind;

/// Result type alias for registration-pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building the dispatch surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Metadata failed contract validation; the loader skips the candidate
    #[error("invalid tool metadata from {source_label}: {}", .problems.join("; "))]
    Validation {
        source_label: String,
        problems: Vec<String>,
    },

    /// A tool with the same name is already bound to the host
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),

    /// The host refused the binding; fatal to startup
    #[error("failed to bind tool '{name}': {message}")]
    Binding { name: String, message: String },

    /// JSON error while converting schemas or exporting the manifest
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while exporting the manifest
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A failure produced while executing a tool.
///
/// Carry the category explicitly wherever the origin is known
/// ([`ToolError::Tagged`], typed client errors); the classifier only
/// falls back to message heuristics for [`ToolError::Message`].
#[derive(Debug, Error)]
pub enum ToolError {
    /// Failure whose category was known at the point of origin
    #[error("{message}")]
    Tagged { kind: ErrorKind, message: String },

    /// Failure surfaced by the catalog client
    #[error(transparent)]
    Catalog(#[from] catalog_client::Error),

    /// Untyped failure; classified heuristically from its message
    #[error("{0}")]
    Message(String),

    /// Failure carrying no usable diagnostics
    #[error("unknown error")]
    Unknown,
}

impl ToolError {
    /// Failure with an explicit taxonomy tag.
    pub fn tagged(kind: ErrorKind, message: impl Into<String>) -> Self {
        ToolError::Tagged {
            kind,
            message: message.into(),
        }
    }

    /// Argument-shape failure, tagged as a validation error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::tagged(ErrorKind::Validation, message)
    }

    /// Untyped failure from a foreign source.
    pub fn message(message: impl Into<String>) -> Self {
        ToolError::Message(message.into())
    }
}
