//! Tool dispatch framework for the catalog MCP server
//!
//! This crate turns independently written tool implementations into a
//! uniform, introspectable dispatch surface:
//!
//! ```text
//! [ Discovery ] -> [ Metadata Registry ] -> [ Validator ]
//!        |                                        |
//!        v                                        v
//! [ Loader ] ---------------------------> [ Registrar ]
//!                                               |
//!                      binds handler:           v
//!        middleware pipeline -> execution strategy -> tool
//!                                               |
//!                                               v
//!                                  [ classifier / formatter ]
//! ```
//!
//! At startup the [`loader::ToolLoader`] walks every discovered candidate,
//! resolves its metadata from the identity-keyed [`metadata::MetadataRegistry`],
//! validates it, and asks the [`registrar::Registrar`] to bind a handler
//! into the host's [`registrar::ToolHost`] surface. Each bound handler
//! threads a call through the [`middleware::MiddlewarePipeline`] and one of
//! the [`strategy`] implementations (direct, cached, batched) before the
//! tool's own logic runs; failures come back through the classifier as a
//! uniform, taxonomy-tagged [`classify::ErrorResponse`].
//!
//! Metadata resolution failures skip a candidate; host binding failures
//! abort startup. Tools never format their own error payloads.

pub mod classify;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod metadata;
pub mod middleware;
pub mod registrar;
pub mod strategy;
pub mod tool;
pub mod validate;

#[cfg(test)]
pub(crate) mod testutil;

pub use classify::{
    ErrorKind, ErrorResponse, classify, classify_message, format_error, redact, simple_error,
};
pub use discovery::{Candidate, FilteredDiscovery, StaticDiscovery, ToolDiscovery};
pub use error::{Error, Result, ToolError};
pub use loader::{LoaderReport, ToolLoader};
pub use manifest::{ManifestBuilder, ManifestEntry};
pub use metadata::{MetadataRegistry, ToolCategory, ToolMetadata};
pub use middleware::{Middleware, MiddlewarePipeline, Next};
pub use registrar::{Registrar, ToolHandler, ToolHost};
pub use strategy::{BatchedStrategy, CachedStrategy, DirectStrategy, ExecutionStrategy, FlushPolicy};
pub use tool::{ExecutionContext, HostInfo, Tool, ToolContext};
