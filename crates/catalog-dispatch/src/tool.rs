//! Tool contract and execution context

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use catalog_client::CatalogClient;

use crate::error::ToolError;
use crate::metadata::ToolMetadata;

/// Identity of the host process, available to tools through the context.
#[derive(Debug, Clone)]
pub struct HostInfo {
    pub name: String,
    pub version: String,
}

/// Shared handles constructed once at startup and threaded through every
/// call.
pub struct ExecutionContext {
    catalog: Arc<dyn CatalogClient>,
    host: HostInfo,
}

impl ExecutionContext {
    pub fn new(catalog: Arc<dyn CatalogClient>, host: HostInfo) -> Self {
        Self { catalog, host }
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogClient> {
        &self.catalog
    }

    pub fn host(&self) -> &HostInfo {
        &self.host
    }
}

/// Per-call view handed to middleware and tools.
///
/// Assembled by the registrar for each invocation: the shared context,
/// the bound tool's metadata, and the transport extras that arrived with
/// the call. Cloning is cheap (everything is reference-counted) and
/// tools only ever see a shared reference.
#[derive(Clone)]
pub struct ToolContext {
    shared: Arc<ExecutionContext>,
    metadata: Arc<ToolMetadata>,
    extras: Arc<Map<String, Value>>,
}

impl ToolContext {
    pub fn new(
        shared: Arc<ExecutionContext>,
        metadata: Arc<ToolMetadata>,
        extras: Map<String, Value>,
    ) -> Self {
        Self {
            shared,
            metadata,
            extras: Arc::new(extras),
        }
    }

    pub fn catalog(&self) -> &dyn CatalogClient {
        self.shared.catalog().as_ref()
    }

    pub fn host(&self) -> &HostInfo {
        self.shared.host()
    }

    /// Metadata of the tool this call is bound to.
    pub fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    pub fn tool_name(&self) -> &str {
        &self.metadata.name
    }

    /// Transport metadata that arrived with the call.
    pub fn extras(&self) -> &Map<String, Value> {
        &self.extras
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }
}

/// A named, independently invocable unit of business logic.
///
/// The `Any` supertrait lets the metadata registry resolve an instance
/// back to the identity of its implementing type.
#[async_trait]
pub trait Tool: Any + Send + Sync {
    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError>;
}
