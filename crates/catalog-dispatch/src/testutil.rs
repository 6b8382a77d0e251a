//! Shared helpers for unit tests

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use catalog_client::{
    CatalogClient, Entity, EntityQuery, EntityRef, Location, ValidationOutcome,
};

use crate::error::{Error, Result};
use crate::metadata::ToolMetadata;
use crate::registrar::{ToolHandler, ToolHost};
use crate::tool::{ExecutionContext, HostInfo, ToolContext};

/// Catalog client that answers every call with an empty/neutral result.
pub(crate) struct NullCatalog;

#[async_trait]
impl CatalogClient for NullCatalog {
    async fn get_entities(&self, _query: EntityQuery) -> catalog_client::Result<Vec<Entity>> {
        Ok(vec![])
    }

    async fn get_entity_by_ref(&self, entity_ref: &EntityRef) -> catalog_client::Result<Entity> {
        Err(catalog_client::Error::NotFound(entity_ref.to_string()))
    }

    async fn remove_entity_by_uid(&self, _uid: &str) -> catalog_client::Result<()> {
        Ok(())
    }

    async fn validate_entity(
        &self,
        _body: Value,
        _location_ref: &str,
    ) -> catalog_client::Result<ValidationOutcome> {
        Ok(ValidationOutcome {
            valid: true,
            errors: vec![],
        })
    }

    async fn add_location(
        &self,
        location_type: &str,
        target: &str,
    ) -> catalog_client::Result<Location> {
        Ok(Location {
            id: "loc-1".into(),
            location_type: location_type.into(),
            target: target.into(),
        })
    }

    async fn get_locations(&self) -> catalog_client::Result<Vec<Location>> {
        Ok(vec![])
    }
}

pub(crate) fn shared_context() -> Arc<ExecutionContext> {
    Arc::new(ExecutionContext::new(
        Arc::new(NullCatalog),
        HostInfo {
            name: "test-host".into(),
            version: "0.0.0".into(),
        },
    ))
}

/// Build a per-call context for the given metadata and extras.
pub(crate) fn context_for(metadata: ToolMetadata, extras: Map<String, Value>) -> ToolContext {
    ToolContext::new(shared_context(), Arc::new(metadata), extras)
}

/// Tool bound into a [`RecordingHost`].
pub(crate) struct BoundTool {
    pub name: String,
    pub description: String,
    pub schema: Value,
    pub handler: ToolHandler,
}

/// In-memory host surface for exercising the registrar and loader.
#[derive(Default)]
pub(crate) struct RecordingHost {
    tools: Vec<BoundTool>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&BoundTool> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl ToolHost for RecordingHost {
    fn tool(
        &mut self,
        name: &str,
        description: &str,
        parameter_schema: Value,
        handler: ToolHandler,
    ) -> Result<()> {
        if self.get(name).is_some() {
            return Err(Error::DuplicateTool(name.to_string()));
        }
        self.tools.push(BoundTool {
            name: name.to_string(),
            description: description.to_string(),
            schema: parameter_schema,
            handler,
        });
        Ok(())
    }
}
