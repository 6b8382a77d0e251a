//! CatalogClient trait
//!
//! The contract the dispatch framework programs against. Tools receive an
//! `Arc<dyn CatalogClient>` through their execution context and never see
//! the transport underneath.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::{Entity, EntityQuery, EntityRef, Location, ValidationOutcome};

/// Entity and location operations against the software catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// List entities matching the query.
    async fn get_entities(&self, query: EntityQuery) -> Result<Vec<Entity>>;

    /// Fetch a single entity by reference.
    async fn get_entity_by_ref(&self, entity_ref: &EntityRef) -> Result<Entity>;

    /// Delete an entity by its uid.
    async fn remove_entity_by_uid(&self, uid: &str) -> Result<()>;

    /// Validate an entity body against the catalog's schema without
    /// registering it.
    async fn validate_entity(&self, body: Value, location_ref: &str) -> Result<ValidationOutcome>;

    /// Register a new location for the catalog to ingest from.
    async fn add_location(&self, location_type: &str, target: &str) -> Result<Location>;

    /// List all registered locations.
    async fn get_locations(&self) -> Result<Vec<Location>>;
}
