//! Entity tools
//!
//! Read/query operations plus the destructive removal tool. Metadata
//! here drives framework policy: `get_entities` and `get_entity_by_ref`
//! opt into caching, `get_entity_by_ref` additionally coalesces
//! concurrent lookups, and `remove_entity_by_uid` demands confirmation
//! and a write scope.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use catalog_client::{CatalogClient, EntityQuery, EntityRef};
use catalog_dispatch::{MetadataRegistry, Tool, ToolCategory, ToolContext, ToolError, ToolMetadata};

use super::parse_args;

/// List catalog entities, optionally filtered.
pub struct GetEntitiesTool;

#[derive(Debug, Deserialize)]
struct GetEntitiesArgs {
    #[serde(default)]
    filter: Vec<String>,
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    offset: Option<usize>,
}

fn get_entities_metadata() -> ToolMetadata {
    ToolMetadata::new(
        "get_entities",
        "List catalog entities, optionally filtered by kind, spec fields, or annotations",
    )
    .with_schema(json!({
        "type": "object",
        "properties": {
            "filter": {
                "type": "array",
                "items": { "type": "string" },
                "description": "key=value filter expressions, ANDed together"
            },
            "fields": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Restrict the response to these field paths"
            },
            "limit": { "type": "integer", "description": "Maximum entities to return" },
            "offset": { "type": "integer", "description": "Pagination offset" }
        }
    }))
    .with_category(ToolCategory::Entities)
    .with_tags(["catalog", "read"])
    .cacheable()
}

#[async_trait]
impl Tool for GetEntitiesTool {
    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let args: GetEntitiesArgs = parse_args(args)?;
        let query = EntityQuery {
            filter: args.filter,
            fields: args.fields,
            limit: args.limit,
            offset: args.offset,
        };
        let entities = ctx.catalog().get_entities(query).await?;
        Ok(json!({
            "total": entities.len(),
            "entities": entities,
        }))
    }
}

/// Fetch a single entity by `kind:namespace/name` reference.
pub struct GetEntityByRefTool;

#[derive(Debug, Deserialize)]
struct GetEntityByRefArgs {
    entity_ref: String,
}

fn get_entity_by_ref_metadata() -> ToolMetadata {
    ToolMetadata::new(
        "get_entity_by_ref",
        "Fetch one catalog entity by its kind:namespace/name reference",
    )
    .with_schema(json!({
        "type": "object",
        "properties": {
            "entity_ref": {
                "type": "string",
                "description": "Entity reference, e.g. component:default/website"
            }
        },
        "required": ["entity_ref"]
    }))
    .with_category(ToolCategory::Entities)
    .with_tags(["catalog", "read"])
    .cacheable()
    .with_max_batch_size(10)
}

#[async_trait]
impl Tool for GetEntityByRefTool {
    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let args: GetEntityByRefArgs = parse_args(args)?;
        let entity_ref = EntityRef::parse(&args.entity_ref)?;
        let entity = ctx.catalog().get_entity_by_ref(&entity_ref).await?;
        serde_json::to_value(entity)
            .map_err(|e| ToolError::message(format!("serializing entity: {e}")))
    }
}

/// Validate an entity body without registering it.
pub struct ValidateEntityTool;

#[derive(Debug, Deserialize)]
struct ValidateEntityArgs {
    entity: Value,
    #[serde(default)]
    location_ref: Option<String>,
}

fn validate_entity_metadata() -> ToolMetadata {
    ToolMetadata::new(
        "validate_entity",
        "Validate an entity body against the catalog schema without registering it",
    )
    .with_schema(json!({
        "type": "object",
        "properties": {
            "entity": {
                "type": "object",
                "description": "Complete entity body to validate"
            },
            "location_ref": {
                "type": "string",
                "description": "Location attributed in validation messages"
            }
        },
        "required": ["entity"]
    }))
    .with_category(ToolCategory::Entities)
    .with_tags(["catalog", "validation"])
}

#[async_trait]
impl Tool for ValidateEntityTool {
    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let args: ValidateEntityArgs = parse_args(args)?;
        let location_ref = args
            .location_ref
            .unwrap_or_else(|| "url:inline".to_string());
        let outcome = ctx
            .catalog()
            .validate_entity(args.entity, &location_ref)
            .await?;
        Ok(json!({
            "valid": outcome.valid,
            "errors": outcome.errors,
        }))
    }
}

/// Delete an entity by uid. Destructive; gated by the confirmation
/// middleware and a write scope.
pub struct RemoveEntityByUidTool;

#[derive(Debug, Deserialize)]
struct RemoveEntityArgs {
    uid: String,
}

fn remove_entity_metadata() -> ToolMetadata {
    ToolMetadata::new(
        "remove_entity_by_uid",
        "Permanently delete a catalog entity by its uid",
    )
    .with_schema(json!({
        "type": "object",
        "properties": {
            "uid": { "type": "string", "description": "Entity uid to delete" }
        },
        "required": ["uid"]
    }))
    .with_category(ToolCategory::Maintenance)
    .with_tags(["catalog", "write"])
    .requires_confirmation()
    .with_required_scopes(["catalog:write"])
}

#[async_trait]
impl Tool for RemoveEntityByUidTool {
    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let args: RemoveEntityArgs = parse_args(args)?;
        ctx.catalog().remove_entity_by_uid(&args.uid).await?;
        Ok(json!({
            "removed": true,
            "uid": args.uid,
        }))
    }
}

pub(crate) fn register_metadata(registry: &mut MetadataRegistry) {
    registry.register::<GetEntitiesTool>(get_entities_metadata());
    registry.register::<GetEntityByRefTool>(get_entity_by_ref_metadata());
    registry.register::<ValidateEntityTool>(validate_entity_metadata());
    registry.register::<RemoveEntityByUidTool>(remove_entity_metadata());
}
