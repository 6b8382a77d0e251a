//! Location tools

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use catalog_client::CatalogClient;
use catalog_dispatch::{MetadataRegistry, Tool, ToolCategory, ToolContext, ToolError, ToolMetadata};

use super::parse_args;

fn default_location_type() -> String {
    "url".to_string()
}

/// Register a new location for the catalog to ingest from.
pub struct AddLocationTool;

#[derive(Debug, Deserialize)]
struct AddLocationArgs {
    #[serde(rename = "type", default = "default_location_type")]
    location_type: String,
    target: String,
}

fn add_location_metadata() -> ToolMetadata {
    ToolMetadata::new(
        "add_location",
        "Register a location (e.g. a catalog-info URL) for the catalog to ingest",
    )
    .with_schema(json!({
        "type": "object",
        "properties": {
            "type": {
                "type": "string",
                "description": "Location type (defaults to url)"
            },
            "target": {
                "type": "string",
                "description": "Location target, e.g. a catalog-info.yaml URL"
            }
        },
        "required": ["target"]
    }))
    .with_category(ToolCategory::Locations)
    .with_tags(["catalog", "write"])
}

#[async_trait]
impl Tool for AddLocationTool {
    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let args: AddLocationArgs = parse_args(args)?;
        let location = ctx
            .catalog()
            .add_location(&args.location_type, &args.target)
            .await?;
        Ok(json!({
            "id": location.id,
            "type": location.location_type,
            "target": location.target,
        }))
    }
}

/// List all registered locations.
pub struct ListLocationsTool;

fn list_locations_metadata() -> ToolMetadata {
    ToolMetadata::new("list_locations", "List all registered catalog locations")
        .with_schema(json!({
            "type": "object",
            "properties": {}
        }))
        .with_category(ToolCategory::Locations)
        .with_tags(["catalog", "read"])
        .cacheable()
}

#[async_trait]
impl Tool for ListLocationsTool {
    async fn execute(&self, _args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let locations = ctx.catalog().get_locations().await?;
        Ok(json!({
            "total": locations.len(),
            "locations": locations,
        }))
    }
}

pub(crate) fn register_metadata(registry: &mut MetadataRegistry) {
    registry.register::<AddLocationTool>(add_location_metadata());
    registry.register::<ListLocationsTool>(list_locations_metadata());
}
