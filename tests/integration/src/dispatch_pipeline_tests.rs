//! End-to-end tests over the assembled dispatch pipeline
//!
//! Builds real servers against an in-memory catalog client and checks
//! the registration pipeline's observable behavior: skip-vs-abort
//! semantics, manifest round-tripping, and strategy effects visible
//! through the protocol surface.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use catalog_client::{
    CatalogClient, Entity, EntityMeta, EntityQuery, EntityRef, Location, ValidationOutcome,
};
use catalog_dispatch::{
    Candidate, ManifestEntry, MetadataRegistry, Tool, ToolContext, ToolError, ToolMetadata,
};
use catalog_mcp::{CatalogMcpServer, ServerConfig};

/// Counts catalog hits so cache behavior is observable end to end.
struct CountingCatalog {
    entity_queries: AtomicUsize,
}

impl CountingCatalog {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            entity_queries: AtomicUsize::new(0),
        })
    }

    fn entity_queries(&self) -> usize {
        self.entity_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogClient for CountingCatalog {
    async fn get_entities(&self, _query: EntityQuery) -> catalog_client::Result<Vec<Entity>> {
        self.entity_queries.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Entity {
            api_version: "catalog/v1".into(),
            kind: "Component".into(),
            metadata: EntityMeta {
                name: "website".into(),
                namespace: Some("default".into()),
                uid: Some("uid-1".into()),
                description: None,
                annotations: serde_json::Map::new(),
                tags: vec![],
            },
            spec: json!({}),
        }])
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

struct DocumentedTool;
struct UndescribedTool;
struct OrphanTool;

#[async_trait]
impl Tool for DocumentedTool {
    async fn execute(&self, _args: Value, _ctx: &ToolContext) -> Result<Value, ToolError> {
        Ok(json!("documented"))
    }
}

#[async_trait]
impl Tool for UndescribedTool {
    async fn execute(&self, _args: Value, _ctx: &ToolContext) -> Result<Value, ToolError> {
        Ok(json!("undescribed"))
    }
}

#[async_trait]
impl Tool for OrphanTool {
    async fn execute(&self, _args: Value, _ctx: &ToolContext) -> Result<Value, ToolError> {
        Ok(json!("orphan"))
    }
}

fn config() -> ServerConfig {
    ServerConfig::with_base_url("https://catalog.example.com/api/catalog")
}

#[tokio::test]
async fn test_data_quality_failures_skip_but_do_not_abort() {
    let mut registry = MetadataRegistry::new();
    registry.register::<DocumentedTool>(ToolMetadata::new("documented_tool", "works fine"));
    // Empty description: must fail fast in validation, before any binding.
    registry.register::<UndescribedTool>(ToolMetadata::new("undescribed_tool", "   "));

    let server = CatalogMcpServer::build_with_candidates(
        &config(),
        CountingCatalog::new(),
        registry,
        vec![
            Candidate::of(DocumentedTool),
            Candidate::of(UndescribedTool),
            Candidate::of(OrphanTool),
        ],
    )
    .unwrap();

    assert_eq!(server.report().processed, 3);
    assert_eq!(server.report().registered, 1);
    assert!(server.table().get("documented_tool").is_some());
    assert!(server.table().get("undescribed_tool").is_none());

    let listing = server
        .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list","params":{}}"#)
        .await
        .unwrap();
    assert!(listing.contains("documented_tool"));
    assert!(!listing.contains("undescribed_tool"));
}

#[tokio::test]
async fn test_same_name_twice_aborts_startup() {
    let mut registry = MetadataRegistry::new();
    registry.register::<DocumentedTool>(ToolMetadata::new("clashing_name", "first"));
    registry.register::<OrphanTool>(ToolMetadata::new("clashing_name", "second"));

    let error = CatalogMcpServer::build_with_candidates(
        &config(),
        CountingCatalog::new(),
        registry,
        vec![Candidate::of(DocumentedTool), Candidate::of(OrphanTool)],
    )
    .unwrap_err();

    assert!(error.to_string().contains("clashing_name"));
}

#[tokio::test]
async fn test_manifest_export_round_trip() {
    let server = CatalogMcpServer::build(&config(), CountingCatalog::new()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.json");
    server.manifest().export(&path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let reread: Vec<ManifestEntry> = serde_json::from_str(&raw).unwrap();
    assert_eq!(reread, server.manifest().entries());

    let by_ref = reread
        .iter()
        .find(|entry| entry.name == "get_entity_by_ref")
        .unwrap();
    assert_eq!(by_ref.params, vec!["entity_ref"]);

    let list_locations = reread
        .iter()
        .find(|entry| entry.name == "list_locations")
        .unwrap();
    assert!(list_locations.params.is_empty());
}

#[tokio::test]
async fn test_cacheable_tool_hits_the_catalog_once() {
    let catalog = CountingCatalog::new();
    let server = CatalogMcpServer::build(&config(), catalog.clone()).unwrap();

    let call = r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"get_entities","arguments":{"limit":5}}}"#;
    server.handle_message(call).await.unwrap();
    server.handle_message(call).await.unwrap();
    assert_eq!(catalog.entity_queries(), 1);

    // Different arguments are a different cache key.
    let other = r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_entities","arguments":{"limit":7}}}"#;
    server.handle_message(other).await.unwrap();
    assert_eq!(catalog.entity_queries(), 2);
}

#[tokio::test]
async fn test_disabled_tool_is_invisible_to_callers() {
    let mut config = config();
    config.disabled_tools = vec!["add_location".to_string()];
    let server = CatalogMcpServer::build(&config, CountingCatalog::new()).unwrap();

    let response = server
        .handle_message(
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"add_location","arguments":{"target":"https://x"}}}"#,
        )
        .await
        .unwrap();
    assert!(response.contains("unknown tool"));
}
