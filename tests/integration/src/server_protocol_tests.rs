//! Protocol compliance tests
//!
//! Drives the server with raw JSON-RPC messages and checks the wire
//! shapes: initialize capabilities, tool listings, tool results, and
//! error envelopes.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use catalog_client::{
    CatalogClient, Entity, EntityMeta, EntityQuery, EntityRef, Location, ValidationOutcome,
};
use catalog_mcp::{CatalogMcpServer, ServerConfig};

struct StubCatalog;

fn entity(name: &str) -> Entity {
    Entity {
        api_version: "catalog/v1".into(),
        kind: "Component".into(),
        metadata: EntityMeta {
            name: name.into(),
            namespace: Some("default".into()),
            uid: Some(format!("uid-{name}")),
            description: Some("a component".into()),
            annotations: serde_json::Map::new(),
            tags: vec!["frontend".into()],
        },
        spec: json!({ "type": "website", "owner": "team-a" }),
    }
}

#[async_trait]
impl CatalogClient for StubCatalog {
    async fn get_entities(&self, _query: EntityQuery) -> catalog_client::Result<Vec<Entity>> {
        Ok(vec![entity("website"), entity("payments")])
    }

    async fn get_entity_by_ref(&self, entity_ref: &EntityRef) -> catalog_client::Result<Entity> {
        if entity_ref.name == "website" {
            Ok(entity("website"))
        } else {
            Err(catalog_client::Error::NotFound(entity_ref.to_string()))
        }
    }

    async fn remove_entity_by_uid(&self, _uid: &str) -> catalog_client::Result<()> {
        Ok(())
    }

    async fn validate_entity(
        &self,
        body: Value,
        _location_ref: &str,
    ) -> catalog_client::Result<ValidationOutcome> {
        if body.get("kind").is_some() {
            Ok(ValidationOutcome {
                valid: true,
                errors: vec![],
            })
        } else {
            Ok(ValidationOutcome {
                valid: false,
                errors: vec!["kind is required".into()],
            })
        }
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

fn server() -> CatalogMcpServer {
    let config = ServerConfig::with_base_url("https://catalog.example.com/api/catalog");
    CatalogMcpServer::build(&config, Arc::new(StubCatalog)).unwrap()
}

async fn roundtrip(message: &str) -> Value {
    let response = server().handle_message(message).await.unwrap();
    serde_json::from_str(&response).unwrap()
}

#[tokio::test]
async fn test_initialize_shape() {
    let parsed = roundtrip(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"1.0"}}}"#,
    )
    .await;

    assert_eq!(parsed["jsonrpc"], "2.0");
    assert_eq!(parsed["id"], 1);
    assert_eq!(parsed["result"]["serverInfo"]["name"], "catalog-mcp");
    assert!(parsed["result"]["capabilities"]["tools"].is_object());
    assert!(parsed.get("error").is_none());
}

#[tokio::test]
async fn test_tools_list_has_schemas_for_every_tool() {
    let parsed = roundtrip(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list","params":{}}"#).await;
    let tools = parsed["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 6);

    for tool in tools {
        assert!(tool["name"].is_string());
        assert!(tool["description"].is_string());
        assert_eq!(tool["inputSchema"]["type"], "object");
    }

    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    for expected in [
        "get_entities",
        "get_entity_by_ref",
        "validate_entity",
        "remove_entity_by_uid",
        "add_location",
        "list_locations",
    ] {
        assert!(names.contains(&expected), "missing tool {expected}");
    }
}

#[tokio::test]
async fn test_tool_call_returns_text_content() {
    let parsed = roundtrip(
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"get_entities","arguments":{}}}"#,
    )
    .await;

    let content = &parsed["result"]["content"][0];
    assert_eq!(content["type"], "text");
    let payload: Value = serde_json::from_str(content["text"].as_str().unwrap()).unwrap();
    assert_eq!(payload["total"], 2);
    assert_eq!(payload["entities"][0]["metadata"]["name"], "website");
}

#[tokio::test]
async fn test_tool_failure_carries_the_error_taxonomy() {
    let parsed = roundtrip(
        r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"get_entity_by_ref","arguments":{"entity_ref":"component:default/ghost"}}}"#,
    )
    .await;

    assert_eq!(parsed["result"]["is_error"], true);
    let text = parsed["result"]["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["error"]["code"], "NOT_FOUND");
    assert_eq!(payload["error"]["status"], "404 Not Found");
    assert_eq!(payload["metadata"]["tool"], "get_entity_by_ref");
    assert!(payload["metadata"]["timestamp"].is_string());
}

#[tokio::test]
async fn test_missing_required_argument_is_a_validation_error() {
    let parsed = roundtrip(
        r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"get_entity_by_ref","arguments":{}}}"#,
    )
    .await;

    assert_eq!(parsed["result"]["is_error"], true);
    let text = parsed["result"]["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["error"]["code"], "VALIDATION");
    assert!(payload["error"]["message"]
        .as_str()
        .unwrap()
        .contains("entity_ref"));
}

#[tokio::test]
async fn test_validate_entity_round_trip() {
    let parsed = roundtrip(
        r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"validate_entity","arguments":{"entity":{"kind":"Component"}}}}"#,
    )
    .await;

    let text = parsed["result"]["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["valid"], true);
}

#[tokio::test]
async fn test_unknown_method_is_a_jsonrpc_error() {
    let parsed = roundtrip(r#"{"jsonrpc":"2.0","id":7,"method":"resources/list","params":{}}"#).await;
    assert_eq!(parsed["error"]["code"], -32601);
    assert!(parsed.get("result").is_none());
}

#[tokio::test]
async fn test_notification_produces_no_output() {
    let response = server()
        .handle_message(r#"{"jsonrpc":"2.0","method":"initialized"}"#)
        .await
        .unwrap();
    assert!(response.is_empty());
}
