//! MCP server implementation
//!
//! Wires the dispatch framework together at startup (registry →
//! discovery → loader → dispatch table) and then speaks JSON-RPC 2.0
//! over stdio. The [`DispatchTable`] is this deployment's host
//! invocation surface: the registrar binds each validated tool here,
//! and `tools/call` looks the handler up by name.

use std::io::{BufRead, Write};
use std::sync::Arc;

use serde_json::{Map, Value, json};

use catalog_client::CatalogClient;
use catalog_dispatch::{
    BatchedStrategy, CachedStrategy, Candidate, ErrorResponse, ExecutionContext,
    FilteredDiscovery, HostInfo, LoaderReport, ManifestBuilder, MiddlewarePipeline, Registrar,
    StaticDiscovery, ToolHandler, ToolHost, ToolLoader,
    middleware::{ConfirmationGate, RequestLogging, RequiredArgsValidation, ScopeGuard},
};

use crate::config::ServerConfig;
use crate::protocol::{
    InitializeResult, JsonRpcRequest, JsonRpcResponse, ServerCapabilities, ServerInfo,
    ToolCallParams, ToolResult, ToolsCapability,
};
use crate::tools;
use crate::{Error, Result};

/// One tool bound into the dispatch table.
pub struct BoundTool {
    pub name: String,
    pub description: String,
    pub schema: Value,
    handler: ToolHandler,
}

impl std::fmt::Debug for BoundTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Host invocation surface for this deployment.
#[derive(Default, Debug)]
pub struct DispatchTable {
    tools: Vec<BoundTool>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&BoundTool> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool definitions in the shape `tools/list` expects.
    pub fn definitions(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "inputSchema": tool.schema,
                })
            })
            .collect()
    }

    /// Invoke a bound handler. `None` means no such tool.
    pub async fn call(
        &self,
        name: &str,
        args: Value,
        extras: Map<String, Value>,
    ) -> Option<std::result::Result<Value, ErrorResponse>> {
        let tool = self.get(name)?;
        Some((tool.handler)(args, extras).await)
    }
}

impl ToolHost for DispatchTable {
    fn tool(
        &mut self,
        name: &str,
        description: &str,
        parameter_schema: Value,
        handler: ToolHandler,
    ) -> catalog_dispatch::Result<()> {
        if self.get(name).is_some() {
            return Err(catalog_dispatch::Error::DuplicateTool(name.to_string()));
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

/// MCP server for the software catalog.
#[derive(Debug)]
pub struct CatalogMcpServer {
    table: DispatchTable,
    manifest: ManifestBuilder,
    report: LoaderReport,
}

impl CatalogMcpServer {
    /// Assemble the dispatch surface and register every shipped tool.
    pub fn build(config: &ServerConfig, catalog: Arc<dyn CatalogClient>) -> Result<Self> {
        Self::build_with_candidates(config, catalog, tools::metadata_registry(), tools::candidates())
    }

    /// Assemble the dispatch surface for an explicit candidate set —
    /// lets tests exercise the pipeline with synthetic tools.
    pub fn build_with_candidates(
        config: &ServerConfig,
        catalog: Arc<dyn CatalogClient>,
        registry: catalog_dispatch::MetadataRegistry,
        candidates: Vec<Candidate>,
    ) -> Result<Self> {
        let registry = Arc::new(registry);
        let context = Arc::new(ExecutionContext::new(
            catalog,
            HostInfo {
                name: "catalog-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        ));

        let mut pipeline = MiddlewarePipeline::new();
        pipeline.add(Arc::new(RequestLogging));
        pipeline.add(Arc::new(ScopeGuard));
        pipeline.add(Arc::new(RequiredArgsValidation));
        pipeline.add(Arc::new(ConfirmationGate));

        let registrar = Registrar::new(context, Arc::new(pipeline))
            .with_caching(Arc::new(
                CachedStrategy::new(config.cache_ttl()).with_capacity(config.cache_capacity),
            ))
            .with_batching(Arc::new(BatchedStrategy::new(config.flush_policy())));

        let discovery = FilteredDiscovery::new(
            StaticDiscovery::new(candidates),
            Arc::clone(&registry),
            config.disabled_tools.iter().cloned(),
        );

        let loader = ToolLoader::new(registry, registrar);
        let mut table = DispatchTable::new();
        let mut manifest = ManifestBuilder::new();
        let report = loader.load(&discovery, &mut table, &mut manifest)?;

        Ok(Self {
            table,
            manifest,
            report,
        })
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    pub fn manifest(&self) -> &ManifestBuilder {
        &self.manifest
    }

    pub fn report(&self) -> LoaderReport {
        self.report
    }

    /// Run the server over stdio until stdin closes.
    pub async fn run(&self) -> Result<()> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();

        tracing::info!(
            tools = self.table.len(),
            "MCP server ready, listening on stdio"
        );

        for line in stdin.lock().lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            tracing::debug!(request = %line, "received message");

            match self.handle_message(&line).await {
                Ok(response) if !response.is_empty() => {
                    writeln!(stdout, "{}", response)?;
                    stdout.flush()?;
                }
                Ok(_) => {} // Notification, no response
                Err(e) => {
                    let error_response = JsonRpcResponse::error(
                        None,
                        -32603,
                        format!("Internal error: {}", e),
                    );
                    writeln!(stdout, "{}", serde_json::to_string(&error_response)?)?;
                    stdout.flush()?;
                }
            }
        }

        Ok(())
    }

    /// Handle a single JSON-RPC message. Returns an empty string for
    /// notifications.
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let request: JsonRpcRequest = serde_json::from_str(message)?;

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "initialized" | "notifications/initialized" => return Ok(String::new()),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await?,
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: "2024-11-05".to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: "catalog-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };
        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, -32603, e.to_string()),
        }
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": self.table.definitions() }))
    }

    async fn handle_tools_call(
        &self,
        id: Option<Value>,
        params: Value,
    ) -> Result<JsonRpcResponse> {
        let params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    -32602,
                    format!("Invalid params: {}", e),
                ));
            }
        };

        let tool_result = match self
            .table
            .call(&params.name, params.arguments, params.meta)
            .await
        {
            None => ToolResult::error(format!("unknown tool: {}", params.name)),
            Some(Ok(value)) => ToolResult::text(serde_json::to_string_pretty(&value)?),
            Some(Err(response)) => ToolResult::error(serde_json::to_string_pretty(&response)?),
        };

        Ok(JsonRpcResponse::success(
            id,
            serde_json::to_value(tool_result)?,
        ))
    }
}
