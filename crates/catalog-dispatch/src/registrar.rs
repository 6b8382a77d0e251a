//! Registrar and host invocation surface
//!
//! The registrar turns a validated tool + metadata pair into a handler
//! closure bound to the host protocol under `metadata.name`. The bound
//! handler assembles a per-call context, threads the call through the
//! middleware pipeline and the tool's execution strategy, and converts
//! any failure into a formatted [`ErrorResponse`] — registration-time
//! binding failures, by contrast, are fatal and propagate.

use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::{Map, Value, json};

use crate::classify::{ErrorResponse, classify, format_error};
use crate::error::Result;
use crate::metadata::ToolMetadata;
use crate::middleware::{MiddlewarePipeline, Terminal};
use crate::strategy::{DirectStrategy, ExecutionStrategy};
use crate::tool::{ExecutionContext, Tool, ToolContext};

/// Future returned by a bound handler.
pub type HandlerFuture = BoxFuture<'static, std::result::Result<Value, ErrorResponse>>;

/// Handler closure bound into the host: `(arguments, transport extras)`.
pub type ToolHandler = Arc<dyn Fn(Value, Map<String, Value>) -> HandlerFuture + Send + Sync>;

/// The host protocol's invocation surface.
///
/// Implemented by whatever actually speaks to callers (the MCP dispatch
/// table in this deployment). Duplicate names must be rejected here —
/// that is the point where two same-named implementations collide.
pub trait ToolHost {
    fn tool(
        &mut self,
        name: &str,
        description: &str,
        parameter_schema: Value,
        handler: ToolHandler,
    ) -> Result<()>;
}

/// Binds validated tools into a [`ToolHost`].
pub struct Registrar {
    context: Arc<ExecutionContext>,
    pipeline: Arc<MiddlewarePipeline>,
    direct: Arc<dyn ExecutionStrategy>,
    cached: Option<Arc<dyn ExecutionStrategy>>,
    batched: Option<Arc<dyn ExecutionStrategy>>,
}

impl Registrar {
    pub fn new(context: Arc<ExecutionContext>, pipeline: Arc<MiddlewarePipeline>) -> Self {
        Self {
            context,
            pipeline,
            direct: Arc::new(DirectStrategy),
            cached: None,
            batched: None,
        }
    }

    /// Strategy used for tools that declare `cacheable`.
    pub fn with_caching(mut self, strategy: Arc<dyn ExecutionStrategy>) -> Self {
        self.cached = Some(strategy);
        self
    }

    /// Strategy used for tools that declare a batch size.
    pub fn with_batching(mut self, strategy: Arc<dyn ExecutionStrategy>) -> Self {
        self.batched = Some(strategy);
        self
    }

    /// Pick invocation semantics from the tool's metadata. Batching wins
    /// over caching when both are declared; tools that opt into neither
    /// run direct.
    fn strategy_for(&self, metadata: &ToolMetadata) -> Arc<dyn ExecutionStrategy> {
        if metadata.max_batch_size.is_some_and(|size| size > 1)
            && let Some(batched) = &self.batched
        {
            return Arc::clone(batched);
        }
        if metadata.cacheable
            && let Some(cached) = &self.cached
        {
            return Arc::clone(cached);
        }
        Arc::clone(&self.direct)
    }

    /// Bind one tool into the host. Any error here is a host-protocol
    /// contract violation: logged, then rethrown to abort startup.
    pub fn register(
        &self,
        tool: Arc<dyn Tool>,
        metadata: Arc<ToolMetadata>,
        host: &mut dyn ToolHost,
    ) -> Result<()> {
        let schema = metadata
            .parameter_schema
            .clone()
            .unwrap_or_else(|| json!({ "type": "object", "properties": {} }));

        let handler = self.handler(tool, Arc::clone(&metadata));
        if let Err(error) = host.tool(&metadata.name, &metadata.description, schema, handler) {
            tracing::error!(tool = %metadata.name, error = %error, "host rejected tool binding");
            return Err(error);
        }
        tracing::debug!(tool = %metadata.name, "tool bound to host");
        Ok(())
    }

    fn handler(&self, tool: Arc<dyn Tool>, metadata: Arc<ToolMetadata>) -> ToolHandler {
        let context = Arc::clone(&self.context);
        let pipeline = Arc::clone(&self.pipeline);
        let strategy = self.strategy_for(&metadata);

        Arc::new(move |args: Value, extras: Map<String, Value>| {
            let ctx = ToolContext::new(Arc::clone(&context), Arc::clone(&metadata), extras);
            let pipeline = Arc::clone(&pipeline);
            let strategy = Arc::clone(&strategy);
            let tool = Arc::clone(&tool);
            let metadata = Arc::clone(&metadata);

            Box::pin(async move {
                let terminal: Box<Terminal> = {
                    let strategy = Arc::clone(&strategy);
                    let tool = Arc::clone(&tool);
                    let metadata = Arc::clone(&metadata);
                    Box::new(move |args: Value, ctx: ToolContext| {
                        let strategy = Arc::clone(&strategy);
                        let tool = Arc::clone(&tool);
                        let metadata = Arc::clone(&metadata);
                        Box::pin(async move { strategy.execute(tool, args, ctx, metadata).await })
                            as BoxFuture<'static, _>
                    })
                };

                match pipeline.execute(args, ctx, terminal.as_ref()).await {
                    Ok(value) => Ok(value),
                    Err(error) => {
                        let kind = classify(&error);
                        tracing::warn!(
                            tool = %metadata.name,
                            kind = kind.code(),
                            error = %error,
                            "tool execution failed"
                        );
                        Err(format_error(&error, kind, &metadata.name, "execute", None))
                    }
                }
            })
        })
    }
}
