//! Direct execution

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ToolError;
use crate::metadata::ToolMetadata;
use crate::strategy::ExecutionStrategy;
use crate::tool::{Tool, ToolContext};

/// Delegates to the tool immediately; no extra state.
pub struct DirectStrategy;

#[async_trait]
impl ExecutionStrategy for DirectStrategy {
    async fn execute(
        &self,
        tool: Arc<dyn Tool>,
        args: Value,
        ctx: ToolContext,
        _metadata: Arc<ToolMetadata>,
    ) -> Result<Value, ToolError> {
        tool.execute(args, &ctx).await
    }
}
