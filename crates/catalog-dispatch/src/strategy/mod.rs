//! Execution strategies
//!
//! Pluggable invocation semantics sitting between the middleware chain
//! and the tool itself. Every strategy degrades to direct delegation
//! when the tool's metadata does not opt in, so a deployment can share
//! one strategy instance across its whole tool set.

mod batched;
mod cached;
mod direct;

pub use batched::{BatchedStrategy, FlushPolicy};
pub use cached::CachedStrategy;
pub use direct::DirectStrategy;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ToolError;
use crate::metadata::ToolMetadata;
use crate::tool::{Tool, ToolContext};

/// Policy governing how a tool invocation is actually carried out.
#[async_trait]
pub trait ExecutionStrategy: Send + Sync {
    async fn execute(
        &self,
        tool: Arc<dyn Tool>,
        args: Value,
        ctx: ToolContext,
        metadata: Arc<ToolMetadata>,
    ) -> Result<Value, ToolError>;
}
