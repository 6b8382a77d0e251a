//! Middleware pipeline
//!
//! Cross-cutting wrappers composed around tool execution in ascending
//! priority order (lower priority number = outer layer). Each middleware
//! receives a [`Next`] continuation and may short-circuit by not calling
//! it, rewrite the arguments before delegating, or post-process the
//! result afterwards.

mod builtin;

pub use builtin::{ConfirmationGate, RequestLogging, RequiredArgsValidation, ScopeGuard};

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::error::ToolError;
use crate::tool::ToolContext;

/// The innermost handler the chain bottoms out in — normally the
/// execution strategy wrapped around the tool itself.
pub type Terminal =
    dyn Fn(Value, ToolContext) -> BoxFuture<'static, Result<Value, ToolError>> + Send + Sync;

/// A cross-cutting wrapper around tool execution.
#[async_trait]
pub trait Middleware: Send + Sync {
    fn name(&self) -> &str;

    /// Lower runs earlier. Insertion order breaks ties.
    fn priority(&self) -> i32 {
        100
    }

    async fn handle(
        &self,
        args: Value,
        ctx: ToolContext,
        next: Next<'_>,
    ) -> Result<Value, ToolError>;
}

/// The remainder of the chain, handed to each middleware.
pub struct Next<'a> {
    chain: &'a [Arc<dyn Middleware>],
    terminal: &'a Terminal,
}

impl<'a> Next<'a> {
    /// Run the rest of the chain. Consumes the continuation; a middleware
    /// that never calls this short-circuits the pipeline.
    pub async fn run(self, args: Value, ctx: ToolContext) -> Result<Value, ToolError> {
        match self.chain.split_first() {
            Some((head, rest)) => {
                let next = Next {
                    chain: rest,
                    terminal: self.terminal,
                };
                head.handle(args, ctx, next).await
            }
            None => (self.terminal)(args, ctx).await,
        }
    }
}

/// Ordered middleware chain.
#[derive(Default)]
pub struct MiddlewarePipeline {
    chain: Vec<Arc<dyn Middleware>>,
}

impl MiddlewarePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware and re-sort ascending by priority. The sort is
    /// stable, so equal priorities keep their insertion order.
    pub fn add(&mut self, middleware: Arc<dyn Middleware>) {
        self.chain.push(middleware);
        self.chain.sort_by_key(|m| m.priority());
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Thread a call through the chain and into `terminal`.
    pub async fn execute(
        &self,
        args: Value,
        ctx: ToolContext,
        terminal: &Terminal,
    ) -> Result<Value, ToolError> {
        let next = Next {
            chain: &self.chain,
            terminal,
        };
        next.run(args, ctx).await
    }
}
