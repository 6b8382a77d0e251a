//! Built-in middlewares
//!
//! The cross-cutting policies every deployment wants: request logging,
//! scope enforcement, argument-shape validation, and a confirmation gate
//! for destructive tools. All of them read policy from the call's
//! [`ToolMetadata`](crate::metadata::ToolMetadata) so tools stay free of
//! boilerplate.

use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;

use crate::classify::ErrorKind;
use crate::error::ToolError;
use crate::middleware::{Middleware, Next};
use crate::tool::ToolContext;

/// Logs every invocation with its outcome and duration. Priority 10 so
/// it wraps everything else.
pub struct RequestLogging;

#[async_trait]
impl Middleware for RequestLogging {
    fn name(&self) -> &str {
        "request_logging"
    }

    fn priority(&self) -> i32 {
        10
    }

    async fn handle(
        &self,
        args: Value,
        ctx: ToolContext,
        next: Next<'_>,
    ) -> Result<Value, ToolError> {
        let tool = ctx.tool_name().to_string();
        let started = Instant::now();
        tracing::debug!(tool = %tool, "tool invocation started");

        let result = next.run(args, ctx).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => tracing::info!(tool = %tool, elapsed_ms, "tool invocation succeeded"),
            Err(error) => {
                tracing::warn!(tool = %tool, elapsed_ms, error = %error, "tool invocation failed")
            }
        }
        result
    }
}

/// Rejects calls whose transport extras lack the scopes the tool
/// declares in `required_scopes`.
pub struct ScopeGuard;

impl ScopeGuard {
    fn granted_scopes(ctx: &ToolContext) -> Vec<String> {
        ctx.extra("scopes")
            .and_then(Value::as_array)
            .map(|scopes| {
                scopes
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl Middleware for ScopeGuard {
    fn name(&self) -> &str {
        "scope_guard"
    }

    fn priority(&self) -> i32 {
        15
    }

    async fn handle(
        &self,
        args: Value,
        ctx: ToolContext,
        next: Next<'_>,
    ) -> Result<Value, ToolError> {
        let required = &ctx.metadata().required_scopes;
        if !required.is_empty() {
            let granted = Self::granted_scopes(&ctx);
            if let Some(missing) = required.iter().find(|scope| !granted.contains(scope)) {
                return Err(ToolError::tagged(
                    ErrorKind::Authorization,
                    format!("missing required scope '{missing}'"),
                ));
            }
        }
        next.run(args, ctx).await
    }
}

/// Checks the arguments against the schema's `required` list before the
/// tool runs, so tools can deserialize without re-stating the contract.
pub struct RequiredArgsValidation;

#[async_trait]
impl Middleware for RequiredArgsValidation {
    fn name(&self) -> &str {
        "required_args"
    }

    fn priority(&self) -> i32 {
        20
    }

    async fn handle(
        &self,
        args: Value,
        ctx: ToolContext,
        next: Next<'_>,
    ) -> Result<Value, ToolError> {
        let required: Vec<String> = ctx
            .metadata()
            .parameter_schema
            .as_ref()
            .and_then(|schema| schema.get("required"))
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if !required.is_empty() {
            let Some(provided) = args.as_object() else {
                return Err(ToolError::invalid_args(
                    "arguments must be an object".to_string(),
                ));
            };
            if let Some(missing) = required
                .iter()
                .find(|name| !provided.contains_key(name.as_str()))
            {
                return Err(ToolError::invalid_args(format!(
                    "missing required argument '{missing}'"
                )));
            }
        }
        next.run(args, ctx).await
    }
}

/// Blocks tools flagged `requires_confirmation` unless the call's extras
/// carry `confirmed: true`.
pub struct ConfirmationGate;

#[async_trait]
impl Middleware for ConfirmationGate {
    fn name(&self) -> &str {
        "confirmation_gate"
    }

    fn priority(&self) -> i32 {
        30
    }

    async fn handle(
        &self,
        args: Value,
        ctx: ToolContext,
        next: Next<'_>,
    ) -> Result<Value, ToolError> {
        if ctx.metadata().requires_confirmation {
            let confirmed = ctx
                .extra("confirmed")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if !confirmed {
                return Err(ToolError::invalid_args(format!(
                    "'{}' is destructive; pass confirmed=true in the call metadata to proceed",
                    ctx.tool_name()
                )));
            }
        }
        next.run(args, ctx).await
    }
}
