//! Invocation coalescing
//!
//! Concurrent calls to the same tool within a flush window are gathered
//! into one batch and executed together. This is coalescing by time
//! window, not payload merging: the tool still runs once per queued
//! call, and every caller gets its own outcome — one entry's failure
//! never affects its siblings.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::classify::ErrorKind;
use crate::error::ToolError;
use crate::metadata::ToolMetadata;
use crate::strategy::ExecutionStrategy;
use crate::tool::{Tool, ToolContext};

/// When a scheduled flush fires, relative to the first enqueued call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushPolicy {
    /// Flush as soon as the flush task runs
    Immediate,
    /// Yield once so same-tick callers can join the batch
    NextTick,
    /// Hold the queue open for a fixed window
    Delay(Duration),
}

impl Default for FlushPolicy {
    fn default() -> Self {
        FlushPolicy::NextTick
    }
}

struct BatchEntry {
    args: Value,
    ctx: ToolContext,
    reply: oneshot::Sender<Result<Value, ToolError>>,
}

struct BatchQueue {
    generation: u64,
    entries: Vec<BatchEntry>,
}

/// Coalescing execution strategy.
///
/// Queues are keyed by tool name. The first call for a key schedules a
/// flush per the policy; a queue that reaches `max_batch_size` before
/// the flush fires is flushed inline instead. Each queue carries a
/// generation stamp so a scheduled flush only detaches the queue it was
/// scheduled for, never a successor started after an inline flush.
pub struct BatchedStrategy {
    policy: FlushPolicy,
    queues: Arc<Mutex<HashMap<String, BatchQueue>>>,
    generations: AtomicU64,
}

impl BatchedStrategy {
    pub fn new(policy: FlushPolicy) -> Self {
        Self {
            policy,
            queues: Arc::new(Mutex::new(HashMap::new())),
            generations: AtomicU64::new(0),
        }
    }

    fn effective_batch_size(metadata: &ToolMetadata) -> Option<usize> {
        metadata
            .max_batch_size
            .filter(|size| *size > 1)
            .map(|size| size as usize)
    }

    /// Execute every queued entry concurrently, resolving each caller
    /// individually.
    async fn flush(tool: Arc<dyn Tool>, entries: Vec<BatchEntry>, name: &str) {
        tracing::debug!(tool = name, count = entries.len(), "flushing batch");
        let calls = entries.into_iter().map(|entry| {
            let tool = Arc::clone(&tool);
            async move {
                let result = tool.execute(entry.args, &entry.ctx).await;
                // The caller may have been dropped; nothing to do then.
                let _ = entry.reply.send(result);
            }
        });
        futures::future::join_all(calls).await;
    }
}

impl Default for BatchedStrategy {
    fn default() -> Self {
        Self::new(FlushPolicy::default())
    }
}

#[async_trait]
impl ExecutionStrategy for BatchedStrategy {
    async fn execute(
        &self,
        tool: Arc<dyn Tool>,
        args: Value,
        ctx: ToolContext,
        metadata: Arc<ToolMetadata>,
    ) -> Result<Value, ToolError> {
        let Some(max) = Self::effective_batch_size(&metadata) else {
            return tool.execute(args, &ctx).await;
        };

        let (reply, receiver) = oneshot::channel();
        let entry = BatchEntry { args, ctx, reply };

        let mut scheduled_generation = None;
        let full_batch = {
            let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
            let queue = queues
                .entry(metadata.name.clone())
                .or_insert_with(|| BatchQueue {
                    generation: self.generations.fetch_add(1, Ordering::Relaxed),
                    entries: Vec::new(),
                });
            queue.entries.push(entry);

            if queue.entries.len() >= max {
                queues.remove(&metadata.name).map(|queue| queue.entries)
            } else {
                if queue.entries.len() == 1 {
                    scheduled_generation = Some(queue.generation);
                }
                None
            }
        };

        if let Some(entries) = full_batch {
            // The queue filled synchronously; flush now instead of waiting.
            Self::flush(Arc::clone(&tool), entries, &metadata.name).await;
        } else if let Some(generation) = scheduled_generation {
            let queues = Arc::clone(&self.queues);
            let tool = Arc::clone(&tool);
            let name = metadata.name.clone();
            let policy = self.policy;
            tokio::spawn(async move {
                match policy {
                    FlushPolicy::Immediate => {}
                    FlushPolicy::NextTick => tokio::task::yield_now().await,
                    FlushPolicy::Delay(window) => tokio::time::sleep(window).await,
                }
                let entries = {
                    let mut queues = queues.lock().unwrap_or_else(|e| e.into_inner());
                    match queues.get(&name) {
                        Some(queue) if queue.generation == generation => {
                            queues.remove(&name).map(|queue| queue.entries)
                        }
                        _ => None,
                    }
                };
                if let Some(entries) = entries {
                    Self::flush(tool, entries, &name).await;
                }
            });
        }

        match receiver.await {
            Ok(result) => result,
            Err(_) => Err(ToolError::tagged(
                ErrorKind::Internal,
                "batch flush dropped before completion",
            )),
        }
    }
}
