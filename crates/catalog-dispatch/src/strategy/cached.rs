//! Time-boxed result caching
//!
//! Results of tools that declare `cacheable` are held for a TTL and
//! returned without re-invoking the tool. The cache is scoped to the
//! strategy instance: one instance shared across tools means one shared
//! cache, separate instances mean separate caches. Entries expire on
//! read; capacity pressure evicts the stalest entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::ToolError;
use crate::metadata::ToolMetadata;
use crate::strategy::ExecutionStrategy;
use crate::tool::{Tool, ToolContext};

struct CacheEntry {
    result: Value,
    stored_at: Instant,
}

/// Caching execution strategy.
pub struct CachedStrategy {
    ttl: Duration,
    capacity: usize,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl CachedStrategy {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            capacity: Self::DEFAULT_CAPACITY,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Bound the number of live entries (builder pattern).
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Cache key: tool name plus a digest of the serialized arguments.
    fn cache_key(name: &str, args: &Value) -> Result<String, ToolError> {
        let serialized = serde_json::to_string(args)
            .map_err(|e| ToolError::message(format!("arguments are not serializable: {e}")))?;
        let mut hasher = Sha256::new();
        hasher.update(serialized.as_bytes());
        Ok(format!("{}:{:x}", name, hasher.finalize()))
    }

    /// Live cached result, if any. Expired entries are dropped here.
    fn lookup(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.result.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn store(&self, key: String, result: &Value) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            let stalest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(k, _)| k.clone());
            if let Some(stalest) = stalest {
                entries.remove(&stalest);
            }
        }
        entries.insert(
            key,
            CacheEntry {
                result: result.clone(),
                stored_at: Instant::now(),
            },
        );
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Default for CachedStrategy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

#[async_trait]
impl ExecutionStrategy for CachedStrategy {
    async fn execute(
        &self,
        tool: Arc<dyn Tool>,
        args: Value,
        ctx: ToolContext,
        metadata: Arc<ToolMetadata>,
    ) -> Result<Value, ToolError> {
        if !metadata.cacheable {
            return tool.execute(args, &ctx).await;
        }

        let key = Self::cache_key(&metadata.name, &args)?;
        if let Some(result) = self.lookup(&key) {
            tracing::debug!(tool = %metadata.name, "cache hit");
            return Ok(result);
        }

        let result = tool.execute(args, &ctx).await?;
        self.store(key, &result);
        Ok(result)
    }
}
