//! Tool discovery
//!
//! Discovery is an injectable strategy: the loader only sees the
//! [`ToolDiscovery`] trait, so deployments pick their enumeration mode
//! without touching the registration pipeline. The canonical mode is
//! static enumeration of already-constructed tool values; a
//! config-driven filter wrapper handles per-deployment tool selection.

use std::collections::HashSet;
use std::sync::Arc;

use crate::metadata::MetadataRegistry;
use crate::tool::Tool;

/// A discovered tool implementation, not yet validated or registered.
#[derive(Clone)]
pub struct Candidate {
    /// Identifies the candidate in logs even when its metadata is
    /// missing or unusable
    pub label: String,
    pub tool: Arc<dyn Tool>,
}

impl Candidate {
    pub fn new(label: impl Into<String>, tool: Arc<dyn Tool>) -> Self {
        Self {
            label: label.into(),
            tool,
        }
    }

    /// Candidate labeled by its implementation type.
    pub fn of<T: Tool>(tool: T) -> Self {
        Self {
            label: std::any::type_name::<T>().to_string(),
            tool: Arc::new(tool),
        }
    }
}

/// Enumerates candidate tool implementations.
pub trait ToolDiscovery: Send + Sync {
    fn discover(&self) -> Vec<Candidate>;
}

/// Static enumeration of a fixed candidate list.
pub struct StaticDiscovery {
    candidates: Vec<Candidate>,
}

impl StaticDiscovery {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }
}

impl ToolDiscovery for StaticDiscovery {
    fn discover(&self) -> Vec<Candidate> {
        self.candidates.clone()
    }
}

/// Drops candidates whose declared tool name is disabled by deployment
/// configuration. Candidates without metadata pass through — the loader
/// owns that skip and its logging.
pub struct FilteredDiscovery<D> {
    inner: D,
    registry: Arc<MetadataRegistry>,
    disabled: HashSet<String>,
}

impl<D: ToolDiscovery> FilteredDiscovery<D> {
    pub fn new(
        inner: D,
        registry: Arc<MetadataRegistry>,
        disabled: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            inner,
            registry,
            disabled: disabled.into_iter().map(Into::into).collect(),
        }
    }
}

impl<D: ToolDiscovery> ToolDiscovery for FilteredDiscovery<D> {
    fn discover(&self) -> Vec<Candidate> {
        self.inner
            .discover()
            .into_iter()
            .filter(|candidate| {
                match self.registry.lookup(candidate.tool.as_ref()) {
                    Some(metadata) if self.disabled.contains(&metadata.name) => {
                        tracing::info!(tool = %metadata.name, "tool disabled by configuration");
                        false
                    }
                    _ => true,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use crate::metadata::ToolMetadata;
    use crate::tool::ToolContext;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct Alpha;
    struct Beta;

    #[async_trait]
    impl Tool for Alpha {
        async fn execute(&self, _args: Value, _ctx: &ToolContext) -> Result<Value, ToolError> {
            Ok(json!("alpha"))
        }
    }

    #[async_trait]
    impl Tool for Beta {
        async fn execute(&self, _args: Value, _ctx: &ToolContext) -> Result<Value, ToolError> {
            Ok(json!("beta"))
        }
    }

    #[test]
    fn test_candidate_of_labels_by_type() {
        let candidate = Candidate::of(Alpha);
        assert!(candidate.label.contains("Alpha"));
    }

    #[test]
    fn test_static_discovery_preserves_order() {
        let discovery = StaticDiscovery::new(vec![Candidate::of(Alpha), Candidate::of(Beta)]);
        let found = discovery.discover();
        assert_eq!(found.len(), 2);
        assert!(found[0].label.contains("Alpha"));
        assert!(found[1].label.contains("Beta"));
    }

    #[test]
    fn test_filtered_discovery_drops_disabled_names() {
        let mut registry = MetadataRegistry::new();
        registry.register::<Alpha>(ToolMetadata::new("alpha_tool", "d"));
        registry.register::<Beta>(ToolMetadata::new("beta_tool", "d"));

        let discovery = FilteredDiscovery::new(
            StaticDiscovery::new(vec![Candidate::of(Alpha), Candidate::of(Beta)]),
            Arc::new(registry),
            ["beta_tool"],
        );

        let found = discovery.discover();
        assert_eq!(found.len(), 1);
        assert!(found[0].label.contains("Alpha"));
    }

    #[test]
    fn test_filtered_discovery_passes_unknown_candidates() {
        // No metadata registered: the loader decides what to do with it.
        let discovery = FilteredDiscovery::new(
            StaticDiscovery::new(vec![Candidate::of(Alpha)]),
            Arc::new(MetadataRegistry::new()),
            ["alpha_tool"],
        );
        assert_eq!(discovery.discover().len(), 1);
    }
}
