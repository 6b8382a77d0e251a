//! Tool metadata and the identity-keyed registry
//!
//! Metadata is attached to a tool implementation *type*, not a name: the
//! registry maps `TypeId` to [`ToolMetadata`], so two distinct
//! implementations may legally declare the same name and only collide at
//! registration time. Registration is an explicit startup call; there is
//! no reflection.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tool::Tool;

/// Tool category for grouping and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCategory {
    /// Entity read/query operations
    Entities,
    /// Location registration and listing
    Locations,
    /// Destructive or administrative operations
    Maintenance,
}

/// Declarative description of a tool.
///
/// Created once at definition time and immutable after registration
/// (stored behind `Arc`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
    /// JSON-Schema-shaped parameter descriptor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ToolCategory>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub cacheable: bool,
    #[serde(default)]
    pub requires_confirmation: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_scopes: Vec<String>,
    /// Invocation coalescing window size; must be > 0 when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_batch_size: Option<u32>,
}

impl ToolMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameter_schema: None,
            category: None,
            tags: Vec::new(),
            version: None,
            deprecated: false,
            cacheable: false,
            requires_confirmation: false,
            required_scopes: Vec::new(),
            max_batch_size: None,
        }
    }

    /// Set the parameter schema (builder pattern).
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.parameter_schema = Some(schema);
        self
    }

    pub fn with_category(mut self, category: ToolCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn cacheable(mut self) -> Self {
        self.cacheable = true;
        self
    }

    pub fn requires_confirmation(mut self) -> Self {
        self.requires_confirmation = true;
        self
    }

    pub fn with_required_scopes(
        mut self,
        scopes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.required_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_batch_size(mut self, size: u32) -> Self {
        self.max_batch_size = Some(size);
        self
    }

    /// Ordered top-level parameter names, or empty when the schema is
    /// absent or not structurally introspectable.
    pub fn parameter_names(&self) -> Vec<String> {
        self.parameter_schema
            .as_ref()
            .and_then(|schema| schema.get("properties"))
            .and_then(Value::as_object)
            .map(|properties| properties.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// Registry associating tool implementations with their metadata.
///
/// Absent metadata means "not a tool" — a benign state the loader treats
/// as a skip, never an error.
#[derive(Default)]
pub struct MetadataRegistry {
    entries: HashMap<TypeId, Arc<ToolMetadata>>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach metadata to the implementation type. This is the only way
    /// metadata reaches the registry.
    pub fn register<T: Tool>(&mut self, metadata: ToolMetadata) {
        self.register_id(TypeId::of::<T>(), metadata);
    }

    /// Attach metadata under an explicit identity handle.
    pub fn register_id(&mut self, id: TypeId, metadata: ToolMetadata) {
        self.entries.insert(id, Arc::new(metadata));
    }

    /// Resolve metadata by implementation identity.
    pub fn lookup_id(&self, id: TypeId) -> Option<Arc<ToolMetadata>> {
        self.entries.get(&id).cloned()
    }

    /// Resolve metadata for an instance; the instance's own identity is
    /// recovered through the `Any` supertrait.
    pub fn lookup(&self, tool: &dyn Tool) -> Option<Arc<ToolMetadata>> {
        self.lookup_id((tool as &dyn Any).type_id())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
