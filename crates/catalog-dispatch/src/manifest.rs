//! Tool manifest
//!
//! An introspectable summary of everything the loader registered,
//! exportable as pretty-printed JSON for tooling and documentation.
//! Export failures are the host's problem to log; nothing here panics
//! or aborts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metadata::ToolMetadata;

/// Summary of one registered tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub description: String,
    /// Ordered top-level parameter names; empty when the schema is
    /// absent or not introspectable
    pub params: Vec<String>,
}

/// Accumulates manifest entries during a registration pass.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    entries: Vec<ManifestEntry>,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive and append the entry for a validated tool.
    pub fn record(&mut self, metadata: &ToolMetadata) {
        self.entries.push(ManifestEntry {
            name: metadata.name.clone(),
            description: metadata.description.clone(),
            params: metadata.parameter_names(),
        });
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the manifest as pretty-printed JSON.
    pub fn export(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), tools = self.entries.len(), "manifest exported");
        Ok(())
    }
}
