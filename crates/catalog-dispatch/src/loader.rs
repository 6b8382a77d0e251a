//! Tool loading pipeline
//!
//! Drives discovery through metadata resolution, validation,
//! registration, and manifest accumulation. Data-quality problems
//! (missing or invalid metadata) skip the candidate; a host binding
//! failure is a contract violation and aborts the pass.

use std::sync::Arc;

use crate::discovery::ToolDiscovery;
use crate::error::Result;
use crate::manifest::ManifestBuilder;
use crate::metadata::MetadataRegistry;
use crate::registrar::{Registrar, ToolHost};
use crate::validate::validate;

/// Outcome of a registration pass. The two counts legitimately differ
/// when candidates are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderReport {
    pub processed: usize,
    pub registered: usize,
}

/// Runs the registration pipeline over discovered candidates.
pub struct ToolLoader {
    registry: Arc<MetadataRegistry>,
    registrar: Registrar,
}

impl ToolLoader {
    pub fn new(registry: Arc<MetadataRegistry>, registrar: Registrar) -> Self {
        Self {
            registry,
            registrar,
        }
    }

    /// Process every candidate in enumeration order.
    pub fn load(
        &self,
        discovery: &dyn ToolDiscovery,
        host: &mut dyn ToolHost,
        manifest: &mut ManifestBuilder,
    ) -> Result<LoaderReport> {
        let candidates = discovery.discover();
        let mut report = LoaderReport {
            processed: 0,
            registered: 0,
        };

        for candidate in candidates {
            report.processed += 1;

            let Some(metadata) = self.registry.lookup(candidate.tool.as_ref()) else {
                tracing::warn!(
                    source = %candidate.label,
                    "no metadata registered for candidate; skipping"
                );
                continue;
            };

            if let Err(error) = validate(&metadata, &candidate.label) {
                tracing::warn!(
                    source = %candidate.label,
                    error = %error,
                    "skipping candidate with invalid metadata"
                );
                continue;
            }

            // Binding failures propagate: a host that refuses a validated
            // tool is misconfigured, and starting without it would hide
            // the defect.
            self.registrar
                .register(Arc::clone(&candidate.tool), Arc::clone(&metadata), host)?;
            manifest.record(&metadata);
            report.registered += 1;
        }

        tracing::info!(
            processed = report.processed,
            registered = report.registered,
            "tool loading complete"
        );
        Ok(report)
    }
}
