//! HTTP client for the software catalog API
//!
//! This crate provides the outbound side of the catalog MCP server: a
//! typed, async client for entity and location operations. The dispatch
//! framework treats the client as an opaque injected dependency behind
//! the [`CatalogClient`] trait, so tests and alternative transports can
//! substitute their own implementation.
//!
//! # Example
//!
//! ```ignore
//! use catalog_client::{HttpCatalogClient, StaticTokenProvider};
//! use std::sync::Arc;
//!
//! let client = HttpCatalogClient::new(
//!     "https://catalog.example.com/api/catalog".parse()?,
//!     Arc::new(StaticTokenProvider::new(Some("token".into()))),
//! )?;
//! let entities = client.get_entities(Default::default()).await?;
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use auth::{StaticTokenProvider, TokenProvider};
pub use client::CatalogClient;
pub use error::{Error, Result};
pub use http::HttpCatalogClient;
pub use types::{Entity, EntityMeta, EntityQuery, EntityRef, Location, ValidationOutcome};
