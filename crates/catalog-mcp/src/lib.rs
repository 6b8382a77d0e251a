//! MCP server for the software catalog
//!
//! This crate exposes catalog operations (entity queries, location
//! management, validation) as tools over the Model Context Protocol, so
//! language-model agents can work with the catalog through a uniform
//! request/response surface.
//!
//! # Architecture
//!
//! ```text
//! [ MCP Client (agent) ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ catalog-mcp (this crate) ]
//!        | DispatchTable (host surface)
//!        v
//! [ catalog-dispatch (registration, middleware, strategies, errors) ]
//!        |
//!        v
//! [ catalog-client (HTTP) ] ----> software catalog API
//! ```
//!
//! Tool implementations live in [`tools`]; everything cross-cutting —
//! discovery, validation, caching, batching, confirmation, error
//! shaping — is the dispatch framework's job.

pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use protocol::{ToolContent, ToolResult};
pub use server::{CatalogMcpServer, DispatchTable};
