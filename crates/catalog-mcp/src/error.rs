//! Error types for the MCP server

use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during MCP server operations
#[derive(Debug, Error)]
pub enum Error {
    /// Error from the dispatch framework during startup
    #[error("dispatch error: {0}")]
    Dispatch(#[from] catalog_dispatch::Error),

    /// Error from the catalog client during startup
    #[error("catalog client error: {0}")]
    Client(#[from] catalog_client::Error),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Invalid or incomplete configuration
    #[error("configuration error: {0}")]
    Config(String),
}
