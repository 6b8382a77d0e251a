//! Error types for the catalog client

use thiserror::Error;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by catalog API calls.
///
/// HTTP statuses are mapped to dedicated variants so callers (notably the
/// dispatch error classifier) can branch on the failure category without
/// parsing messages.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog rejected the supplied credentials (401)
    #[error("authentication failed: catalog rejected the supplied credentials")]
    Unauthorized,

    /// The token lacks permission for the operation (403)
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The requested entity or location does not exist (404)
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation conflicts with existing catalog state (409)
    #[error("conflict: {0}")]
    Conflict(String),

    /// The catalog throttled the request (429)
    #[error("rate limit exceeded for the catalog API")]
    RateLimited,

    /// Any other non-success response from the catalog API
    #[error("catalog API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (DNS, connect, timeout, TLS)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Malformed entity reference string
    #[error("invalid entity ref: {0}")]
    InvalidRef(String),

    /// Malformed base URL or path join failure
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Token acquisition failure
    #[error("token error: {0}")]
    Token(String),
}

impl Error {
    /// Map a non-success HTTP status and response body to an error variant.
    pub(crate) fn from_status(status: u16, context: &str, body: String) -> Self {
        match status {
            401 => Error::Unauthorized,
            403 => Error::Forbidden(if body.is_empty() {
                context.to_string()
            } else {
                body
            }),
            404 => Error::NotFound(context.to_string()),
            409 => Error::Conflict(if body.is_empty() {
                context.to_string()
            } else {
                body
            }),
            429 => Error::RateLimited,
            _ => Error::Api {
                status,
                message: if body.is_empty() {
                    context.to_string()
                } else {
                    body
                },
            },
        }
    }
}
