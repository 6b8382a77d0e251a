//! Error classification and response formatting
//!
//! Every tool failure leaves the dispatch boundary as a uniform,
//! taxonomy-tagged [`ErrorResponse`]. Classification prefers explicit
//! tags (typed client errors, [`ToolError::Tagged`]) and falls back to
//! ordered keyword matching over the message for foreign errors. The
//! keyword heuristic is best-effort by design.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::ToolError;

/// Flat failure taxonomy for tool execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Validation,
    Authentication,
    Authorization,
    NotFound,
    Conflict,
    RateLimit,
    Network,
    CatalogApi,
    Internal,
    Unknown,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Authentication => "AUTHENTICATION",
            ErrorKind::Authorization => "AUTHORIZATION",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::RateLimit => "RATE_LIMIT",
            ErrorKind::Network => "NETWORK",
            ErrorKind::CatalogApi => "CATALOG_API",
            ErrorKind::Internal => "INTERNAL",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }

    /// HTTP-like status line for the category.
    pub fn status(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "400 Bad Request",
            ErrorKind::Authentication => "401 Unauthorized",
            ErrorKind::Authorization => "403 Forbidden",
            ErrorKind::NotFound => "404 Not Found",
            ErrorKind::Conflict => "409 Conflict",
            ErrorKind::RateLimit => "429 Too Many Requests",
            ErrorKind::Network => "503 Service Unavailable",
            ErrorKind::CatalogApi => "502 Bad Gateway",
            ErrorKind::Internal | ErrorKind::Unknown => "500 Internal Server Error",
        }
    }

    /// Human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "Validation Failed",
            ErrorKind::Authentication => "Authentication Required",
            ErrorKind::Authorization => "Permission Denied",
            ErrorKind::NotFound => "Resource Not Found",
            ErrorKind::Conflict => "Conflicting State",
            ErrorKind::RateLimit => "Rate Limit Exceeded",
            ErrorKind::Network => "Network Failure",
            ErrorKind::CatalogApi => "Catalog API Failure",
            ErrorKind::Internal => "Internal Error",
            ErrorKind::Unknown => "Unknown Error",
        }
    }

    /// Whether the category is expected and recoverable, as opposed to a
    /// configuration or internal defect.
    pub fn is_operational(&self) -> bool {
        !matches!(self, ErrorKind::Internal | ErrorKind::Unknown)
    }
}

/// Classify a tool failure into the taxonomy.
pub fn classify(error: &ToolError) -> ErrorKind {
    match error {
        ToolError::Tagged { kind, .. } => *kind,
        ToolError::Catalog(client_error) => classify_client(client_error),
        ToolError::Message(message) => classify_message(message),
        ToolError::Unknown => ErrorKind::Unknown,
    }
}

fn classify_client(error: &catalog_client::Error) -> ErrorKind {
    use catalog_client::Error as Client;
    match error {
        Client::Unauthorized | Client::Token(_) => ErrorKind::Authentication,
        Client::Forbidden(_) => ErrorKind::Authorization,
        Client::NotFound(_) => ErrorKind::NotFound,
        Client::Conflict(_) => ErrorKind::Conflict,
        Client::RateLimited => ErrorKind::RateLimit,
        Client::Network(_) => ErrorKind::Network,
        Client::Api { .. } => ErrorKind::CatalogApi,
        Client::InvalidRef(_) => ErrorKind::Validation,
        Client::Url(_) | Client::Json(_) => ErrorKind::Internal,
    }
}

/// Keyword groups checked in order against the lower-cased message.
const KEYWORD_GROUPS: &[(&[&str], ErrorKind)] = &[
    (&["validation", "invalid"], ErrorKind::Validation),
    (&["unauthorized", "authentication"], ErrorKind::Authentication),
    (&["forbidden", "permission"], ErrorKind::Authorization),
    (&["not found", "404"], ErrorKind::NotFound),
    (&["conflict", "already exists"], ErrorKind::Conflict),
    (&["rate limit", "429"], ErrorKind::RateLimit),
    (&["network", "timeout", "connection"], ErrorKind::Network),
    (&["catalog", "api"], ErrorKind::CatalogApi),
];

/// Best-effort classification of an unstructured message.
pub fn classify_message(message: &str) -> ErrorKind {
    let lowered = message.to_lowercase();
    for (keywords, kind) in KEYWORD_GROUPS {
        if keywords.iter().any(|k| lowered.contains(k)) {
            return *kind;
        }
    }
    ErrorKind::Internal
}

/// Structured error payload returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub metadata: ErrorMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: String,
    pub status: String,
    pub title: String,
    pub operational: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMetadata {
    pub tool: String,
    pub operation: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

/// Build the standard error response for a classified failure.
///
/// `details` is redacted before it is attached; sensitive keys never
/// reach the caller.
pub fn format_error(
    error: &ToolError,
    kind: ErrorKind,
    tool: &str,
    operation: &str,
    details: Option<Map<String, Value>>,
) -> ErrorResponse {
    let details = details.map(|map| {
        let mut value = Value::Object(map);
        redact(&mut value);
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    });

    ErrorResponse {
        error: ErrorBody {
            message: error.to_string(),
            code: kind.code().to_string(),
            status: kind.status().to_string(),
            title: kind.title().to_string(),
            operational: kind.is_operational(),
        },
        metadata: ErrorMetadata {
            tool: tool.to_string(),
            operation: operation.to_string(),
            timestamp: Utc::now(),
            details,
        },
    }
}

/// Simplified, non-taxonomy response for backward-compatible callers.
pub fn simple_error(error: &ToolError, tool: &str) -> Value {
    json!({
        "error": error.to_string(),
        "tool": tool,
        "timestamp": Utc::now(),
    })
}

const SENSITIVE_KEYS: &[&str] = &["password", "token", "secret", "key"];

/// Recursively mask values under sensitive keys.
pub fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, entry) in map.iter_mut() {
                let lowered = key.to_lowercase();
                if SENSITIVE_KEYS.iter().any(|s| lowered.contains(s)) {
                    *entry = Value::String("[REDACTED]".to_string());
                } else {
                    redact(entry);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                redact(item);
            }
        }
        _ => {}
    }
}
