//! Token acquisition for catalog requests
//!
//! Token refresh mechanics live outside this crate; the client only needs
//! a way to ask "what bearer token should this request carry". Deployments
//! with short-lived credentials implement [`TokenProvider`] themselves.

use async_trait::async_trait;

use crate::error::Result;

/// Supplies the bearer token for outbound catalog requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return the current token, or `None` for anonymous access.
    async fn token(&self) -> Result<Option<String>>;
}

/// Fixed-token provider for deployments with long-lived credentials.
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    /// Anonymous access (no Authorization header).
    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<Option<String>> {
        Ok(self.token.clone())
    }
}
