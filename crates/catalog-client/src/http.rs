//! HTTP implementation of the catalog client
//!
//! Wraps `reqwest` with bearer-token auth and bounded retry on transient
//! transport failures. Server-side 5xx responses are retried within the
//! same budget; 4xx responses are mapped to typed errors immediately.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use crate::auth::TokenProvider;
use crate::client::CatalogClient;
use crate::error::{Error, Result};
use crate::types::{Entity, EntityQuery, EntityRef, Location, ValidationOutcome};

/// Default budget for retrying a single request.
const DEFAULT_RETRY_BUDGET: Duration = Duration::from_secs(10);

/// Catalog client over HTTP.
pub struct HttpCatalogClient {
    base: Url,
    http: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    retry_budget: Duration,
}

impl HttpCatalogClient {
    /// Create a client rooted at `base` (e.g. `https://host/api/catalog`).
    pub fn new(base: Url, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        Ok(Self {
            base: normalize_base(base),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()?,
            tokens,
            retry_budget: DEFAULT_RETRY_BUDGET,
        })
    }

    /// Override the retry budget (builder pattern).
    pub fn with_retry_budget(mut self, budget: Duration) -> Self {
        self.retry_budget = budget;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    /// Send a request, retrying transient failures within the budget.
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        context: &str,
    ) -> Result<reqwest::Response> {
        let token = self.tokens.token().await?;
        let policy = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(self.retry_budget))
            .build();

        backoff::future::retry(policy, || async {
            tracing::debug!(%url, method = %method, "catalog request");
            let mut request = self.http.request(method.clone(), url.clone());
            if let Some(token) = &token {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }
            let response = request.send().await.map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    backoff::Error::transient(Error::Network(e))
                } else {
                    backoff::Error::permanent(Error::Network(e))
                }
            })?;

            let status = response.status().as_u16();
            if (500..=599).contains(&status) {
                let body = response.text().await.unwrap_or_default();
                return Err(backoff::Error::transient(Error::from_status(
                    status, context, body,
                )));
            }
            Ok(response)
        })
        .await
    }

    /// Map any remaining non-success status to a typed error.
    async fn check(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(Error::from_status(code, context, body))
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn get_entities(&self, query: EntityQuery) -> Result<Vec<Entity>> {
        let mut url = self.endpoint("entities")?;
        for (key, value) in query.to_pairs() {
            url.query_pairs_mut().append_pair(key, &value);
        }
        let response = self.send(Method::GET, url, None, "GET /entities").await?;
        let response = Self::check(response, "GET /entities").await?;
        Ok(response.json().await?)
    }

    async fn get_entity_by_ref(&self, entity_ref: &EntityRef) -> Result<Entity> {
        let path = format!(
            "entities/by-name/{}/{}/{}",
            entity_ref.kind, entity_ref.namespace, entity_ref.name
        );
        let context = entity_ref.to_string();
        let url = self.endpoint(&path)?;
        let response = self.send(Method::GET, url, None, &context).await?;
        let response = Self::check(response, &context).await?;
        Ok(response.json().await?)
    }

    async fn remove_entity_by_uid(&self, uid: &str) -> Result<()> {
        let context = format!("entity uid {uid}");
        let url = self.endpoint(&format!("entities/by-uid/{uid}"))?;
        let response = self.send(Method::DELETE, url, None, &context).await?;
        Self::check(response, &context).await?;
        Ok(())
    }

    async fn validate_entity(&self, body: Value, location_ref: &str) -> Result<ValidationOutcome> {
        let url = self.endpoint("validate-entity")?;
        let payload = json!({ "entity": body, "location": location_ref });
        let context = format!("validate against {location_ref}");
        let response = self
            .send(Method::POST, url, Some(&payload), &context)
            .await?;

        // A 400 here is the validation verdict, not a transport failure.
        if response.status().as_u16() == 400 {
            #[derive(Deserialize)]
            struct Verdict {
                #[serde(default)]
                errors: Vec<String>,
            }
            let verdict: Verdict = response.json().await?;
            return Ok(ValidationOutcome {
                valid: false,
                errors: verdict.errors,
            });
        }
        Self::check(response, &context).await?;
        Ok(ValidationOutcome {
            valid: true,
            errors: vec![],
        })
    }

    async fn add_location(&self, location_type: &str, target: &str) -> Result<Location> {
        let url = self.endpoint("locations")?;
        let payload = json!({ "type": location_type, "target": target });
        let context = format!("add location {target}");
        let response = self
            .send(Method::POST, url, Some(&payload), &context)
            .await?;
        let response = Self::check(response, &context).await?;

        #[derive(Deserialize)]
        struct Created {
            location: Location,
        }
        let created: Created = response.json().await?;
        Ok(created.location)
    }

    async fn get_locations(&self) -> Result<Vec<Location>> {
        let url = self.endpoint("locations")?;
        let response = self.send(Method::GET, url, None, "GET /locations").await?;
        let response = Self::check(response, "GET /locations").await?;
        Ok(response.json().await?)
    }
}

/// Ensure the base URL ends with a slash so `Url::join` appends rather
/// than replaces the final path segment.
fn normalize_base(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}
