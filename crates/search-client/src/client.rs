//! HTTP client for the hosted search index
//!
//! One GET per collection query, single attempt, bounded by the configured
//! timeout. There is deliberately no retry and no circuit breaker here: a
//! failed collection degrades the merged result rather than failing the
//! search, so resilience beyond the timeout belongs to the caller.

use crate::config::SearchConfig;
use crate::error::{SearchError, SearchResult};
use crate::query::CollectionQuery;
use crate::wire::{
    CollectionInfo, HealthResponse, RawSearchResponse, SynonymSetBody, SynonymUpsertResponse,
};
use atlas_telemetry::metrics;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Credential header expected by the index
const API_KEY_HEADER: &str = "X-TYPESENSE-API-KEY";

/// Typed client over the index's HTTP API.
///
/// Cheap to clone; clones share the underlying connection pool and
/// configuration.
#[derive(Clone)]
pub struct IndexClient {
    inner: Client,
    config: Arc<SearchConfig>,
}

impl IndexClient {
    /// Create a client configured from the environment
    pub fn new() -> SearchResult<Self> {
        Self::with_config(SearchConfig::from_env()?)
    }

    /// Create a client with specific configuration
    pub fn with_config(config: SearchConfig) -> SearchResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static("atlas-search-client/0.5"),
        );
        if let Some(ref key) = config.api_key {
            if let Ok(value) = HeaderValue::from_str(key) {
                default_headers.insert(API_KEY_HEADER, value);
            }
        }

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Get the index base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.endpoint
    }

    /// Run one collection search.
    ///
    /// Fails with `RemoteUnavailable` on transport errors, timeouts, and
    /// non-success statuses, and with `MalformedResponse` when a success
    /// body does not parse.
    #[instrument(skip(self, query), fields(collection = %query.collection, request_id))]
    pub async fn search_collection(
        &self,
        query: &CollectionQuery,
    ) -> SearchResult<RawSearchResponse> {
        let url = format!(
            "{}/collections/{}/documents/search",
            self.base(),
            query.collection
        );
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let start = Instant::now();
        let result = async {
            let response = self
                .inner
                .get(&url)
                .query(&query.params())
                .header(X_REQUEST_ID, &request_id)
                .send()
                .await?;
            self.handle_response::<RawSearchResponse>(response).await
        }
        .await;
        let elapsed = start.elapsed();

        metrics().histogram(
            &format!("search.latency.{}", query.collection),
            elapsed.as_secs_f64() * 1000.0,
        );

        match &result {
            Ok(response) => {
                debug!(
                    hits = response.hits.len(),
                    found = response.found,
                    elapsed_ms = elapsed.as_millis(),
                    "Collection search succeeded"
                );
            }
            Err(e) => {
                metrics().increment("search.remote_failures");
                if e.is_malformed() {
                    warn!(error = %e, "Collection returned an unparseable body");
                } else {
                    warn!(error = %e, "Collection search failed");
                }
            }
        }

        result
    }

    /// Check index health
    #[instrument(skip(self))]
    pub async fn health(&self) -> SearchResult<bool> {
        let url = format!("{}/health", self.base());
        let response: HealthResponse = self.get(&url).await?;
        Ok(response.ok)
    }

    /// Fetch collection metadata (document count)
    #[instrument(skip(self))]
    pub async fn collection_stats(&self, collection: &str) -> SearchResult<CollectionInfo> {
        let url = format!("{}/collections/{collection}", self.base());
        self.get(&url).await
    }

    /// Upsert a synonym set on a collection, returning the server-side id
    #[instrument(skip(self, body), fields(synonyms = body.synonyms.len()))]
    pub async fn upsert_synonyms(
        &self,
        collection: &str,
        id: &str,
        body: &SynonymSetBody,
    ) -> SearchResult<String> {
        let url = format!("{}/collections/{collection}/synonyms/{id}", self.base());
        let request_id = Uuid::new_v4().to_string();

        let response = self
            .inner
            .put(&url)
            .json(body)
            .header(X_REQUEST_ID, &request_id)
            .send()
            .await?;
        let upserted: SynonymUpsertResponse = self.handle_response(response).await?;
        debug!(id = %upserted.id, "Synonym set upserted");
        Ok(upserted.id)
    }

    /// Delete a synonym set from a collection
    #[instrument(skip(self))]
    pub async fn delete_synonyms(&self, collection: &str, id: &str) -> SearchResult<()> {
        let url = format!("{}/collections/{collection}/synonyms/{id}", self.base());
        let request_id = Uuid::new_v4().to_string();

        let response = self
            .inner
            .delete(&url)
            .header(X_REQUEST_ID, &request_id)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(SearchError::remote(format!("status {status}: {message}")))
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> SearchResult<T> {
        let request_id = Uuid::new_v4().to_string();
        let response = self
            .inner
            .get(url)
            .header(X_REQUEST_ID, &request_id)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Handle HTTP response and deserialize.
    ///
    /// A success status with an unparseable body is its own failure class;
    /// it points at schema drift rather than an outage.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> SearchResult<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| SearchError::MalformedResponse(e.to_string()))
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(SearchError::remote(format!("status {status}: {message}")))
        }
    }

    fn base(&self) -> &str {
        self.config.endpoint.trim_end_matches('/')
    }
}
