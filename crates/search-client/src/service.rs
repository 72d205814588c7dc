//! Unified search across the places, events, and articles collections
//!
//! [`SearchService`] is the one context object an app holds: it owns the
//! index client, the query cache, and the analytics sink. Collection queries
//! fan out concurrently and fan back in once all have settled; a failed
//! collection contributes zero results and is reported in
//! [`SearchResponse::failed_collections`] instead of failing the search.

use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};

use crate::aggregate;
use crate::analytics::{AnalyticsRecord, AnalyticsSink, SOURCE_SEARCH, SOURCE_SUGGEST};
use crate::cache::{CacheStats, QueryCache};
use crate::client::IndexClient;
use crate::config::SearchConfig;
use crate::error::SearchResult;
use crate::normalize::{normalize_response, UnifiedResult};
use crate::prefetch::PrefetchedPlaces;
use crate::query::CollectionQuery;
use crate::request::{ContentType, GeoOrigin, SearchFilters, SearchRequest};
use crate::wire::CollectionInfo;
use atlas_geo::{BoundingBox, Coordinate};
use atlas_telemetry::metrics;
use chrono::{Duration as TimeDelta, Utc};

/// Queries shorter than this return empty suggestions without a remote call
pub const MIN_SUGGEST_CHARS: usize = 2;

/// Outcome of a unified search
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    /// Merged ranked results across all requested collections
    pub results: Vec<UnifiedResult>,
    /// Each collection's own ranked results, empty for failed collections
    pub results_by_type: BTreeMap<ContentType, Vec<UnifiedResult>>,
    /// Merged result count before truncation to the requested limit
    pub total_found: usize,
    /// End-to-end latency of this call
    pub elapsed_ms: u64,
    /// Collections whose remote call failed; empty means a full response
    pub failed_collections: Vec<ContentType>,
    /// Whether this response was served from the cache
    pub cache_hit: bool,
}

impl SearchResponse {
    /// Whether any requested collection failed
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.failed_collections.is_empty()
    }
}

/// The unified search entry point.
///
/// Build once and share; wrap in an [`Arc`] for use across tasks.
pub struct SearchService {
    client: IndexClient,
    cache: QueryCache<SearchResponse>,
    sink: AnalyticsSink,
}

impl SearchService {
    /// Create a service configured from the environment
    pub fn from_env() -> SearchResult<Self> {
        Self::new(SearchConfig::from_env()?)
    }

    /// Create a service with specific configuration
    pub fn new(config: SearchConfig) -> SearchResult<Self> {
        let client = IndexClient::with_config(config)?;
        let config = client.config();
        let cache = QueryCache::new(config.cache_ttl, config.cache_capacity);
        let sink = AnalyticsSink::new(config.analytics_url.clone())?;
        Ok(Self {
            client,
            cache,
            sink,
        })
    }

    /// Create a service wrapped in an [`Arc`], ready to share
    pub fn shared(config: SearchConfig) -> SearchResult<Arc<Self>> {
        Ok(Arc::new(Self::new(config)?))
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        self.client.config()
    }

    /// The underlying index client
    #[must_use]
    pub fn client(&self) -> &IndexClient {
        &self.client
    }

    /// Unified search across the requested collections.
    ///
    /// Fails only on an invalid request or unusable configuration; remote
    /// failures degrade the response instead. Full responses are cached;
    /// degraded ones are not, so a recovered collection reappears on the
    /// next call rather than after a TTL.
    pub async fn search(&self, request: SearchRequest) -> SearchResult<SearchResponse> {
        self.search_tagged(request, SOURCE_SEARCH).await
    }

    /// Autocomplete suggestions across all collections.
    ///
    /// Prefix-matching search capped at `limit`; queries shorter than
    /// [`MIN_SUGGEST_CHARS`] return empty without touching the index.
    pub async fn suggest(&self, query: &str, limit: usize) -> SearchResult<Vec<UnifiedResult>> {
        if query.trim().chars().count() < MIN_SUGGEST_CHARS {
            return Ok(Vec::new());
        }
        let request = SearchRequest::new(query).with_limit(limit).with_prefix();
        let response = self.search_tagged(request, SOURCE_SUGGEST).await?;
        Ok(response.results)
    }

    /// Browse places around a point, ranked by engagement and popularity
    pub async fn nearby(
        &self,
        center: Coordinate,
        radius_km: f64,
        limit: usize,
    ) -> SearchResult<SearchResponse> {
        let request = SearchRequest::new("")
            .with_types(vec![ContentType::Place])
            .with_origin(GeoOrigin::new(center).with_radius_km(radius_km))
            .with_limit(limit);
        self.search(request).await
    }

    /// Places inside a map viewport, popularity-ranked.
    ///
    /// Uncached and untracked: viewports rarely repeat exactly, and map
    /// panning should not flood the analytics store.
    pub async fn places_in_bounds(
        &self,
        bounds: &BoundingBox,
        limit: usize,
    ) -> SearchResult<Vec<UnifiedResult>> {
        let profile = self.config().profiles.for_type(ContentType::Place);
        let query = CollectionQuery::places_in_bounds(bounds, limit, profile);
        let raw = self.client.search_collection(&query).await?;
        let mut results = normalize_response(raw, ContentType::Place);
        aggregate::score_results(&mut results, &self.config().ranking);
        Ok(results)
    }

    /// Fetch a single place by document id, `Ok(None)` when absent
    pub async fn place_by_id(&self, id: &str) -> SearchResult<Option<UnifiedResult>> {
        let profile = self.config().profiles.for_type(ContentType::Place);
        let query = CollectionQuery::by_id(ContentType::Place, id, profile);
        let raw = self.client.search_collection(&query).await?;
        Ok(normalize_response(raw, ContentType::Place).into_iter().next())
    }

    /// Events starting within the next 24 hours
    pub async fn happening_now(
        &self,
        origin: Option<GeoOrigin>,
        limit: usize,
    ) -> SearchResult<SearchResponse> {
        let now = Utc::now();
        self.events_window(now, now + TimeDelta::hours(24), origin, limit)
            .await
    }

    /// Events starting within the next 7 days
    pub async fn upcoming_events(
        &self,
        origin: Option<GeoOrigin>,
        limit: usize,
    ) -> SearchResult<SearchResponse> {
        let now = Utc::now();
        self.events_window(now, now + TimeDelta::days(7), origin, limit)
            .await
    }

    /// Prefetch nearby places for local as-you-type matching
    pub async fn prefetch_nearby(
        &self,
        center: Coordinate,
        radius_km: f64,
        limit: usize,
    ) -> SearchResult<PrefetchedPlaces> {
        let response = self.nearby(center, radius_km, limit).await?;
        Ok(PrefetchedPlaces::new(center, response.results))
    }

    /// Index health
    pub async fn health(&self) -> SearchResult<bool> {
        self.client.health().await
    }

    /// Document counts for every collection
    pub async fn collection_stats(&self) -> SearchResult<Vec<CollectionInfo>> {
        let mut stats = Vec::with_capacity(ContentType::ALL.len());
        for content_type in ContentType::ALL {
            stats.push(
                self.client
                    .collection_stats(content_type.collection_name())
                    .await?,
            );
        }
        Ok(stats)
    }

    /// Query cache statistics
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached response
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    #[instrument(skip(self, request), fields(query = %request.query))]
    async fn search_tagged(
        &self,
        request: SearchRequest,
        source: &str,
    ) -> SearchResult<SearchResponse> {
        request.validate()?;
        metrics().increment("search.requests");
        let start = Instant::now();
        let key = request.cache_key();

        if let Some(mut cached) = self.cache.get(&key) {
            metrics().increment("search.cache_hits");
            cached.elapsed_ms = elapsed_ms(start);
            cached.cache_hit = true;
            debug!(total = cached.total_found, "Serving search from cache");
            return Ok(cached);
        }
        metrics().increment("search.cache_misses");

        let response = self.fan_out(&request, start).await;

        let error_summary = if response.failed_collections.is_empty() {
            None
        } else {
            let names: Vec<&str> = response
                .failed_collections
                .iter()
                .map(ContentType::as_str)
                .collect();
            Some(format!("unavailable: {}", names.join(",")))
        };
        self.sink.record(AnalyticsRecord::new(
            source,
            &request.query,
            response.results.len() as u64,
            response.elapsed_ms,
            request.has_location(),
            request.filters.applied_names(),
            error_summary,
        ));

        // A degraded response would pin a collection's absence for a full
        // TTL, so only complete responses are cached.
        if !response.is_degraded() {
            self.cache.insert(&key, response.clone());
            metrics().gauge("search.cache_entries", self.cache.len() as u64);
        }

        Ok(response)
    }

    /// Query every requested collection concurrently and merge whatever
    /// settled successfully.
    async fn fan_out(&self, request: &SearchRequest, start: Instant) -> SearchResponse {
        let config = self.config();
        let queries: Vec<(ContentType, CollectionQuery)> = request
            .types
            .iter()
            .map(|&content_type| {
                (
                    content_type,
                    CollectionQuery::for_request(
                        request,
                        content_type,
                        config.profiles.for_type(content_type),
                        config.default_radius_km,
                    ),
                )
            })
            .collect();

        let calls = queries.iter().map(|(content_type, query)| async move {
            (*content_type, self.client.search_collection(query).await)
        });
        let settled = join_all(calls).await;

        let mut failed_collections = Vec::new();
        let mut results_by_type = BTreeMap::new();
        let mut merge_order: Vec<Vec<UnifiedResult>> = Vec::with_capacity(settled.len());

        for (content_type, outcome) in settled {
            let mut list = match outcome {
                Ok(raw) => normalize_response(raw, content_type),
                Err(_) => {
                    // Already logged by the client with its request id
                    failed_collections.push(content_type);
                    Vec::new()
                }
            };
            aggregate::score_results(&mut list, &config.ranking);
            merge_order.push(list.clone());
            list.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
            results_by_type.insert(content_type, list);
        }

        let merged = aggregate::merge_ranked(merge_order, request.limit, &config.ranking);

        debug!(
            results = merged.results.len(),
            total_found = merged.total_found,
            failed = failed_collections.len(),
            "Search merged"
        );

        SearchResponse {
            results: merged.results,
            results_by_type,
            total_found: merged.total_found,
            elapsed_ms: elapsed_ms(start),
            failed_collections,
            cache_hit: false,
        }
    }

    async fn events_window(
        &self,
        after: chrono::DateTime<Utc>,
        before: chrono::DateTime<Utc>,
        origin: Option<GeoOrigin>,
        limit: usize,
    ) -> SearchResult<SearchResponse> {
        let filters = SearchFilters {
            starts_after: Some(after),
            starts_before: Some(before),
            ..SearchFilters::default()
        };
        let mut request = SearchRequest::new("")
            .with_types(vec![ContentType::Event])
            .with_filters(filters)
            .with_limit(limit);
        if let Some(origin) = origin {
            request = request.with_origin(origin);
        }
        self.search(request).await
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
