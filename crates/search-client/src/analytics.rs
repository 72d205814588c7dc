//! Fire-and-forget search analytics
//!
//! One record per completed search, posted to an ingest endpoint from a
//! detached task. The search path never waits on the write and never sees
//! its failures; a lost record costs a data point, not a search.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::SearchResult;

/// Record source tag for full searches
pub const SOURCE_SEARCH: &str = "search";
/// Record source tag for autocomplete suggestions
pub const SOURCE_SUGGEST: &str = "suggest";

/// Analytics writes get a tighter timeout than searches; they are disposable
const ANALYTICS_TIMEOUT: Duration = Duration::from_secs(5);

/// One completed search, as written to the analytics store.
///
/// Deliberately carries a geo-presence flag instead of raw coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsRecord {
    /// Query text as typed
    pub query: String,
    /// Results returned to the caller
    pub results_count: u64,
    /// End-to-end search latency
    pub search_time_ms: u64,
    /// Whether the request carried a geo origin
    pub has_location: bool,
    /// Names of the filters that were set
    pub filters: Vec<String>,
    /// Error summary when the search degraded
    pub error: Option<String>,
    /// Which surface issued the search
    pub source: String,
    /// Process session correlating records from one app run
    pub session_id: String,
    /// Record time
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsRecord {
    /// Build a record for a completed search
    #[must_use]
    pub fn new(
        source: &str,
        query: impl Into<String>,
        results_count: u64,
        search_time_ms: u64,
        has_location: bool,
        filters: Vec<String>,
        error: Option<String>,
    ) -> Self {
        Self {
            query: query.into(),
            results_count,
            search_time_ms,
            has_location,
            filters,
            error,
            source: source.to_string(),
            session_id: atlas_telemetry::session_id().to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Handle to the analytics ingest endpoint.
///
/// Built with its own HTTP client: the index client's default headers carry
/// the index API key, which must not leak to the analytics host.
#[derive(Clone)]
pub struct AnalyticsSink {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl AnalyticsSink {
    /// Create a sink. `None` disables recording entirely.
    pub fn new(endpoint: Option<String>) -> SearchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(ANALYTICS_TIMEOUT)
            .build()?;
        Ok(Self { endpoint, client })
    }

    /// Whether records will actually be sent anywhere
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Schedule a record write and return immediately.
    ///
    /// The write runs on a detached task; failures are logged at `warn!`
    /// and dropped.
    pub fn record(&self, record: AnalyticsRecord) {
        let Some(endpoint) = self.endpoint.clone() else {
            debug!(query = %record.query, "Analytics disabled, dropping record");
            return;
        };
        let client = self.client.clone();

        tokio::spawn(async move {
            match client.post(&endpoint).json(&record).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(query = %record.query, "Analytics record written");
                }
                Ok(response) => {
                    warn!(
                        status = %response.status(),
                        "Analytics write rejected"
                    );
                }
                Err(e) => {
                    warn!(error = %e, "Analytics write failed");
                }
            }
        });
    }
}
