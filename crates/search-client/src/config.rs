//! Configuration for the Atlas search client
//!
//! Supports environment-based configuration with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::aggregate::ENGAGEMENT_WEIGHT;
use crate::error::{SearchError, SearchResult};
use crate::request::ContentType;

/// Default production index URL
const DEFAULT_SEARCH_URL: &str = "https://atlas-search-production.up.railway.app";

/// Default per-request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default cache TTL; popularity and live events move fast, so keep it short
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(120);

/// Default cache capacity in entries
const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Default geo radius in kilometers
const DEFAULT_RADIUS_KM: f64 = 50.0;

/// Environment types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development (typically a localhost index)
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

impl Default for Environment {
    fn default() -> Self {
        Self::Production
    }
}

impl Environment {
    /// Parse from the `ATLAS_ENV` environment variable
    pub fn from_env() -> Self {
        match env::var("ATLAS_ENV").unwrap_or_default().to_lowercase().as_str() {
            "development" | "dev" | "local" => Self::Development,
            "staging" | "stage" => Self::Staging,
            _ => Self::Production,
        }
    }
}

/// Product ranking knobs.
///
/// The engagement multiplier is an empirically chosen product tuning value,
/// not a derived constant; change it deliberately and in one place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Multiplier applied to a document's engagement score before it is
    /// added to the index text-match score
    pub engagement_weight: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            engagement_weight: ENGAGEMENT_WEIGHT,
        }
    }
}

/// How one collection is queried: which fields, their weights, and the
/// fixed sort expression.
///
/// The sort order encodes the product's ranking policy (text relevance,
/// then engagement, then popularity, then soonest-first for time-bound
/// content) and is deliberately not caller-overridable per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionProfile {
    /// Comma-separated fields to match against, highest priority first
    pub query_by: String,
    /// Comma-separated per-field weights, aligned with `query_by`
    pub query_by_weights: String,
    /// Fixed sort expression
    pub sort_by: String,
    /// Whether this collection's documents carry an indexed location
    pub geo_filterable: bool,
}

impl CollectionProfile {
    fn validate(&self, collection: ContentType) -> SearchResult<()> {
        if self.query_by.trim().is_empty() {
            return Err(SearchError::config(format!(
                "{collection}: query_by cannot be empty"
            )));
        }
        let fields = self.query_by.split(',').count();
        let weights = self.query_by_weights.split(',').count();
        if fields != weights {
            return Err(SearchError::config(format!(
                "{collection}: {fields} query fields but {weights} weights"
            )));
        }
        Ok(())
    }
}

/// Per-collection query profiles with the product's default field tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionProfiles {
    /// Places collection profile
    pub place: CollectionProfile,
    /// Events collection profile
    pub event: CollectionProfile,
    /// Articles collection profile
    pub article: CollectionProfile,
}

impl Default for CollectionProfiles {
    fn default() -> Self {
        Self {
            place: CollectionProfile {
                query_by: "name,address,city,categories".to_string(),
                query_by_weights: "10,5,3,2".to_string(),
                sort_by: "_text_match:desc,tap_quality_score:desc,popularity:desc".to_string(),
                geo_filterable: true,
            },
            event: CollectionProfile {
                query_by: "title,description,venue_name,city".to_string(),
                query_by_weights: "10,5,3,2".to_string(),
                sort_by: "_text_match:desc,tap_quality_score:desc,popularity:desc,start_time:asc"
                    .to_string(),
                geo_filterable: true,
            },
            article: CollectionProfile {
                query_by: "title,excerpt,content,seo_keywords".to_string(),
                query_by_weights: "10,5,3,2".to_string(),
                sort_by: "_text_match:desc,engagement_score:desc,published_at:desc".to_string(),
                geo_filterable: false,
            },
        }
    }
}

impl CollectionProfiles {
    /// The profile for a content type
    #[must_use]
    pub fn for_type(&self, content_type: ContentType) -> &CollectionProfile {
        match content_type {
            ContentType::Place => &self.place,
            ContentType::Event => &self.event,
            ContentType::Article => &self.article,
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the hosted search index
    pub endpoint: String,
    /// Index API key
    pub api_key: Option<String>,
    /// Per-request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Geo radius applied when the caller gives coordinates but no radius
    pub default_radius_km: f64,
    /// Query cache time-to-live
    #[serde(with = "duration_secs")]
    pub cache_ttl: Duration,
    /// Query cache capacity in entries
    pub cache_capacity: usize,
    /// Analytics ingest endpoint; `None` disables the sink
    pub analytics_url: Option<String>,
    /// Ranking knobs
    pub ranking: RankingConfig,
    /// Per-collection query profiles
    pub profiles: CollectionProfiles,
    /// Current environment
    pub environment: Environment,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            default_radius_km: DEFAULT_RADIUS_KM,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            analytics_url: None,
            ranking: RankingConfig::default(),
            profiles: CollectionProfiles::default(),
            environment: Environment::default(),
        }
    }
}

impl SearchConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `ATLAS_SEARCH_URL`: Base URL of the index
    /// - `ATLAS_SEARCH_API_KEY`: Index API key
    /// - `ATLAS_ENV`: Environment (development/staging/production)
    /// - `ATLAS_SEARCH_TIMEOUT_SECS`: Per-request timeout in seconds
    /// - `ATLAS_SEARCH_CACHE_TTL_SECS`: Query cache TTL in seconds
    /// - `ATLAS_ANALYTICS_URL`: Analytics ingest endpoint (optional)
    pub fn from_env() -> SearchResult<Self> {
        let environment = Environment::from_env();

        let endpoint = env::var("ATLAS_SEARCH_URL").unwrap_or_else(|_| match environment {
            Environment::Development => "http://localhost:8108".to_string(),
            _ => DEFAULT_SEARCH_URL.to_string(),
        });

        let api_key = env::var("ATLAS_SEARCH_API_KEY").ok();

        let timeout = env::var("ATLAS_SEARCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        let cache_ttl = env::var("ATLAS_SEARCH_CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map_or(DEFAULT_CACHE_TTL, Duration::from_secs);

        let analytics_url = env::var("ATLAS_ANALYTICS_URL").ok();

        Ok(Self {
            endpoint,
            api_key,
            timeout,
            default_radius_km: DEFAULT_RADIUS_KM,
            cache_ttl,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            analytics_url,
            ranking: RankingConfig::default(),
            profiles: CollectionProfiles::default(),
            environment,
        })
    }

    /// Create development configuration (local index)
    #[must_use]
    pub fn development() -> Self {
        Self {
            endpoint: "http://localhost:8108".to_string(),
            // Stock development key of a local index container
            api_key: Some("xyz".to_string()),
            timeout: Duration::from_secs(5),
            environment: Environment::Development,
            ..Self::default()
        }
    }

    /// Create staging configuration
    #[must_use]
    pub fn staging() -> Self {
        Self {
            endpoint: env::var("ATLAS_STAGING_SEARCH_URL")
                .unwrap_or_else(|_| DEFAULT_SEARCH_URL.to_string()),
            api_key: env::var("ATLAS_STAGING_SEARCH_API_KEY")
                .or_else(|_| env::var("ATLAS_SEARCH_API_KEY"))
                .ok(),
            environment: Environment::Staging,
            ..Self::default()
        }
    }

    /// Create production configuration
    #[must_use]
    pub fn production() -> Self {
        Self {
            api_key: env::var("ATLAS_SEARCH_API_KEY").ok(),
            analytics_url: env::var("ATLAS_ANALYTICS_URL").ok(),
            environment: Environment::Production,
            ..Self::default()
        }
    }

    /// Builder-style method to set the index URL
    #[must_use]
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// Builder-style method to set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builder-style method to set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set the default geo radius
    #[must_use]
    pub fn with_default_radius_km(mut self, radius_km: f64) -> Self {
        self.default_radius_km = radius_km;
        self
    }

    /// Builder-style method to set the cache TTL
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Builder-style method to set the cache capacity
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Builder-style method to set the analytics endpoint
    #[must_use]
    pub fn with_analytics_url(mut self, url: impl Into<String>) -> Self {
        self.analytics_url = Some(url.into());
        self
    }

    /// Builder-style method to set the engagement multiplier
    #[must_use]
    pub fn with_engagement_weight(mut self, weight: f64) -> Self {
        self.ranking.engagement_weight = weight;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> SearchResult<()> {
        if self.endpoint.is_empty() {
            return Err(SearchError::config("endpoint cannot be empty"));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(SearchError::config(
                "endpoint must start with http:// or https://",
            ));
        }
        if self.timeout.is_zero() {
            return Err(SearchError::config("timeout cannot be zero"));
        }
        // A key that cannot be sent as a header value would silently turn
        // every request unauthenticated
        if let Some(key) = &self.api_key {
            if key.is_empty() || !key.chars().all(|c| c.is_ascii_graphic()) {
                return Err(SearchError::config(
                    "API key must be non-empty printable ASCII",
                ));
            }
        }
        if self.default_radius_km <= 0.0 {
            return Err(SearchError::config("default radius must be positive"));
        }
        if self.cache_capacity == 0 {
            return Err(SearchError::config("cache capacity cannot be zero"));
        }
        if !self.ranking.engagement_weight.is_finite() || self.ranking.engagement_weight < 0.0 {
            return Err(SearchError::config(
                "engagement weight must be finite and non-negative",
            ));
        }
        for content_type in ContentType::ALL {
            self.profiles.for_type(content_type).validate(content_type)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert!(config.endpoint.starts_with("https://"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.default_radius_km, 50.0);
        assert_eq!(config.cache_capacity, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_development_config() {
        let config = SearchConfig::development();
        assert!(config.endpoint.contains("localhost"));
        assert_eq!(config.environment, Environment::Development);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SearchConfig::default()
            .with_endpoint("https://search.example.com")
            .with_timeout(Duration::from_secs(3))
            .with_engagement_weight(4.0);

        assert_eq!(config.endpoint, "https://search.example.com");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.ranking.engagement_weight, 4.0);
    }

    #[test]
    fn test_validation_rejects_bad_endpoint() {
        let config = SearchConfig::default().with_endpoint("");
        assert!(config.validate().is_err());

        let config = SearchConfig::default().with_endpoint("ftp://search.example.com");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_unsendable_api_key() {
        let config = SearchConfig::default().with_api_key("line\nbreak");
        assert!(config.validate().is_err());

        let config = SearchConfig::default().with_api_key("");
        assert!(config.validate().is_err());

        let config = SearchConfig::default().with_api_key("xyz-123_ABC");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_mismatched_weights() {
        let mut config = SearchConfig::default();
        config.profiles.place.query_by_weights = "10,5".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_profiles_weight_alignment() {
        let profiles = CollectionProfiles::default();
        for content_type in ContentType::ALL {
            let profile = profiles.for_type(content_type);
            assert_eq!(
                profile.query_by.split(',').count(),
                profile.query_by_weights.split(',').count(),
            );
        }
    }

    #[test]
    fn test_events_sort_ends_with_soonest_first() {
        let profiles = CollectionProfiles::default();
        assert!(profiles.event.sort_by.ends_with("start_time:asc"));
        assert!(profiles.place.sort_by.starts_with("_text_match:desc"));
    }
}
