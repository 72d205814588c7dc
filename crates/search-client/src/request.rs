//! Search request types and validation.
//!
//! A [`SearchRequest`] captures the caller's intent: free text, which
//! collections to hit, an optional geo origin, filters, and paging. The
//! request also knows how to render itself as a canonical cache key string
//! so that semantically identical requests share one cache entry.

use atlas_geo::{BoundingBox, Coordinate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};

/// Default result limit when the caller does not specify one
pub const DEFAULT_LIMIT: usize = 50;

/// Number of coordinate decimals kept in cache keys (~1.1 km grid)
const CACHE_KEY_COORD_DECIMALS: u32 = 2;

/// The closed set of searchable content collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Physical venues (restaurants, parks, stores)
    Place,
    /// Time-bound happenings with a venue and start time
    Event,
    /// Editorial content
    Article,
}

impl ContentType {
    /// All searchable content types, in default query order
    pub const ALL: [ContentType; 3] = [ContentType::Place, ContentType::Event, ContentType::Article];

    /// Stable lowercase tag, used in cache keys and CLI arguments
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Place => "place",
            ContentType::Event => "event",
            ContentType::Article => "article",
        }
    }

    /// Name of the index collection backing this content type
    #[must_use]
    pub fn collection_name(&self) -> &'static str {
        match self {
            ContentType::Place => "places",
            ContentType::Event => "events",
            ContentType::Article => "articles",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentType {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "place" | "places" => Ok(ContentType::Place),
            "event" | "events" => Ok(ContentType::Event),
            "article" | "articles" => Ok(ContentType::Article),
            other => Err(SearchError::invalid_request(format!(
                "unknown content type: {other}"
            ))),
        }
    }
}

/// Where a search is anchored geographically.
///
/// A radius only exists together with an origin; a request without an
/// origin cannot carry one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoOrigin {
    /// The anchor coordinate
    pub coordinate: Coordinate,
    /// Search radius in kilometers; the collection default applies when unset
    pub radius_km: Option<f64>,
}

impl GeoOrigin {
    /// Anchor at `coordinate` with the default radius
    #[must_use]
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            radius_km: None,
        }
    }

    /// Set an explicit radius in kilometers
    #[must_use]
    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }
}

/// Optional filter clauses, each independently omitted when unset.
///
/// Category filters apply to places and events; locality, region, and
/// country to places; time and price windows to events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Match any of these categories
    #[serde(default)]
    pub categories: Vec<String>,
    /// Exact city/locality
    #[serde(default)]
    pub locality: Option<String>,
    /// Exact region/state
    #[serde(default)]
    pub region: Option<String>,
    /// Exact country
    #[serde(default)]
    pub country: Option<String>,
    /// Events starting at or after this instant
    #[serde(default)]
    pub starts_after: Option<DateTime<Utc>>,
    /// Events starting at or before this instant
    #[serde(default)]
    pub starts_before: Option<DateTime<Utc>>,
    /// Minimum ticket price
    #[serde(default)]
    pub price_min: Option<f64>,
    /// Maximum ticket price
    #[serde(default)]
    pub price_max: Option<f64>,
    /// Free events only
    #[serde(default)]
    pub free_only: bool,
    /// Verified events only
    #[serde(default)]
    pub verified_only: bool,
}

impl SearchFilters {
    /// True when no filter clause is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &SearchFilters::default()
    }

    /// Names of the filters that are set, for analytics records
    #[must_use]
    pub fn applied_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        if !self.categories.is_empty() {
            names.push("categories".to_string());
        }
        if self.locality.is_some() {
            names.push("locality".to_string());
        }
        if self.region.is_some() {
            names.push("region".to_string());
        }
        if self.country.is_some() {
            names.push("country".to_string());
        }
        if self.starts_after.is_some() {
            names.push("starts_after".to_string());
        }
        if self.starts_before.is_some() {
            names.push("starts_before".to_string());
        }
        if self.price_min.is_some() {
            names.push("price_min".to_string());
        }
        if self.price_max.is_some() {
            names.push("price_max".to_string());
        }
        if self.free_only {
            names.push("free_only".to_string());
        }
        if self.verified_only {
            names.push("verified_only".to_string());
        }
        names
    }
}

/// A unified search request across one or more collections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query; empty means "match everything"
    pub query: String,
    /// Collections to search, in query order
    pub types: Vec<ContentType>,
    /// Optional geo anchor with optional radius
    #[serde(default)]
    pub origin: Option<GeoOrigin>,
    /// Optional map-viewport constraint (place search only); mutually
    /// exclusive with `origin`
    #[serde(default)]
    pub bounds: Option<BoundingBox>,
    /// Filter clauses
    #[serde(default)]
    pub filters: SearchFilters,
    /// Maximum number of merged results to return
    pub limit: usize,
    /// Pagination offset in results
    #[serde(default)]
    pub offset: usize,
    /// Prefix matching for as-you-type suggestions
    #[serde(default)]
    pub prefix: bool,
}

impl SearchRequest {
    /// A request over all content types with default paging
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            types: ContentType::ALL.to_vec(),
            origin: None,
            bounds: None,
            filters: SearchFilters::default(),
            limit: DEFAULT_LIMIT,
            offset: 0,
            prefix: false,
        }
    }

    /// Restrict the search to specific collections
    #[must_use]
    pub fn with_types(mut self, types: impl Into<Vec<ContentType>>) -> Self {
        self.types = types.into();
        self
    }

    /// Anchor the search at a geo origin
    #[must_use]
    pub fn with_origin(mut self, origin: GeoOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Constrain place results to a map viewport
    #[must_use]
    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Apply filter clauses
    #[must_use]
    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Cap the number of merged results
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Skip into the result pages
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Enable prefix matching for as-you-type suggestions
    #[must_use]
    pub fn with_prefix(mut self) -> Self {
        self.prefix = true;
        self
    }

    /// True when the request carries a geo origin
    #[must_use]
    pub fn has_location(&self) -> bool {
        self.origin.is_some()
    }

    /// Reject requests that cannot be sent to the index
    pub fn validate(&self) -> SearchResult<()> {
        if self.limit == 0 {
            return Err(SearchError::invalid_request("limit must be greater than zero"));
        }
        if self.types.is_empty() {
            return Err(SearchError::invalid_request(
                "at least one content type is required",
            ));
        }
        if let Some(origin) = &self.origin {
            if !origin.coordinate.is_valid() {
                return Err(SearchError::invalid_request(format!(
                    "origin out of range: latitude {}, longitude {}",
                    origin.coordinate.latitude, origin.coordinate.longitude
                )));
            }
            if let Some(radius) = origin.radius_km {
                if radius <= 0.0 {
                    return Err(SearchError::invalid_request(
                        "radius must be greater than zero",
                    ));
                }
            }
        }
        if self.origin.is_some() && self.bounds.is_some() {
            return Err(SearchError::invalid_request(
                "origin and bounds are mutually exclusive",
            ));
        }
        if let (Some(min), Some(max)) = (self.filters.price_min, self.filters.price_max) {
            if min > max {
                return Err(SearchError::invalid_request("price_min exceeds price_max"));
            }
        }
        if let (Some(after), Some(before)) =
            (self.filters.starts_after, self.filters.starts_before)
        {
            if after > before {
                return Err(SearchError::invalid_request(
                    "starts_after is later than starts_before",
                ));
            }
        }
        Ok(())
    }

    /// Canonical cache key string.
    ///
    /// Every field appears with an explicit absence marker, the query is
    /// trimmed and lowercased, types and categories are sorted, and
    /// coordinates are rounded so GPS jitter maps to the same key. Two
    /// semantically identical requests always render the same string.
    #[must_use]
    pub fn cache_key(&self) -> String {
        let mut types: Vec<&str> = self.types.iter().map(ContentType::as_str).collect();
        types.sort_unstable();
        types.dedup();

        let geo = match &self.origin {
            Some(origin) => {
                let rounded = origin.coordinate.rounded(CACHE_KEY_COORD_DECIMALS);
                let radius = origin
                    .radius_km
                    .map_or_else(|| "default".to_string(), |r| format!("{r:.1}"));
                format!("{:.2},{:.2},r={radius}", rounded.latitude, rounded.longitude)
            }
            None => "none".to_string(),
        };

        let bounds = match &self.bounds {
            Some(b) => format!(
                "{:.4},{:.4},{:.4},{:.4}",
                b.min_lat(),
                b.min_lng(),
                b.max_lat(),
                b.max_lng()
            ),
            None => "none".to_string(),
        };

        let mut categories = self.filters.categories.clone();
        categories.sort_unstable();
        categories.dedup();

        fn opt_str(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or("none")
        }
        fn opt_ts(value: &Option<DateTime<Utc>>) -> String {
            value.map_or_else(|| "none".to_string(), |t| t.timestamp().to_string())
        }
        fn opt_num(value: &Option<f64>) -> String {
            value.map_or_else(|| "none".to_string(), |n| format!("{n:.2}"))
        }

        format!(
            "q={}|types={}|geo={}|bounds={}|cat={}|locality={}|region={}|country={}|after={}|before={}|pmin={}|pmax={}|free={}|verified={}|prefix={}|limit={}|offset={}",
            self.query.trim().to_lowercase(),
            types.join(","),
            geo,
            bounds,
            categories.join(","),
            opt_str(&self.filters.locality),
            opt_str(&self.filters.region),
            opt_str(&self.filters.country),
            opt_ts(&self.filters.starts_after),
            opt_ts(&self.filters.starts_before),
            opt_num(&self.filters.price_min),
            opt_num(&self.filters.price_max),
            self.filters.free_only,
            self.filters.verified_only,
            self.prefix,
            self.limit,
            self.offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = SearchRequest::new("pizza");
        assert_eq!(request.types, ContentType::ALL.to_vec());
        assert_eq!(request.limit, DEFAULT_LIMIT);
        assert_eq!(request.offset, 0);
        assert!(request.origin.is_none());
        assert!(!request.prefix);
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let request = SearchRequest::new("pizza").with_limit(0);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_types() {
        let request = SearchRequest::new("pizza").with_types(Vec::new());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_origin() {
        let request = SearchRequest::new("pizza")
            .with_origin(GeoOrigin::new(Coordinate::new(95.0, 0.0)));
        assert!(request.validate().is_err());

        let request = SearchRequest::new("pizza")
            .with_origin(GeoOrigin::new(Coordinate::new(37.0, -122.0)).with_radius_km(-5.0));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_price_window() {
        let mut request = SearchRequest::new("jazz").with_types(vec![ContentType::Event]);
        request.filters.price_min = Some(50.0);
        request.filters.price_max = Some(10.0);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_cache_key_ignores_type_order() {
        let a = SearchRequest::new("pizza")
            .with_types(vec![ContentType::Event, ContentType::Place]);
        let b = SearchRequest::new("pizza")
            .with_types(vec![ContentType::Place, ContentType::Event]);
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_cache_key_normalizes_query_text() {
        let a = SearchRequest::new("  Pizza ");
        let b = SearchRequest::new("pizza");
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_cache_key_rounds_coordinates() {
        let a = SearchRequest::new("pizza")
            .with_origin(GeoOrigin::new(Coordinate::new(37.77491, -122.41943)));
        let b = SearchRequest::new("pizza")
            .with_origin(GeoOrigin::new(Coordinate::new(37.77493, -122.41940)));
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_cache_key_distinguishes_radius() {
        let base = GeoOrigin::new(Coordinate::new(37.77, -122.42));
        let a = SearchRequest::new("pizza").with_origin(base);
        let b = SearchRequest::new("pizza").with_origin(base.with_radius_km(5.0));
        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_cache_key_marks_absent_fields() {
        let key = SearchRequest::new("pizza").cache_key();
        assert!(key.contains("geo=none"));
        assert!(key.contains("locality=none"));
        assert!(key.contains("after=none"));
    }

    #[test]
    fn test_content_type_round_trip() {
        for ct in ContentType::ALL {
            let parsed: ContentType = ct.as_str().parse().unwrap();
            assert_eq!(parsed, ct);
        }
        assert!("universe".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_applied_filter_names() {
        let mut filters = SearchFilters::default();
        assert!(filters.applied_names().is_empty());
        filters.categories = vec!["Cafe".to_string()];
        filters.free_only = true;
        assert_eq!(filters.applied_names(), vec!["categories", "free_only"]);
    }
}
