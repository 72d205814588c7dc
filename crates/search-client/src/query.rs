//! Per-collection query construction
//!
//! Translates a [`SearchRequest`] into the concrete wire parameters for one
//! collection: matched fields and weights from the collection profile, a
//! `filter_by` expression assembled from the structured filters, and paging.

use crate::config::CollectionProfile;
use crate::request::{ContentType, GeoOrigin, SearchFilters, SearchRequest};
use atlas_geo::BoundingBox;

/// Wildcard query matching every document, used when the caller's query is empty
const MATCH_ALL: &str = "*";

/// A fully assembled query against a single collection.
///
/// All requests against a collection go through [`CollectionQuery::params`],
/// so the parameter names stay in one place.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionQuery {
    /// Target collection name
    pub collection: String,
    /// Query text (`*` matches everything)
    pub q: String,
    /// Comma-separated fields to match
    pub query_by: String,
    /// Comma-separated per-field weights
    pub query_by_weights: String,
    /// Sort expression
    pub sort_by: String,
    /// Filter expression; omitted from the wire when no filters apply
    pub filter_by: Option<String>,
    /// Results per page
    pub per_page: usize,
    /// 1-based page number
    pub page: usize,
    /// Treat the query as a prefix (search-as-you-type)
    pub prefix: bool,
}

impl CollectionQuery {
    /// Build the query for one collection of a multi-collection request.
    ///
    /// Every collection receives the full requested limit; the merged list is
    /// truncated after ranking, so a collection with strong matches can fill
    /// the whole page instead of being capped at an even share.
    #[must_use]
    pub fn for_request(
        request: &SearchRequest,
        content_type: ContentType,
        profile: &CollectionProfile,
        default_radius_km: f64,
    ) -> Self {
        let trimmed = request.query.trim();
        let q = if trimmed.is_empty() {
            MATCH_ALL.to_string()
        } else {
            trimmed.to_string()
        };

        let mut clauses = Vec::new();
        if profile.geo_filterable {
            if let Some(origin) = &request.origin {
                clauses.push(geo_clause(origin, default_radius_km));
            }
        }
        collect_filter_clauses(&request.filters, content_type, &mut clauses);

        Self {
            collection: content_type.collection_name().to_string(),
            q,
            query_by: profile.query_by.clone(),
            query_by_weights: profile.query_by_weights.clone(),
            sort_by: profile.sort_by.clone(),
            filter_by: join_clauses(clauses),
            per_page: request.limit,
            page: request.offset / request.limit + 1,
            prefix: request.prefix,
        }
    }

    /// Build a map-viewport query over the places collection.
    ///
    /// Matches every place inside the box and ranks by popularity alone;
    /// text relevance is meaningless for a wildcard query.
    #[must_use]
    pub fn places_in_bounds(bounds: &BoundingBox, limit: usize, profile: &CollectionProfile) -> Self {
        Self {
            collection: ContentType::Place.collection_name().to_string(),
            q: MATCH_ALL.to_string(),
            query_by: profile.query_by.clone(),
            query_by_weights: profile.query_by_weights.clone(),
            sort_by: "popularity:desc".to_string(),
            filter_by: Some(bounds_clause(bounds)),
            per_page: limit,
            page: 1,
            prefix: false,
        }
    }

    /// Build an exact-id lookup against one collection
    #[must_use]
    pub fn by_id(content_type: ContentType, id: &str, profile: &CollectionProfile) -> Self {
        Self {
            collection: content_type.collection_name().to_string(),
            q: MATCH_ALL.to_string(),
            query_by: profile.query_by.clone(),
            query_by_weights: profile.query_by_weights.clone(),
            sort_by: profile.sort_by.clone(),
            filter_by: Some(format!("id:={id}")),
            per_page: 1,
            page: 1,
            prefix: false,
        }
    }

    /// Wire parameters in the order the index documents them
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", self.q.clone()),
            ("query_by", self.query_by.clone()),
            ("query_by_weights", self.query_by_weights.clone()),
            ("sort_by", self.sort_by.clone()),
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
        ];
        if let Some(filter) = &self.filter_by {
            params.push(("filter_by", filter.clone()));
        }
        if self.prefix {
            params.push(("prefix", "true".to_string()));
        }
        params
    }
}

/// Radial geo filter: `location:(lat,lng,R km)`
fn geo_clause(origin: &GeoOrigin, default_radius_km: f64) -> String {
    let radius = origin.radius_km.unwrap_or(default_radius_km);
    format!(
        "location:({},{},{radius} km)",
        origin.coordinate.latitude, origin.coordinate.longitude
    )
}

/// Polygon geo filter over the four corners of a bounding box
fn bounds_clause(bounds: &BoundingBox) -> String {
    format!(
        "location:({},{},{},{},{},{},{},{})",
        bounds.min_lat(),
        bounds.min_lng(),
        bounds.max_lat(),
        bounds.min_lng(),
        bounds.max_lat(),
        bounds.max_lng(),
        bounds.min_lat(),
        bounds.max_lng(),
    )
}

/// Append the structured-filter clauses that apply to `content_type`.
///
/// The two collections name their category field differently: places carry a
/// `categories` array, events a single `category` string.
fn collect_filter_clauses(
    filters: &SearchFilters,
    content_type: ContentType,
    clauses: &mut Vec<String>,
) {
    if !filters.categories.is_empty() {
        let field = match content_type {
            ContentType::Place => "categories",
            _ => "category",
        };
        let alternatives: Vec<String> = filters
            .categories
            .iter()
            .map(|c| format!("{field}:={c}"))
            .collect();
        clauses.push(format!("({})", alternatives.join(" || ")));
    }

    if content_type == ContentType::Place {
        if let Some(locality) = &filters.locality {
            clauses.push(format!("locality:={locality}"));
        }
        if let Some(region) = &filters.region {
            clauses.push(format!("region:={region}"));
        }
        if let Some(country) = &filters.country {
            clauses.push(format!("country:={country}"));
        }
    }

    if content_type == ContentType::Event {
        if let Some(after) = filters.starts_after {
            clauses.push(format!("start_time:>={}", after.timestamp()));
        }
        if let Some(before) = filters.starts_before {
            clauses.push(format!("start_time:<={}", before.timestamp()));
        }
        if let Some(min) = filters.price_min {
            clauses.push(format!("price_min:>={min}"));
        }
        if let Some(max) = filters.price_max {
            clauses.push(format!("price_max:<={max}"));
        }
        if filters.free_only {
            clauses.push("is_free:=true".to_string());
        }
        if filters.verified_only {
            clauses.push("verified:=true".to_string());
        }
    }
}

fn join_clauses(clauses: Vec<String>) -> Option<String> {
    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" && "))
    }
}
