//! Serde types mirroring the remote index's JSON payloads
//!
//! Documents are modeled with optional fields throughout: collections are
//! reindexed independently of app releases, and a missing field must degrade
//! to a default rather than fail the whole response.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Response envelope of a collection search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchResponse {
    /// Total matching documents reported by the index (not just this page)
    #[serde(default)]
    pub found: u64,
    /// Matching documents with per-hit scoring metadata
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

/// One hit inside a search response
#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
    /// The document itself, shaped per collection schema
    pub document: serde_json::Value,
    /// Index-computed text relevance for this hit
    #[serde(default)]
    pub text_match_score: Option<f64>,
    /// Distance from the filter origin, present only for geo-filtered queries
    #[serde(default)]
    pub geo_distance_meters: Option<GeoDistance>,
}

/// Geo distance as the index reports it.
///
/// Older index versions return a bare number; newer ones key the distance by
/// the geo field name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GeoDistance {
    /// Plain meters
    Meters(f64),
    /// Meters keyed by geo field name
    PerField(HashMap<String, f64>),
}

impl GeoDistance {
    /// The distance in meters, regardless of representation
    #[must_use]
    pub fn meters(&self) -> Option<f64> {
        match self {
            Self::Meters(m) => Some(*m),
            Self::PerField(map) => map
                .get("location")
                .copied()
                .or_else(|| map.values().next().copied()),
        }
    }
}

/// A document from the places collection
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaceDocument {
    /// Stable document id
    pub id: String,
    /// Display name
    pub name: Option<String>,
    /// Street address
    pub address: Option<String>,
    /// City display name
    pub city: Option<String>,
    /// Indexed locality used for exact filtering
    pub locality: Option<String>,
    /// Region or state code
    pub region: Option<String>,
    /// ISO country code
    pub country: Option<String>,
    /// Category tags
    pub categories: Vec<String>,
    /// `[latitude, longitude]`
    pub location: Option<[f64; 2]>,
    /// Popularity score maintained by the indexer
    pub popularity: Option<f64>,
    /// In-app engagement score
    pub tap_quality_score: Option<f64>,
    /// Average user rating
    pub rating: Option<f64>,
    /// Primary photo
    pub photo_url: Option<String>,
    /// Whether the listing is verified
    pub verified: Option<bool>,
    /// Short description
    pub description: Option<String>,
    /// URL slug
    pub slug: Option<String>,
}

/// A document from the events collection
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventDocument {
    /// Stable document id
    pub id: String,
    /// Event title
    pub title: Option<String>,
    /// Long-form description
    pub description: Option<String>,
    /// Name of the hosting venue
    pub venue_name: Option<String>,
    /// City display name
    pub city: Option<String>,
    /// Single category tag
    pub category: Option<String>,
    /// `[latitude, longitude]` of the venue
    pub location: Option<[f64; 2]>,
    /// Start as a unix timestamp in seconds
    pub start_time: Option<i64>,
    /// End as a unix timestamp in seconds
    pub end_time: Option<i64>,
    /// Lowest ticket price
    pub price_min: Option<f64>,
    /// Highest ticket price
    pub price_max: Option<f64>,
    /// Free admission
    pub is_free: Option<bool>,
    /// Popularity score maintained by the indexer
    pub popularity: Option<f64>,
    /// In-app engagement score
    pub tap_quality_score: Option<f64>,
    /// Cover image
    pub image_url: Option<String>,
    /// Whether the organizer is verified
    pub verified: Option<bool>,
}

/// A document from the articles collection
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArticleDocument {
    /// Stable document id
    pub id: String,
    /// Article title
    pub title: Option<String>,
    /// Teaser paragraph
    pub excerpt: Option<String>,
    /// Full body text
    pub content: Option<String>,
    /// SEO keyword tags
    pub seo_keywords: Vec<String>,
    /// Reader engagement score
    pub engagement_score: Option<f64>,
    /// Publication time as a unix timestamp in seconds
    pub published_at: Option<i64>,
    /// Cover image
    pub cover_image_url: Option<String>,
    /// URL slug
    pub slug: Option<String>,
    /// Author display name
    pub author: Option<String>,
    /// Estimated reading time
    pub reading_time_minutes: Option<u32>,
}

/// Response of the index health endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    /// Whether the index reports itself healthy
    pub ok: bool,
}

/// Collection metadata returned by the index
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CollectionInfo {
    /// Collection name
    pub name: String,
    /// Number of indexed documents
    pub num_documents: u64,
}

/// Body of a synonym-set upsert
#[derive(Debug, Clone, Serialize)]
pub struct SynonymSetBody {
    /// The root term followed by its synonyms
    pub synonyms: Vec<String>,
}

/// Response of a synonym-set upsert
#[derive(Debug, Clone, Deserialize)]
pub struct SynonymUpsertResponse {
    /// Server-side id of the synonym set
    pub id: String,
}
