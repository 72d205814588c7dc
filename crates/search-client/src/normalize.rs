//! Normalization of per-collection documents into the unified result shape
//!
//! Each collection has its own schema; the app renders one card type. The
//! mapping is total over known schemas: fields the source schema lacks stay
//! `None`, never fabricated. A document that fails its schema is skipped with
//! a warning rather than failing the collection that carried it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::request::ContentType;
use crate::wire::{
    ArticleDocument, EventDocument, GeoDistance, PlaceDocument, RawHit, RawSearchResponse,
};
use atlas_geo::{meters_to_km, Coordinate};

/// A search result in the app's canonical shape, regardless of which
/// collection produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedResult {
    /// Stable document id
    pub id: String,
    /// Which collection this result came from
    pub content_type: ContentType,
    /// Display title (place name, event title, article headline)
    pub title: String,
    /// Secondary display line (address, venue name, excerpt)
    pub description: Option<String>,
    /// City display name
    pub city: Option<String>,
    /// Category tags
    pub categories: Vec<String>,
    /// Display image
    pub image_url: Option<String>,
    /// Document location, when the schema carries one
    pub location: Option<Coordinate>,
    /// Distance from the request origin in kilometers
    pub distance_km: Option<f64>,
    /// Index-computed text relevance
    pub text_match_score: f64,
    /// Engagement signal (tap quality for places/events, reader engagement
    /// for articles)
    pub engagement: f64,
    /// Indexer-maintained popularity
    pub popularity: f64,
    /// Combined relevance assigned during aggregation
    pub final_score: f64,
    /// Verified listing or organizer
    pub verified: bool,
    /// Average user rating (places only)
    pub rating: Option<f64>,
    /// Event start (events only)
    pub starts_at: Option<DateTime<Utc>>,
    /// Event end (events only)
    pub ends_at: Option<DateTime<Utc>>,
    /// Free admission (events only)
    pub is_free: Option<bool>,
    /// Publication time (articles only)
    pub published_at: Option<DateTime<Utc>>,
    /// URL slug
    pub slug: Option<String>,
}

impl UnifiedResult {
    fn base(id: String, content_type: ContentType, title: String) -> Self {
        Self {
            id,
            content_type,
            title,
            description: None,
            city: None,
            categories: Vec::new(),
            image_url: None,
            location: None,
            distance_km: None,
            text_match_score: 0.0,
            engagement: 0.0,
            popularity: 0.0,
            final_score: 0.0,
            verified: false,
            rating: None,
            starts_at: None,
            ends_at: None,
            is_free: None,
            published_at: None,
            slug: None,
        }
    }
}

/// Normalize a whole collection response.
///
/// Documents that fail their schema are logged and dropped; the index's
/// `found` total is left to the caller, which reports the merged length.
pub fn normalize_response(
    response: RawSearchResponse,
    content_type: ContentType,
) -> Vec<UnifiedResult> {
    response
        .hits
        .into_iter()
        .filter_map(|hit| normalize_hit(hit, content_type))
        .collect()
}

/// Normalize one hit into the unified shape.
///
/// Returns `None` when the document does not fit its collection schema.
pub fn normalize_hit(hit: RawHit, content_type: ContentType) -> Option<UnifiedResult> {
    let text_match = hit.text_match_score.unwrap_or(0.0);
    let distance_km = hit
        .geo_distance_meters
        .as_ref()
        .and_then(GeoDistance::meters)
        .map(meters_to_km);

    let mut result = match content_type {
        ContentType::Place => match serde_json::from_value::<PlaceDocument>(hit.document) {
            Ok(doc) => place_result(doc),
            Err(e) => {
                warn!(collection = %content_type, error = %e, "Dropping document that does not fit its schema");
                return None;
            }
        },
        ContentType::Event => match serde_json::from_value::<EventDocument>(hit.document) {
            Ok(doc) => event_result(doc),
            Err(e) => {
                warn!(collection = %content_type, error = %e, "Dropping document that does not fit its schema");
                return None;
            }
        },
        ContentType::Article => match serde_json::from_value::<ArticleDocument>(hit.document) {
            Ok(doc) => article_result(doc),
            Err(e) => {
                warn!(collection = %content_type, error = %e, "Dropping document that does not fit its schema");
                return None;
            }
        },
    };

    result.text_match_score = text_match;
    result.distance_km = distance_km;
    Some(result)
}

fn place_result(doc: PlaceDocument) -> UnifiedResult {
    let mut result = UnifiedResult::base(
        doc.id,
        ContentType::Place,
        doc.name.unwrap_or_default(),
    );
    result.description = doc.address;
    result.city = doc.city.or(doc.locality);
    result.categories = doc.categories;
    result.image_url = doc.photo_url;
    result.location = doc.location.map(coordinate_from_pair);
    result.engagement = doc.tap_quality_score.unwrap_or(0.0);
    result.popularity = doc.popularity.unwrap_or(0.0);
    result.verified = doc.verified.unwrap_or(false);
    result.rating = doc.rating;
    result.slug = doc.slug;
    result
}

fn event_result(doc: EventDocument) -> UnifiedResult {
    let mut result = UnifiedResult::base(
        doc.id,
        ContentType::Event,
        doc.title.unwrap_or_default(),
    );
    result.description = doc.venue_name.or(doc.description);
    result.city = doc.city;
    result.categories = doc.category.into_iter().collect();
    result.image_url = doc.image_url;
    result.location = doc.location.map(coordinate_from_pair);
    result.engagement = doc.tap_quality_score.unwrap_or(0.0);
    result.popularity = doc.popularity.unwrap_or(0.0);
    result.verified = doc.verified.unwrap_or(false);
    result.starts_at = doc.start_time.and_then(from_unix);
    result.ends_at = doc.end_time.and_then(from_unix);
    result.is_free = doc.is_free;
    result
}

fn article_result(doc: ArticleDocument) -> UnifiedResult {
    let mut result = UnifiedResult::base(
        doc.id,
        ContentType::Article,
        doc.title.unwrap_or_default(),
    );
    result.description = doc.excerpt;
    result.image_url = doc.cover_image_url;
    result.engagement = doc.engagement_score.unwrap_or(0.0);
    result.published_at = doc.published_at.and_then(from_unix);
    result.slug = doc.slug;
    result
}

/// The index stores locations as `[latitude, longitude]`
fn coordinate_from_pair(pair: [f64; 2]) -> Coordinate {
    Coordinate::new(pair[0], pair[1])
}

fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hit(document: serde_json::Value, score: f64) -> RawHit {
        serde_json::from_value(json!({
            "document": document,
            "text_match_score": score
        }))
        .unwrap()
    }

    #[test]
    fn test_place_normalization() {
        let raw = hit(
            json!({
                "id": "pl_1",
                "name": "Golden Gate Bakery",
                "address": "1029 Grant Ave",
                "city": "San Francisco",
                "categories": ["bakery"],
                "location": [37.7969, -122.4077],
                "popularity": 91.0,
                "tap_quality_score": 4.6,
                "rating": 4.4,
                "verified": true
            }),
            1200.0,
        );

        let result = normalize_hit(raw, ContentType::Place).unwrap();
        assert_eq!(result.content_type, ContentType::Place);
        assert_eq!(result.title, "Golden Gate Bakery");
        assert_eq!(result.description.as_deref(), Some("1029 Grant Ave"));
        assert_eq!(result.engagement, 4.6);
        assert_eq!(result.popularity, 91.0);
        assert!(result.verified);
        assert_eq!(result.text_match_score, 1200.0);
        assert!(result.location.is_some());
        // Not assigned until aggregation
        assert_eq!(result.final_score, 0.0);
    }

    #[test]
    fn test_event_normalization_wraps_category() {
        let raw = hit(
            json!({
                "id": "ev_1",
                "title": "Jazz in the Park",
                "venue_name": "Dolores Park",
                "category": "music",
                "start_time": 1750000000,
                "is_free": true,
                "tap_quality_score": 3.1
            }),
            800.0,
        );

        let result = normalize_hit(raw, ContentType::Event).unwrap();
        assert_eq!(result.categories, vec!["music"]);
        assert_eq!(result.description.as_deref(), Some("Dolores Park"));
        assert_eq!(result.is_free, Some(true));
        assert!(result.starts_at.is_some());
        assert_eq!(result.engagement, 3.1);
    }

    #[test]
    fn test_article_engagement_source() {
        let raw = hit(
            json!({
                "id": "ar_1",
                "title": "The 10 Best Taco Spots",
                "excerpt": "We ate them all.",
                "engagement_score": 7.2,
                "published_at": 1740000000
            }),
            500.0,
        );

        let result = normalize_hit(raw, ContentType::Article).unwrap();
        assert_eq!(result.engagement, 7.2);
        assert_eq!(result.description.as_deref(), Some("We ate them all."));
        assert_eq!(result.location, None);
        assert_eq!(result.distance_km, None);
    }

    #[test]
    fn test_absent_fields_stay_unset() {
        let raw = hit(json!({ "id": "pl_2" }), 0.0);
        let result = normalize_hit(raw, ContentType::Place).unwrap();
        assert_eq!(result.title, "");
        assert_eq!(result.description, None);
        assert_eq!(result.location, None);
        assert_eq!(result.rating, None);
        assert_eq!(result.engagement, 0.0);
    }

    #[test]
    fn test_distance_normalized_to_km() {
        let raw: RawHit = serde_json::from_value(json!({
            "document": { "id": "pl_3", "name": "Pier 39" },
            "text_match_score": 100.0,
            "geo_distance_meters": 2500.0
        }))
        .unwrap();

        let result = normalize_hit(raw, ContentType::Place).unwrap();
        assert_eq!(result.distance_km, Some(2.5));
    }

    #[test]
    fn test_schema_violation_drops_document() {
        // location must be a two-element array
        let raw = hit(json!({ "id": "pl_4", "location": "not-a-pair" }), 10.0);
        assert!(normalize_hit(raw, ContentType::Place).is_none());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let raw = hit(
            json!({
                "id": "pl_5",
                "name": "New Spot",
                "brand_new_index_field": { "nested": true }
            }),
            10.0,
        );
        assert!(normalize_hit(raw, ContentType::Place).is_some());
    }
}
