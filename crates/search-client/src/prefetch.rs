//! Local matching over a prefetched nearby result set
//!
//! The app prefetches places around the user before they start typing, then
//! ranks that set locally per keystroke. Zero network per keystroke, and the
//! first remote search races against an already-useful local list.

use std::time::{Duration, Instant};

use crate::normalize::UnifiedResult;
use atlas_geo::Coordinate;
use atlas_relevance::{match_strength, MatchStrength};

/// A set of nearby places held for local as-you-type ranking.
///
/// Entries keep the distance the geo search computed; entries without one
/// fall back to the great-circle distance from the prefetch origin.
pub struct PrefetchedPlaces {
    origin: Coordinate,
    entries: Vec<UnifiedResult>,
    fetched_at: Instant,
}

impl PrefetchedPlaces {
    /// Wrap a prefetched result set
    #[must_use]
    pub fn new(origin: Coordinate, entries: Vec<UnifiedResult>) -> Self {
        Self {
            origin,
            entries,
            fetched_at: Instant::now(),
        }
    }

    /// The point the set was prefetched around
    #[must_use]
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Number of held entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How long ago the set was fetched; callers refresh stale sets
    #[must_use]
    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    /// Rank the held entries against a typed query, strongest match first.
    ///
    /// Any name match outranks any category or city match, regardless of
    /// ladder level; within the same field, strengths follow the ladder
    /// (exact > prefix > word prefix > substring > fuzzy). Equal matches
    /// order nearest-first. An empty query returns the nearest entries.
    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> Vec<UnifiedResult> {
        let trimmed = query.trim();

        let mut ranked: Vec<(FieldMatch, f64, &UnifiedResult)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let matched = if trimmed.is_empty() {
                    // Browsing mode: everything matches, distance decides
                    FieldMatch::browse()
                } else {
                    FieldMatch::rank(entry, trimmed)
                };
                matched
                    .is_match()
                    .then(|| (matched, self.distance_km(entry), entry))
            })
            .collect();

        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.total_cmp(&b.1)));
        ranked
            .into_iter()
            .take(limit)
            .map(|(_, _, entry)| entry.clone())
            .collect()
    }

    fn distance_km(&self, entry: &UnifiedResult) -> f64 {
        entry
            .distance_km
            .or_else(|| {
                entry
                    .location
                    .map(|location| self.origin.distance_km(&location))
            })
            .unwrap_or(f64::MAX)
    }
}

/// How an entry matched the query.
///
/// The derived ordering compares the name strength before the secondary
/// strength: the user is typing toward a place name, so an exact category
/// hit must not leapfrog a partial name hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct FieldMatch {
    name: MatchStrength,
    secondary: MatchStrength,
}

impl FieldMatch {
    /// Everything matches an empty query; distance alone decides
    fn browse() -> Self {
        Self {
            name: MatchStrength::Exact,
            secondary: MatchStrength::Exact,
        }
    }

    fn rank(entry: &UnifiedResult, query: &str) -> Self {
        let name = match_strength(&entry.title, query);
        let mut secondary = MatchStrength::None;
        for category in &entry.categories {
            secondary = secondary.max(match_strength(category, query));
        }
        if let Some(city) = &entry.city {
            secondary = secondary.max(match_strength(city, query));
        }
        Self { name, secondary }
    }

    fn is_match(self) -> bool {
        self.name.is_match() || self.secondary.is_match()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_hit;
    use crate::request::ContentType;
    use serde_json::json;

    fn place(id: &str, name: &str, categories: &[&str], distance_km: f64) -> UnifiedResult {
        let raw = serde_json::from_value(json!({
            "document": {
                "id": id,
                "name": name,
                "categories": categories,
            },
            "text_match_score": 0.0,
            "geo_distance_meters": distance_km * 1000.0
        }))
        .unwrap();
        normalize_hit(raw, ContentType::Place).unwrap()
    }

    fn set(entries: Vec<UnifiedResult>) -> PrefetchedPlaces {
        PrefetchedPlaces::new(Coordinate::new(37.7749, -122.4194), entries)
    }

    #[test]
    fn test_name_match_outranks_category_match() {
        let places = set(vec![
            place("cat", "Mission Diner", &["coffee"], 0.2),
            place("name", "Coffee Movement", &["cafe"], 5.0),
        ]);

        let results = places.search("coffee", 10);
        assert_eq!(results[0].id, "name");
        assert_eq!(results[1].id, "cat");
    }

    #[test]
    fn test_any_name_match_beats_exact_category_match() {
        // "Cofee House" only fuzzy-matches the query on its name, yet still
        // outranks the nearer diner whose category matches exactly
        let places = set(vec![
            place("exact_cat", "Mission Diner", &["coffee"], 0.1),
            place("fuzzy_name", "Cofee House", &[], 9.0),
        ]);

        let results = places.search("coffee", 10);
        assert_eq!(results[0].id, "fuzzy_name");
    }

    #[test]
    fn test_category_only_matches_rank_by_category_strength() {
        let places = set(vec![
            place("partial", "Mission Diner", &["coffee roasters"], 0.1),
            place("exact", "Dolores Deli", &["coffee"], 5.0),
        ]);

        let results = places.search("coffee", 10);
        assert_eq!(results[0].id, "exact");
        assert_eq!(results[1].id, "partial");
    }

    #[test]
    fn test_equal_strength_orders_by_distance() {
        let places = set(vec![
            place("far", "Blue Bottle", &[], 4.2),
            place("near", "Blue Plate", &[], 0.8),
        ]);

        let results = places.search("blue", 10);
        assert_eq!(results[0].id, "near");
        assert_eq!(results[1].id, "far");
    }

    #[test]
    fn test_empty_query_returns_nearest() {
        let places = set(vec![
            place("b", "Beta", &[], 2.0),
            place("a", "Alpha", &[], 1.0),
            place("c", "Gamma", &[], 3.0),
        ]);

        let results = places.search("", 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "a");
        assert_eq!(results[1].id, "b");
    }

    #[test]
    fn test_non_matching_entries_excluded() {
        let places = set(vec![
            place("match", "Taqueria Cancun", &[], 1.0),
            place("no", "Golden Gate Bakery", &["bakery"], 0.1),
        ]);

        let results = places.search("taqueria", 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "match");
    }

    #[test]
    fn test_typo_still_matches_locally() {
        let places = set(vec![place("r", "Restaurant Gary Danko", &[], 1.0)]);
        let results = places.search("resturant", 10);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_distance_falls_back_to_haversine_from_origin() {
        // No geo_distance_meters on this entry, but it has a location
        let raw = serde_json::from_value(json!({
            "document": {
                "id": "no_distance",
                "name": "Ferry Building",
                "location": [37.7955, -122.3937]
            },
            "text_match_score": 0.0
        }))
        .unwrap();
        let entry = normalize_hit(raw, ContentType::Place).unwrap();
        assert_eq!(entry.distance_km, None);

        let places = set(vec![entry]);
        let results = places.search("ferry", 10);
        assert_eq!(results.len(), 1);
        // Roughly 3 km across town, well under the MAX fallback
        assert!(places.distance_km(&results[0]) < 10.0);
    }
}
