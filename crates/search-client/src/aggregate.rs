//! Cross-collection relevance merging
//!
//! Each collection is ranked by the index in isolation; this module combines
//! text relevance with the app's engagement signal and merges the collections
//! into one ranked list.

use crate::config::RankingConfig;
use crate::normalize::UnifiedResult;

/// Multiplier applied to a document's engagement score before adding it to
/// the index text-match score.
///
/// Tuned so a strong engagement signal can lift a result past a
/// merely-keyword-matching one, while engagement alone cannot outrank a
/// genuinely relevant text match. Product tuning lives in [`RankingConfig`];
/// this is its default.
pub const ENGAGEMENT_WEIGHT: f64 = 10.0;

/// A merged, ranked result list
#[derive(Debug, Clone)]
pub struct MergedResults {
    /// Ranked results, truncated to the requested limit
    pub results: Vec<UnifiedResult>,
    /// Merged result count before truncation
    pub total_found: usize,
}

/// Assign each result its combined relevance score
pub fn score_results(results: &mut [UnifiedResult], ranking: &RankingConfig) {
    for result in results {
        result.final_score = final_score(result, ranking);
    }
}

/// Combined relevance of one result
#[must_use]
pub fn final_score(result: &UnifiedResult, ranking: &RankingConfig) -> f64 {
    result.text_match_score + result.engagement * ranking.engagement_weight
}

/// Merge per-collection result lists into one ranked list.
///
/// Lists are flattened in collection query order, scored, stable-sorted by
/// descending score (so ties keep query order and identical inputs produce
/// identical output), and truncated to `limit` only after the merge. A
/// collection that failed contributes an empty list, so an all-failures
/// search merges to an empty, non-error outcome.
#[must_use]
pub fn merge_ranked(
    per_collection: Vec<Vec<UnifiedResult>>,
    limit: usize,
    ranking: &RankingConfig,
) -> MergedResults {
    let mut merged: Vec<UnifiedResult> = per_collection.into_iter().flatten().collect();
    score_results(&mut merged, ranking);
    merged.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));

    let total_found = merged.len();
    merged.truncate(limit);

    MergedResults {
        results: merged,
        total_found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ContentType;

    fn result(id: &str, content_type: ContentType, text: f64, engagement: f64) -> UnifiedResult {
        let raw: crate::wire::RawHit = serde_json::from_value(serde_json::json!({
            "document": { "id": id },
            "text_match_score": text
        }))
        .unwrap();
        let mut unified = crate::normalize::normalize_hit(raw, content_type).unwrap();
        unified.engagement = engagement;
        unified
    }

    fn ranking() -> RankingConfig {
        RankingConfig::default()
    }

    #[test]
    fn test_final_score_combines_text_and_engagement() {
        let r = result("a", ContentType::Place, 100.0, 4.5);
        assert_eq!(final_score(&r, &ranking()), 145.0);
    }

    #[test]
    fn test_engagement_can_lift_past_weaker_text_match() {
        let weak_text_high_engagement = result("a", ContentType::Place, 100.0, 8.0);
        let strong_text_no_engagement = result("b", ContentType::Place, 150.0, 0.0);

        let merged = merge_ranked(
            vec![vec![strong_text_no_engagement, weak_text_high_engagement]],
            10,
            &ranking(),
        );
        assert_eq!(merged.results[0].id, "a");
        assert_eq!(merged.results[0].final_score, 180.0);
    }

    #[test]
    fn test_ties_keep_collection_query_order() {
        let place = result("place", ContentType::Place, 100.0, 0.0);
        let event = result("event", ContentType::Event, 100.0, 0.0);
        let article = result("article", ContentType::Article, 100.0, 0.0);

        let merged = merge_ranked(
            vec![vec![place], vec![event], vec![article]],
            10,
            &ranking(),
        );
        let ids: Vec<&str> = merged.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["place", "event", "article"]);
    }

    #[test]
    fn test_merge_order_irrelevant_for_distinct_scores() {
        let a = result("a", ContentType::Place, 300.0, 0.0);
        let b = result("b", ContentType::Event, 200.0, 0.0);
        let c = result("c", ContentType::Article, 100.0, 0.0);

        let forward = merge_ranked(
            vec![vec![a.clone()], vec![b.clone()], vec![c.clone()]],
            10,
            &ranking(),
        );
        let backward = merge_ranked(vec![vec![c], vec![b], vec![a]], 10, &ranking());

        let forward_ids: Vec<&str> = forward.results.iter().map(|r| r.id.as_str()).collect();
        let backward_ids: Vec<&str> = backward.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(forward_ids, backward_ids);
        assert_eq!(forward_ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_truncation_happens_after_merge() {
        // The second collection's results outscore the first collection's;
        // truncating per-collection first would have kept the wrong ones.
        let places: Vec<UnifiedResult> = (0..5)
            .map(|i| result(&format!("p{i}"), ContentType::Place, 10.0, 0.0))
            .collect();
        let events: Vec<UnifiedResult> = (0..5)
            .map(|i| result(&format!("e{i}"), ContentType::Event, 500.0, 0.0))
            .collect();

        let merged = merge_ranked(vec![places, events], 5, &ranking());
        assert_eq!(merged.total_found, 10);
        assert_eq!(merged.results.len(), 5);
        assert!(merged.results.iter().all(|r| r.id.starts_with('e')));
    }

    #[test]
    fn test_all_collections_failed_is_empty_not_error() {
        let merged = merge_ranked(vec![Vec::new(), Vec::new(), Vec::new()], 10, &ranking());
        assert!(merged.results.is_empty());
        assert_eq!(merged.total_found, 0);
    }

    #[test]
    fn test_custom_engagement_weight() {
        let r = result("a", ContentType::Article, 50.0, 2.0);
        let tuned = RankingConfig {
            engagement_weight: 3.0,
        };
        assert_eq!(final_score(&r, &tuned), 56.0);
    }
}
