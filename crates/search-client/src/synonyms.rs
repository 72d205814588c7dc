//! Curated synonym sets for place vocabulary
//!
//! Uploaded to the index so "café" finds coffee shops and "pub" finds bars.
//! Curation is deliberate and small; synonym sprawl degrades precision.

use tracing::{info, warn};

use crate::client::IndexClient;
use crate::request::ContentType;
use crate::wire::SynonymSetBody;

/// One curated synonym set
#[derive(Debug, Clone, Copy)]
pub struct SynonymSet {
    /// Stable id used as the upsert key
    pub id: &'static str,
    /// Canonical term
    pub root: &'static str,
    /// Interchangeable terms
    pub synonyms: &'static [&'static str],
}

impl SynonymSet {
    /// Wire body: the root term followed by its synonyms
    #[must_use]
    pub fn body(&self) -> SynonymSetBody {
        SynonymSetBody {
            synonyms: std::iter::once(self.root)
                .chain(self.synonyms.iter().copied())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// The curated place-vocabulary sets
pub const PLACE_SYNONYMS: &[SynonymSet] = &[
    SynonymSet {
        id: "coffee-synonyms",
        root: "coffee",
        synonyms: &["café", "coffeehouse", "coffee shop", "espresso bar"],
    },
    SynonymSet {
        id: "restaurant-synonyms",
        root: "restaurant",
        synonyms: &["eatery", "diner", "bistro", "dining", "food"],
    },
    SynonymSet {
        id: "bar-synonyms",
        root: "bar",
        synonyms: &["pub", "tavern", "lounge", "nightclub", "club"],
    },
    SynonymSet {
        id: "gym-synonyms",
        root: "gym",
        synonyms: &["fitness center", "health club", "workout", "fitness"],
    },
    SynonymSet {
        id: "hotel-synonyms",
        root: "hotel",
        synonyms: &["motel", "inn", "lodge", "accommodation", "lodging"],
    },
    SynonymSet {
        id: "store-synonyms",
        root: "store",
        synonyms: &["shop", "boutique", "retail", "market"],
    },
    SynonymSet {
        id: "park-synonyms",
        root: "park",
        synonyms: &["garden", "green space", "playground", "recreation area"],
    },
    SynonymSet {
        id: "salon-synonyms",
        root: "salon",
        synonyms: &["hair salon", "beauty salon", "barber", "hairdresser"],
    },
    SynonymSet {
        id: "spa-synonyms",
        root: "spa",
        synonyms: &["wellness center", "massage", "beauty spa"],
    },
    SynonymSet {
        id: "theater-synonyms",
        root: "theater",
        synonyms: &["cinema", "movie theater", "theatre", "movies"],
    },
];

/// Outcome of a synonym sync run
#[derive(Debug, Clone, Default)]
pub struct SynonymSyncReport {
    /// Ids upserted successfully
    pub configured: Vec<String>,
    /// Ids that failed, with the failure text
    pub failed: Vec<(String, String)>,
}

impl SynonymSyncReport {
    /// Whether every set landed
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Upsert every curated set onto the places collection.
///
/// Per-set failures are reported, not fatal; a partial sync leaves the
/// index in a usable state.
pub async fn configure_place_synonyms(client: &IndexClient) -> SynonymSyncReport {
    let collection = ContentType::Place.collection_name();
    let mut report = SynonymSyncReport::default();

    for set in PLACE_SYNONYMS {
        match client.upsert_synonyms(collection, set.id, &set.body()).await {
            Ok(id) => {
                info!(id = %id, "Synonym set configured");
                report.configured.push(id);
            }
            Err(e) => {
                warn!(id = %set.id, error = %e, "Synonym set failed");
                report.failed.push((set.id.to_string(), e.to_string()));
            }
        }
    }

    report
}

/// Delete every curated set from the places collection
pub async fn clear_place_synonyms(client: &IndexClient) -> SynonymSyncReport {
    let collection = ContentType::Place.collection_name();
    let mut report = SynonymSyncReport::default();

    for set in PLACE_SYNONYMS {
        match client.delete_synonyms(collection, set.id).await {
            Ok(()) => {
                info!(id = %set.id, "Synonym set deleted");
                report.configured.push(set.id.to_string());
            }
            Err(e) => {
                warn!(id = %set.id, error = %e, "Synonym delete failed");
                report.failed.push((set.id.to_string(), e.to_string()));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_body_puts_root_first() {
        let coffee = &PLACE_SYNONYMS[0];
        let body = coffee.body();
        assert_eq!(body.synonyms[0], "coffee");
        assert!(body.synonyms.contains(&"café".to_string()));
        assert_eq!(body.synonyms.len(), coffee.synonyms.len() + 1);
    }

    #[test]
    fn test_set_ids_are_unique() {
        let ids: HashSet<&str> = PLACE_SYNONYMS.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), PLACE_SYNONYMS.len());
    }

    #[test]
    fn test_every_set_has_synonyms() {
        for set in PLACE_SYNONYMS {
            assert!(!set.synonyms.is_empty(), "{} has no synonyms", set.id);
        }
    }
}
