//! Local relevance ranking for Atlas search.
//!
//! The hosted index does its own scoring; this crate ranks *prefetched*
//! results on-device while the user types, so suggestions stay instant and
//! work offline. It provides:
//! - A multi-level match strength ladder
//! - Levenshtein edit distance with typo tolerance
//! - Unicode-aware word matching

mod fuzzy;
mod strength;

pub use fuzzy::{fuzzy_match, is_typo_match, levenshtein_distance};
pub use strength::{match_strength, MatchStrength};
