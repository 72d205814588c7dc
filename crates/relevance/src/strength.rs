//! Match strength ladder for local ranking.

use unicode_segmentation::UnicodeSegmentation;

use crate::fuzzy::{fuzzy_match, is_typo_match};

/// How strongly a candidate text matches the typed query.
///
/// Discriminants are spaced so product tuning can slot levels in between
/// without renumbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchStrength {
    /// No match
    None = 0,
    /// Typo-tolerant or in-order character match
    Fuzzy = 10,
    /// Query appears somewhere inside the text
    Substring = 20,
    /// A word inside the text starts with the query
    WordPrefix = 30,
    /// The text starts with the query
    Prefix = 40,
    /// Case-insensitive exact match
    Exact = 50,
}

impl MatchStrength {
    /// Numeric score, higher is better.
    #[inline]
    pub fn score(self) -> u32 {
        self as u32
    }

    /// True for anything stronger than [`MatchStrength::None`].
    #[inline]
    pub fn is_match(self) -> bool {
        self != MatchStrength::None
    }
}

/// Ranks `text` against `query` on the match strength ladder.
///
/// Comparison is case-insensitive. Word boundaries are Unicode word
/// segments, so "Café del Mar" word-prefix-matches "del".
pub fn match_strength(text: &str, query: &str) -> MatchStrength {
    let text_lower = text.to_lowercase();
    let query_lower = query.trim().to_lowercase();

    if query_lower.is_empty() {
        return MatchStrength::None;
    }

    if text_lower == query_lower {
        return MatchStrength::Exact;
    }

    if text_lower.starts_with(&query_lower) {
        return MatchStrength::Prefix;
    }

    for word in text_lower.unicode_words() {
        if word.starts_with(&query_lower) {
            return MatchStrength::WordPrefix;
        }
    }

    if text_lower.contains(&query_lower) {
        return MatchStrength::Substring;
    }

    let typo = text_lower
        .unicode_words()
        .any(|word| is_typo_match(word, &query_lower));
    if typo || fuzzy_match(&text_lower, &query_lower) {
        return MatchStrength::Fuzzy;
    }

    MatchStrength::None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(match_strength("Blue Bottle", "blue bottle"), MatchStrength::Exact);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(match_strength("Blue Bottle Coffee", "blue"), MatchStrength::Prefix);
    }

    #[test]
    fn test_word_prefix() {
        assert_eq!(match_strength("Blue Bottle Coffee", "bot"), MatchStrength::WordPrefix);
    }

    #[test]
    fn test_word_prefix_unicode() {
        assert_eq!(match_strength("Café del Mar", "del"), MatchStrength::WordPrefix);
    }

    #[test]
    fn test_substring() {
        assert_eq!(match_strength("Bluebottle", "uebo"), MatchStrength::Substring);
    }

    #[test]
    fn test_typo_is_fuzzy() {
        assert_eq!(match_strength("Restaurant Row", "resturant"), MatchStrength::Fuzzy);
    }

    #[test]
    fn test_no_match() {
        assert_eq!(match_strength("Blue Bottle", "pizza"), MatchStrength::None);
    }

    #[test]
    fn test_empty_query_never_matches() {
        assert_eq!(match_strength("Blue Bottle", "   "), MatchStrength::None);
    }

    #[test]
    fn test_ladder_ordering() {
        assert!(MatchStrength::Exact > MatchStrength::Prefix);
        assert!(MatchStrength::Prefix > MatchStrength::WordPrefix);
        assert!(MatchStrength::WordPrefix > MatchStrength::Substring);
        assert!(MatchStrength::Substring > MatchStrength::Fuzzy);
        assert!(MatchStrength::Fuzzy.is_match());
        assert!(!MatchStrength::None.is_match());
    }
}
