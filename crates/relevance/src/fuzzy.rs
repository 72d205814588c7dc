//! Fuzzy matching algorithms.

/// Calculate Levenshtein edit distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows are enough; full matrix would be m*n
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Edit-distance tolerance for a query of `len` characters.
///
/// Queries under 4 characters get no tolerance: with so few letters a
/// single edit is a different word ("bar" vs "car").
fn typo_tolerance(len: usize) -> usize {
    match len {
        0..=3 => 0,
        4..=7 => 1,
        _ => 2,
    }
}

/// Returns true if `word` is within typo tolerance of `query`.
///
/// Catches the common mobile misspellings ("resturant", "cofee") that the
/// in-order matcher misses when letters are substituted or transposed.
pub fn is_typo_match(word: &str, query: &str) -> bool {
    let tolerance = typo_tolerance(query.chars().count());
    if tolerance == 0 {
        return false;
    }
    levenshtein_distance(word, query) <= tolerance
}

/// Check if text contains all characters of query in order.
///
/// Characters need not be consecutive, so "sfo" matches "san francisco".
pub fn fuzzy_match(text: &str, query: &str) -> bool {
    let mut text_chars = text.chars();

    for query_char in query.chars() {
        loop {
            match text_chars.next() {
                Some(c) if c == query_char => break,
                Some(_) => continue,
                None => return false,
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_levenshtein_same() {
        assert_eq!(levenshtein_distance("coffee", "coffee"), 0);
    }

    #[test]
    fn test_levenshtein_substitution() {
        assert_eq!(levenshtein_distance("coffee", "coffae"), 1);
    }

    #[test]
    fn test_levenshtein_insert() {
        assert_eq!(levenshtein_distance("cofee", "coffee"), 1);
    }

    #[test]
    fn test_levenshtein_delete() {
        assert_eq!(levenshtein_distance("coffee", "cofee"), 1);
    }

    #[test]
    fn test_typo_match_common_misspelling() {
        assert!(is_typo_match("restaurant", "resturant"));
        assert!(is_typo_match("coffee", "cofee"));
    }

    #[test]
    fn test_typo_match_short_queries_strict() {
        assert!(!is_typo_match("bar", "car"));
        assert!(!is_typo_match("gym", "gem"));
    }

    #[test]
    fn test_typo_match_rejects_different_words() {
        assert!(!is_typo_match("restaurant", "bookstore"));
    }

    #[test]
    fn test_fuzzy_match_in_order() {
        assert!(fuzzy_match("san francisco", "sfo"));
    }

    #[test]
    fn test_fuzzy_match_out_of_order() {
        assert!(!fuzzy_match("hello", "lhe"));
    }

    #[test]
    fn test_fuzzy_match_exact() {
        assert!(fuzzy_match("hello", "hello"));
    }

    proptest! {
        #[test]
        fn prop_levenshtein_symmetric(a in "[a-z]{0,12}", b in "[a-z]{0,12}") {
            prop_assert_eq!(levenshtein_distance(&a, &b), levenshtein_distance(&b, &a));
        }

        #[test]
        fn prop_levenshtein_identity(a in "[a-z]{0,12}") {
            prop_assert_eq!(levenshtein_distance(&a, &a), 0);
        }

        #[test]
        fn prop_levenshtein_bounded_by_longer(a in "[a-z]{0,12}", b in "[a-z]{0,12}") {
            let d = levenshtein_distance(&a, &b);
            prop_assert!(d <= a.chars().count().max(b.chars().count()));
        }
    }
}
