//! Token-based similarity between region names.

use rapidfuzz::distance::indel;

/// Normalize a string for comparison.
///
/// - Converts to lowercase
/// - Replaces every non-alphanumeric character with a space
/// - Collapses runs of whitespace
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn token_sort(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn ratio(a: &str, b: &str) -> f64 {
    indel::normalized_similarity(a.chars(), b.chars()) * 100.0
}

/// Similarity of two names on a 0 to 100 scale.
///
/// The maximum of the plain Indel ratio and the ratio of the sorted tokens,
/// both computed on normalized input. Word order therefore does not matter.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    ratio(&a, &b).max(ratio(&token_sort(&a), &token_sort(&b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_punctuation_and_case() {
        assert_eq!(normalize("  Korea, Republic-of "), "korea republic of");
        assert_eq!(normalize("St. Kitts & Nevis"), "st kitts nevis");
    }

    #[test]
    fn identical_names_score_100() {
        assert_eq!(similarity("Puerto Rico", "puerto  rico"), 100.0);
    }

    #[test]
    fn token_order_is_ignored() {
        assert_eq!(similarity("Korea, Republic of", "Republic of Korea"), 100.0);
    }

    #[test]
    fn misspellings_score_high() {
        let score = similarity(
            "United Kindom o Great Britain and Northern Ireland",
            "United Kingdom of Great Britain and Northern Ireland",
        );
        assert!(score > 95.0, "got {score}");
        assert!(similarity("Xyzabc", "United Kingdom") < 50.0);
    }

    #[test]
    fn empty_input_scores_zero() {
        assert_eq!(similarity("", "France"), 0.0);
        assert_eq!(similarity("!!", "France"), 0.0);
    }
}
