//! Complaint text normalization.

use crate::analysis::stem::stem;
use crate::analysis::stopwords::is_stop_word;

/// Minimum token length kept after stop-word removal.
const MIN_TOKEN_LEN: usize = 3;

/// Normalize raw complaint text into a sequence of stemmed tokens.
///
/// Steps, in order: lowercase; drop every character that is not an ASCII
/// letter or whitespace (digits and punctuation are removed, not replaced,
/// so "3-day" collapses to "day"); split on whitespace; drop English stop
/// words; drop tokens shorter than three characters; Porter-stem the rest.
///
/// Pure function; empty input yields an empty sequence. Re-normalizing its
/// own space-joined output yields the same sequence, except that stemming
/// can shrink a token below three characters, in which case it vanishes on
/// the second pass. Callers never re-normalize, so this is a documented
/// edge case rather than a guaranteed fixed point.
pub fn normalize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| !is_stop_word(token) && token.len() >= MIN_TOKEN_LEN)
        .map(stem)
        .collect()
}

/// Normalize text and join the tokens with single spaces, the form the
/// TF-IDF vectorizer consumes.
pub fn normalized_document(text: &str) -> String {
    normalize(text).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_empty() {
        assert!(normalize("").is_empty());
    }

    #[test]
    fn test_normalize_strips_digits_and_punctuation() {
        let tokens = normalize("3-day power outage!!! on 5th street");
        assert!(tokens.contains(&"day".to_string()));
        assert!(tokens.contains(&"power".to_string()));
        assert!(!tokens.iter().any(|t| t.contains('3') || t.contains('!')));
    }

    #[test]
    fn test_normalize_removes_stop_words_and_short_tokens() {
        let tokens = normalize("the water is up to my knees");
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"up".to_string()));
        assert!(tokens.contains(&"water".to_string()));
    }

    #[test]
    fn test_normalize_stems() {
        let tokens = normalize("flooding flooded floods");
        assert_eq!(tokens, vec!["flood", "flood", "flood"]);
    }

    #[test]
    fn test_normalize_non_ascii_dropped() {
        // Non-ASCII letters are outside the representation and removed.
        let tokens = normalize("inondation sévère");
        assert_eq!(tokens, vec!["inond", "svre"]);
    }

    #[test]
    fn test_normalized_document_joins() {
        assert_eq!(normalized_document("severe flooding"), "sever flood");
    }
}
