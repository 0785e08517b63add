//! Rule-based spam gate.
//!
//! Evaluated strictly before disaster classification; a positive verdict
//! short-circuits the pipeline and the ensemble is never invoked. Pure and
//! deterministic, no trained state.
//!
//! Known design tension, deliberately left unresolved: the minimum-length
//! rule treats any message under three words as spam, so a terse but real
//! emergency ("Help, trapped!") is withheld. Guarding against that would
//! require consulting the disaster lexicon here, which would entangle the
//! two stages.

use std::sync::LazyLock;

use regex::Regex;

/// Spam lexicon, matched as whole words (word-boundary-delimited) against
/// the lowercased text.
const SPAM_WORDS: &[&str] = &[
    "lottery",
    "winner",
    "prize",
    "free",
    "money",
    "cash",
    "credit",
    "loan",
    "debt",
    "investment",
    "bitcoin",
    "crypto",
    "offer",
    "discount",
    "buy now",
    "limited time",
    "click here",
    "subscribe",
    "casino",
    "betting",
    "gambling",
    "dating",
    "singles",
    "hot",
    "meet singles",
    "weight loss",
    "diet",
    "pills",
    "medication",
    "viagra",
    "cialis",
    "enlargement",
    "miracle",
    "cure",
    "hair loss",
    "wrinkle",
    "anti-aging",
    "fountain of youth",
];

/// Maximum `!` count before the text is flagged.
const MAX_EXCLAMATIONS: usize = 3;
/// Maximum `$` count before the text is flagged.
const MAX_DOLLAR_SIGNS: usize = 2;
/// Messages with fewer whitespace tokens than this are treated as noise.
const MIN_WORD_COUNT: usize = 3;

static SPAM_LEXICON: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = SPAM_WORDS
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b")).expect("spam lexicon regex is valid")
});

/// Rule-based spam verdict over raw complaint text.
///
/// Positive when the lowercased text contains a whole-word spam-lexicon
/// match, when punctuation is excessive (`!` > 3 or `$` > 2), or when the
/// message has fewer than three whitespace tokens.
pub fn is_spam(text: &str) -> bool {
    let lowered = text.to_lowercase();

    if SPAM_LEXICON.is_match(&lowered) {
        return true;
    }

    if text.matches('!').count() > MAX_EXCLAMATIONS
        || text.matches('$').count() > MAX_DOLLAR_SIGNS
    {
        return true;
    }

    text.split_whitespace().count() < MIN_WORD_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_whole_word_match() {
        assert!(is_spam("you are a prize winner today"));
        assert!(is_spam("invest in crypto for free money"));
        // Substrings inside larger words do not match.
        assert!(!is_spam("the surprise inspection found flooding damage"));
    }

    #[test]
    fn test_excessive_punctuation() {
        assert!(is_spam("free prize winner!!!!"));
        assert!(is_spam("send $$$ now to this $account please"));
        assert!(!is_spam("water main burst! street is flooding badly"));
    }

    #[test]
    fn test_short_messages_are_noise() {
        assert!(is_spam("ok"));
        assert!(is_spam("hello there"));
        // Documented false positive: terse real emergencies trip this rule.
        assert!(is_spam("Help, trapped!"));
    }

    #[test]
    fn test_genuine_complaint_passes() {
        assert!(!is_spam(
            "Severe flooding in downtown area, need immediate evacuation assistance"
        ));
        assert!(!is_spam("Street light not working on main road"));
    }

    #[test]
    fn test_deterministic() {
        let text = "free prize winner!!!!";
        assert_eq!(is_spam(text), is_spam(text));
    }
}
