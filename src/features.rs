//! Handcrafted features extracted from raw complaint text.
//!
//! These five features ride alongside the TF-IDF vector: they are computed
//! from the *raw* text (not the normalized tokens), so punctuation counts
//! and multi-word keyword phrases are still visible. The field order is part
//! of the trained representation — the vector is concatenated positionally
//! with the TF-IDF output, so reordering fields invalidates every persisted
//! model.

use serde::{Deserialize, Serialize};

/// Number of handcrafted features appended to the TF-IDF vector.
pub const HANDCRAFTED_FEATURE_COUNT: usize = 5;

/// Disaster-domain keywords matched case-insensitively as substrings of the
/// raw text. Multi-word entries ("power outage") match as phrases; matches
/// inside larger words are accepted as a known imprecision of the original
/// rule set.
pub const DISASTER_KEYWORDS: &[&str] = &[
    "flood",
    "flooding",
    "flooded",
    "water",
    "rain",
    "storm",
    "hurricane",
    "earthquake",
    "fire",
    "wildfire",
    "tornado",
    "cyclone",
    "tsunami",
    "landslide",
    "avalanche",
    "drought",
    "famine",
    "emergency",
    "disaster",
    "evacuation",
    "rescue",
    "help",
    "urgent",
    "trapped",
    "stuck",
    "injured",
    "damage",
    "destroyed",
    "collapsed",
    "broken",
    "power outage",
    "blackout",
    "road blocked",
    "bridge down",
    "tree fallen",
    "debris",
    "shelter",
    "medical emergency",
    "hospital",
    "ambulance",
    "police",
    "firefighter",
    "dangerous",
    "hazard",
    "toxic",
    "gas leak",
    "explosion",
    "accident",
    "missing person",
    "lost",
    "stranded",
    "isolated",
    "cut off",
    "infrastructure",
    "utility",
    "communication down",
    "network down",
];

/// Short urgency markers, also matched as case-insensitive substrings.
pub const URGENCY_WORDS: &[&str] = &["urgent", "emergency", "help", "asap", "immediate", "now"];

/// Fixed-order handcrafted feature vector.
///
/// Field order matters; see the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandcraftedFeatures {
    /// Distinct disaster keywords present in the text.
    pub disaster_keyword_count: usize,
    /// Raw character count.
    pub text_length: usize,
    /// Whitespace-delimited segment count.
    pub word_count: usize,
    /// Distinct urgency markers present in the text.
    pub urgency_count: usize,
    /// Literal `!` count.
    pub exclamation_count: usize,
}

impl HandcraftedFeatures {
    /// Render the features in their fixed positional order.
    pub fn to_vec(self) -> [f64; HANDCRAFTED_FEATURE_COUNT] {
        [
            self.disaster_keyword_count as f64,
            self.text_length as f64,
            self.word_count as f64,
            self.urgency_count as f64,
            self.exclamation_count as f64,
        ]
    }
}

/// Extract handcrafted features from raw complaint text.
///
/// Total function: never fails, returns all zeros for empty input.
pub fn extract(text: &str) -> HandcraftedFeatures {
    let lowered = text.to_lowercase();

    HandcraftedFeatures {
        disaster_keyword_count: DISASTER_KEYWORDS
            .iter()
            .filter(|keyword| lowered.contains(*keyword))
            .count(),
        text_length: text.chars().count(),
        word_count: text.split_whitespace().count(),
        urgency_count: URGENCY_WORDS
            .iter()
            .filter(|word| lowered.contains(*word))
            .count(),
        exclamation_count: text.matches('!').count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_empty() {
        let features = extract("");
        assert_eq!(features.to_vec(), [0.0; HANDCRAFTED_FEATURE_COUNT]);
    }

    #[test]
    fn test_extract_disaster_text() {
        let features = extract("Severe flooding in downtown area, need immediate evacuation help!");
        // "flood", "flooding" and "evacuation" all match as substrings.
        assert!(features.disaster_keyword_count >= 3);
        assert_eq!(features.urgency_count, 2); // "immediate", "help"
        assert_eq!(features.exclamation_count, 1);
        assert_eq!(features.word_count, 9);
    }

    #[test]
    fn test_extract_counts_raw_characters() {
        let features = extract("ok!!");
        assert_eq!(features.text_length, 4);
        assert_eq!(features.word_count, 1);
        assert_eq!(features.exclamation_count, 2);
    }

    #[test]
    fn test_substring_match_imprecision() {
        // "firefighter" contains "fire"; both count. Known imprecision.
        let features = extract("firefighter visited the school");
        assert!(features.disaster_keyword_count >= 2);
    }
}
