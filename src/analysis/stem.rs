//! Porter stemming for normalized complaint tokens.
//!
//! Reduces English words to their stems so that "flooding", "flooded" and
//! "floods" all land on the same vocabulary entry. This is the classic
//! five-step Porter algorithm, restricted to ASCII input (the normalizer
//! guarantees tokens are lowercase ASCII letters by the time they get here).
//!
//! # Examples
//!
//! ```
//! use complaint_triage::analysis::stem;
//!
//! assert_eq!(stem("flooding"), "flood");
//! assert_eq!(stem("evacuation"), "evacu");
//! assert_eq!(stem("trapped"), "trap");
//! ```

/// Stem a single lowercase ASCII word.
///
/// Words of length <= 2 are returned unchanged; the normalizer filters them
/// out anyway, but the function stays total.
pub fn stem(word: &str) -> String {
    if word.len() <= 2 {
        return word.to_string();
    }

    let word = step1a(word.to_string());
    let word = step1b(word);
    let word = step2(word);
    let word = step3(word);
    let word = step4(word);
    step5(word)
}

fn is_vowel(word: &[u8], pos: usize) -> bool {
    match word[pos] {
        b'a' | b'e' | b'i' | b'o' | b'u' => true,
        b'y' if pos > 0 => !is_vowel(word, pos - 1),
        _ => false,
    }
}

/// Number of vowel-consonant transitions (the Porter "measure").
fn measure(word: &str) -> usize {
    let bytes = word.as_bytes();
    let n = bytes.len();
    let mut m = 0;
    let mut i = 0;

    while i < n && !is_vowel(bytes, i) {
        i += 1;
    }
    while i < n {
        while i < n && is_vowel(bytes, i) {
            i += 1;
        }
        if i >= n {
            break;
        }
        m += 1;
        while i < n && !is_vowel(bytes, i) {
            i += 1;
        }
    }
    m
}

fn contains_vowel(word: &str) -> bool {
    let bytes = word.as_bytes();
    (0..bytes.len()).any(|i| is_vowel(bytes, i))
}

fn ends_double_consonant(word: &str) -> bool {
    let bytes = word.as_bytes();
    let n = bytes.len();
    n >= 2 && bytes[n - 1] == bytes[n - 2] && !is_vowel(bytes, n - 1)
}

/// Consonant-vowel-consonant ending, where the final consonant is not w, x
/// or y.
fn ends_cvc(word: &str) -> bool {
    let bytes = word.as_bytes();
    let n = bytes.len();
    n >= 3
        && !is_vowel(bytes, n - 3)
        && is_vowel(bytes, n - 2)
        && !is_vowel(bytes, n - 1)
        && !matches!(bytes[n - 1], b'w' | b'x' | b'y')
}

fn strip<'a>(word: &'a str, suffix: &str) -> Option<&'a str> {
    word.strip_suffix(suffix)
}

fn replace_if_measure(word: String, old: &str, new: &str, min_measure: usize) -> String {
    if let Some(root) = strip(&word, old) {
        if measure(root) >= min_measure {
            return format!("{root}{new}");
        }
    }
    word
}

fn step1a(word: String) -> String {
    if let Some(root) = strip(&word, "sses") {
        format!("{root}ss")
    } else if let Some(root) = strip(&word, "ies") {
        format!("{root}i")
    } else if word.ends_with("ss") {
        word
    } else if word.len() > 1 {
        match strip(&word, "s") {
            Some(root) => root.to_string(),
            None => word,
        }
    } else {
        word
    }
}

fn step1b(word: String) -> String {
    let reduced = if word.ends_with("eed") {
        return replace_if_measure(word, "eed", "ee", 1);
    } else if let Some(root) = strip(&word, "ed") {
        if contains_vowel(root) {
            Some(root.to_string())
        } else {
            None
        }
    } else if let Some(root) = strip(&word, "ing") {
        if contains_vowel(root) {
            Some(root.to_string())
        } else {
            None
        }
    } else {
        None
    };

    let Some(word) = reduced else {
        return word;
    };

    // Cleanup after -ed/-ing removal.
    if word.ends_with("at") || word.ends_with("bl") || word.ends_with("iz") {
        format!("{word}e")
    } else if ends_double_consonant(&word) && !matches!(word.as_bytes().last(), Some(b'l' | b's' | b'z')) {
        word[..word.len() - 1].to_string()
    } else if measure(&word) == 1 && ends_cvc(&word) {
        format!("{word}e")
    } else {
        word
    }
}

fn step2(word: String) -> String {
    const RULES: &[(&str, &str)] = &[
        ("ational", "ate"),
        ("tional", "tion"),
        ("enci", "ence"),
        ("anci", "ance"),
        ("izer", "ize"),
        ("abli", "able"),
        ("alli", "al"),
        ("entli", "ent"),
        ("eli", "e"),
        ("ousli", "ous"),
        ("ization", "ize"),
        ("ation", "ate"),
        ("ator", "ate"),
        ("alism", "al"),
        ("iveness", "ive"),
        ("fulness", "ful"),
        ("ousness", "ous"),
        ("aliti", "al"),
        ("iviti", "ive"),
        ("biliti", "ble"),
    ];

    for (old, new) in RULES {
        if word.ends_with(old) {
            return replace_if_measure(word, old, new, 1);
        }
    }
    word
}

fn step3(word: String) -> String {
    const RULES: &[(&str, &str)] = &[
        ("icate", "ic"),
        ("ative", ""),
        ("alize", "al"),
        ("iciti", "ic"),
        ("ical", "ic"),
        ("ful", ""),
        ("ness", ""),
    ];

    for (old, new) in RULES {
        if word.ends_with(old) {
            return replace_if_measure(word, old, new, 1);
        }
    }
    word
}

fn step4(word: String) -> String {
    const SUFFIXES: &[&str] = &[
        "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion",
        "ou", "ism", "ate", "iti", "ous", "ive", "ize",
    ];

    for suffix in SUFFIXES {
        if let Some(root) = strip(&word, suffix) {
            if measure(root) > 1 {
                // -ion only drops after s or t.
                if *suffix != "ion" || root.ends_with('s') || root.ends_with('t') {
                    return root.to_string();
                }
            }
        }
    }
    word
}

fn step5(word: String) -> String {
    let word = if let Some(root) = strip(&word, "e") {
        let m = measure(root);
        if m > 1 || (m == 1 && !ends_cvc(root)) {
            root.to_string()
        } else {
            word
        }
    } else {
        word
    };

    if word.ends_with("ll") && measure(&word) > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_basic() {
        assert_eq!(stem("running"), "run");
        assert_eq!(stem("flies"), "fli");
        assert_eq!(stem("agreed"), "agre");
        assert_eq!(stem("disabled"), "disabl");
        assert_eq!(stem("measuring"), "measur");
        assert_eq!(stem("itemization"), "item");
        assert_eq!(stem("sensational"), "sensat");
        assert_eq!(stem("traditional"), "tradit");
    }

    #[test]
    fn test_stem_disaster_vocabulary() {
        assert_eq!(stem("flooding"), "flood");
        assert_eq!(stem("flooded"), "flood");
        assert_eq!(stem("trapped"), "trap");
        assert_eq!(stem("collapsed"), "collaps");
    }

    #[test]
    fn test_stem_short_words_untouched() {
        assert_eq!(stem("go"), "go");
        assert_eq!(stem("a"), "a");
    }

    #[test]
    fn test_measure() {
        assert_eq!(measure("tree"), 0);
        assert_eq!(measure("trees"), 1);
        assert_eq!(measure("trouble"), 1);
        assert_eq!(measure("troubles"), 2);
    }
}
