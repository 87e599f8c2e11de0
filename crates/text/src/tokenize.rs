//! Tokenizer/normalizer

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Latin alphanumeric runs or Arabic-script runs
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-z0-9]+|\p{Arabic}+").expect("token regex is valid")
});

/// Words skipped when building catalog filters. Generic automotive terms
/// ("car", "price") are included: they appear in most queries and match
/// nothing useful in make/model fields.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "is", "are", "was", "were", "be", "been", "i", "you", "we", "me", "my",
        "it", "this", "that", "what", "which", "who", "how", "to", "for", "in", "on", "at", "by",
        "with", "from", "and", "or", "but", "if", "of", "do", "does", "can", "could", "would",
        "should", "want", "need", "show", "find", "looking", "under", "over", "about", "around",
        "please", "any", "some", "car", "cars", "vehicle", "vehicles", "auto", "price", "prices",
        "cost", "buy", "buying", "sell", "best", "good", "cheap", "expensive", "new", "used",
        "في", "من", "الى", "إلى", "على", "هل", "انا", "أنا", "اريد", "أريد", "سيارة", "سيارات",
        "سعر", "عن", "ما", "هذه", "هذا",
    ]
    .into_iter()
    .collect()
});

/// Normalize text into search tokens.
///
/// Tokens keep first-occurrence order and duplicates; every token is
/// lowercase and at least two characters long. Never fails: input with no
/// extractable tokens yields an empty vec.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .filter(|token| token.chars().count() >= 2)
        .collect()
}

/// Whether a normalized token belongs to the filter stop-word set
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_keeps_order() {
        let tokens = tokenize("Compare Camry VS Accord");
        assert_eq!(tokens, vec!["compare", "camry", "vs", "accord"]);
    }

    #[test]
    fn test_min_length_two() {
        let tokens = tokenize("a 5 BMW X5");
        assert_eq!(tokens, vec!["bmw", "x5"]);
        assert!(tokens.iter().all(|t| t.chars().count() >= 2));
    }

    #[test]
    fn test_duplicates_retained() {
        let tokens = tokenize("camry or camry");
        assert_eq!(tokens, vec!["camry", "or", "camry"]);
    }

    #[test]
    fn test_arabic_script() {
        let tokens = tokenize("سيارة تويوتا 2020");
        assert_eq!(tokens, vec!["سيارة", "تويوتا", "2020"]);
    }

    #[test]
    fn test_punctuation_and_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("!?. ,").is_empty());
        assert_eq!(tokenize("F-150!"), vec!["150"]);
    }

    #[test]
    fn test_stop_words() {
        assert!(is_stop_word("car"));
        assert!(is_stop_word("سيارة"));
        assert!(!is_stop_word("camry"));
    }
}
