// ============================================================
// Layer 4 — Word Tokenizer
// ============================================================
// Turns raw chat text into lowercase word-like tokens.
//
// Token grammar:  [A-Za-z0-9_'@#+-]+
//
// Mentions (@val), hashtags (#tbt), contractions (don't) and
// hyphenated words (lol-ok) survive as single tokens; every
// other character is a separator. The curly apostrophe (’)
// is folded to a straight one first so "don’t" and "don't"
// produce the same token.
//
// This tokenizer feeds the Markov model and the vocabulary
// export. The tf-idf transformer has its own analyzer (see
// ml/tfidf.rs).

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_'@#+\-]+").expect("word regex is valid"));

/// Names the entity detector flags.
const KNOWN_NAMES: &[&str] = &[
    "kya", "colin", "val", "galaxy", "miles", "connor", "ry", "ryan", "asher",
];

/// Split `text` into normalised tokens, left to right.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalised = text.to_lowercase().replace('\u{2019}', "'");
    WORD_RE
        .find_iter(&normalised)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Flag tokens that match the fixed list of known names.
///
/// Informational only: the reply engine logs the result but
/// does not branch on it.
pub fn detect_names(text: &str) -> BTreeSet<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| is_alphabetic(t) && t.chars().count() <= 20)
        .filter(|t| KNOWN_NAMES.contains(&t.as_str()))
        .collect()
}

/// True for non-empty tokens made only of letters.
pub fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_splits_on_punctuation() {
        assert_eq!(tokenize("Hello, World!"), vec!["hello", "world"]);
    }

    #[test]
    fn test_keeps_mentions_hashtags_and_contractions() {
        assert_eq!(
            tokenize("@Val don’t #TBT well-known c++"),
            vec!["@val", "don't", "#tbt", "well-known", "c++"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  ... !!! ").is_empty());
    }

    #[test]
    fn test_idempotent_on_joined_tokens() {
        let samples = [
            "OMG kya is THE best!!",
            "wait... what’s up @galaxydev13 #late",
            "1 + 1 = 2, right?? lol-ok",
            "",
        ];
        for s in samples {
            let once = tokenize(s);
            let twice = tokenize(&once.join(" "));
            assert_eq!(once, twice, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_detect_names() {
        let names = detect_names("Colin and KYA went with miles, not bob");
        let expected: BTreeSet<String> =
            ["colin", "kya", "miles"].iter().map(|s| s.to_string()).collect();
        assert_eq!(names, expected);
    }
}
