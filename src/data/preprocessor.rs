// ============================================================
// Layer 4 — Message Sanitizer
// ============================================================
// Cleans a collected chat message before it becomes an
// utterance.
//
// Chat exports carry noise that would otherwise end up in the
// Markov tables and tf-idf vocabulary:
//   - "[image]" / "image" placeholders where a picture was sent
//   - pasted links
//   - runs of spaces, tabs and non-breaking spaces
//
// Cleaning steps (applied in order):
//   1. Remove image placeholders (case-insensitive)
//   2. Remove http(s) URLs
//   3. Collapse whitespace runs into one space
//   4. Trim the ends
//
// An empty result means "drop this message".

use regex::Regex;
use std::sync::LazyLock;

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[image\]|\bimage\b|^image$").expect("image regex is valid")
});

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("url regex is valid"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Sanitize one message. Returns an empty string when nothing is left.
    pub fn clean(&self, message: &str) -> String {
        let without_images = IMAGE_RE.replace_all(message, "");
        let without_urls = URL_RE.replace_all(&without_images, "");
        WHITESPACE_RE
            .replace_all(&without_urls, " ")
            .trim()
            .to_string()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("  hello \t  world\u{00A0} "), "hello world");
    }

    #[test]
    fn test_strips_image_markers() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("look [Image] at this"), "look at this");
        assert_eq!(p.clean("Image"), "");
        assert_eq!(p.clean("an image here"), "an here");
        // whole-word only
        assert_eq!(p.clean("imagine that"), "imagine that");
    }

    #[test]
    fn test_strips_urls() {
        let p = Preprocessor::new();
        assert_eq!(
            p.clean("see https://example.com/a?b=c and http://x.y"),
            "see and"
        );
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
    }
}
