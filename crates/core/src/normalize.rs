//! Cleanup of model-generated text before slide parsing.
//!
//! Handles line endings, stray invisible characters, and the outer code fence
//! some models wrap their whole reply in. Unicode composition and joiner
//! removal are available but off by default, since they rewrite content.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Info strings that mark a fence wrapping the entire reply.
static WRAPPER_FENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^```\s*(markdown|md|text|plaintext)?\s*$").unwrap());

/// Characters that never carry meaning in a slide outline.
const INVISIBLE_CHARS: &[char] = &[
    '\u{FEFF}', // BOM / zero-width no-break space
    '\u{200B}', // Zero-width space
];

/// Characters that can be part of real text (emoji sequences, scripts that
/// need joiners, hyphenation hints). Removed only on request.
const JOINER_CHARS: &[char] = &[
    '\u{200C}', // Zero-width non-joiner
    '\u{200D}', // Zero-width joiner
    '\u{2060}', // Word joiner
    '\u{00AD}', // Soft hyphen
];

fn is_fence_line(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// Text normalizer for generated slide text.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    /// Whether to remove a fence wrapping the entire reply.
    strip_wrapper_fence: bool,
    /// Whether to also remove joiners and soft hyphens.
    strip_joiners: bool,
    /// Whether to apply Unicode NFC composition.
    nfc: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    /// Create a new normalizer with default settings.
    pub fn new() -> Self {
        Self {
            strip_wrapper_fence: true,
            strip_joiners: false,
            nfc: false,
        }
    }

    /// Set whether to remove a fence wrapping the entire reply.
    pub fn with_strip_wrapper_fence(mut self, strip: bool) -> Self {
        self.strip_wrapper_fence = strip;
        self
    }

    /// Set whether to remove zero-width joiners, word joiners, and soft hyphens.
    ///
    /// This breaks emoji ZWJ sequences.
    pub fn with_strip_joiners(mut self, strip: bool) -> Self {
        self.strip_joiners = strip;
        self
    }

    /// Set whether to apply Unicode NFC composition.
    pub fn with_nfc(mut self, nfc: bool) -> Self {
        self.nfc = nfc;
        self
    }

    /// Normalize a whole reply.
    ///
    /// - Converts `\r\n` and lone `\r` to `\n`
    /// - Removes the BOM and zero-width spaces
    /// - Optionally removes joiners and soft hyphens
    /// - Optionally applies Unicode NFC composition
    /// - Optionally unwraps a ```` ```markdown ```` fence around the reply
    ///
    /// With the defaults, every other character of the reply (trailing
    /// whitespace included) is kept byte-for-byte.
    pub fn normalize(&self, text: &str) -> String {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");

        let filtered = text.chars().filter(|c| {
            !INVISIBLE_CHARS.contains(c) && !(self.strip_joiners && JOINER_CHARS.contains(c))
        });
        let text: String = if self.nfc {
            filtered.nfc().collect()
        } else {
            filtered.collect()
        };

        if self.strip_wrapper_fence {
            strip_wrapper_fence(&text)
        } else {
            text
        }
    }
}

/// Remove an opening wrapper fence and its matching closer.
///
/// The closer is only removed when it is left unpaired after the opener is
/// dropped, so a reply truncated before its closing fence keeps the closer
/// of its last inner block.
fn strip_wrapper_fence(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();

    let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return text.to_string();
    };

    if !WRAPPER_FENCE_REGEX.is_match(lines[first].trim()) {
        return text.to_string();
    }

    let mut body: Vec<&str> = lines[first + 1..].to_vec();

    if let Some(last) = body.iter().rposition(|l| !l.trim().is_empty()) {
        let fence_count = body.iter().filter(|l| is_fence_line(l)).count();
        if body[last].trim() == "```" && fence_count % 2 == 1 {
            body.truncate(last);
        }
    }

    log::debug!("Removed wrapper fence around reply");
    body.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_line_endings() {
        let normalizer = TextNormalizer::new();
        assert_eq!(
            normalizer.normalize("Slide 1: A\r\n- one\r- two"),
            "Slide 1: A\n- one\n- two"
        );
    }

    #[test]
    fn test_remove_invisible_characters() {
        let normalizer = TextNormalizer::new();
        assert_eq!(
            normalizer.normalize("\u{FEFF}Slide 1:\u{200B} Intro"),
            "Slide 1: Intro"
        );
    }

    #[test]
    fn test_joiners_kept_by_default() {
        let normalizer = TextNormalizer::new();
        let input = "| 👩\u{200D}💻 | soft\u{00AD}ware | a\u{2060}b |";
        assert_eq!(normalizer.normalize(input), input);
    }

    #[test]
    fn test_strip_joiners_on_request() {
        let normalizer = TextNormalizer::new().with_strip_joiners(true);
        assert_eq!(
            normalizer.normalize("soft\u{00AD}ware\u{200C} a\u{2060}b"),
            "software ab"
        );
    }

    #[test]
    fn test_nfc_off_by_default() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("Cafe\u{0301}"), "Cafe\u{0301}");
    }

    #[test]
    fn test_nfc_composition() {
        let normalizer = TextNormalizer::new().with_nfc(true);
        // "e" followed by a combining acute accent
        assert_eq!(normalizer.normalize("Cafe\u{0301}"), "Caf\u{00E9}");
    }

    #[test]
    fn test_keeps_trailing_whitespace() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("| a | b |  "), "| a | b |  ");
    }

    #[test]
    fn test_strip_markdown_wrapper() {
        let normalizer = TextNormalizer::new();
        let input = "```markdown\nSlide 1: Intro\n- point\n```\n";
        assert_eq!(normalizer.normalize(input), "Slide 1: Intro\n- point");
    }

    #[test]
    fn test_strip_wrapper_keeps_inner_fences() {
        let normalizer = TextNormalizer::new();
        let input = "```md\nSlide 1: Data\n```chart\nQ1: 10\n```\n```";
        assert_eq!(
            normalizer.normalize(input),
            "Slide 1: Data\n```chart\nQ1: 10\n```"
        );
    }

    #[test]
    fn test_truncated_wrapper_keeps_inner_closer() {
        let normalizer = TextNormalizer::new();
        let input = "```markdown\nSlide 1: Data\n```chart\nQ1: 10\n```";
        assert_eq!(
            normalizer.normalize(input),
            "Slide 1: Data\n```chart\nQ1: 10\n```"
        );
    }

    #[test]
    fn test_no_wrapper_left_alone() {
        let normalizer = TextNormalizer::new();
        let input = "Slide 1: Data\n```chart\nQ1: 10\n```";
        assert_eq!(normalizer.normalize(input), input);
    }

    #[test]
    fn test_wrapper_stripping_can_be_disabled() {
        let normalizer = TextNormalizer::new().with_strip_wrapper_fence(false);
        let input = "```markdown\nSlide 1: Intro\n```";
        assert_eq!(normalizer.normalize(input), input);
    }
}
