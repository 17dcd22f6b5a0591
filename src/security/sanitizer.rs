//! Input sanitizer for user questions
//!
//! Strips a fixed denylist of script and SQL fragments (case-insensitive) and
//! caps the length of the remaining text. This is cosmetic input hygiene: it
//! neither parses nor escapes anything, and it does nothing against prompt
//! injection aimed at the model. Treat the output as untrusted text.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::HoosWhoError;

/// Substrings removed from user input, matched case-insensitively
pub const DENYLIST: &[&str] = &[
    "<script>",
    "javascript:",
    "onerror=",
    "onclick=",
    "DROP TABLE",
    "DELETE FROM",
    "INSERT INTO",
    "SELECT *",
    "<iframe>",
    "eval(",
    "document.cookie",
];

/// Default maximum length of sanitized input, in characters
pub const DEFAULT_MAX_CHARS: usize = 500;

/// Default minimum question length, in characters
pub const DEFAULT_MIN_CHARS: usize = 3;

/// Raw input larger than this is rejected before sanitizing
pub const MAX_RAW_BYTES: usize = 16 * 1024;

fn denylist_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let alternation = DENYLIST
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!("(?i){}", alternation)).expect("denylist pattern is valid")
    })
}

// Denylist entries are ASCII, so one char per byte
fn ends_with_ignore_case(kept: &[char], pattern: &str) -> bool {
    kept.len() >= pattern.len()
        && kept[kept.len() - pattern.len()..]
            .iter()
            .zip(pattern.chars())
            .all(|(a, b)| a.eq_ignore_ascii_case(&b))
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

/// Denylist sanitizer with configurable length bounds
///
/// # Examples
///
/// ```
/// use hooswho::security::Sanitizer;
///
/// let sanitizer = Sanitizer::default();
/// assert_eq!(sanitizer.sanitize("Who <SCRIPT>works at ICF?"), "Who works at ICF?");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer {
    max_chars: usize,
    min_chars: usize,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS, DEFAULT_MIN_CHARS)
    }
}

impl Sanitizer {
    /// Create a sanitizer
    ///
    /// # Arguments
    ///
    /// * `max_chars` - Output is truncated to this many characters
    /// * `min_chars` - [`Sanitizer::validate_question`] rejects shorter questions
    pub fn new(max_chars: usize, min_chars: usize) -> Self {
        Self {
            max_chars,
            min_chars,
        }
    }

    /// Minimum accepted question length
    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Remove denylisted substrings and cap the length
    ///
    /// A single left-to-right pass drops each occurrence as soon as its last
    /// character arrives, so fragments that join into a new occurrence after
    /// a removal are stripped too, in linear time. Truncation happens last
    /// and counts characters, never splitting a code point.
    pub fn sanitize(&self, raw: &str) -> String {
        if !denylist_regex().is_match(raw) {
            return truncate_chars(raw, self.max_chars).to_string();
        }

        let mut kept: Vec<char> = Vec::with_capacity(raw.len());
        for c in raw.chars() {
            kept.push(c);
            if let Some(pattern) = DENYLIST.iter().find(|p| ends_with_ignore_case(&kept, p)) {
                kept.truncate(kept.len() - pattern.len());
            }
        }

        kept.into_iter().take(self.max_chars).collect()
    }

    /// Sanitize and check the question is long enough to send
    ///
    /// Surrounding whitespace is trimmed before the length check.
    ///
    /// # Errors
    ///
    /// Returns `HoosWhoError::InvalidInput` when fewer than `min_chars`
    /// characters remain, or when the raw text exceeds [`MAX_RAW_BYTES`].
    pub fn validate_question(&self, raw: &str) -> std::result::Result<String, HoosWhoError> {
        if raw.len() > MAX_RAW_BYTES {
            return Err(HoosWhoError::InvalidInput {
                min_chars: self.min_chars,
            });
        }
        let sanitized = self.sanitize(raw);
        let question = sanitized.trim();
        if question.is_empty() || question.chars().count() < self.min_chars {
            return Err(HoosWhoError::InvalidInput {
                min_chars: self.min_chars,
            });
        }
        Ok(question.to_string())
    }
}

/// Sanitize with the default bounds
///
/// # Examples
///
/// ```
/// use hooswho::security::sanitize_input;
///
/// assert_eq!(sanitize_input("drop table students"), " students");
/// assert!(sanitize_input(&"a".repeat(900)).chars().count() <= 500);
/// ```
pub fn sanitize_input(raw: &str) -> String {
    Sanitizer::default().sanitize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains_denylisted(text: &str) -> bool {
        let lower = text.to_lowercase();
        DENYLIST.iter().any(|p| lower.contains(&p.to_lowercase()))
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize_input(""), "");
    }

    #[test]
    fn test_clean_input_unchanged() {
        assert_eq!(sanitize_input("Who works at ICF?"), "Who works at ICF?");
    }

    #[test]
    fn test_every_pattern_removed_in_any_casing() {
        for pattern in DENYLIST {
            let variants = [
                pattern.to_string(),
                pattern.to_lowercase(),
                pattern.to_uppercase(),
                pattern
                    .chars()
                    .enumerate()
                    .map(|(i, c)| {
                        if i % 2 == 0 {
                            c.to_ascii_uppercase()
                        } else {
                            c.to_ascii_lowercase()
                        }
                    })
                    .collect::<String>(),
            ];
            for variant in variants {
                let input = format!("before {} after", variant);
                let output = sanitize_input(&input);
                assert!(
                    !contains_denylisted(&output),
                    "pattern {:?} survived in {:?}",
                    variant,
                    output
                );
                assert!(output.starts_with("before "));
                assert!(output.ends_with(" after"));
            }
        }
    }

    #[test]
    fn test_spliced_pattern_removed() {
        let output = sanitize_input("<scr<script>ipt>alert(1)");
        assert!(!contains_denylisted(&output));
        assert_eq!(output, "alert(1)");
    }

    #[test]
    fn test_deeply_nested_splice_is_linear() {
        let depth = 32 * 1024;
        let input = format!("{}<script>{}", "<scr".repeat(depth), "ipt>".repeat(depth));
        assert!(input.len() >= 256 * 1024);

        let started = std::time::Instant::now();
        let output = Sanitizer::new(input.len(), 1).sanitize(&input);
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
        assert_eq!(output, "");
    }

    #[test]
    fn test_validate_rejects_oversized_raw_input() {
        let raw = format!("Who works at ICF? {}", "x".repeat(MAX_RAW_BYTES));
        let err = Sanitizer::default().validate_question(&raw).unwrap_err();
        assert!(matches!(err, HoosWhoError::InvalidInput { min_chars: 3 }));
    }

    #[test]
    fn test_validate_accepts_raw_input_at_byte_limit() {
        let raw = format!("ICF{}", " ".repeat(MAX_RAW_BYTES - 3));
        assert_eq!(Sanitizer::default().validate_question(&raw).unwrap(), "ICF");
    }

    #[test]
    fn test_nested_mixed_case_splice() {
        let output = sanitize_input("DROP DrOp TABLE TABLE x");
        assert!(!contains_denylisted(&output));
    }

    #[test]
    fn test_length_capped() {
        let output = sanitize_input(&"x".repeat(2000));
        assert_eq!(output.chars().count(), 500);
    }

    #[test]
    fn test_cap_applies_after_removal() {
        let input = format!("{}{}", "<script>".repeat(10), "y".repeat(500));
        assert_eq!(sanitize_input(&input), "y".repeat(500));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let input = "é".repeat(600);
        let output = sanitize_input(&input);
        assert_eq!(output.chars().count(), 500);
        assert!(output.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_custom_max_chars() {
        let sanitizer = Sanitizer::new(10, 3);
        assert_eq!(sanitizer.sanitize("abcdefghijklmnop"), "abcdefghij");
    }

    #[test]
    fn test_validate_rejects_short() {
        let err = Sanitizer::default().validate_question("hi").unwrap_err();
        assert!(matches!(err, HoosWhoError::InvalidInput { min_chars: 3 }));
    }

    #[test]
    fn test_validate_rejects_only_denylisted() {
        assert!(Sanitizer::default().validate_question("<script>eval(").is_err());
    }

    #[test]
    fn test_validate_rejects_whitespace() {
        assert!(Sanitizer::default().validate_question("      ").is_err());
    }

    #[test]
    fn test_validate_accepts_and_trims() {
        let question = Sanitizer::default()
            .validate_question("  Who works at ICF?  ")
            .unwrap();
        assert_eq!(question, "Who works at ICF?");
    }

    #[test]
    fn test_validate_exactly_min_length() {
        assert_eq!(
            Sanitizer::default().validate_question("ICF").unwrap(),
            "ICF"
        );
    }
}
