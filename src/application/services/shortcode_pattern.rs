//! Single compiled pattern matching any known shortcode.

use regex::Regex;
use tracing::{debug, error};

use crate::domain::entities::EmojiMap;

/// A byte range of one shortcode occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcodeMatch {
    /// Start byte offset.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl ShortcodeMatch {
    /// Returns the matched shortcode within `text`.
    #[must_use]
    pub fn as_str<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }
}

/// Alternation over every shortcode of an [`EmojiMap`], each matched literally.
#[derive(Debug, Clone)]
pub struct ShortcodePattern {
    regex: Regex,
}

impl ShortcodePattern {
    /// Compiles the pattern for `emoji`.
    ///
    /// Returns `None` when the mapping has no non-empty shortcode, since an
    /// empty alternation would match everywhere.
    #[must_use]
    pub fn compile(emoji: &EmojiMap) -> Option<Self> {
        let mut keys: Vec<&str> = emoji.shortcodes().filter(|key| !key.is_empty()).collect();
        if keys.is_empty() {
            return None;
        }
        // Longest first so a shortcode never loses to one of its prefixes.
        keys.sort_unstable_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let alternation = keys
            .iter()
            .map(|key| regex::escape(key))
            .collect::<Vec<_>>()
            .join("|");

        match Regex::new(&format!("(?:{alternation})")) {
            Ok(regex) => {
                debug!(shortcodes = keys.len(), "Compiled shortcode pattern");
                Some(Self { regex })
            }
            Err(e) => {
                error!(error = %e, "Failed to compile shortcode pattern");
                None
            }
        }
    }

    /// Returns every non-overlapping occurrence, left to right.
    #[must_use]
    pub fn find_all(&self, text: &str) -> Vec<ShortcodeMatch> {
        self.regex
            .find_iter(text)
            .map(|m| ShortcodeMatch {
                start: m.start(),
                end: m.end(),
            })
            .collect()
    }

    /// Returns the compiled pattern source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
