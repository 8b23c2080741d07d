//! Shortcode to image source mapping.

use std::collections::HashMap;

/// Immutable mapping from shortcode (e.g. `:smile:`) to an image source
/// reference (path, `file://`, `http(s)://` or `data:` URI).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmojiMap(HashMap<String, String>);

impl EmojiMap {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the source for a shortcode.
    #[must_use]
    pub fn get(&self, shortcode: &str) -> Option<&str> {
        self.0.get(shortcode).map(String::as_str)
    }

    /// Iterates over all shortcodes in unspecified order.
    pub fn shortcodes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds entries from `other`, replacing existing shortcodes.
    #[must_use]
    pub fn merged(mut self, other: Self) -> Self {
        self.0.extend(other.0);
        self
    }
}

impl<K, V> FromIterator<(K, V)> for EmojiMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl From<HashMap<String, String>> for EmojiMap {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}
