//! Shortcode to inline image filter.
//!
//! Scans a text node for shortcodes, materialises each referenced image as a
//! data URI and splices `<img class="emoji">` elements into the document.
//!
//! The filtered node is never removed: its text is cleared in place and the
//! replacement nodes are appended as the last children of its parent. An
//! external walker holding the node's id keeps a valid position.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::domain::entities::{Document, Element, EmojiMap, NodeId};
use crate::domain::ports::{ImageMaterializerPort, NodeFilter};

use super::shortcode_pattern::{ShortcodeMatch, ShortcodePattern};

/// CSS class carried by every produced image.
pub const EMOJI_CLASS: &str = "emoji";

/// What happens to plain text around the shortcodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TextPolicy {
    /// Keep only the text before the first shortcode, then the images.
    #[default]
    LeadingOnly,
    /// Keep the text between and after shortcodes as well.
    Interleaved,
}

impl std::fmt::Display for TextPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LeadingOnly => write!(f, "leading-only"),
            Self::Interleaved => write!(f, "interleaved"),
        }
    }
}

/// A node of the replacement fragment, not yet inserted in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentNode {
    /// Plain text.
    Text(String),
    /// An emoji image with its data URI source (possibly empty).
    Image {
        /// The shortcode this image stands for.
        shortcode: String,
        /// Data URI, or `""` when the image was unavailable.
        src: String,
    },
}

/// Ordered nodes standing in for the original text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementFragment {
    /// Text before the first shortcode.
    pub leading: String,
    /// Images, and gap text under [`TextPolicy::Interleaved`].
    pub nodes: Vec<FragmentNode>,
}

impl ReplacementFragment {
    /// Number of image nodes.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, FragmentNode::Image { .. }))
            .count()
    }
}

/// Replaces emoji shortcodes in text nodes with inline images.
pub struct EmojiFilter {
    emoji: EmojiMap,
    pattern: Option<ShortcodePattern>,
    materializer: Arc<dyn ImageMaterializerPort>,
    policy: TextPolicy,
}

impl std::fmt::Debug for EmojiFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmojiFilter")
            .field("shortcodes", &self.emoji.len())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl EmojiFilter {
    /// Creates a filter that keeps only the leading text.
    #[must_use]
    pub fn new(emoji: EmojiMap, materializer: Arc<dyn ImageMaterializerPort>) -> Self {
        Self::with_policy(emoji, materializer, TextPolicy::default())
    }

    /// Creates a filter with an explicit text policy.
    #[must_use]
    pub fn with_policy(
        emoji: EmojiMap,
        materializer: Arc<dyn ImageMaterializerPort>,
        policy: TextPolicy,
    ) -> Self {
        let pattern = ShortcodePattern::compile(&emoji);
        Self {
            emoji,
            pattern,
            materializer,
            policy,
        }
    }

    /// Returns the active text policy.
    #[must_use]
    pub const fn policy(&self) -> TextPolicy {
        self.policy
    }

    /// Replaces shortcodes in `node` with emoji images.
    ///
    /// Does nothing unless the node has an element parent and text containing
    /// `:` that matches at least one shortcode. Images are materialised one at
    /// a time in match order; the document is only touched after the last one
    /// resolved, so dropping this future leaves it unchanged.
    ///
    /// A node that was already filtered has empty text, so calling this again
    /// is a no-op.
    pub async fn filter(&self, document: &mut Document, node: NodeId) {
        let Some(parent) = document.parent_element(node) else {
            return;
        };
        let Some(text) = document.text_content(node) else {
            return;
        };
        if !text.contains(':') {
            return;
        }
        let Some(pattern) = self.pattern.as_ref() else {
            return;
        };

        let matches = pattern.find_all(&text);
        if matches.is_empty() {
            trace!(node = %node, "No shortcode in text");
            return;
        }

        let fragment = self.build_fragment(&text, &matches).await;
        debug!(
            node = %node,
            matches = matches.len(),
            images = fragment.image_count(),
            "Splicing emoji images"
        );

        Self::splice(document, node, parent, fragment);
    }

    async fn build_fragment(
        &self,
        text: &str,
        matches: &[ShortcodeMatch],
    ) -> ReplacementFragment {
        let mut fragment = ReplacementFragment {
            leading: text[..matches[0].start].to_string(),
            nodes: Vec::with_capacity(matches.len() * 2),
        };

        let mut cursor = matches[0].start;
        for m in matches {
            if self.policy == TextPolicy::Interleaved && m.start > cursor {
                fragment
                    .nodes
                    .push(FragmentNode::Text(text[cursor..m.start].to_string()));
            }
            cursor = m.end;

            let shortcode = m.as_str(text);
            let Some(source) = self.emoji.get(shortcode) else {
                trace!(shortcode, "Shortcode missing from mapping, skipping");
                continue;
            };

            let src = self.materializer.materialize(source).await;
            if src.is_empty() {
                debug!(shortcode, source, "Emoji image unavailable");
            }
            fragment.nodes.push(FragmentNode::Image {
                shortcode: shortcode.to_string(),
                src,
            });
        }

        if self.policy == TextPolicy::Interleaved && cursor < text.len() {
            fragment
                .nodes
                .push(FragmentNode::Text(text[cursor..].to_string()));
        }

        fragment
    }

    fn splice(
        document: &mut Document,
        node: NodeId,
        parent: NodeId,
        fragment: ReplacementFragment,
    ) {
        document.set_text_content(node, "");

        let leading = document.create_text(fragment.leading);
        document.append_child(parent, leading);

        for item in fragment.nodes {
            let child = match item {
                FragmentNode::Text(text) => document.create_text(text),
                FragmentNode::Image { src, .. } => document.create_element(
                    Element::new("img")
                        .with_class(EMOJI_CLASS)
                        .with_attribute("src", src),
                ),
            };
            document.append_child(parent, child);
        }
    }
}

#[async_trait]
impl NodeFilter for EmojiFilter {
    fn name(&self) -> &'static str {
        "emoji"
    }

    async fn filter(&self, document: &mut Document, node: NodeId) {
        EmojiFilter::filter(self, document, node).await;
    }
}
