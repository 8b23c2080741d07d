//! Domain entity definitions.

mod document;
mod emoji_map;

pub use document::{Document, Element, NodeData, NodeId};
pub use emoji_map::EmojiMap;
