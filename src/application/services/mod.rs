pub mod emoji_filter;
pub mod filter_pass;
pub mod shortcode_pattern;
pub mod tree_walker;


pub use emoji_filter::{EMOJI_CLASS, EmojiFilter, FragmentNode, ReplacementFragment, TextPolicy};
pub use filter_pass::{FilterPass, PassReport};
pub use shortcode_pattern::{ShortcodeMatch, ShortcodePattern};
pub use tree_walker::TreeWalker;
