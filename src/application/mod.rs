//! Application layer with the emoji filter and the pass that drives it.

/// Filter, pattern and traversal services.
pub mod services;

pub use services::{EmojiFilter, FilterPass, PassReport, TextPolicy, TreeWalker};
