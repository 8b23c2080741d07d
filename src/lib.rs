//! Emojify - emoji shortcode filter for rendered documents.
//!
//! This crate replaces shortcodes such as `:smile:` inside document text
//! nodes with inline `<img class="emoji">` elements whose source is a
//! self-contained data URI, for use as one pass of a sanitising renderer.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the filter and the pass driving it.
pub mod application;
/// Domain layer containing the document model, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing configuration and image adapters.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "emojify";
