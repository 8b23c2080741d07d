//! Image materialisation error types.

use thiserror::Error;

use super::FetchError;

/// Failure while turning an image source into a data URI.
///
/// Never crosses the materializer boundary: callers only see the empty
/// string that stands for "no image available".
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum MaterializeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to draw image: {0}")]
    Render(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("render task failed: {0}")]
    Task(String),
}
