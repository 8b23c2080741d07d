//! Port definition for image materialisation.

/// Turns an image source reference into a self-contained data URI.
///
/// The operation always resolves. An empty string means "no image
/// available"; callers may still emit an element with an empty source.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImageMaterializerPort: Send + Sync {
    /// Loads `source` and returns its pixels as a data URI, or `""`.
    async fn materialize(&self, source: &str) -> String;
}
