//! Port definition for obtaining original image bytes.

use bytes::Bytes;

use crate::domain::errors::FetchError;

/// Resolves an image source reference to its raw, still-encoded bytes.
/// Implementations must be thread-safe.
#[async_trait::async_trait]
pub trait ImageFetchPort: Send + Sync {
    /// Fetches the bytes behind `source`.
    async fn fetch(&self, source: &str) -> Result<Bytes, FetchError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;

    /// In-memory fetcher keyed by source reference.
    #[derive(Default)]
    pub struct MockImageFetcher {
        images: HashMap<String, Bytes>,
    }

    impl MockImageFetcher {
        /// Creates an empty fetcher where every source is missing.
        pub fn new() -> Self {
            Self::default()
        }

        /// Registers bytes for a source.
        pub fn with_image(mut self, source: &str, bytes: impl Into<Bytes>) -> Self {
            self.images.insert(source.to_string(), bytes.into());
            self
        }
    }

    #[async_trait::async_trait]
    impl ImageFetchPort for MockImageFetcher {
        async fn fetch(&self, source: &str) -> Result<Bytes, FetchError> {
            self.images.get(source).cloned().ok_or_else(|| {
                FetchError::io(
                    source,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "not registered"),
                )
            })
        }
    }
}
