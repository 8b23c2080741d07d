//! Resolves image source references to raw bytes.
//!
//! Supported forms:
//! - `http://` and `https://` URLs, downloaded with a shared client
//! - `data:<mime>;base64,<payload>` URIs, decoded in place
//! - `file://` URLs and plain paths, relative ones joined to a base directory

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use bytes::Bytes;
use tracing::{debug, trace};

use crate::domain::errors::FetchError;
use crate::domain::ports::ImageFetchPort;

/// Configuration for the source fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Directory relative paths are resolved against.
    pub base_dir: Option<PathBuf>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            base_dir: None,
        }
    }
}

/// Fetches image bytes from the network, the filesystem or inline data URIs.
pub struct SourceFetcher {
    http_client: reqwest::Client,
    base_dir: Option<PathBuf>,
}

impl std::fmt::Debug for SourceFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFetcher")
            .field("base_dir", &self.base_dir)
            .finish_non_exhaustive()
    }
}

impl SourceFetcher {
    /// Creates a fetcher with the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::http("", format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_dir: config.base_dir,
        })
    }

    /// Resolves a path-like source against the base directory.
    #[must_use]
    pub fn resolve_path(&self, source: &str) -> PathBuf {
        let raw = source.strip_prefix("file://").unwrap_or(source);
        let path = Path::new(raw);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    async fn download(&self, url: &str) -> Result<Bytes, FetchError> {
        debug!(url, "Downloading emoji image");
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::http(url, format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| FetchError::http(url, format!("Failed to read body: {e}")))
    }

    async fn read_file(&self, source: &str) -> Result<Bytes, FetchError> {
        let path = self.resolve_path(source);
        trace!(path = %path.display(), "Reading emoji image");
        tokio::fs::read(&path)
            .await
            .map(Bytes::from)
            .map_err(|e| FetchError::io(path.display().to_string(), e))
    }
}

#[async_trait::async_trait]
impl ImageFetchPort for SourceFetcher {
    async fn fetch(&self, source: &str) -> Result<Bytes, FetchError> {
        if source.starts_with("data:") {
            decode_data_uri(source)
        } else if source.starts_with("http://") || source.starts_with("https://") {
            self.download(source).await
        } else {
            self.read_file(source).await
        }
    }
}

/// Decodes the payload of a base64 `data:` URI.
///
/// # Errors
/// Returns error if the URI has no payload or is not base64 encoded.
pub fn decode_data_uri(uri: &str) -> Result<Bytes, FetchError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| FetchError::invalid_data_uri("missing data: scheme"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| FetchError::invalid_data_uri("missing payload separator"))?;
    if !header.ends_with(";base64") {
        return Err(FetchError::invalid_data_uri("only base64 payloads are supported"));
    }

    BASE64_STANDARD
        .decode(payload.trim())
        .map(Bytes::from)
        .map_err(|e| FetchError::invalid_data_uri(e.to_string()))
}
