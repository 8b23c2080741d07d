//! Image source fetch error types.

use thiserror::Error;

/// Failure to obtain the original bytes behind an image source reference.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum FetchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request for {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("invalid data URI: {reason}")]
    InvalidDataUri { reason: String },
}

impl FetchError {
    /// Creates an I/O error for a path.
    #[must_use]
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a transport error.
    #[must_use]
    pub fn http(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a malformed data URI error.
    #[must_use]
    pub fn invalid_data_uri(reason: impl Into<String>) -> Self {
        Self::InvalidDataUri {
            reason: reason.into(),
        }
    }

    /// Returns whether the failure came from the network.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Status { .. })
    }
}
