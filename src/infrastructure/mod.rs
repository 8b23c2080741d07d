//! Infrastructure layer with configuration and image adapters.

/// Application configuration.
pub mod config;
/// Image handling (fetching, rasterisation).
pub mod image;

pub use config::{AppConfig, CliArgs, ConfigError, ConfigNotice, LogLevel, StorageManager};
pub use self::image::{FetcherConfig, RasterMaterializer, SourceFetcher};
