//! Application configuration.

/// Configuration values and their defaults.
pub mod app_config;
/// Command line arguments.
pub mod args;
/// Config file and emoji map persistence.
pub mod storage;

pub use app_config::{AppConfig, LogLevel};
pub use args::CliArgs;
pub use storage::{ConfigError, ConfigNotice, StorageManager};
