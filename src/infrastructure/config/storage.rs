use super::app_config::AppConfig;
use crate::domain::entities::EmojiMap;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while reading or writing configuration files.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("json deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported emoji map format: {0}")]
    UnsupportedMapFormat(PathBuf),
}

/// Something worth reporting about how the config was obtained.
///
/// Config is loaded before logging exists, so these are handed back to the
/// caller to log once a subscriber is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigNotice {
    /// No file existed and a default one was written.
    CreatedDefault(PathBuf),
    /// The file could not be parsed and defaults are used instead.
    Malformed {
        /// Offending file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },
}

impl ConfigNotice {
    /// Emits the notice through `tracing`.
    pub fn log(&self) {
        match self {
            Self::CreatedDefault(path) => {
                info!(path = %path.display(), "Config file not found, created default");
            }
            Self::Malformed { path, reason } => {
                warn!(
                    path = %path.display(),
                    error = %reason,
                    "Failed to parse config file, using defaults"
                );
            }
        }
    }
}

/// Reads and writes the config file and emoji maps.
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Create a new `StorageManager`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration directory cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = AppConfig::default_config_dir().ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self { config_dir })
    }

    /// Creates a new `StorageManager` with a specific directory (useful for testing).
    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// Ensures the configuration directory exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created.
    pub fn ensure_config_dir(&self) -> Result<(), ConfigError> {
        if !self.config_dir.exists() {
            info!("Creating configuration directory at {:?}", self.config_dir);
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Loads the application configuration.
    ///
    /// A missing file is created with defaults. A malformed file is left
    /// alone and defaults are used. Either case comes back as a
    /// [`ConfigNotice`] for the caller to log.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or created.
    pub fn load_config(
        &self,
        path_override: Option<&Path>,
    ) -> Result<(AppConfig, Option<ConfigNotice>), ConfigError> {
        let config_path = path_override.map_or_else(
            || self.config_dir.join(CONFIG_FILE_NAME),
            std::path::Path::to_path_buf,
        );

        let (mut config, notice) = if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            match toml::from_str::<AppConfig>(&content) {
                Ok(config) => (config, None),
                Err(e) => {
                    let notice = ConfigNotice::Malformed {
                        path: config_path.clone(),
                        reason: e.to_string(),
                    };
                    (AppConfig::default(), Some(notice))
                }
            }
        } else {
            let default_config = AppConfig::default();
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            Self::save_to_file(&config_path, &default_config)?;
            (
                default_config,
                Some(ConfigNotice::CreatedDefault(config_path.clone())),
            )
        };

        config.config = Some(config_path);
        Ok((config, notice))
    }

    /// Saves the application configuration to its effective path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be written.
    pub fn save_config(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.ensure_config_dir()?;
        let path = config
            .config
            .clone()
            .unwrap_or_else(|| self.config_dir.join(CONFIG_FILE_NAME));
        Self::save_to_file(&path, config)
    }

    /// Loads an emoji map file.
    ///
    /// The file is a flat table of shortcode to source, as TOML (`.toml`) or
    /// JSON (`.json`). Relative file sources are resolved against the
    /// directory holding the map.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load_emoji_map(path: &Path) -> Result<EmojiMap, ConfigError> {
        let content = fs::read_to_string(path)?;
        let entries: HashMap<String, String> =
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => toml::from_str(&content)?,
                Some("json") => serde_json::from_str(&content)?,
                _ => return Err(ConfigError::UnsupportedMapFormat(path.to_path_buf())),
            };

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        debug!(path = %path.display(), entries = entries.len(), "Loaded emoji map");
        Ok(resolve_sources(base, entries))
    }

    /// Builds the effective emoji map for a configuration.
    ///
    /// Entries from the map file come first; inline `[emoji]` entries,
    /// resolved against the config file's directory, override them.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the map file cannot be loaded.
    pub fn resolve_emoji_map(config: &AppConfig) -> Result<EmojiMap, ConfigError> {
        let from_file = match &config.emoji_map {
            Some(path) => Self::load_emoji_map(path)?,
            None => EmojiMap::new(),
        };

        let config_dir = config
            .config
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new(""));
        let inline = resolve_sources(config_dir, config.emoji.clone());

        let emoji = from_file.merged(inline);
        if emoji.is_empty() {
            warn!("No emoji shortcodes configured");
        }
        Ok(emoji)
    }

    fn save_to_file<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(data)?;

        let parent = path
            .parent()
            .ok_or_else(|| std::io::Error::other("Invalid path"))?;
        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(path).map_err(|e| e.error)?;

        Ok(())
    }
}

fn resolve_sources(base: &Path, entries: HashMap<String, String>) -> EmojiMap {
    entries
        .into_iter()
        .map(|(shortcode, source)| {
            let source = resolve_source(base, &source);
            (shortcode, source)
        })
        .collect()
}

/// Joins relative file sources to `base`; URLs and absolute paths pass through.
fn resolve_source(base: &Path, source: &str) -> String {
    let is_url = ["http://", "https://", "data:", "file://"]
        .iter()
        .any(|scheme| source.starts_with(scheme));
    if is_url || Path::new(source).is_absolute() || base.as_os_str().is_empty() {
        return source.to_string();
    }
    base.join(source).to_string_lossy().into_owned()
}
