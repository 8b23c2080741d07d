//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::services::TextPolicy;

const APP_NAME: &str = "emojify";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path. Logs go to stderr when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emoji map file (TOML or JSON table of shortcode to source).
    #[serde(default)]
    pub emoji_map: Option<PathBuf>,

    /// Handling of text around shortcodes.
    #[serde(default)]
    pub text_policy: TextPolicy,

    /// Per-node filter timeout in milliseconds, 0 disables it.
    #[serde(default = "default_node_timeout_ms")]
    pub node_timeout_ms: u64,

    /// Detach text nodes emptied by the filter once the pass is done.
    #[serde(default = "default_true")]
    pub prune_empty_nodes: bool,

    /// Timeout for downloading remote emoji images.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Inline emoji entries, taking precedence over the map file.
    #[serde(default)]
    pub emoji: HashMap<String, String>,
}

fn default_node_timeout_ms() -> u64 {
    5000
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(emoji_map) = &args.emoji_map {
            self.emoji_map = Some(emoji_map.clone());
        }
        if let Some(text_policy) = args.text_policy {
            self.text_policy = text_policy;
        }
        if let Some(node_timeout_ms) = args.node_timeout_ms {
            self.node_timeout_ms = node_timeout_ms;
        }
        if let Some(prune) = args.prune_empty_nodes {
            self.prune_empty_nodes = prune;
        }
    }

    /// Per-node filter timeout.
    #[must_use]
    pub const fn node_timeout(&self) -> Duration {
        Duration::from_millis(self.node_timeout_ms)
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            emoji_map: None,
            text_policy: TextPolicy::default(),
            node_timeout_ms: default_node_timeout_ms(),
            prune_empty_nodes: true,
            http_timeout_secs: default_http_timeout_secs(),
            emoji: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
            log_level = "debug"
            emoji_map = "/etc/emoji.toml"
            text_policy = "interleaved"
            node_timeout_ms = 250

            [emoji]
            ":cat:" = "cat.png"
            ":+1:" = "https://example.com/thumbs.png"
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.emoji_map, Some(PathBuf::from("/etc/emoji.toml")));
        assert_eq!(config.text_policy, TextPolicy::Interleaved);
        assert_eq!(config.node_timeout(), Duration::from_millis(250));
        assert!(config.prune_empty_nodes); // default_true
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.emoji.len(), 2);
        assert_eq!(config.emoji.get(":cat:"), Some(&"cat.png".to_string()));
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.text_policy, TextPolicy::LeadingOnly);
        assert_eq!(config.node_timeout_ms, 5000);
        assert!(config.emoji.is_empty());
        assert!(config.log_path.is_none());
    }

    #[test]
    fn test_args_override_file_values() {
        let mut config: AppConfig = toml::from_str("node_timeout_ms = 10").expect("parse");
        let args = CliArgs::parse_from([
            "emojify",
            "--text-policy",
            "interleaved",
            "--node-timeout-ms",
            "0",
            "--prune-empty-nodes",
            "false",
            "--log-level",
            "warn",
        ]);

        config.merge_with_args(&args);

        assert_eq!(config.text_policy, TextPolicy::Interleaved);
        assert_eq!(config.node_timeout_ms, 0);
        assert!(!config.prune_empty_nodes);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert!(args.input.is_none());
    }
}
