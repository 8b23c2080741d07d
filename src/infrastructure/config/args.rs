use super::app_config::LogLevel;
use crate::application::services::TextPolicy;
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments, each overriding the matching config value.
#[derive(Debug, Parser)]
#[command(
    name = "emojify",
    version,
    about = "Replaces emoji shortcodes in text with inline data URI images",
    long_about = None
)]
pub struct CliArgs {
    /// Input text file. Reads stdin when omitted.
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Emoji map file (TOML or JSON).
    #[arg(short, long, value_name = "PATH", env = "EMOJIFY_MAP")]
    pub emoji_map: Option<PathBuf>,

    /// Handling of text around shortcodes.
    #[arg(long, value_enum)]
    pub text_policy: Option<TextPolicy>,

    /// Per-node filter timeout in milliseconds, 0 disables it.
    #[arg(long, value_name = "MS")]
    pub node_timeout_ms: Option<u64>,

    /// Detach emptied text nodes after filtering.
    #[arg(long)]
    pub prune_empty_nodes: Option<bool>,
}
