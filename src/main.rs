use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use emojify::application::{EmojiFilter, FilterPass};
use emojify::domain::{Document, NodeFilter};
use emojify::infrastructure::{
    AppConfig, CliArgs, ConfigNotice, FetcherConfig, RasterMaterializer, SourceFetcher,
    StorageManager,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<(AppConfig, Option<ConfigNotice>)> {
    let storage = match &args.config {
        Some(path) => StorageManager::with_dir(
            path.parent()
                .map(std::path::Path::to_path_buf)
                .unwrap_or_default(),
        ),
        None => StorageManager::new()?,
    };

    let (mut config, notice) = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok((config, notice))
}

async fn read_input(args: &CliArgs) -> Result<String> {
    if let Some(path) = &args.input {
        return tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("Failed to read {}", path.display()));
    }

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .wrap_err("Failed to read stdin")?;
    Ok(input)
}

fn build_pass(config: &AppConfig) -> Result<FilterPass> {
    let emoji = StorageManager::resolve_emoji_map(config)?;
    info!(shortcodes = emoji.len(), policy = %config.text_policy, "Emoji map ready");

    let fetcher = SourceFetcher::new(FetcherConfig {
        timeout_secs: config.http_timeout_secs,
        base_dir: None,
    })?;
    let materializer = Arc::new(RasterMaterializer::new(Arc::new(fetcher)));
    let filter: Arc<dyn NodeFilter> = Arc::new(EmojiFilter::with_policy(
        emoji,
        materializer,
        config.text_policy,
    ));

    Ok(FilterPass::new(vec![filter])
        .with_node_timeout(config.node_timeout())
        .with_pruning(config.prune_empty_nodes))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let (config, notice) = load_config(&args)?;

    init_logging(&config)?;
    if let Some(notice) = &notice {
        notice.log();
    }

    info!(version = emojify::VERSION, "Starting {}", emojify::NAME);

    let pass = build_pass(&config)?;
    let input = read_input(&args).await?;

    let mut document = Document::from_plain_text(&input);
    let root = document.root();
    let report = pass.run(&mut document, root).await;

    info!(
        visited = report.visited,
        emptied = report.emptied,
        timed_out = report.timed_out,
        "Document filtered"
    );
    println!("{}", document.to_html(root));

    Ok(())
}
