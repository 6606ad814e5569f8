use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use tracing::info;

use memod::{
    completion::OpenAiClient, config::Config, rest, storage::Storage, AppContext,
};

#[derive(Parser)]
#[command(
    name = "memod",
    about = "Memo service — drafts and revises three-section business memos",
    version
)]
struct Args {
    /// HTTP server port
    #[arg(long, env = "MEMOD_PORT")]
    port: Option<u16>,

    /// Bind address (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "MEMOD_BIND")]
    bind_address: Option<String>,

    /// SQLite database path
    #[arg(long, env = "MEMOD_DB")]
    database: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MEMOD_LOG")]
    log: Option<String>,

    /// Config file path (default: memod.toml in the working directory)
    #[arg(long, env = "MEMOD_CONFIG")]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::new(
        args.port,
        args.bind_address,
        args.database,
        args.log,
        args.config,
    );
    init_tracing(&config);

    info!(version = env!("CARGO_PKG_VERSION"), "memod starting");

    let api_key = config
        .api_key
        .clone()
        .context("OPENAI_API_KEY is not set")?;
    let storage = Storage::init(&config.database_path).await?;
    let completion = OpenAiClient::new(&config, api_key)?;

    let ctx = Arc::new(AppContext {
        config: Arc::new(config),
        storage,
        completion: Arc::new(completion),
        started_at: std::time::Instant::now(),
    });

    rest::serve(ctx).await
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log));
    if config.log_format == "json" {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).compact().init();
    }
}
