use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::error;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
const DEFAULT_DB_PATH: &str = "memo.db";
const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `memod.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// HTTP server port (default: 8000).
    port: Option<u16>,
    /// Bind address (default: "127.0.0.1").
    bind_address: Option<String>,
    /// SQLite database path (default: "memo.db").
    database: Option<PathBuf>,
    /// Completion API base URL (default: https://api.openai.com/v1).
    api_base_url: Option<String>,
    /// Completion model identifier (default: gpt-4o-mini).
    model: Option<String>,
    /// Completion request timeout in seconds (default: 60).
    request_timeout_secs: Option<u64>,
    /// Log level filter string, e.g. "debug", "info,memod=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default) | "json".
    log_format: Option<String>,
}

fn load_toml(path: &Path) -> Option<TomlConfig> {
    let contents = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config file — using defaults");
            None
        }
    }
}

// ─── Config ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind_address: String,
    pub database_path: PathBuf,
    /// Completion API base URL (OPENAI_BASE_URL env var overrides).
    pub api_base_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
    pub log: String,
    /// "pretty" (default) | "json" (structured for log aggregators).
    pub log_format: String,
    /// Completion API credential (OPENAI_API_KEY env var only — never TOML).
    /// None makes startup fail; no process-wide singleton holds it.
    pub api_key: Option<String>,
}

impl Config {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file (default path: `memod.toml` in the working directory)
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        bind_address: Option<String>,
        database: Option<PathBuf>,
        log: Option<String>,
        config_path: Option<PathBuf>,
    ) -> Self {
        let config_path = config_path.unwrap_or_else(|| PathBuf::from("memod.toml"));
        let toml = load_toml(&config_path).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let bind_address = bind_address
            .or(toml.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let database_path = database
            .or(toml.database)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let api_base_url = std::env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let model = std::env::var("MEMOD_MODEL")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let request_timeout_secs = toml
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let log_format = std::env::var("MEMOD_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|s| !s.is_empty());

        Self {
            port,
            bind_address,
            database_path,
            api_base_url,
            model,
            request_timeout_secs,
            log,
            log_format,
            api_key,
        }
    }
}
