use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::MODEL;

/// Application configuration loaded from environment variables.
///
/// The generation API key is optional at startup: the client is built lazily on the
/// first report request, which fails with a generation error if the key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub llm_model: String,
    pub llm_timeout: Duration,
    /// Directory for per-artifact prompt audit files. `None` disables auditing.
    pub prompt_audit_dir: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_timeout_secs = std::env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "90".to_string())
            .parse::<u64>()
            .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| MODEL.to_string()),
            llm_timeout: Duration::from_secs(llm_timeout_secs),
            prompt_audit_dir: optional_env("PROMPT_AUDIT_DIR").map(PathBuf::from),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an environment variable, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
