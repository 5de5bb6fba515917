use anyhow::{Context, Result};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-001";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    pub openrouter_base_url: String,
    pub openrouter_model: String,
    /// Sent as `HTTP-Referer` so OpenRouter can attribute traffic to the app.
    pub app_url: Option<String>,
    /// Sent as `X-Title`.
    pub app_title: Option<String>,
    pub llm_timeout_secs: u64,
    /// When set, conversations and drafts live in Redis instead of on disk.
    pub redis_url: Option<String>,
    pub storage_dir: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            openrouter_api_key: optional("OPENROUTER_API_KEY").with_context(|| {
                "Required environment variable 'OPENROUTER_API_KEY' is not set".to_string()
            })?,
            openrouter_base_url: optional("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            openrouter_model: optional("OPENROUTER_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            app_url: optional("APP_URL"),
            app_title: optional("APP_TITLE"),
            llm_timeout_secs: optional("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|| "120".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            redis_url: optional("REDIS_URL"),
            storage_dir: optional("STORAGE_DIR").unwrap_or_else(|| "./data".to_string()),
            port: optional("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
