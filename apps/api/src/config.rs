use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Application configuration loaded from environment variables.
/// Every variable has a default; only a malformed `PORT` fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    /// Optional at startup; job structuring reports it missing when called.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            backend_url: env_or("BACKEND_URL", DEFAULT_BACKEND_URL),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_model: env_or("OPENAI_MODEL", DEFAULT_MODEL),
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            port: parse_port(std::env::var("PORT").ok().as_deref())?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_port(value: Option<&str>) -> Result<u16> {
    value
        .unwrap_or("8080")
        .parse::<u16>()
        .context("PORT must be a valid port number")
}
