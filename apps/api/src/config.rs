use anyhow::{Context, Result};

use crate::llm_client::{gemini, openai, ProviderSettings};

/// Default upper bound on a single provider call.
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 8;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
///
/// Provider API keys are optional: a missing key makes that provider
/// unavailable and every generation through it degrades to local content.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub openai: ProviderSettings,
    pub gemini: ProviderSettings,
    pub provider_timeout_secs: u64,
    /// Base URL rendered document paths are joined onto.
    pub public_base_url: String,
    /// Allowed CORS origin.
    pub frontend_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            openai: ProviderSettings {
                api_key: optional_env("OPENAI_API_KEY"),
                model: env_or("OPENAI_MODEL", openai::DEFAULT_MODEL),
                base_url: env_or("OPENAI_BASE_URL", openai::DEFAULT_BASE_URL),
            },
            gemini: ProviderSettings {
                api_key: optional_env("GEMINI_API_KEY"),
                model: env_or("GEMINI_MODEL", gemini::DEFAULT_MODEL),
                base_url: env_or("GEMINI_BASE_URL", gemini::DEFAULT_BASE_URL),
            },
            provider_timeout_secs: env_or(
                "PROVIDER_TIMEOUT_SECS",
                &DEFAULT_PROVIDER_TIMEOUT_SECS.to_string(),
            )
            .parse::<u64>()
            .context("PROVIDER_TIMEOUT_SECS must be a whole number of seconds")?,
            public_base_url: env_or("PUBLIC_BASE_URL", "http://localhost:8080"),
            frontend_url: env_or("FRONTEND_URL", "http://localhost:5173"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}
