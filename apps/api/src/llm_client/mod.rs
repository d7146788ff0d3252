/// LLM Client: the single point of entry for all language-model calls in QuickCV.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// All LLM interactions MUST go through an `LlmProvider` from this module.
///
/// Adapters make exactly one request per `generate` call. Retry and fallback
/// policy belongs to the generation orchestrator, not here.
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub mod gemini;
pub mod openai;
pub mod prompts;

/// Sampling temperature for every provider.
pub const TEMPERATURE: f32 = 0.2;

// ────────────────────────────────────────────────────────────────────────────
// Provider identity
// ────────────────────────────────────────────────────────────────────────────

/// Closed set of supported providers. `OpenAi` is the primary provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    Gemini,
}

impl ProviderId {
    /// Resolves a caller-supplied provider name. Unrecognized names fall back to
    /// the primary provider instead of erroring.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "gemini" => ProviderId::Gemini,
            _ => ProviderId::OpenAi,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai",
            ProviderId::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProviderId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(ProviderId::from_name(&name))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} is not configured (missing API key)")]
    Unavailable { provider: ProviderId },

    #[error("{provider} request failed: {reason}")]
    RequestFailed { provider: ProviderId, reason: String },
}

impl ProviderError {
    pub fn request_failed(provider: ProviderId, reason: impl Into<String>) -> Self {
        ProviderError::RequestFailed {
            provider,
            reason: reason.into(),
        }
    }

    /// Maps a transport error, naming timeouts explicitly.
    fn from_http(provider: ProviderId, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::request_failed(provider, "request timed out")
        } else {
            ProviderError::request_failed(provider, format!("HTTP error: {err}"))
        }
    }
}

/// Error envelope shared by the OpenAI and Gemini APIs.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Builds a `RequestFailed` from a non-success response body.
fn api_failure(provider: ProviderId, status: u16, body: String) -> ProviderError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    ProviderError::request_failed(provider, format!("API error (status {status}): {message}"))
}

// ────────────────────────────────────────────────────────────────────────────
// Provider capability
// ────────────────────────────────────────────────────────────────────────────

/// Credentials and endpoint for one provider, read once from config at startup.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl ProviderSettings {
    /// Returns the API key when one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// One language-model backend. Every variant has the same contract:
/// a non-empty prompt in, the model's raw text out.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Whether a credential is present. An unconfigured provider fails every
    /// `generate` call with `ProviderError::Unavailable`.
    fn is_configured(&self) -> bool;

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// The full set of providers, one slot per `ProviderId`.
#[derive(Clone)]
pub struct ProviderSet {
    openai: Arc<dyn LlmProvider>,
    gemini: Arc<dyn LlmProvider>,
}

impl ProviderSet {
    pub fn new(openai: Arc<dyn LlmProvider>, gemini: Arc<dyn LlmProvider>) -> Self {
        Self { openai, gemini }
    }

    pub fn get(&self, id: ProviderId) -> &dyn LlmProvider {
        match id {
            ProviderId::OpenAi => self.openai.as_ref(),
            ProviderId::Gemini => self.gemini.as_ref(),
        }
    }

    /// Which providers currently have credentials, for the health endpoint.
    pub fn configured(&self) -> Vec<(ProviderId, bool)> {
        [ProviderId::OpenAi, ProviderId::Gemini]
            .into_iter()
            .map(|id| (id, self.get(id).is_configured()))
            .collect()
    }
}
