//! OpenAI-style chat completion adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompts::JSON_ONLY_SYSTEM;
use super::{api_failure, LlmProvider, ProviderError, ProviderId, ProviderSettings, TEMPERATURE};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if it carries any non-blank content.
    fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

fn build_request<'a>(model: &'a str, prompt: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        temperature: TEMPERATURE,
        response_format: ResponseFormat {
            format_type: "json_object",
        },
        messages: vec![
            ChatMessage {
                role: "system",
                content: JSON_ONLY_SYSTEM,
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ],
    }
}

/// Calls `{base_url}/chat/completions` with a JSON-only response format.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    settings: ProviderSettings,
}

impl OpenAiProvider {
    pub fn new(client: Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn is_configured(&self) -> bool {
        self.settings.api_key().is_some()
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let provider = self.id();
        let api_key = self
            .settings
            .api_key()
            .ok_or(ProviderError::Unavailable { provider })?;

        let url = format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&build_request(&self.settings.model, prompt))
            .send()
            .await
            .map_err(|e| ProviderError::from_http(provider, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_failure(provider, status.as_u16(), body));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::from_http(provider, e))?;

        if let Some(usage) = &body.usage {
            debug!(
                "OpenAI call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        body.text()
            .map(str::to_owned)
            .ok_or_else(|| ProviderError::request_failed(provider, "response contained no text"))
    }
}
