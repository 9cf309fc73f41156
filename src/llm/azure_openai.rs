//! Azure OpenAI chat completion provider.
//!
//! The configured URL is the full deployment endpoint
//! (`…/openai/deployments/<name>/chat/completions?api-version=…`), so the
//! request body carries no model name. The key travels in the `api-key`
//! header. All wire types are private to this module.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::Config;
use crate::llm::{ProviderError, TEMPERATURE};

const API_KEY_HEADER: &str = "api-key";

/// Client for a single Azure OpenAI chat completions deployment.
///
/// Cheap to clone: `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct AzureOpenAiProvider {
    client: Client,
    api_url: String,
    api_key: String,
}

impl AzureOpenAiProvider {
    /// Build a provider for `api_url`, authenticating with `api_key`.
    ///
    /// The transport's default timeouts are kept as-is.
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;

        Ok(Self { client, api_url: api_url.into(), api_key: api_key.into() })
    }

    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Self::new(config.api_url.clone(), config.api_key.clone())
    }

    /// Send `system` and `content` as a two-message conversation and return
    /// the first choice's text unchanged.
    ///
    /// Both messages are trimmed before sending.
    pub async fn complete(&self, system: &str, content: &str) -> Result<String, ProviderError> {
        let payload = ChatCompletionRequest {
            messages: vec![
                Message { role: "system", content: system.trim() },
                Message { role: "user", content: content.trim() },
            ],
            temperature: TEMPERATURE,
        };

        debug!(
            url = %self.api_url,
            system_len = payload.messages[0].content.len(),
            content_len = payload.messages[1].content.len(),
            "sending completion request"
        );
        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
            trace!(payload = %json, "full completion request payload");
        }

        let response = self
            .client
            .post(&self.api_url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let response = check_status(response).await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let parsed: ChatCompletionResponse =
            serde_json::from_slice(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;

        debug!(choices = parsed.choices.len(), "received completion response");

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or(ProviderError::EmptyCompletion)
    }
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    messages: Vec<Message<'a>>,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// Error envelope used by OpenAI and Azure OpenAI.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

/// Pass a successful response through, or turn it into [`ProviderError::Http`].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(env) => match env.error.code {
            Some(serde_json::Value::String(code)) => format!("[{code}] {}", env.error.message),
            Some(code) => format!("[{code}] {}", env.error.message),
            None => env.error.message,
        },
        Err(_) => body.trim().to_string(),
    };

    debug!(%status, %message, "completion request returned HTTP error");
    Err(ProviderError::Http { status: status.as_u16(), message })
}
