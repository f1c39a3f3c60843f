//! OpenRouter chat-completions client.
//!
//! Speaks the OpenAI-compatible `/chat/completions` endpoint, which is what
//! OpenRouter exposes for every routed model.
//! See: <https://openrouter.ai/docs/api-reference/chat-completion>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::traits::ChatProvider;
use crate::types::{ChatOptions, ChatResponse, Message, ResponseFormat, Usage};
use crate::{Result, WartaError};

/// Default base URL for the OpenRouter API
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Upper bound on a single HTTP exchange. Per-tier timeouts are enforced by
/// the orchestrator and are always shorter.
const HTTP_TIMEOUT: Duration = Duration::from_secs(90);

/// Client for OpenRouter (or any OpenAI-compatible) chat completions.
#[derive(Clone)]
pub struct OpenRouterClient {
    api_key: Option<String>,
    http: Client,
    base_url: String,
}

impl OpenRouterClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: Option<impl Into<String>>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(
        api_key: Option<impl Into<String>>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| WartaError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.map(Into::into),
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Check response status and map to appropriate error.
    async fn handle_response_errors(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(WartaError::RateLimited { retry_after })
            }
            code => {
                let body = response.text().await.unwrap_or_default();
                let message = extract_error_message(&body).unwrap_or_else(|| status.to_string());
                Err(WartaError::Api {
                    status: code,
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl ChatProvider for OpenRouterClient {
    fn name(&self) -> &str {
        "openrouter"
    }

    #[instrument(name = "openrouter.chat", skip(self, messages, options), fields(model = %options.model))]
    async fn chat(&self, messages: &[Message], options: &ChatOptions) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = CompletionRequest {
            model: &options.model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            response_format: options.response_format.map(|format| ResponseFormatBody {
                kind: match format {
                    ResponseFormat::Text => "text",
                    ResponseFormat::JsonObject => "json_object",
                },
            }),
            provider: options.routing.as_ref(),
        };

        let mut request = self.http.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| WartaError::Http(e.to_string()))?;
        let response = Self::handle_response_errors(response).await?;

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| {
                if e.is_decode() {
                    WartaError::Provider(format!("undecodable completion body: {e}"))
                } else {
                    WartaError::Http(e.to_string())
                }
            })?;

        // OpenRouter reports some upstream failures inside a 200 body.
        if let Some(err) = completion.error {
            return Err(WartaError::Provider(err.message));
        }

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(WartaError::EmptyResponse)?;

        Ok(ChatResponse {
            content,
            usage: completion.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            model: completion.model,
        })
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormatBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<&'a serde_json::Value>,
}

#[derive(Serialize)]
struct ResponseFormatBody {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<UsageBody>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct UsageBody {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}
