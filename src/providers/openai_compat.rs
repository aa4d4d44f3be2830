//! Client for OpenAI-compatible chat-completions endpoints.
//!
//! Both built-in providers (OpenRouter and OpenAI) speak this wire format:
//! `POST {base_url}/chat/completions` with bearer auth, completion text in
//! `choices[0].message.content`.
//! See: <https://platform.openai.com/docs/api-reference/chat/create>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::prompt::DiagnosticPrompt;
use super::selector::ProviderConfig;
use super::traits::CompletionClient;
use crate::{Result, VetgateError, version};

/// Default connect timeout. Whole-attempt timeouts are enforced by the
/// cascade.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Sampling temperature for diagnosis requests.
const TEMPERATURE: f32 = 0.2;

/// Upper bound on how much of an error body is copied into an error.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// HTTP client for any OpenAI-compatible provider.
///
/// Holds no credentials: base URL and key come from the
/// [`ProviderConfig`] passed to each call.
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    http: Client,
}

impl OpenAiCompatibleClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(version::user_agent())
            .build()
            .map_err(|e| VetgateError::Configuration(format!("HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Wrap an existing reqwest client (shared connection pool, proxies).
    pub fn with_http_client(http: Client) -> Self {
        Self { http }
    }

    async fn chat_completion(
        &self,
        provider: &ProviderConfig,
        model: &str,
        prompt: &DiagnosticPrompt,
    ) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            provider.base_url.trim_end_matches('/')
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&provider.credential)
            .json(&ChatRequest {
                model,
                messages: [
                    ChatMessage {
                        role: "system",
                        content: &prompt.system,
                    },
                    ChatMessage {
                        role: "user",
                        content: &prompt.user,
                    },
                ],
                temperature: TEMPERATURE,
            })
            .send()
            .await
            .map_err(|e| VetgateError::Http(e.to_string()))?;

        let response = check_status(response, model).await?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| VetgateError::Http(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(VetgateError::EmptyResponse)
    }
}

/// Map a non-success status to the matching error.
async fn check_status(response: reqwest::Response, model: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        401 | 403 => Err(VetgateError::AuthenticationFailed),
        404 => Err(VetgateError::ModelNotFound(model.to_string())),
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(VetgateError::RateLimited { retry_after })
        }
        code => {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.to_string()
            } else {
                body.chars().take(MAX_ERROR_BODY_CHARS).collect()
            };
            Err(VetgateError::Api {
                status: code,
                message,
            })
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn complete(
        &self,
        provider: &ProviderConfig,
        model: &str,
        prompt: &DiagnosticPrompt,
    ) -> Result<String> {
        self.chat_completion(provider, model, prompt).await
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
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
