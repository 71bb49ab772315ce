//! AI client: the single point of entry for calls to the AI gateway.
//!
//! The gateway speaks the OpenAI-compatible chat completions shape. Rate limits
//! (429) and exhausted credits (402) are terminal and reported as their own
//! variants; server errors and transport failures are retried with backoff.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

use prompts::{build_prompt, SuggestionContext, SuggestionKind};

const MAX_RETRIES: u32 = 3;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("AI gateway rate limit exceeded")]
    RateLimited,

    #[error("AI credits exhausted")]
    CreditsExhausted,

    #[error("AI gateway returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Content of the first choice, if it has any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// What to do with a non-success gateway status.
#[derive(Debug)]
enum Failure {
    Terminal(SuggestionError),
    Retryable(SuggestionError),
}

fn classify(status: StatusCode, body: String) -> Failure {
    match status {
        StatusCode::TOO_MANY_REQUESTS => Failure::Terminal(SuggestionError::RateLimited),
        StatusCode::PAYMENT_REQUIRED => Failure::Terminal(SuggestionError::CreditsExhausted),
        s if s.is_server_error() => Failure::Retryable(SuggestionError::Api {
            status: s.as_u16(),
            message: body,
        }),
        s => Failure::Terminal(SuggestionError::Api {
            status: s.as_u16(),
            message: body,
        }),
    }
}

/// Exponential backoff before retry `attempt` (1-based): 1s, 2s, ...
fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(1000 * (1 << (attempt - 1)))
}

#[derive(Clone)]
pub struct AiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl AiClient {
    pub fn new(gateway_url: &str, api_key: String, model: String) -> Result<Self, SuggestionError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(60)).build()?,
            endpoint: format!("{}/chat/completions", gateway_url.trim_end_matches('/')),
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generates a suggestion of `kind` from the editor's context.
    pub async fn suggest(
        &self,
        kind: SuggestionKind,
        context: &SuggestionContext,
    ) -> Result<String, SuggestionError> {
        let prompt = build_prompt(kind, context)?;
        let response = self.call(&prompt.user, prompt.system).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(SuggestionError::EmptyContent)
    }

    /// Makes a raw chat completions call, returning the full response object.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<ChatResponse, SuggestionError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
        };

        let mut last_error: Option<SuggestionError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = backoff(attempt);
                warn!(
                    "AI gateway attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(SuggestionError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                warn!("AI gateway returned {}: {}", status, body);
                match classify(status, body) {
                    Failure::Terminal(err) => return Err(err),
                    Failure::Retryable(err) => {
                        last_error = Some(err);
                        continue;
                    }
                }
            }

            let chat: ChatResponse = response.json().await?;

            if let Some(usage) = &chat.usage {
                debug!(
                    "AI call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(chat);
        }

        Err(last_error.unwrap_or(SuggestionError::EmptyContent))
    }
}
