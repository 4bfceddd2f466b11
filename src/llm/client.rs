//! Chat-completion client for an OpenAI-style HTTP endpoint.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;

/// Sampling temperature sent with every request.
pub const TEMPERATURE: f32 = 0.2;
/// Nucleus sampling cutoff sent with every request.
pub const TOP_P: f32 = 0.9;

/// Maximum characters of a response body quoted in error messages.
const MAX_ERROR_BODY: usize = 500;

/// A single non-streaming completion.
///
/// This abstraction allows mocking the endpoint in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the system instruction and user prompt, returning the content of
    /// the first choice.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ApiError>;
}

/// [`CompletionClient`] that POSTs JSON to the configured endpoint.
pub struct HttpCompletionClient {
    http: Client,
    server: String,
    model: String,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

impl HttpCompletionClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ApiError::Request)?;

        Ok(Self {
            http,
            server: config.server.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            timeout_secs: config.timeout.map(|t| t.as_secs()),
        })
    }

    fn map_send_error(&self, err: reqwest::Error) -> ApiError {
        match self.timeout_secs {
            Some(secs) if err.is_timeout() => ApiError::Timeout(secs),
            _ => ApiError::Request(err),
        }
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ApiError> {
        let body = ChatRequest::new(&self.model, system, prompt);
        debug!(
            "POST {} (model {}, prompt {} chars)",
            self.server,
            self.model,
            prompt.chars().count()
        );

        let mut request = self
            .http
            .post(&self.server)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.header(AUTHORIZATION, format!("Bearer {key}"));
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: snippet(&text),
            });
        }

        parse_chat_response(&text)
    }
}

/// Extract the first choice's message content from a response body.
pub fn parse_chat_response(body: &str) -> Result<String, ApiError> {
    let payload: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidResponse(format!("{e}. Response: {}", snippet(body))))?;

    let choice = payload.choices.into_iter().next().ok_or(ApiError::NoChoices)?;
    choice.message.content.ok_or_else(|| {
        ApiError::InvalidResponse("first choice has no message content".to_string())
    })
}

fn snippet(text: &str) -> String {
    text.chars().take(MAX_ERROR_BODY).collect()
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    parameters: SamplingParameters,
    messages: [ChatMessage<'a>; 2],
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, system: &'a str, prompt: &'a str) -> Self {
        Self {
            model,
            parameters: SamplingParameters {
                temperature: TEMPERATURE,
                top_p: TOP_P,
            },
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        }
    }
}

#[derive(Debug, Serialize)]
struct SamplingParameters {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
