//! ChatCompletionAgent - REST client for OpenAI-compatible chat completion endpoints.
//!
//! Defaults target OpenRouter. The whole transcript (system turn included) is
//! sent as the `messages` array on every call.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use mentor_core::assistant::{Assistant, AssistantError};
use mentor_core::config::AssistantSettings;
use mentor_core::conversation::Turn;

/// Agent implementation that talks to a chat completion HTTP API.
#[derive(Clone)]
pub struct ChatCompletionAgent {
    client: Client,
    api_key: Option<String>,
    settings: AssistantSettings,
}

impl ChatCompletionAgent {
    /// Creates a new agent.
    ///
    /// `api_key` may be absent; calls then fail with an auth-category error
    /// instead of reaching the network.
    pub fn new(settings: AssistantSettings, api_key: Option<String>) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|err| AssistantError::Transport(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            api_key,
            settings,
        })
    }

    fn build_request(&self, turns: &[Turn]) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.settings.model.clone(),
            messages: turns
                .iter()
                .map(|turn| ChatMessage {
                    role: turn.role.as_str().to_string(),
                    content: turn.content.clone(),
                })
                .collect(),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }

    async fn send_request(
        &self,
        api_key: &str,
        body: &ChatCompletionRequest,
    ) -> Result<String, AssistantError> {
        let mut request = self
            .client
            .post(&self.settings.endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("content-type", "application/json")
            .header("X-Title", &self.settings.app_title);

        if let Some(referer) = &self.settings.referer {
            request = request.header("HTTP-Referer", referer);
        }

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|err| AssistantError::Transport(format!("Chat completion request failed: {err}")))?;

        let status = response.status();
        tracing::debug!("[ChatCompletionAgent] Response status: {}", status);

        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| AssistantError::InvalidResponse(err.to_string()))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl Assistant for ChatCompletionAgent {
    async fn ask(&self, turns: &[Turn]) -> Result<String, AssistantError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AssistantError::MissingCredential)?;

        tracing::info!(
            "[ChatCompletionAgent] Requesting completion: model={}, turns={}",
            self.settings.model,
            turns.len()
        );

        let request = self.build_request(turns);
        self.send_request(api_key, &request).await
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String, AssistantError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .ok_or_else(|| AssistantError::InvalidResponse("no choices[0].message".into()))?;

    match message.content {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ => Err(AssistantError::EmptyResponse),
    }
}

fn map_http_error(status: StatusCode, body: String) -> AssistantError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    AssistantError::Http {
        status: status.as_u16(),
        message,
    }
}
