//! Chat-completions client for itinerary text

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::LlmConfig;
use crate::{PlannerError, Result};

const SERVICE: &str = "language model";

/// Something that turns a prompt into text
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// OpenAI-compatible chat completions client
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl ChatCompletionClient {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    fn request_body(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        }
    }
}

fn completion_text(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| PlannerError::no_data(SERVICE, "completion has no content"))
}

#[async_trait]
impl LanguageModel for ChatCompletionClient {
    #[instrument(skip_all)]
    async fn complete(&self, prompt: &str) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(PlannerError::config("llm.api_key is not set"));
        }

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| PlannerError::upstream(SERVICE, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlannerError::upstream(
                SERVICE,
                format!("API error ({status}): {body}"),
            ));
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| PlannerError::upstream(SERVICE, format!("invalid response body: {e}")))?;

        debug!("Completion received with {} choices", api_response.choices.len());
        completion_text(api_response)
    }
}
