//! OpenAI-compatible chat-completions client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sparkblog_core::ports::{GenerateError, TextGenerator};

const SYSTEM_PROMPT: &str = "You write blog posts in Markdown. \
    Start with a single '# ' heading that works as the post title.";

pub struct OpenAiGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", api_url.trim_end_matches('/')),
            api_key,
            model,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
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
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// First non-blank completion in a response body.
fn extract_content(body: ChatResponse) -> Result<String, GenerateError> {
    body.choices
        .into_iter()
        .filter_map(|c| c.message.content)
        .find(|content| !content.trim().is_empty())
        .ok_or(GenerateError::EmptyResponse)
}

/// Human-readable message out of an error body, falling back to the raw text.
fn upstream_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => format!("generation service returned {status}"),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerateError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(status, &body);
            tracing::warn!(%status, error = %message, "Generation request rejected");
            return Err(GenerateError::Upstream(message));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Upstream(e.to_string()))?;
        extract_content(body)
    }
}
