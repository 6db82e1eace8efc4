//! Direct client for an OpenAI-compatible chat-completions gateway.
//!
//! Does the work the hosted function does: builds the compliance prompt,
//! asks for a JSON object back and parses the first choice.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::prompt::{SYSTEM_PROMPT, build_user_prompt};
use crate::{DisputeRequest, GenerateError, GeneratedReply, ResponseGenerator};

pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1";
pub const DEFAULT_MODEL: &str = "google/gemini-3-flash-preview";

const RATE_LIMITED: &str = "Rate limit exceeded. Please try again in a moment.";
const CREDITS_REQUIRED: &str = "AI usage credits required. Please add credits to your workspace.";
const GENERATION_FAILED: &str = "AI generation failed. Please try again.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn status_error(status: u16) -> GenerateError {
    let message = match status {
        429 => RATE_LIMITED,
        402 => CREDITS_REQUIRED,
        _ => GENERATION_FAILED,
    };
    GenerateError::Server {
        status,
        message: message.to_string(),
    }
}

/// Strip a markdown code fence some models wrap JSON in.
fn unfence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

#[async_trait]
impl ResponseGenerator for GatewayClient {
    async fn generate(&self, request: &DisputeRequest) -> Result<GeneratedReply, GenerateError> {
        let url = self.url();
        let user_prompt = build_user_prompt(request);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            response_format: ResponseFormat { kind: "json_object" },
        };

        info!(url = %url, model = %self.model, "requesting chat completion");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %text, "gateway error");
            return Err(status_error(status.as_u16()));
        }

        let chat: ChatResponse = resp.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(GenerateError::EmptyReply)?;

        let reply: GeneratedReply = serde_json::from_str(unfence(&content))?;
        info!(risk = ?reply.risk(), "chat completion parsed");
        Ok(reply)
    }
}
