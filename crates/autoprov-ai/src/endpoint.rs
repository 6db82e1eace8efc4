//! HTTP client for the hosted dispute-response function.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::{DisputeRequest, GenerateError, GeneratedReply, ResponseGenerator};

const FUNCTION_PATH: &str = "/functions/v1/dispute-response";

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Client for `POST {base}/functions/v1/dispute-response`.
pub struct EndpointClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl EndpointClient {
    /// `base_url` should be like `https://project.example.co` (a trailing slash is ignored).
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn url(&self) -> String {
        format!("{}{FUNCTION_PATH}", self.base_url)
    }
}

/// Best-effort message from a failed response body.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed ({status})"))
}

#[async_trait]
impl ResponseGenerator for EndpointClient {
    async fn generate(&self, request: &DisputeRequest) -> Result<GeneratedReply, GenerateError> {
        let url = self.url();
        info!(url = %url, complaint = request.complaint_type.key(), "requesting dispute response");

        let mut req = self.client.post(&url).json(request);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerateError::Server {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }

        let body = resp.text().await?;
        let reply: GeneratedReply = serde_json::from_str(&body)?;
        info!(risk = ?reply.risk(), "dispute response received");
        Ok(reply)
    }
}
