//! Response generation for the Dispute Response Builder.
//!
//! The wizard sends a [`DisputeRequest`] to a [`ResponseGenerator`] and merges
//! the [`GeneratedReply`] back into the draft. Two generators are provided:
//! [`EndpointClient`] calls a hosted dispute-response function, and
//! [`GatewayClient`] talks to an OpenAI-compatible chat-completions gateway
//! directly, building the prompt itself.

mod endpoint;
mod error;
mod gateway;
pub mod prompt;
mod request;

use async_trait::async_trait;

pub use endpoint::EndpointClient;
pub use error::GenerateError;
pub use gateway::{DEFAULT_GATEWAY_URL, DEFAULT_MODEL, GatewayClient};
pub use request::{DisputeRequest, GeneratedReply};

/// Something that can draft a dispute response.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, request: &DisputeRequest) -> Result<GeneratedReply, GenerateError>;
}
