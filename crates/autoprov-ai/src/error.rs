use thiserror::Error;

/// A failed generation attempt. `Display` is the message shown to the user.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Empty response from AI")]
    EmptyReply,
}

impl GenerateError {
    /// HTTP status of a server-side failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
