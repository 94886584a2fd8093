use thiserror::Error;

/// Failures while calling the catalog API
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request never produced a response (connect, timeout, body read)
    #[error("Failed to reach catalog API: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status; `message` is the server's `error` field when present
    #[error("Catalog API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode catalog API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
