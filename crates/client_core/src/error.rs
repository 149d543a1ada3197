use thiserror::Error;

use crate::types::Endpoint;

pub const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Error)]
pub enum ApiCallError {
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: Endpoint, status: u16 },
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid response from {endpoint}: {message}")]
    Decode { endpoint: Endpoint, message: String },
    #[error("{endpoint} rejected the request: {}", .message.as_deref().unwrap_or(UNKNOWN_ERROR))]
    Rejected {
        endpoint: Endpoint,
        message: Option<String>,
    },
}

impl ApiCallError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            ApiCallError::Status { endpoint, .. }
            | ApiCallError::Transport { endpoint, .. }
            | ApiCallError::Decode { endpoint, .. }
            | ApiCallError::Rejected { endpoint, .. } => *endpoint,
        }
    }

    /// Text for the error banner: the backend's own reason when it gave one,
    /// otherwise a fixed per-endpoint message.
    pub fn user_message(&self) -> String {
        match self {
            ApiCallError::Rejected {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            ApiCallError::Rejected { .. } => UNKNOWN_ERROR.to_string(),
            other => other.endpoint().failure_message().to_string(),
        }
    }
}
