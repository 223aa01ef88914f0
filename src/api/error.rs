//! Typed API failures
//!
//! Every failure the HTTP layer can produce is reduced to one of these kinds.
//! Stores only ever need [`ApiError::message`], but the kind is kept so the
//! log and the auth flow can tell a dead network apart from a rejected token.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response at all (DNS, refused connection, timeout)
    #[error("network error: {0}")]
    Network(String),
    /// 400 / 404 / 409 / 422: the server rejected the input
    #[error("validation failed ({status}): {message}")]
    Validation { status: u16, message: String },
    /// 401 / 403
    #[error("unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },
    /// Any other non-success status
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    /// A success status with a body we could not read
    #[error("unexpected response: {0}")]
    Decode(String),
    /// The request could not be built locally (bad url, unreadable file)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    /// Build an error from a non-success status and the raw response body.
    ///
    /// The body is expected to look like `{ "message": "..." }`; anything else
    /// falls back to a generic message for the status.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_message(status));

        match status {
            401 | 403 => ApiError::Unauthorized { status, message },
            400 | 404 | 409 | 422 => ApiError::Validation { status, message },
            _ => ApiError::Server { status, message },
        }
    }

    /// Text shown to the user in the store's `error` field and the toast.
    pub fn message(&self) -> String {
        match self {
            ApiError::Network(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            ApiError::Validation { message, .. }
            | ApiError::Unauthorized { message, .. }
            | ApiError::Server { message, .. } => message.clone(),
            ApiError::Decode(_) => "Received an unexpected response from the server.".to_string(),
            ApiError::InvalidRequest(detail) => detail.clone(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

fn default_message(status: u16) -> String {
    match status {
        401 => "Your session has expired. Please log in again.".to_string(),
        403 => "You do not have permission to do that.".to_string(),
        404 => "The requested resource was not found.".to_string(),
        429 => "Too many requests. Please wait a moment.".to_string(),
        s if s >= 500 => format!("Server error ({})", s),
        s => format!("Request failed with status {}", s),
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_builder() {
            ApiError::InvalidRequest(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::from_status(status.as_u16(), "")
        } else {
            ApiError::Network(err.to_string())
        }
    }
}
