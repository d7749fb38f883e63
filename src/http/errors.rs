//! Remote client errors.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors returned by the remote clients.
///
/// These carry the raw HTTP outcome; deciding whether a failure is tolerable
/// is left to the cart store.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status.
    #[error("request failed with status {status}")]
    Status {
        /// Response status code.
        status: StatusCode,

        /// Message extracted from the response body, if any.
        message: Option<String>,
    },

    /// The request could not be sent or the response could not be decoded.
    #[error("http error")]
    Http(#[from] reqwest::Error),

    /// The client was constructed with an unusable configuration.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Whether the backend reported the resource as absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// The status code reported by the backend, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(error) => error.status(),
            Self::InvalidConfig(_) => None,
        }
    }

    /// The server-provided message, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            Self::Http(_) | Self::InvalidConfig(_) => None,
        }
    }

    /// Build a status error from a response body.
    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        Self::Status {
            status,
            message: extract_message(body),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Pull a human-readable message out of an error body.
///
/// JSON bodies are searched for `message` then `error`; any other non-empty
/// body is used verbatim.
fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();

    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .message
            .or(parsed.error)
            .filter(|message| !message.trim().is_empty()),
        Err(_) => Some(body.to_string()),
    }
}
