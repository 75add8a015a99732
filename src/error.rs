// Client Error Types
use thiserror::Error;

/// Errors surfaced by calls against the admin API.
///
/// `AuthExpired` is informational: by the time a caller sees it the gateway
/// has already cleared the session and navigated to the login entry point.
/// Callers should propagate it without rendering an error state.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Session expired, please log in again")]
    AuthExpired,

    #[error("Request failed: {message}")]
    RequestFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("{message}")]
    LogicalFailure { message: String },

    #[error("Unexpected response payload: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn request_failed(status: Option<u16>, message: impl Into<String>) -> Self {
        ClientError::RequestFailed {
            status,
            message: message.into(),
        }
    }

    pub fn logical_failure(message: impl Into<String>) -> Self {
        ClientError::LogicalFailure {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ClientError::Decode(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ClientError::Storage(message.into())
    }

    /// HTTP status associated with the failure, when there was one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::AuthExpired => Some(401),
            ClientError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Stable code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::AuthExpired => "AUTH_EXPIRED",
            ClientError::RequestFailed { .. } => "REQUEST_FAILED",
            ClientError::LogicalFailure { .. } => "LOGICAL_FAILURE",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::Storage(_) => "STORAGE_ERROR",
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ClientError::AuthExpired)
    }

    /// Logical failures render inline next to the form or list; everything
    /// else that reaches a screen renders as a full error panel.
    pub fn is_inline(&self) -> bool {
        matches!(self, ClientError::LogicalFailure { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ClientError::decode(err.to_string());
        }
        let status = err.status().map(|s| s.as_u16());
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "could not connect to the API server".to_string()
        } else {
            err.to_string()
        };
        ClientError::RequestFailed { status, message }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::decode(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
