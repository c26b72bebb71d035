//! API error handling
//!
//! Classifies failures of a single backend call. Nothing here retries; every
//! error is terminal for the call that produced it.

use thiserror::Error;

/// Errors that can occur while talking to the backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// No response arrived (connection refused, reset, DNS...)
    #[error("Could not reach '{url}': {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error(
        "Server returned HTTP {status} for '{url}': {}",
        .message.as_deref().unwrap_or("no error message")
    )]
    Server {
        url: String,
        status: u16,
        /// The `error` field of the response body, when present
        message: Option<String>,
    },

    /// A success response whose body does not match the expected shape
    #[error("Unexpected response body from '{url}': {details}")]
    Decode { url: String, details: String },
}

impl ApiError {
    /// Server-reported failure
    pub fn server(url: impl Into<String>, status: u16, message: Option<String>) -> Self {
        ApiError::Server {
            url: url.into(),
            status,
            message,
        }
    }

    /// The message the server supplied in its `error` field, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }

    /// HTTP status of a server-reported failure
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when no response was received at all
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. } | ApiError::Client(_))
    }
}

/// Result type for API calls
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message() {
        let err = ApiError::server("/cycles/3", 404, Some("康复周期不存在".to_string()));
        assert_eq!(err.server_message(), Some("康复周期不存在"));
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_server_without_message() {
        let err = ApiError::server("/exercises/1", 500, None);
        assert!(err.server_message().is_none());
        assert!(err.to_string().contains("no error message"));
    }

    #[test]
    fn test_decode_display() {
        let err = ApiError::Decode {
            url: "http://localhost:5000/tasks".to_string(),
            details: "expected a sequence".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tasks"));
        assert!(msg.contains("expected a sequence"));
        assert!(err.server_message().is_none());
    }
}
