//! Error types for the backend client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur when talking to the job backend
///
/// No retries happen at this layer; callers decide what to do with a failure.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the connection failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-success status code
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Reason phrase, followed by the response body when there is one
        message: String,
    },

    /// The response body was not the expected JSON
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl TransportError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            Self::Parse(_) => None,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let not_found = TransportError::api_error(404, "Not Found");
        assert!(not_found.is_not_found());
        assert!(not_found.is_client_error());
        assert!(!not_found.is_server_error());

        let unavailable = TransportError::api_error(503, "Service Unavailable");
        assert_eq!(unavailable.status(), Some(503));
        assert!(unavailable.is_server_error());

        let parse = TransportError::Parse("eof".to_string());
        assert_eq!(parse.status(), None);
        assert!(!parse.is_client_error());
    }

    #[test]
    fn test_display_includes_status_and_message() {
        let err = TransportError::api_error(500, "Internal Server Error: db down");
        assert_eq!(
            err.to_string(),
            "API error (status 500): Internal Server Error: db down"
        );
    }
}
