//! Error types for the Courier clients

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when calling a remote API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body returned by the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| s >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let unauthorized = ClientError::api_error(401, "bad token");
        assert_eq!(unauthorized.status(), Some(401));
        assert!(unauthorized.is_client_error());
        assert!(!unauthorized.is_server_error());

        let unavailable = ClientError::api_error(503, "down");
        assert!(unavailable.is_server_error());
        assert!(!unavailable.is_client_error());

        let parse = ClientError::ParseError("nope".to_string());
        assert_eq!(parse.status(), None);
        assert!(!parse.is_client_error());
    }

    #[test]
    fn test_api_error_display() {
        let err = ClientError::api_error(400, "{\"errors\":[]}");
        assert_eq!(err.to_string(), "API error (status 400): {\"errors\":[]}");
    }
}
