//! Client Error Types

use thiserror::Error;

/// Errors that can occur when calling the prediction API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure: unreachable host, reset connection, bad URL
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status, with the server detail when it sent one
    #[error("API error {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    /// Success status but the body did not match the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// The response decoded but carried no result to show
    #[error("Empty response: {0}")]
    Empty(&'static str),
}

impl ClientError {
    /// Server-provided detail, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Message to show the user: the server detail, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }

    /// HTTP status, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for API calls
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_detail() {
        let err = ClientError::Api {
            status: 401,
            detail: Some("Invalid credentials".to_string()),
        };
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_user_message_fallback() {
        let err = ClientError::Api {
            status: 500,
            detail: None,
        };
        assert_eq!(err.user_message("Login failed"), "Login failed");

        let err = ClientError::Decode("missing field".to_string());
        assert_eq!(err.user_message("Prediction failed"), "Prediction failed");
    }

    #[test]
    fn test_display() {
        let err = ClientError::Api {
            status: 400,
            detail: None,
        };
        assert_eq!(err.to_string(), "API error 400: no detail");
    }
}
