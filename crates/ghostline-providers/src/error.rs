//! Error types for completion backends

use thiserror::Error;

/// Errors that can occur when calling a completion backend
#[derive(Debug, Error, PartialEq, Clone)]
pub enum BackendError {
    /// Authentication failed (never includes key details)
    #[error("Authentication failed")]
    Auth,

    /// Rate limited by the backend
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Network error occurred
    #[error("Network error: {0}")]
    Network(String),

    /// Response could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Generic backend error
    #[error("Backend error: {0}")]
    Backend(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_hides_details() {
        let err = BackendError::Auth;
        assert_eq!(err.to_string(), "Authentication failed");
    }

    #[test]
    fn test_rate_limited_display() {
        let err = BackendError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }

    #[test]
    fn test_serde_json_error_maps_to_invalid_response() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: BackendError = parse_err.into();
        assert!(matches!(err, BackendError::InvalidResponse(_)));
    }
}
