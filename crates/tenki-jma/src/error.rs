//! JMA-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JmaError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl JmaError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Check your connection.".to_string(),
            Self::Api { status, .. } => format!("Weather service error ({})", status),
            Self::MalformedPayload(_) => {
                "Received an unexpected response from the weather service.".to_string()
            }
            Self::Storage(_) => "Local cache error".to_string(),
        }
    }

    /// Whether cached data can still be served after this error.
    ///
    /// Remote and payload failures degrade to the cache; storage failures
    /// mean the cache itself cannot be trusted.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_user_messages() {
        let err = JmaError::Api {
            status: 503,
            message: "unavailable".into(),
        };
        assert!(err.user_message().contains("503"));

        let err = JmaError::MalformedPayload("too short".into());
        assert!(err.user_message().contains("unexpected response"));
    }

    #[test]
    fn test_remote_errors_are_recoverable() {
        let api = JmaError::Api {
            status: 500,
            message: "boom".into(),
        };
        assert!(api.is_recoverable());
        assert!(JmaError::MalformedPayload("bad".into()).is_recoverable());
    }

    #[test]
    fn test_storage_errors_are_not_recoverable() {
        let err = JmaError::Storage(rusqlite::Error::QueryReturnedNoRows);
        assert!(!err.is_recoverable());
    }
}
