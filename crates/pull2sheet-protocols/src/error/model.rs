//! Model capability errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model not available: {0}")]
    Unavailable(String),

    #[error("Unsupported modality: {0}")]
    UnsupportedModality(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Session already destroyed")]
    SessionClosed,

    #[error("Prompt failed: {0}")]
    PromptFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_api() {
        let err = ModelError::Api {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("Internal Server Error"));
    }

    #[test]
    fn test_model_error_unsupported_modality() {
        let err = ModelError::UnsupportedModality("image".to_string());
        assert!(err.to_string().contains("Unsupported modality"));
    }

    #[test]
    fn test_model_error_session_closed() {
        assert!(ModelError::SessionClosed.to_string().contains("destroyed"));
    }
}
