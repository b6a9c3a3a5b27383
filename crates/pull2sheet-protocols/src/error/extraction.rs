//! Extraction pass errors.

use thiserror::Error;

use super::ModelError;

#[derive(Debug, Error)]
pub enum ExtractionError {
    /// No model capability is present at all.
    #[error("AI features are not supported in this environment")]
    Unsupported,

    /// The capability is present but not ready.
    #[error("AI model is unavailable (Status: {0})")]
    Unavailable(String),

    /// Session creation, a field prompt or the batch split exceeded its deadline.
    #[error("{0}")]
    Timeout(String),

    /// The capability rejected a multimodal session.
    #[error("Image analysis is not supported: {0}")]
    UnsupportedModality(String),

    /// A field prompt failed for a reason other than a timeout.
    #[error("Extraction failed: {0}")]
    ExtractionFailure(String),

    /// The batch split produced no items.
    #[error("No distinct items found in the selection")]
    NoItemsFound,

    /// The pass was cancelled while an operation was pending.
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Image fetch failed: {0}")]
    Fetch(String),
}

impl ExtractionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExtractionError::Timeout(_))
    }
}
