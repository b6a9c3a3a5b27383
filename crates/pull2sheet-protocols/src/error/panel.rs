//! Panel state store errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("Template headers do not match the sheet (expected {expected:?}, found {found:?})")]
    StructureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Invalid or empty template: {0}")]
    InvalidTemplate(String),

    #[error("Sheet is empty or has no headers")]
    EmptySheet,

    #[error("No sheet structure available")]
    NoSheet,

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field is locked: {0}")]
    Locked(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
