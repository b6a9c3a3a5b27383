//! Input payloads handed to an extraction pass.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Raw image bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub media_type: String,
    pub bytes: Bytes,
}

impl ImageData {
    pub fn new(media_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// What the user selected: text, or an image (single-item flow only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPayload {
    Text(String),
    Image(ImageData),
}

impl InputPayload {
    pub fn kind(&self) -> InputKind {
        match self {
            InputPayload::Text(_) => InputKind::Text,
            InputPayload::Image(_) => InputKind::Image,
        }
    }
}

/// Kind of input, used to pick session options and prompt shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Image,
}
