//! Prompt content and session options.

use serde::{Deserialize, Serialize};

use crate::types::ImageData;

/// Content of a single prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Text(String),
    Multimodal(Vec<PromptPart>),
}

impl Prompt {
    pub fn text(text: impl Into<String>) -> Self {
        Prompt::Text(text.into())
    }

    /// Build a prompt with one text part and one image part.
    pub fn with_image(text: impl Into<String>, image: ImageData) -> Self {
        Prompt::Multimodal(vec![PromptPart::Text(text.into()), PromptPart::Image(image)])
    }

    /// All text parts joined by newlines.
    pub fn text_content(&self) -> String {
        match self {
            Prompt::Text(text) => text.clone(),
            Prompt::Multimodal(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    PromptPart::Text(text) => Some(text.as_str()),
                    PromptPart::Image(_) => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn images(&self) -> Vec<&ImageData> {
        match self {
            Prompt::Text(_) => Vec::new(),
            Prompt::Multimodal(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    PromptPart::Image(image) => Some(image),
                    PromptPart::Text(_) => None,
                })
                .collect(),
        }
    }
}

/// A part of a multimodal prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    Text(String),
    Image(ImageData),
}

/// Input modality a session is expected to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputModality {
    Text,
    Image,
}

/// Options passed when opening a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected_inputs: Vec<InputModality>,
}

impl SessionOptions {
    /// Plain text session.
    pub fn text() -> Self {
        Self::default()
    }

    /// Session that accepts image and text parts.
    pub fn multimodal() -> Self {
        Self {
            expected_inputs: vec![InputModality::Image, InputModality::Text],
        }
    }

    pub fn wants_images(&self) -> bool {
        self.expected_inputs.contains(&InputModality::Image)
    }
}
