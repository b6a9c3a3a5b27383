//! Ollama HTTP API types.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    /// Base64-encoded image bytes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl ChatMessage {
    pub fn user(content: String, images: Vec<String>) -> Self {
        Self {
            role: "user".to_string(),
            content,
            images,
        }
    }
}

/// Non-streaming reply of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub message: ChatMessage,
    #[serde(default)]
    pub done: bool,
}

/// Reply of `GET /api/tags`.
#[derive(Debug, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TagEntry {
    pub name: String,
}

impl TagsResponse {
    /// Whether `model` is installed, with or without an explicit tag.
    pub fn contains(&self, model: &str) -> bool {
        self.models.iter().any(|entry| {
            entry.name == model
                || entry
                    .name
                    .strip_prefix(model)
                    .is_some_and(|rest| rest.starts_with(':'))
        })
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
