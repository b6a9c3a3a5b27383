//! Ollama chat session.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use pull2sheet_protocols::{ModelError, ModelSession, Prompt};

use crate::api::{ChatMessage, ChatRequest, ChatResponse};

/// Each prompt is sent as an independent single-message chat.
#[derive(Debug)]
pub struct OllamaSession {
    client: reqwest::Client,
    base_url: String,
    model: String,
    closed: AtomicBool,
}

impl OllamaSession {
    pub(crate) fn new(client: reqwest::Client, base_url: String, model: String) -> Self {
        Self {
            client,
            base_url,
            model,
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn build_request(&self, prompt: &Prompt) -> ChatRequest<'_> {
        let images = prompt
            .images()
            .into_iter()
            .map(|image| STANDARD.encode(&image.bytes))
            .collect();
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage::user(prompt.text_content(), images)],
            stream: false,
        }
    }
}

#[async_trait]
impl ModelSession for OllamaSession {
    async fn prompt(&self, prompt: Prompt) -> Result<String, ModelError> {
        if self.is_closed() {
            return Err(ModelError::SessionClosed);
        }

        let url = format!("{}/api/chat", self.base_url);
        let request = self.build_request(&prompt);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;
        debug!(model = %self.model, chars = reply.message.content.len(), "Ollama reply");
        Ok(reply.message.content)
    }

    async fn destroy(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
