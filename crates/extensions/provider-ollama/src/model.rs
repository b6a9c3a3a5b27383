//! Ollama model capability.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use pull2sheet_protocols::{Availability, LanguageModel, ModelError, ModelSession, SessionOptions};

use crate::api::TagsResponse;
use crate::session::OllamaSession;

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;

/// One model served by a local Ollama instance.
#[derive(Debug, Clone)]
pub struct OllamaModel {
    base_url: String,
    model: String,
    vision: bool,
    client: reqwest::Client,
}

impl OllamaModel {
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ModelError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            vision: true,
            client,
        })
    }

    /// Whether the model accepts image input.
    pub fn with_vision(mut self, vision: bool) -> Self {
        self.vision = vision;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn supports_images(&self) -> bool {
        self.vision
    }
}

#[async_trait]
impl LanguageModel for OllamaModel {
    fn id(&self) -> &str {
        &self.model
    }

    async fn availability(&self) -> Result<Availability, ModelError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "Ollama server not reachable");
                return Ok(Availability::Unavailable);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;
        let availability = if tags.contains(&self.model) {
            Availability::Available
        } else {
            Availability::Downloadable
        };
        debug!(model = %self.model, %availability, "Ollama availability");
        Ok(availability)
    }

    async fn create(&self, options: SessionOptions) -> Result<Box<dyn ModelSession>, ModelError> {
        if options.wants_images() && !self.vision {
            return Err(ModelError::UnsupportedModality(format!(
                "model {} is configured as text-only",
                self.model
            )));
        }
        debug!(model = %self.model, images = options.wants_images(), "Opening Ollama session");
        Ok(Box::new(OllamaSession::new(
            self.client.clone(),
            self.base_url.clone(),
            self.model.clone(),
        )))
    }
}
