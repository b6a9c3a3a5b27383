//! Fetching the bytes behind an image trigger.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use pull2sheet_protocols::ImageData;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to fetch image. Status: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("Fetched content is not an image ({0})")]
    NotAnImage(String),
}

/// Resolves an image URL to bytes.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<ImageData, FetchError>;
}

/// [`ImageFetcher`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<ImageData, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let media_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !media_type.starts_with("image/") {
            return Err(FetchError::NotAnImage(if media_type.is_empty() {
                "no content type".to_string()
            } else {
                media_type
            }));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        debug!(url, media_type = %media_type, size = bytes.len(), "Fetched image");
        Ok(ImageData::new(media_type, bytes))
    }
}
