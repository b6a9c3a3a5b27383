//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod schema_extraction;

pub use schema_extraction::*;

/// Shared default helper used by submodules.
pub(crate) fn default_true() -> bool {
    true
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Persisted panel settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Infer field hints from sheet headers with the model when a sheet is loaded.
    #[serde(default = "default_true")]
    pub analyze_headers_with_ai: bool,

    /// Split selections into multiple rows.
    #[serde(default)]
    pub batch_mode_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            analyze_headers_with_ai: true,
            batch_mode_enabled: false,
        }
    }
}

/// Model provider endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Whether the model accepts image parts.
    #[serde(default = "default_true")]
    pub vision: bool,

    /// Transport-level timeout for a single HTTP request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            vision: true,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "gemma3".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory (default: ~/.pull2sheet/logs).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
