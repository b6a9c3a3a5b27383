//! Extraction deadlines, limits and failure policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Deadlines and limits applied to every extraction pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Deadline for opening a model session.
    #[serde(default = "default_session_timeout")]
    pub session_timeout_ms: u64,

    /// Deadline for each field prompt.
    #[serde(default = "default_field_timeout")]
    pub field_timeout_ms: u64,

    /// Deadline for the batch split prompt.
    #[serde(default = "default_batch_split_timeout")]
    pub batch_split_timeout_ms: u64,

    /// Maximum characters of a single-item text input.
    #[serde(default = "default_max_input_length")]
    pub max_input_length: usize,

    /// Maximum characters of a batch text input.
    #[serde(default = "default_batch_max_length")]
    pub batch_max_length: usize,

    /// Pause between delivered batch items.
    #[serde(default = "default_batch_pacing")]
    pub batch_pacing_ms: u64,

    /// Consecutive failed fields after which the pass is cancelled.
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,

    /// Extra attempts for a failed (non-timeout) field prompt.
    #[serde(default)]
    pub retry_count: u32,

    /// Drop in-flight prompts as soon as the pass is cancelled instead of
    /// letting them finish or time out.
    #[serde(default)]
    pub abort_in_flight: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            session_timeout_ms: default_session_timeout(),
            field_timeout_ms: default_field_timeout(),
            batch_split_timeout_ms: default_batch_split_timeout(),
            max_input_length: default_max_input_length(),
            batch_max_length: default_batch_max_length(),
            batch_pacing_ms: default_batch_pacing(),
            max_consecutive_failures: default_max_consecutive_failures(),
            retry_count: 0,
            abort_in_flight: false,
        }
    }
}

impl ExtractionConfig {
    pub fn session_timeout(&self) -> Duration {
        Duration::from_millis(self.session_timeout_ms)
    }

    pub fn field_timeout(&self) -> Duration {
        Duration::from_millis(self.field_timeout_ms)
    }

    pub fn batch_split_timeout(&self) -> Duration {
        Duration::from_millis(self.batch_split_timeout_ms)
    }

    pub fn batch_pacing(&self) -> Duration {
        Duration::from_millis(self.batch_pacing_ms)
    }
}

fn default_session_timeout() -> u64 {
    30_000
}

fn default_field_timeout() -> u64 {
    30_000
}

fn default_batch_split_timeout() -> u64 {
    55_000
}

fn default_max_input_length() -> usize {
    8000
}

fn default_batch_max_length() -> usize {
    12_000
}

fn default_batch_pacing() -> u64 {
    800
}

fn default_max_consecutive_failures() -> u32 {
    1
}
