//! Capability and session traits.

use async_trait::async_trait;

use super::{Availability, Prompt, SessionOptions};
use crate::error::ModelError;

/// Host-provided on-device language model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Returns the capability ID.
    fn id(&self) -> &str;

    /// Report whether the model can be used right now.
    async fn availability(&self) -> Result<Availability, ModelError>;

    /// Open a new session.
    async fn create(&self, options: SessionOptions) -> Result<Box<dyn ModelSession>, ModelError>;
}

/// An open connection to the model.
///
/// Prompts against one session are issued strictly one at a time.
#[async_trait]
pub trait ModelSession: Send + Sync {
    /// Send a prompt and wait for the full response text.
    async fn prompt(&self, prompt: Prompt) -> Result<String, ModelError>;

    /// Release the session. Called exactly once per session.
    async fn destroy(&self);
}
