//! Ollama-backed language model capability for Pull2Sheet.

mod api;
mod model;
mod session;

pub use model::OllamaModel;
pub use session::OllamaSession;
