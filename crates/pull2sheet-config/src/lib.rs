//! # Pull2Sheet Config
//!
//! Configuration management: persisted panel settings, extraction deadlines
//! and limits, the model provider endpoint and logging.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
