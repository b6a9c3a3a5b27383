//! # Pull2Sheet Protocols
//!
//! Core protocol definitions for the Pull2Sheet extraction core.
//! Contains only interface definitions and the shared data model.
//!
//! ## Core Traits
//!
//! - [`LanguageModel`] - The on-device model capability (availability + session creation)
//! - [`ModelSession`] - A single-use open session against the capability
//! - [`PanelSink`] - Core → UI message channel
//! - [`FieldSource`] - UI → core field schema requests

pub mod error;
pub mod model;
pub mod panel;
pub mod types;

pub use error::{ExtractionError, ModelError, PanelError};
pub use model::{Availability, InputModality, LanguageModel, ModelSession, Prompt, PromptPart, SessionOptions};
pub use panel::{
    ChannelPanelSink, FieldRequest, FieldSource, MemoryPanelSink, PanelEvent, PanelSink,
    ToastSeverity,
};
pub use types::*;
