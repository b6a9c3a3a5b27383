//! # Pull2Sheet Core
//!
//! Extraction orchestration against an on-device language model.
//!
//! ```text
//! Trigger → Orchestrator → SessionManager → FieldExtractor ─┐
//!                       └→ BatchSplitter ──→ FieldExtractor ─┴→ PanelSink
//! ```
//!
//! Every pass owns a fresh cancellation token. Deadlines, user stop requests
//! and failed fields cancel the token; loops poll it before starting the next
//! field or item.

pub mod batch;
pub mod context;
pub mod extractor;
pub mod fetch;
pub mod orchestrator;
pub mod prompt;
pub mod session;
pub mod timeout;
pub mod trigger;

#[cfg(test)]
mod testing;

pub use batch::{split_and_extract, BatchOutcome, StopCause};
pub use context::PassContext;
pub use extractor::extract_fields;
pub use fetch::{FetchError, HttpImageFetcher, ImageFetcher};
pub use orchestrator::{Delivery, Orchestrator, PassOutcome, PassReport};
pub use prompt::{clean_response, truncate_input, ITEM_DELIMITER, TRUNCATION_MARKER};
pub use session::{SessionGuard, SessionManager};
pub use timeout::with_timeout;
pub use trigger::{Trigger, TriggerHandler};
