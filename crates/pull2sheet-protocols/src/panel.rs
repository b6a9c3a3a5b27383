//! Panel message protocol.
//!
//! The panel is the host UI collaborator that owns the field schema and the
//! working sheet. The core talks to it only through these messages:
//!
//! - **core → UI**: [`PanelEvent`] delivered through a [`PanelSink`]
//! - **UI → core**: field schema requests through a [`FieldSource`], and
//!   cancellation through the orchestrator's `cancel()`

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::error::PanelError;
use crate::types::{ExtractionResult, FieldDescriptor};

#[cfg(test)]
#[path = "panel_tests.rs"]
mod tests;

/// Default toast duration.
pub const DEFAULT_TOAST_MS: u64 = 5000;

/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastSeverity {
    Success,
    Info,
    Error,
}

/// Message from the core to the panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PanelEvent {
    /// Append to the activity log.
    Log { message: String },
    /// Transient user notice.
    Toast {
        message: String,
        severity: ToastSeverity,
        duration_ms: u64,
    },
    ShowSpinner,
    HideSpinner,
    /// Deliver a single-item result.
    FillFields { data: ExtractionResult },
    /// Deliver one batch item and request an immediate row commit.
    FillAndAdd { data: ExtractionResult },
}

impl PanelEvent {
    pub fn log(message: impl Into<String>) -> Self {
        PanelEvent::Log {
            message: message.into(),
        }
    }

    pub fn toast(message: impl Into<String>, severity: ToastSeverity, duration_ms: u64) -> Self {
        PanelEvent::Toast {
            message: message.into(),
            severity,
            duration_ms,
        }
    }

    /// Message type as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            PanelEvent::Log { .. } => "LOG",
            PanelEvent::Toast { .. } => "TOAST",
            PanelEvent::ShowSpinner => "SHOW_SPINNER",
            PanelEvent::HideSpinner => "HIDE_SPINNER",
            PanelEvent::FillFields { .. } => "FILL_FIELDS",
            PanelEvent::FillAndAdd { .. } => "FILL_AND_ADD",
        }
    }
}

/// Receiver side of core → UI messages.
///
/// Delivery is fire-and-forget: a closed panel must never fail a pass.
pub trait PanelSink: Send + Sync {
    fn emit(&self, event: PanelEvent);

    fn log(&self, message: &str) {
        self.emit(PanelEvent::log(message));
    }

    fn toast(&self, message: &str, severity: ToastSeverity, duration_ms: u64) {
        self.emit(PanelEvent::toast(message, severity, duration_ms));
    }
}

/// Reply to a GET_FIELDS request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldRequest {
    pub fields: Vec<FieldDescriptor>,
    pub batch_mode: bool,
}

/// UI → core schema lookup.
#[async_trait]
pub trait FieldSource: Send + Sync {
    async fn field_request(&self) -> Result<FieldRequest, PanelError>;
}

/// Sink that forwards events into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelPanelSink {
    tx: mpsc::UnboundedSender<PanelEvent>,
}

impl ChannelPanelSink {
    pub fn new(tx: mpsc::UnboundedSender<PanelEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink together with its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PanelEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl PanelSink for ChannelPanelSink {
    fn emit(&self, event: PanelEvent) {
        // Receiver gone means the panel was closed; drop the event.
        let _ = self.tx.send(event);
    }
}

/// Sink that records every event in memory.
#[derive(Debug, Default)]
pub struct MemoryPanelSink {
    events: Mutex<Vec<PanelEvent>>,
}

impl MemoryPanelSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PanelEvent> {
        self.events.lock().clone()
    }

    /// Log messages in emission order.
    pub fn logs(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                PanelEvent::Log { message } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Toasts as (message, severity) in emission order.
    pub fn toasts(&self) -> Vec<(String, ToastSeverity)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                PanelEvent::Toast {
                    message, severity, ..
                } => Some((message.clone(), *severity)),
                _ => None,
            })
            .collect()
    }

    /// Number of events of the given wire kind.
    pub fn count(&self, kind: &str) -> usize {
        self.events.lock().iter().filter(|e| e.kind() == kind).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl PanelSink for MemoryPanelSink {
    fn emit(&self, event: PanelEvent) {
        self.events.lock().push(event);
    }
}
