//! Context-menu trigger dispatch.

use std::sync::Arc;

use tracing::{info, warn};

use pull2sheet_protocols::panel::DEFAULT_TOAST_MS;
use pull2sheet_protocols::{
    ExtractionError, FieldSource, InputPayload, PanelEvent, PanelSink, ToastSeverity,
};

use crate::fetch::ImageFetcher;
use crate::orchestrator::{Orchestrator, PassReport};

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;

const SNIPPET_CHARS: usize = 150;

/// First characters of a selection for the activity log.
fn snippet(text: &str) -> String {
    match text.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// What the user invoked extraction on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Selection(String),
    Image { src_url: String },
    Empty,
}

impl Trigger {
    /// Selection text takes precedence over an image; blank text counts as none.
    pub fn from_parts(selection: Option<String>, src_url: Option<String>) -> Self {
        match (selection, src_url) {
            (Some(text), _) if !text.trim().is_empty() => Trigger::Selection(text),
            (_, Some(src_url)) if !src_url.trim().is_empty() => Trigger::Image { src_url },
            _ => Trigger::Empty,
        }
    }
}

/// Routes a trigger to the single-item or batch flow.
pub struct TriggerHandler {
    orchestrator: Arc<Orchestrator>,
    fetcher: Arc<dyn ImageFetcher>,
}

impl TriggerHandler {
    pub fn new(orchestrator: Arc<Orchestrator>, fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self {
            orchestrator,
            fetcher,
        }
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }

    fn emit(&self, event: PanelEvent) {
        self.orchestrator.panel().emit(event);
    }

    fn log(&self, message: &str) {
        self.emit(PanelEvent::log(message));
    }

    fn toast(&self, message: &str, severity: ToastSeverity, duration_ms: u64) {
        self.emit(PanelEvent::toast(message, severity, duration_ms));
    }

    /// Returns `None` when the panel supplied no fields or nothing was
    /// selected.
    pub async fn dispatch(&self, trigger: Trigger, source: &dyn FieldSource) -> Option<PassReport> {
        self.log("Context menu clicked. Checking for fields...");

        let request = match source.field_request().await {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Field request failed");
                self.log(&format!("Error communicating with side panel: {}", e));
                return None;
            }
        };
        if request.fields.is_empty() {
            self.log("Action stopped: No fields defined.");
            return None;
        }

        self.emit(PanelEvent::ShowSpinner);

        match trigger {
            Trigger::Selection(text) => {
                self.log(&format!("Processing selected text: \"{}\"", snippet(&text)));
                info!(batch = request.batch_mode, chars = text.len(), "Dispatching text selection");
                let report = if request.batch_mode {
                    self.orchestrator.extract_batch(&text, &request.fields).await
                } else {
                    self.orchestrator
                        .extract_single(InputPayload::Text(text), &request.fields)
                        .await
                };
                Some(report)
            }
            Trigger::Image { src_url } => {
                if request.batch_mode {
                    self.log("Batch mode is not supported for images. Processing as a single item.");
                    self.toast(
                        "Batch Mode is only available for text extraction.",
                        ToastSeverity::Info,
                        DEFAULT_TOAST_MS,
                    );
                }
                self.log(&format!("Processing image: {}", src_url));

                match self.fetcher.fetch(&src_url).await {
                    Ok(image) => Some(
                        self.orchestrator
                            .extract_single(InputPayload::Image(image), &request.fields)
                            .await,
                    ),
                    Err(e) => {
                        warn!(url = %src_url, error = %e, "Image fetch failed");
                        self.log(&format!("Error processing image: {}", e));
                        self.toast(
                            &format!("Error processing image: {}", e),
                            ToastSeverity::Error,
                            10_000,
                        );
                        self.emit(PanelEvent::HideSpinner);
                        Some(PassReport::failed(ExtractionError::Fetch(e.to_string())))
                    }
                }
            }
            Trigger::Empty => {
                self.log("Action stopped: No text or image selected.");
                self.emit(PanelEvent::HideSpinner);
                None
            }
        }
    }
}
