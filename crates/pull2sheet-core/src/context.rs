//! Per-pass context.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use pull2sheet_config::ExtractionConfig;
use pull2sheet_protocols::{PanelEvent, PanelSink, ToastSeverity};

/// State shared by every step of one extraction pass.
///
/// The token is created fresh for each pass and is never reset; once
/// cancelled, no new field prompt or batch item starts.
#[derive(Clone)]
pub struct PassContext {
    id: u64,
    token: CancellationToken,
    panel: Arc<dyn PanelSink>,
    config: Arc<ExtractionConfig>,
}

impl PassContext {
    pub fn new(id: u64, panel: Arc<dyn PanelSink>, config: Arc<ExtractionConfig>) -> Self {
        Self {
            id,
            token: CancellationToken::new(),
            panel,
            config,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn emit(&self, event: PanelEvent) {
        self.panel.emit(event);
    }

    /// Write to the activity log and to tracing.
    pub fn log(&self, message: &str) {
        info!(pass = self.id, "{}", message);
        self.panel.emit(PanelEvent::log(message));
    }

    pub fn toast(&self, message: &str, severity: ToastSeverity, duration_ms: u64) {
        self.panel
            .emit(PanelEvent::toast(message, severity, duration_ms));
    }
}

impl std::fmt::Debug for PassContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassContext")
            .field("id", &self.id)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}
