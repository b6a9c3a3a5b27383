//! Top-level extraction passes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use pull2sheet_config::ExtractionConfig;
use pull2sheet_protocols::panel::DEFAULT_TOAST_MS;
use pull2sheet_protocols::{
    ExtractionError, ExtractionResult, FieldDescriptor, InputKind, InputPayload, LanguageModel,
    PanelEvent, PanelSink, SessionOptions, ToastSeverity,
};

use crate::batch::{split_and_extract, BatchOutcome, StopCause};
use crate::context::PassContext;
use crate::extractor::extract_fields;
use crate::prompt::truncate_input;
use crate::session::{SessionGuard, SessionManager};

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;

/// How a pass ended.
#[derive(Debug)]
pub enum PassOutcome {
    /// Every item was extracted and delivered.
    Completed { items: usize },
    /// The user cancelled; no field carries a failure.
    Cancelled,
    /// A timeout or field error stopped the pass; partial results may exist.
    PartialFailure,
    /// The pass failed before producing results.
    Failed(ExtractionError),
}

/// Which message carried the results to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Nothing was sent.
    None,
    /// FILL_FIELDS: values wait in the panel inputs, no row is committed.
    FillFields,
    /// FILL_AND_ADD: every item was committed as a row.
    FillAndAdd,
}

/// Result of one pass, returned after teardown.
#[derive(Debug)]
pub struct PassReport {
    pub outcome: PassOutcome,
    /// Results sent to the panel, in delivery order.
    pub delivered: Vec<ExtractionResult>,
    pub delivery: Delivery,
}

impl PassReport {
    fn new(outcome: PassOutcome, delivered: Vec<ExtractionResult>) -> Self {
        let delivery = if delivered.is_empty() {
            Delivery::None
        } else {
            Delivery::FillAndAdd
        };
        Self {
            outcome,
            delivered,
            delivery,
        }
    }

    /// A completed pass whose single result went out as FILL_FIELDS.
    fn filled(result: ExtractionResult) -> Self {
        Self {
            outcome: PassOutcome::Completed { items: 1 },
            delivered: vec![result],
            delivery: Delivery::FillFields,
        }
    }

    pub(crate) fn failed(error: ExtractionError) -> Self {
        Self::new(PassOutcome::Failed(error), Vec::new())
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, PassOutcome::Completed { .. })
    }

    /// Whether the values sit in the panel inputs without a committed row.
    pub fn awaits_commit(&self) -> bool {
        self.delivery == Delivery::FillFields
    }
}

/// Runs single-item and batch passes.
///
/// Each pass gets a fresh cancellation token registered until the pass
/// ends; [`Orchestrator::cancel`] triggers every registered token. Both
/// entry points always dispose their session, emit HIDE_SPINNER and return
/// a report instead of an error.
pub struct Orchestrator {
    sessions: SessionManager,
    panel: Arc<dyn PanelSink>,
    config: Arc<ExtractionConfig>,
    active: Mutex<HashMap<u64, CancellationToken>>,
    next_pass: AtomicU64,
}

impl Orchestrator {
    pub fn new(
        model: Option<Arc<dyn LanguageModel>>,
        panel: Arc<dyn PanelSink>,
        config: ExtractionConfig,
    ) -> Self {
        Self {
            sessions: SessionManager::new(model),
            panel,
            config: Arc::new(config),
            active: Mutex::new(HashMap::new()),
            next_pass: AtomicU64::new(1),
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn panel(&self) -> &Arc<dyn PanelSink> {
        &self.panel
    }

    /// CANCEL_TASK: stop every pass in progress at its next poll point.
    ///
    /// Returns whether any pass was running.
    pub fn cancel(&self) -> bool {
        let active = self.active.lock();
        if active.is_empty() {
            return false;
        }
        self.panel.emit(PanelEvent::log(
            "Cancellation request received. Process will stop soon.",
        ));
        info!(passes = active.len(), "Cancelling active passes");
        for token in active.values() {
            token.cancel();
        }
        true
    }

    pub fn is_busy(&self) -> bool {
        !self.active.lock().is_empty()
    }

    fn begin_pass(&self) -> PassContext {
        let id = self.next_pass.fetch_add(1, Ordering::Relaxed);
        let ctx = PassContext::new(id, self.panel.clone(), self.config.clone());
        self.active.lock().insert(id, ctx.token().clone());
        ctx
    }

    async fn end_pass(&self, ctx: &PassContext, session: Option<SessionGuard>) {
        if let Some(session) = session {
            session.dispose(ctx).await;
        }
        self.active.lock().remove(&ctx.id());
        ctx.emit(PanelEvent::HideSpinner);
    }

    /// Extract one item from text or an image and deliver it as FILL_FIELDS.
    #[instrument(skip_all, fields(kind = ?input.kind(), fields = fields.len()))]
    pub async fn extract_single(
        &self,
        input: InputPayload,
        fields: &[FieldDescriptor],
    ) -> PassReport {
        let ctx = self.begin_pass();
        let mut session = None;

        let report = match self.run_single(&ctx, input, fields, &mut session).await {
            Ok(report) => report,
            Err(e) => {
                error!(pass = ctx.id(), error = %e, "Single-item extraction failed");
                ctx.log(&format!("An error occurred during extraction: {}", e));
                PassReport::failed(e)
            }
        };

        self.end_pass(&ctx, session).await;
        report
    }

    async fn run_single(
        &self,
        ctx: &PassContext,
        input: InputPayload,
        fields: &[FieldDescriptor],
        session: &mut Option<SessionGuard>,
    ) -> Result<PassReport, ExtractionError> {
        self.sessions.check_availability(ctx).await?;
        ctx.log("Starting single item extraction...");

        let input = match input {
            InputPayload::Text(text) => {
                let max = ctx.config().max_input_length;
                match truncate_input(&text, max) {
                    Some(truncated) => {
                        ctx.log(&format!(
                            "Input text too long ({} chars). Truncating to {} chars.",
                            text.chars().count(),
                            max
                        ));
                        ctx.toast(
                            &format!("Warning: Input truncated to {} characters for stability.", max),
                            ToastSeverity::Info,
                            DEFAULT_TOAST_MS,
                        );
                        InputPayload::Text(truncated)
                    }
                    None => InputPayload::Text(text),
                }
            }
            image => image,
        };

        let guard = match input.kind() {
            InputKind::Text => self.sessions.create_session(ctx, SessionOptions::text()).await?,
            InputKind::Image => self
                .sessions
                .create_session(ctx, SessionOptions::multimodal())
                .await
                .map_err(|e| reject_modality(ctx, e))?,
        };
        let guard = session.insert(guard);

        let result = extract_fields(ctx, guard.session(), &input, fields).await;

        if !ctx.is_cancelled() {
            ctx.log("AI extraction complete. Sending data to panel.");
            ctx.emit(PanelEvent::FillFields {
                data: result.clone(),
            });
            return Ok(PassReport::filled(result));
        }

        if result.has_failure() {
            ctx.toast(
                "AI operation stopped due to timeout or error. Partial results may be shown.",
                ToastSeverity::Error,
                10_000,
            );
            Ok(PassReport::new(PassOutcome::PartialFailure, Vec::new()))
        } else {
            ctx.log("AI task cancelled by user.");
            ctx.toast("AI operation cancelled by user.", ToastSeverity::Info, DEFAULT_TOAST_MS);
            Ok(PassReport::new(PassOutcome::Cancelled, Vec::new()))
        }
    }

    /// Split a text selection into items and deliver each as FILL_AND_ADD.
    #[instrument(skip_all, fields(chars = text.len(), fields = fields.len()))]
    pub async fn extract_batch(&self, text: &str, fields: &[FieldDescriptor]) -> PassReport {
        let ctx = self.begin_pass();
        let mut session = None;

        let report = match self.run_batch(&ctx, text, fields, &mut session).await {
            Ok(report) => report,
            Err(e) => {
                error!(pass = ctx.id(), error = %e, "Batch extraction failed");
                ctx.log(&format!("An error occurred during batch extraction: {}", e));
                // Creation timeouts were already announced by the session manager.
                if e.is_timeout() && session.is_some() {
                    ctx.toast(
                        "AI batch processing timed out during analysis. Try selecting fewer items.",
                        ToastSeverity::Error,
                        DEFAULT_TOAST_MS,
                    );
                }
                PassReport::failed(e)
            }
        };

        self.end_pass(&ctx, session).await;
        report
    }

    async fn run_batch(
        &self,
        ctx: &PassContext,
        text: &str,
        fields: &[FieldDescriptor],
        session: &mut Option<SessionGuard>,
    ) -> Result<PassReport, ExtractionError> {
        self.sessions.check_availability(ctx).await?;
        ctx.log("Starting Batch Mode extraction...");

        let guard = self
            .sessions
            .create_session(ctx, SessionOptions::text())
            .await?;
        let guard = session.insert(guard);

        let report = match split_and_extract(ctx, guard.session(), text, fields).await? {
            BatchOutcome::NoItems => PassReport::failed(ExtractionError::NoItemsFound),
            BatchOutcome::Single { result, delivered } => {
                if delivered {
                    PassReport::filled(result)
                } else {
                    PassReport::new(stopped_outcome(&result), Vec::new())
                }
            }
            BatchOutcome::Items {
                total,
                delivered,
                stopped,
            } => match stopped {
                Some(StopCause::Cancelled) => PassReport::new(PassOutcome::Cancelled, delivered),
                Some(StopCause::Failure) => PassReport::new(PassOutcome::PartialFailure, delivered),
                None => {
                    ctx.log("Batch processing complete.");
                    ctx.toast(
                        &format!("Batch complete: Successfully processed {} items.", total),
                        ToastSeverity::Success,
                        DEFAULT_TOAST_MS,
                    );
                    PassReport::new(PassOutcome::Completed { items: total }, delivered)
                }
            },
        };
        Ok(report)
    }
}

fn stopped_outcome(result: &ExtractionResult) -> PassOutcome {
    if result.has_failure() {
        PassOutcome::PartialFailure
    } else {
        PassOutcome::Cancelled
    }
}

/// Any non-timeout failure to open a multimodal session means the model
/// cannot take images.
fn reject_modality(ctx: &PassContext, error: ExtractionError) -> ExtractionError {
    if error.is_timeout() {
        return error;
    }
    ctx.log(&format!("Failed to create multi-modal session: {}", error));
    ctx.toast(
        "This AI model configuration does not support image analysis.",
        ToastSeverity::Error,
        DEFAULT_TOAST_MS,
    );
    ExtractionError::UnsupportedModality(error.to_string())
}
