//! Batch splitting: one input holding many similar items.

use tracing::{debug, info};

use pull2sheet_protocols::panel::DEFAULT_TOAST_MS;
use pull2sheet_protocols::{
    ExtractionError, ExtractionResult, FieldDescriptor, InputPayload, ModelSession, PanelEvent,
    ToastSeverity,
};

use crate::context::PassContext;
use crate::extractor::extract_fields;
use crate::prompt::{split_items, split_prompt, truncate_input};
use crate::timeout::with_timeout;

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;

/// How a batch pass ended.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// The split produced no fragments.
    NoItems,
    /// The split found one item; the whole input was extracted once and
    /// delivered as a single-item fill unless the pass was cancelled.
    Single {
        result: ExtractionResult,
        delivered: bool,
    },
    /// Several items were found; `delivered` holds those sent to the panel,
    /// in order. `stopped` is set when the token cut the sequence short.
    Items {
        total: usize,
        delivered: Vec<ExtractionResult>,
        stopped: Option<StopCause>,
    },
}

/// Why a batch sequence ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCause {
    /// Cancelled with no failed field in the item being processed.
    Cancelled,
    /// A field of the current item failed or timed out.
    Failure,
}

/// Split `raw_input` into items and extract each one through `session`.
///
/// Results are delivered to the panel as soon as each item is done. Only the
/// split prompt itself can fail this call.
pub async fn split_and_extract(
    ctx: &PassContext,
    session: &dyn ModelSession,
    raw_input: &str,
    fields: &[FieldDescriptor],
) -> Result<BatchOutcome, ExtractionError> {
    let max = ctx.config().batch_max_length;
    let input = match truncate_input(raw_input, max) {
        Some(truncated) => {
            ctx.log(&format!(
                "Batch input text too long ({} chars). Truncating to {} chars.",
                raw_input.chars().count(),
                max
            ));
            ctx.toast(
                &format!("Warning: Batch input truncated to {} characters for stability.", max),
                ToastSeverity::Info,
                DEFAULT_TOAST_MS,
            );
            truncated
        }
        None => raw_input.to_string(),
    };

    ctx.log("Asking AI to split text into individual items...");
    let response = with_timeout(
        ctx,
        ctx.config().batch_split_timeout(),
        "AI batch splitting timed out.",
        session.prompt(split_prompt(&input)),
    )
    .await?;

    let items = split_items(&response);
    info!(pass = ctx.id(), items = items.len(), "Batch split complete");

    match items.len() {
        0 => {
            ctx.log("AI could not identify any items in the selection.");
            ctx.toast(
                "Batch Mode: AI could not find distinct items in the selected text.",
                ToastSeverity::Error,
                DEFAULT_TOAST_MS,
            );
            Ok(BatchOutcome::NoItems)
        }
        1 => {
            ctx.log("AI found only one item. Processing as a single entry.");
            let result =
                extract_fields(ctx, session, &InputPayload::Text(input.clone()), fields).await;
            let delivered = !ctx.is_cancelled();
            if delivered {
                ctx.emit(PanelEvent::FillFields {
                    data: result.clone(),
                });
            }
            Ok(BatchOutcome::Single { result, delivered })
        }
        total => {
            ctx.log(&format!(
                "AI identified {} items. Starting extraction for each...",
                total
            ));
            let (delivered, stopped) = extract_items(ctx, session, &items, fields).await;
            Ok(BatchOutcome::Items {
                total,
                delivered,
                stopped,
            })
        }
    }
}

async fn extract_items(
    ctx: &PassContext,
    session: &dyn ModelSession,
    items: &[&str],
    fields: &[FieldDescriptor],
) -> (Vec<ExtractionResult>, Option<StopCause>) {
    let total = items.len();
    let mut delivered = Vec::with_capacity(total);

    for (index, item) in items.iter().enumerate() {
        if ctx.is_cancelled() {
            ctx.log("Batch task stopped.");
            return (delivered, Some(StopCause::Cancelled));
        }

        ctx.log(&format!("--- Processing item {} of {} ---", index + 1, total));
        let result =
            extract_fields(ctx, session, &InputPayload::Text((*item).to_string()), fields).await;

        if ctx.is_cancelled() {
            ctx.log("Batch task stopped due to timeout or error.");
            ctx.toast(
                "Batch operation stopped due to timeout or error.",
                ToastSeverity::Error,
                10_000,
            );
            let cause = if result.has_failure() {
                StopCause::Failure
            } else {
                StopCause::Cancelled
            };
            return (delivered, Some(cause));
        }

        ctx.emit(PanelEvent::FillAndAdd {
            data: result.clone(),
        });
        delivered.push(result);

        // Pacing for the panel; a cancel ends the wait early.
        tokio::select! {
            _ = tokio::time::sleep(ctx.config().batch_pacing()) => {}
            _ = ctx.token().cancelled() => {
                debug!(pass = ctx.id(), "Pacing interrupted by cancel");
            }
        }
    }

    let stopped = ctx.is_cancelled().then_some(StopCause::Cancelled);
    (delivered, stopped)
}
