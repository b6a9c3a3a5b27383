//! Sequential field extraction.

use tracing::{debug, error};

use pull2sheet_protocols::{
    ExtractionError, ExtractionResult, FailureKind, FieldDescriptor, FieldValue, InputPayload,
    ModelSession, Prompt,
};

use crate::context::PassContext;
use crate::prompt::{clean_response, field_prompt};
use crate::timeout::with_timeout;

#[cfg(test)]
#[path = "extractor_tests.rs"]
mod tests;

/// Extract every field from `input`, one prompt at a time, in field order.
///
/// Never fails: a failed field is recorded as [`FieldValue::Failed`]. Fields
/// not reached before the pass was cancelled are absent from the result.
pub async fn extract_fields(
    ctx: &PassContext,
    session: &dyn ModelSession,
    input: &InputPayload,
    fields: &[FieldDescriptor],
) -> ExtractionResult {
    let mut results = ExtractionResult::new();
    let mut consecutive_failures = 0u32;
    let max_failures = ctx.config().max_consecutive_failures.max(1);

    ctx.log(&format!(
        "Starting sequential AI extraction for {} fields...",
        fields.len()
    ));

    for field in fields {
        if ctx.is_cancelled() {
            ctx.log("AI task stopped (cancelled or timed out) during sequential extraction.");
            break;
        }

        ctx.log(&format!("- Querying AI for: {}", field.name));
        let prompt = field_prompt(field, input);

        match prompt_field(ctx, session, &field.name, prompt).await {
            Ok(raw) => {
                consecutive_failures = 0;
                let value = clean_response(&raw);
                ctx.log(&format!("  > AI Result for {}: \"{}\"", field.name, value.as_wire()));
                results.insert(field.name.clone(), value);
            }
            Err(ExtractionError::Cancelled) => {
                debug!(field = %field.name, "In-flight prompt dropped on cancel");
                break;
            }
            Err(e) => {
                error!(pass = ctx.id(), field = %field.name, error = %e, "Field extraction failed");
                ctx.log(&format!("  > Error for field {}: {}", field.name, e));

                let kind = if e.is_timeout() {
                    FailureKind::Timeout
                } else {
                    FailureKind::Error
                };
                results.insert(field.name.clone(), FieldValue::Failed(kind));

                consecutive_failures += 1;
                if consecutive_failures >= max_failures {
                    // Timeouts have already cancelled the pass.
                    ctx.cancel();
                    break;
                }
            }
        }
    }

    results
}

/// One field prompt under the field deadline, retried on plain failures.
async fn prompt_field(
    ctx: &PassContext,
    session: &dyn ModelSession,
    field_name: &str,
    prompt: Prompt,
) -> Result<String, ExtractionError> {
    let deadline = ctx.config().field_timeout();
    let message = format!("AI timed out while extracting field: \"{}\".", field_name);
    let mut attempt = 0;

    loop {
        let result = with_timeout(ctx, deadline, &message, async {
            session
                .prompt(prompt.clone())
                .await
                .map_err(|e| ExtractionError::ExtractionFailure(e.to_string()))
        })
        .await;

        match result {
            Err(ExtractionError::ExtractionFailure(reason))
                if attempt < ctx.config().retry_count && !ctx.is_cancelled() =>
            {
                attempt += 1;
                debug!(field = field_name, attempt, %reason, "Retrying field prompt");
                ctx.log(&format!("  > Retrying {} (attempt {})", field_name, attempt + 1));
            }
            other => return other,
        }
    }
}
