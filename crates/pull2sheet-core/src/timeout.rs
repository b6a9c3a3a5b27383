//! Deadline guard for model operations.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use pull2sheet_protocols::{ExtractionError, PanelEvent};

use crate::context::PassContext;

/// Race `operation` against `deadline`.
///
/// On expiry the pass token is cancelled, the message is logged and a
/// [`ExtractionError::Timeout`] carrying it is returned. The operation itself
/// is dropped, not aborted on the far side. A completed operation's result is
/// passed through.
///
/// With `abort_in_flight` the operation is also dropped as soon as the token
/// fires for another reason, yielding [`ExtractionError::Cancelled`].
pub async fn with_timeout<F, T, E>(
    ctx: &PassContext,
    deadline: Duration,
    message: &str,
    operation: F,
) -> Result<T, ExtractionError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<ExtractionError>,
{
    let guarded = async {
        match tokio::time::timeout(deadline, operation).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => {
                ctx.cancel();
                warn!(
                    pass = ctx.id(),
                    deadline_ms = deadline.as_millis() as u64,
                    "{}",
                    message
                );
                ctx.emit(PanelEvent::log(format!("[TIMEOUT] {message}")));
                Err(ExtractionError::Timeout(message.to_string()))
            }
        }
    };

    if !ctx.config().abort_in_flight {
        return guarded.await;
    }

    tokio::select! {
        biased;
        result = guarded => result,
        _ = ctx.token().cancelled() => Err(ExtractionError::Cancelled),
    }
}
