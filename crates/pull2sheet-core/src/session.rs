//! Model session lifecycle.

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, error, warn};

use pull2sheet_protocols::{
    Availability, ExtractionError, LanguageModel, ModelSession, SessionOptions, ToastSeverity,
};

use crate::context::PassContext;
use crate::timeout::with_timeout;

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

const UNSUPPORTED_GUIDANCE: &str = "AI features are not supported in this environment. \
     Please configure an on-device model provider.";

/// Availability checks and deadline-bounded session creation.
#[derive(Clone)]
pub struct SessionManager {
    model: Option<Arc<dyn LanguageModel>>,
}

impl SessionManager {
    pub fn new(model: Option<Arc<dyn LanguageModel>>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> Option<&Arc<dyn LanguageModel>> {
        self.model.as_ref()
    }

    /// Fail with `Unsupported` when no capability exists, or `Unavailable`
    /// when it reports so. Both are surfaced with guidance.
    pub async fn check_availability(&self, ctx: &PassContext) -> Result<Availability, ExtractionError> {
        let Some(model) = &self.model else {
            ctx.log("AI API not supported.");
            ctx.toast(UNSUPPORTED_GUIDANCE, ToastSeverity::Error, 10_000);
            return Err(ExtractionError::Unsupported);
        };

        let availability = match model.availability().await {
            Ok(availability) => availability,
            Err(e) => {
                warn!(model = model.id(), error = %e, "Availability query failed");
                Availability::Unavailable
            }
        };
        debug!(model = model.id(), %availability, "Model availability");

        if !availability.is_usable() {
            ctx.log(&format!("AI model is not available. Status: {}", availability));
            ctx.toast(
                &format!(
                    "AI model is unavailable (Status: {}). Please ensure the on-device model \
                     \"{}\" is installed and its runtime is running.",
                    availability,
                    model.id()
                ),
                ToastSeverity::Error,
                15_000,
            );
            return Err(ExtractionError::Unavailable(availability.to_string()));
        }
        Ok(availability)
    }

    /// Open a session within the creation deadline.
    ///
    /// Creation runs on its own task. If the deadline passes first, the task
    /// is left running and destroys whatever session it eventually yields.
    pub async fn create_session(
        &self,
        ctx: &PassContext,
        options: SessionOptions,
    ) -> Result<SessionGuard, ExtractionError> {
        let model = self.model.clone().ok_or(ExtractionError::Unsupported)?;
        ctx.log("Attempting to create AI session...");

        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let created = model.create(options).await;
            if let Err(Ok(orphan)) = tx.send(created) {
                debug!("Session arrived after the creation deadline, destroying it");
                orphan.destroy().await;
            }
        });

        let deadline = ctx.config().session_timeout();
        let message = format!(
            "AI session creation timed out after {} seconds.",
            deadline.as_secs()
        );
        let created = with_timeout(ctx, deadline, &message, async move {
            match rx.await {
                Ok(created) => created.map_err(ExtractionError::from),
                Err(_) => Err(ExtractionError::ExtractionFailure(
                    "session creation task ended unexpectedly".to_string(),
                )),
            }
        })
        .await;

        match created {
            Ok(session) => {
                ctx.log("AI session created successfully.");
                Ok(SessionGuard::new(session))
            }
            Err(e) => {
                error!(pass = ctx.id(), error = %e, "Failed to create AI session");
                ctx.log(&format!("Failed to create AI session: {}", e));
                if e.is_timeout() {
                    ctx.toast(
                        "AI initialization timed out. The model might be busy or not ready. \
                         Please try again later.",
                        ToastSeverity::Error,
                        10_000,
                    );
                }
                Err(e)
            }
        }
    }
}

/// Owns an open session until [`SessionGuard::dispose`] is called.
///
/// Dropping an undisposed guard schedules the destroy on the current runtime.
pub struct SessionGuard {
    session: Option<Box<dyn ModelSession>>,
}

impl SessionGuard {
    pub fn new(session: Box<dyn ModelSession>) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn session(&self) -> &dyn ModelSession {
        match &self.session {
            Some(session) => session.as_ref(),
            None => unreachable!("session accessed after dispose"),
        }
    }

    pub async fn dispose(mut self, ctx: &PassContext) {
        if let Some(session) = self.session.take() {
            session.destroy().await;
            ctx.log("AI session destroyed.");
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        warn!("Session guard dropped without dispose");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { session.destroy().await });
            }
            Err(_) => error!("No runtime available to destroy session"),
        }
    }
}
