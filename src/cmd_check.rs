//! `check` subcommand: report model availability.

use std::sync::Arc;

use pull2sheet_config::Config;
use pull2sheet_core::{PassContext, SessionManager};
use pull2sheet_panel::PanelHandle;

use crate::build_model;

pub(crate) async fn run(config: &Config) -> anyhow::Result<()> {
    let model = build_model(&config.provider)?;
    let model_id = model.id().to_string();
    let panel = PanelHandle::new(config.settings.clone());
    let ctx = PassContext::new(0, Arc::new(panel.clone()), Arc::new(config.extraction.clone()));

    let checked = SessionManager::new(Some(model)).check_availability(&ctx).await;

    if let Some(toast) = panel.lock().last_toast() {
        eprintln!("{}", toast.message);
    }
    match checked {
        Ok(status) => {
            println!("{}: {}", model_id, status);
            Ok(())
        }
        Err(e) => anyhow::bail!("{}: {}", model_id, e),
    }
}
