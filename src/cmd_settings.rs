//! `settings` subcommand: show or persist the panel toggles.

use std::path::Path;

use tracing::info;

use pull2sheet_config::{Config, ConfigLoader};

pub(crate) fn run(
    path: &Path,
    config: &Config,
    batch_mode: Option<bool>,
    analyze_headers: Option<bool>,
) -> anyhow::Result<()> {
    let mut updated = config.clone();
    if let Some(enabled) = batch_mode {
        updated.settings.batch_mode_enabled = enabled;
    }
    if let Some(enabled) = analyze_headers {
        updated.settings.analyze_headers_with_ai = enabled;
    }

    if updated != *config {
        ConfigLoader::save(path, &updated)?;
        info!(path = %path.display(), "Settings saved");
    }

    println!("batch_mode_enabled = {}", updated.settings.batch_mode_enabled);
    println!("analyze_headers_with_ai = {}", updated.settings.analyze_headers_with_ai);
    Ok(())
}
