//! `analyze` subcommand: describe headers and print a template.

use pull2sheet_config::Config;
use pull2sheet_panel::{template_json, HeaderAnalyzer, PanelHandle};

use crate::build_model;
use crate::cli::split_list;

pub(crate) async fn run(config: &Config, headers: &str, example: Option<&str>) -> anyhow::Result<()> {
    let headers = split_list(headers);
    if headers.iter().all(|h| h.is_empty()) {
        anyhow::bail!("no headers given");
    }
    let first_row = example.map(split_list).unwrap_or_default();

    let panel = PanelHandle::new(config.settings.clone());
    let analyzer = HeaderAnalyzer::new(
        build_model(&config.provider)?,
        config.extraction.session_timeout(),
    );
    let fields = analyzer.analyze(&headers, &first_row, &panel).await;

    for entry in panel.lock().log_entries() {
        eprintln!("{}", entry);
    }
    println!("{}", template_json(&fields)?);
    Ok(())
}
