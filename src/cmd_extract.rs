//! `extract` subcommand: dispatch one trigger against a template or sheet.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio::io::AsyncReadExt;
use tracing::info;

use pull2sheet_config::Config;
use pull2sheet_core::{
    HttpImageFetcher, Orchestrator, PassOutcome, PassReport, Trigger, TriggerHandler,
};
use pull2sheet_panel::{parse_template, HeaderAnalyzer, PanelHandle, Sheet};

use crate::build_model;
use crate::cli::ExtractArgs;

/// Where the selection comes from.
#[derive(Debug)]
pub(crate) enum InputSource {
    File(PathBuf),
    Stdin,
    ImageUrl(String),
}

impl InputSource {
    pub(crate) fn from_args(
        text: Option<PathBuf>,
        stdin: bool,
        image_url: Option<String>,
    ) -> anyhow::Result<Self> {
        match (text, stdin, image_url) {
            (Some(path), false, None) => Ok(Self::File(path)),
            (None, true, None) => Ok(Self::Stdin),
            (None, false, Some(url)) => Ok(Self::ImageUrl(url)),
            _ => anyhow::bail!("exactly one of --text, --stdin or --image-url is required"),
        }
    }

    async fn into_trigger(self) -> anyhow::Result<Trigger> {
        let trigger = match self {
            Self::File(path) => {
                let text = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("reading {}", path.display()))?;
                Trigger::from_parts(Some(text), None)
            }
            Self::Stdin => {
                let mut text = String::new();
                tokio::io::stdin().read_to_string(&mut text).await?;
                Trigger::from_parts(Some(text), None)
            }
            Self::ImageUrl(url) => Trigger::from_parts(None, Some(url)),
        };
        Ok(trigger)
    }
}

pub(crate) async fn run(config: &Config, args: ExtractArgs) -> anyhow::Result<()> {
    let source = InputSource::from_args(args.text, args.stdin, args.image_url)?;
    let model = build_model(&config.provider)?;
    let panel = PanelHandle::new(config.settings.clone());

    if let Some(path) = &args.sheet {
        let analyzer = HeaderAnalyzer::new(model.clone(), config.extraction.session_timeout());
        load_sheet(&panel, path, &analyzer).await?;
    }
    if let Some(path) = &args.template {
        let template_text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading template {}", path.display()))?;
        panel.lock().apply_template(parse_template(&template_text)?, false)?;
    }

    let batch_mode = args.batch || config.settings.batch_mode_enabled;
    panel.lock().set_batch_mode(batch_mode);

    let orchestrator = Arc::new(Orchestrator::new(
        Some(model),
        Arc::new(panel.clone()),
        config.extraction.clone(),
    ));
    let fetcher = HttpImageFetcher::new(config.extraction.session_timeout())?;
    let handler = TriggerHandler::new(orchestrator.clone(), Arc::new(fetcher));

    let trigger = source.into_trigger().await?;
    let report = dispatch_until_done(&handler, trigger, &panel).await;

    if let Some(report) = &report {
        if report.awaits_commit() {
            let added = panel.lock().add_row()?;
            info!(added, "Committed FILL_FIELDS result");
        }
    }

    print_log(&panel);
    write_rows(&panel, args.output.as_deref()).await?;

    match report.map(|r| r.outcome) {
        Some(PassOutcome::Failed(e)) => Err(e.into()),
        _ => Ok(()),
    }
}

/// Load a sheet JSON, describing its headers when analysis is enabled.
async fn load_sheet(
    panel: &PanelHandle,
    path: &Path,
    analyzer: &HeaderAnalyzer,
) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading sheet {}", path.display()))?;
    let sheet: Sheet = serde_json::from_str(&content)
        .with_context(|| format!("parsing sheet {}", path.display()))?;
    panel
        .load_sheet(&sheet.filename, sheet.headers, sheet.rows, Some(analyzer))
        .await?;
    Ok(())
}

/// Run the trigger, turning Ctrl-C into CANCEL_TASK.
async fn dispatch_until_done(
    handler: &TriggerHandler,
    trigger: Trigger,
    panel: &PanelHandle,
) -> Option<PassReport> {
    let dispatch = handler.dispatch(trigger, panel);
    tokio::pin!(dispatch);
    loop {
        tokio::select! {
            report = &mut dispatch => return report,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received");
                handler.orchestrator().cancel();
            }
        }
    }
}

fn print_log(panel: &PanelHandle) {
    let store = panel.lock();
    for entry in store.log_entries() {
        eprintln!("{}", entry);
    }
    if let Some(toast) = store.last_toast() {
        eprintln!("[{:?}] {}", toast.severity, toast.message);
    }
}

async fn write_rows(panel: &PanelHandle, output: Option<&Path>) -> anyhow::Result<()> {
    let json = {
        let store = panel.lock();
        match store.sheet() {
            Some(sheet) => serde_json::to_string_pretty(sheet)?,
            None => return Ok(()),
        }
    };
    match output {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "Rows written");
        }
        None => println!("{}", json),
    }
    Ok(())
}
