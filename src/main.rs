//! Pull2Sheet - field extraction into sheet rows
//!
//! Main entry point for the Pull2Sheet CLI host.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pull2sheet_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig, ProviderConfig};
use pull2sheet_protocols::LanguageModel;
use pull2sheet_provider_ollama::OllamaModel;

mod cli;
mod cmd_analyze;
mod cmd_check;
mod cmd_extract;
mod cmd_settings;

use cli::{Cli, Commands};

const LOG_DIR: &str = "logs";

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let log_dir = logging
        .dir
        .clone()
        .unwrap_or_else(|| ConfigLoader::home_dir().join(LOG_DIR));
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("pull2sheet")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The writer flushes on drop, so the guard lives for the whole process.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true).with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

fn config_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| ConfigLoader::home_dir().join("config.toml"))
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = ConfigLoader::load_or_default(path)
        .with_context(|| format!("loading config from {}", path.display()))?;

    let validation = ConfigValidator::validate(&config);
    for warning in &validation.warnings {
        eprintln!("config warning: {}: {}", warning.path, warning.message);
    }
    if !validation.is_valid() {
        for error in &validation.errors {
            eprintln!("config error: {}: {}", error.path, error.message);
        }
        bail!("invalid configuration in {}", path.display());
    }
    Ok(config)
}

/// Build the model capability from the `[provider]` section.
pub(crate) fn build_model(provider: &ProviderConfig) -> anyhow::Result<Arc<dyn LanguageModel>> {
    let model = OllamaModel::new(
        &provider.base_url,
        provider.model.clone(),
        Duration::from_secs(provider.request_timeout_secs),
    )?
    .with_vision(provider.vision);
    info!(base_url = %model.base_url(), model = %provider.model, "Using Ollama model");
    Ok(Arc::new(model))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let path = config_path(cli.config.as_deref());
    let config = load_config(&path)?;
    init_tracing(&config.logging)?;

    info!("Starting Pull2Sheet v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Check => cmd_check::run(&config).await,
        Commands::Extract(args) => cmd_extract::run(&config, args).await,
        Commands::Analyze { headers, example } => {
            cmd_analyze::run(&config, &headers, example.as_deref()).await
        }
        Commands::Settings {
            batch_mode,
            analyze_headers,
        } => cmd_settings::run(&path, &config, batch_mode, analyze_headers),
    };

    if let Err(e) = &result {
        warn!(error = %e, "Command failed");
    }
    result
}
