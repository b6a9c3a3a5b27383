//! Infer field hints from sheet headers with the model.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use pull2sheet_protocols::panel::DEFAULT_TOAST_MS;
use pull2sheet_protocols::{
    FieldDescriptor, LanguageModel, ModelError, PanelError, PanelSink, Prompt, SessionOptions,
    ToastSeverity, NOT_AVAILABLE,
};

#[cfg(test)]
#[path = "analyzer_tests.rs"]
mod tests;

const EXAMPLE_VALUE_CHARS: usize = 50;

#[derive(Debug, Deserialize)]
struct AnalyzedHeader {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    field_type: Option<String>,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    keywords: Option<String>,
}

/// Asks the model for a type, format and keywords per header.
pub struct HeaderAnalyzer {
    model: Arc<dyn LanguageModel>,
    timeout: Duration,
}

impl HeaderAnalyzer {
    pub fn new(model: Arc<dyn LanguageModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Analyze `headers`, falling back to name-only descriptors on any failure.
    pub async fn analyze(
        &self,
        headers: &[String],
        first_row: &[String],
        panel: &dyn PanelSink,
    ) -> Vec<FieldDescriptor> {
        panel.log("Analyzing sheet structure with AI...");
        match self.try_analyze(headers, first_row).await {
            Ok(fields) => {
                info!(headers = headers.len(), "Header analysis complete");
                panel.log("AI analysis complete.");
                fields
            }
            Err(e) => {
                warn!(error = %e, "Header analysis failed");
                panel.log(&format!(
                    "Error during AI analysis: {}. Falling back to manual setup.",
                    e
                ));
                panel.toast(
                    "AI header analysis failed. Please define fields manually.",
                    ToastSeverity::Error,
                    DEFAULT_TOAST_MS,
                );
                default_fields(headers)
            }
        }
    }

    async fn try_analyze(
        &self,
        headers: &[String],
        first_row: &[String],
    ) -> Result<Vec<FieldDescriptor>, PanelError> {
        let session = tokio::time::timeout(self.timeout, self.model.create(SessionOptions::text()))
            .await
            .map_err(|_| PanelError::InvalidTemplate("AI session creation timed out".to_string()))?
            .map_err(model_error)?;

        let prompt = analysis_prompt(headers, first_row);
        let answered = tokio::time::timeout(self.timeout, session.prompt(Prompt::text(prompt))).await;
        session.destroy().await;

        let raw = answered
            .map_err(|_| PanelError::InvalidTemplate("AI header analysis timed out".to_string()))?
            .map_err(model_error)?;
        parse_analysis(&raw, headers)
    }
}

fn model_error(e: ModelError) -> PanelError {
    PanelError::InvalidTemplate(e.to_string())
}

/// Name-only descriptors, one per header.
pub fn default_fields(headers: &[String]) -> Vec<FieldDescriptor> {
    headers.iter().map(FieldDescriptor::new).collect()
}

/// Descriptors for a freshly loaded sheet, per the analysis setting.
pub async fn describe_headers(
    analyze_with_ai: bool,
    analyzer: Option<&HeaderAnalyzer>,
    headers: &[String],
    first_row: &[String],
    panel: &dyn PanelSink,
) -> Vec<FieldDescriptor> {
    if !analyze_with_ai {
        panel.log("Skipping AI header analysis (setting is disabled).");
        return default_fields(headers);
    }
    match analyzer {
        Some(analyzer) => analyzer.analyze(headers, first_row, panel).await,
        None => {
            panel.log("AI features unavailable. Skipping AI header analysis.");
            panel.toast(
                "AI Header Analysis requires on-device AI support.",
                ToastSeverity::Info,
                DEFAULT_TOAST_MS,
            );
            default_fields(headers)
        }
    }
}

pub fn analysis_prompt(headers: &[String], first_row: &[String]) -> String {
    let examples = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let example = first_row
                .get(index)
                .filter(|v| !v.is_empty())
                .map(|v| v.chars().take(EXAMPLE_VALUE_CHARS).collect::<String>())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            format!("Header: \"{}\", Example Value: \"{}\"", header, example)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze the following spreadsheet headers and example values. For each header, determine:\n\
         1. Likely Data Type (Choose from: Text, Number, Date, Email, URL, Currency, Time, Other).\n\
         2. Example Format (e.g., yyyy-mm-dd, $0.00, or N/A).\n\
         3. 2-3 common Keywords or Aliases (comma separated).\n\n\
         Headers and Examples:\n{examples}\n\n\
         CRITICAL: Respond ONLY with a valid JSON array of objects, where each object has the keys: \
         \"name\", \"type\", \"format\", \"keywords\". The order must match the input headers. \
         If format or keywords are N/A, use an empty string \"\". Do not include any other text \
         or markdown formatting (like ```json).\nJSON Output:"
    )
}

/// Parse the model's JSON answer. The array must have one entry per header.
pub fn parse_analysis(raw: &str, headers: &[String]) -> Result<Vec<FieldDescriptor>, PanelError> {
    let json = strip_fences(raw);
    let parsed: Vec<AnalyzedHeader> = serde_json::from_str(&json)?;
    if parsed.len() != headers.len() {
        return Err(PanelError::InvalidTemplate(
            "AI returned invalid structure or incorrect number of items.".to_string(),
        ));
    }

    Ok(parsed
        .into_iter()
        .zip(headers)
        .map(|(item, header)| FieldDescriptor {
            name: item
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| header.clone()),
            field_type: item.field_type.unwrap_or_default(),
            format: unless_not_available(item.format),
            keywords: unless_not_available(item.keywords),
        })
        .collect())
}

fn unless_not_available(value: Option<String>) -> String {
    value
        .filter(|v| !v.eq_ignore_ascii_case(NOT_AVAILABLE))
        .unwrap_or_default()
}

/// Drop a leading ```json tag and any remaining fences.
fn strip_fences(raw: &str) -> String {
    let mut text = raw.to_string();
    if let Some(start) = text.to_ascii_lowercase().find("```json") {
        text.replace_range(start..start + "```json".len(), "");
    }
    text.replace("```", "").trim().to_string()
}
