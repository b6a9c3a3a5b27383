//! Panel state: field schema, current input values and the working sheet.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Local};
use tracing::{debug, info};

use pull2sheet_config::Settings;
use pull2sheet_protocols::panel::DEFAULT_TOAST_MS;
use pull2sheet_protocols::{
    ExtractionResult, FieldDescriptor, FieldRequest, PanelError, PanelEvent, ToastSeverity,
    ERROR_MARKER,
};

use crate::sheet::{base_name, Sheet};
use crate::template::template_json;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

const DEFAULT_SHEET_NAME: &str = "sheet";

/// One activity log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub message: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// The most recent transient notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub severity: ToastSeverity,
    pub duration_ms: u64,
}

/// Single-owner panel state. Share it through [`crate::PanelHandle`].
#[derive(Debug, Default)]
pub struct PanelStore {
    settings: Settings,
    sheet: Option<Sheet>,
    fields: Vec<FieldDescriptor>,
    inputs: HashMap<String, String>,
    locked: HashSet<String>,
    added_rows: usize,
    log: Vec<LogEntry>,
    last_toast: Option<Toast>,
    busy: bool,
}

impl PanelStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_batch_mode(&mut self, enabled: bool) {
        self.settings.batch_mode_enabled = enabled;
        self.log(format!(
            "Batch Mode setting saved: {}.",
            if enabled { "ON" } else { "OFF" }
        ));
    }

    pub fn set_analyze_headers(&mut self, enabled: bool) {
        self.settings.analyze_headers_with_ai = enabled;
        self.log(format!(
            "AI Header Analysis setting saved: {}.",
            if enabled { "ON" } else { "OFF" }
        ));
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn sheet(&self) -> Option<&Sheet> {
        self.sheet.as_ref()
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.inputs.get(field).map(String::as_str)
    }

    pub fn is_locked(&self, field: &str) -> bool {
        self.locked.contains(field)
    }

    pub fn added_rows(&self) -> usize {
        self.added_rows
    }

    pub fn log_entries(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn last_toast(&self) -> Option<&Toast> {
        self.last_toast.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(target: "pull2sheet::panel", "{}", message);
        self.log.push(LogEntry {
            at: Local::now(),
            message,
        });
    }

    pub fn toast(&mut self, message: impl Into<String>, severity: ToastSeverity, duration_ms: u64) {
        self.last_toast = Some(Toast {
            message: message.into(),
            severity,
            duration_ms,
        });
    }

    /// Install a loaded sheet with its (possibly analyzed) descriptors.
    pub fn load_sheet(
        &mut self,
        filename: &str,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        fields: Vec<FieldDescriptor>,
    ) -> Result<(), PanelError> {
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            self.sheet = None;
            self.reset_fields(Vec::new());
            self.log("Error processing file: Sheet is empty or has no headers.");
            self.toast(
                "Error: Sheet is empty or has no headers.",
                ToastSeverity::Error,
                DEFAULT_TOAST_MS,
            );
            return Err(PanelError::EmptySheet);
        }

        info!(filename, columns = headers.len(), rows = rows.len(), "Sheet loaded");
        self.sheet = Some(Sheet::new(filename, headers, rows));
        self.reset_fields(fields);
        self.added_rows = 0;
        self.toast(
            format!("Sheet loaded: {}", filename),
            ToastSeverity::Success,
            DEFAULT_TOAST_MS,
        );
        Ok(())
    }

    /// Apply template descriptors.
    ///
    /// Without a sheet a new one is started from the template. With a sheet
    /// whose headers differ, fails with `StructureMismatch` unless
    /// `overwrite` is set, in which case the sheet is replaced.
    pub fn apply_template(
        &mut self,
        fields: Vec<FieldDescriptor>,
        overwrite: bool,
    ) -> Result<(), PanelError> {
        match self.try_apply_template(fields, overwrite) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.log(format!("Error loading template: {}", e));
                self.toast(
                    format!("Error loading template: {}", e),
                    ToastSeverity::Error,
                    DEFAULT_TOAST_MS,
                );
                Err(e)
            }
        }
    }

    fn try_apply_template(
        &mut self,
        fields: Vec<FieldDescriptor>,
        overwrite: bool,
    ) -> Result<(), PanelError> {
        if fields.is_empty() {
            return Err(PanelError::InvalidTemplate(
                "Invalid or empty template file.".to_string(),
            ));
        }
        let template_headers: Vec<String> = fields.iter().map(|f| f.name.clone()).collect();

        if self.sheet.is_none() {
            self.start_sheet(template_headers);
            self.reset_fields(fields);
            self.toast(
                "Template loaded. New sheet initialized.",
                ToastSeverity::Success,
                DEFAULT_TOAST_MS,
            );
            self.log("Template loaded. Initialized new workbook.");
            return Ok(());
        }

        let current: Vec<String> = self.fields.iter().map(|f| f.name.clone()).collect();
        if current != template_headers {
            if !overwrite {
                return Err(PanelError::StructureMismatch {
                    expected: current,
                    found: template_headers,
                });
            }
            self.start_sheet(template_headers);
            self.reset_fields(fields);
            self.toast(
                "Template loaded. Current sheet replaced.",
                ToastSeverity::Success,
                DEFAULT_TOAST_MS,
            );
            return Ok(());
        }

        self.reset_fields(fields);
        self.toast("Template applied to sheet.", ToastSeverity::Success, DEFAULT_TOAST_MS);
        self.log("Template applied.");
        Ok(())
    }

    /// Serialize the descriptors as a template, returning `(filename, json)`.
    pub fn save_template(&mut self) -> Result<(String, String), PanelError> {
        if self.fields.is_empty() {
            self.log("No template info to save.");
            self.toast(
                "No fields loaded to save as a template.",
                ToastSeverity::Error,
                DEFAULT_TOAST_MS,
            );
            return Err(PanelError::InvalidTemplate(
                "No fields loaded to save as a template.".to_string(),
            ));
        }

        let base = self
            .sheet
            .as_ref()
            .map(|s| base_name(&s.filename))
            .unwrap_or(DEFAULT_SHEET_NAME);
        let filename = format!("{}_template.json", base);
        let json = template_json(&self.fields)?;

        self.toast("Template saved successfully!", ToastSeverity::Success, DEFAULT_TOAST_MS);
        self.log(format!("Template saved: {}", filename));
        Ok((filename, json))
    }

    /// Blank every descriptor's hints.
    pub fn clear_field_info(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        for field in &mut self.fields {
            field.clear_metadata();
        }
        self.toast("Field info cleared.", ToastSeverity::Success, DEFAULT_TOAST_MS);
        self.log("Field metadata cleared by user.");
    }

    /// Update one descriptor in place, keeping its name.
    pub fn update_field(&mut self, descriptor: FieldDescriptor) -> Result<(), PanelError> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.name == descriptor.name)
            .ok_or_else(|| PanelError::UnknownField(descriptor.name.clone()))?;
        *field = descriptor;
        Ok(())
    }

    /// Manual edit of an input. Locked inputs are read-only.
    pub fn set_value(&mut self, field: &str, value: impl Into<String>) -> Result<(), PanelError> {
        self.ensure_field(field)?;
        if self.is_locked(field) {
            return Err(PanelError::Locked(field.to_string()));
        }
        self.inputs.insert(field.to_string(), value.into());
        Ok(())
    }

    pub fn lock(&mut self, field: &str) -> Result<(), PanelError> {
        self.ensure_field(field)?;
        self.locked.insert(field.to_string());
        self.log(format!("Field \"{}\" locked.", field));
        Ok(())
    }

    pub fn unlock(&mut self, field: &str) -> Result<(), PanelError> {
        self.ensure_field(field)?;
        self.locked.remove(field);
        self.log(format!("Field \"{}\" unlocked.", field));
        Ok(())
    }

    /// Write extracted values into unlocked inputs. Unknown names are ignored.
    pub fn fill_fields(&mut self, values: &ExtractionResult) {
        for (name, value) in values.iter() {
            if self.is_locked(name) {
                self.log(format!(" > Skipped locked field '{}'", name));
                continue;
            }
            if self.fields.iter().any(|f| f.name == name) {
                self.inputs.insert(name.to_string(), value.as_wire().to_string());
            }
        }
    }

    /// Whether the add-row action has anything to commit.
    pub fn can_add_row(&self) -> bool {
        !self.fields.is_empty() && self.inputs.values().any(|v| !v.trim().is_empty())
    }

    /// Commit the current inputs as a sheet row.
    ///
    /// Returns `Ok(false)` when every input is empty. Failure markers are
    /// written as empty cells. Unlocked inputs are cleared afterwards.
    pub fn add_row(&mut self) -> Result<bool, PanelError> {
        if self.sheet.is_none() && !self.fields.is_empty() {
            let headers = self.fields.iter().map(|f| f.name.clone()).collect();
            self.start_sheet(headers);
        }
        if self.sheet.is_none() {
            self.log("Cannot add row: No sheet structure available.");
            self.toast(
                "Please load a sheet or template first.",
                ToastSeverity::Error,
                DEFAULT_TOAST_MS,
            );
            return Err(PanelError::NoSheet);
        }

        let row: Vec<String> = self
            .fields
            .iter()
            .map(|f| {
                let value = self.inputs.get(&f.name).map(|v| v.trim()).unwrap_or_default();
                if value == ERROR_MARKER {
                    String::new()
                } else {
                    value.to_string()
                }
            })
            .collect();

        if row.iter().all(String::is_empty) {
            self.log("Skipped adding row: All fields are empty.");
            return Ok(false);
        }

        if let Some(sheet) = self.sheet.as_mut() {
            sheet.append(row);
        }
        self.log("Data appended to in-memory sheet successfully.");

        let locked = &self.locked;
        self.inputs.retain(|name, _| locked.contains(name));
        self.added_rows += 1;
        Ok(true)
    }

    /// Fill, then commit immediately.
    pub fn fill_and_add(&mut self, values: &ExtractionResult) -> Result<bool, PanelError> {
        self.fill_fields(values);
        self.add_row()
    }

    /// Handle a message from the extraction core.
    pub fn apply(&mut self, event: PanelEvent) {
        match event {
            PanelEvent::Log { message } => self.log(format!("[BG] {}", message)),
            PanelEvent::Toast {
                message,
                severity,
                duration_ms,
            } => self.toast(message, severity, duration_ms),
            PanelEvent::ShowSpinner => self.busy = true,
            PanelEvent::HideSpinner => self.busy = false,
            PanelEvent::FillFields { data } => {
                self.log("Received AI data to fill fields.");
                self.fill_fields(&data);
            }
            PanelEvent::FillAndAdd { data } => {
                self.log("Received batch item data, auto-adding row...");
                // Failures are already logged and toasted by add_row.
                let _ = self.fill_and_add(&data);
            }
        }
    }

    /// GET_FIELDS reply.
    pub fn field_request(&mut self) -> FieldRequest {
        if self.fields.is_empty() {
            self.toast(
                "Please load a sheet or template before extracting data.",
                ToastSeverity::Error,
                DEFAULT_TOAST_MS,
            );
            self.log("Extraction attempt failed: No fields loaded in panel.");
        }
        self.log("Sending fields and settings to the extractor.");
        FieldRequest {
            fields: self.fields.clone(),
            batch_mode: self.settings.batch_mode_enabled,
        }
    }

    fn ensure_field(&self, field: &str) -> Result<(), PanelError> {
        if self.fields.iter().any(|f| f.name == field) {
            Ok(())
        } else {
            Err(PanelError::UnknownField(field.to_string()))
        }
    }

    fn start_sheet(&mut self, headers: Vec<String>) {
        self.log("Initializing new workbook structure from template.");
        self.sheet = Some(Sheet::from_headers(headers));
        self.added_rows = 0;
    }

    /// New descriptors mean fresh inputs and no locks.
    fn reset_fields(&mut self, fields: Vec<FieldDescriptor>) {
        self.fields = fields;
        self.inputs.clear();
        self.locked.clear();
        if !self.fields.is_empty() {
            self.log("Displayed fields in the panel.");
        }
    }
}
