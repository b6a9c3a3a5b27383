//! Shared handle around the panel store.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};

use pull2sheet_config::Settings;
use pull2sheet_protocols::{
    FieldRequest, FieldSource, PanelError, PanelEvent, PanelSink, ToastSeverity,
};

use crate::analyzer::{describe_headers, HeaderAnalyzer};
use crate::store::PanelStore;

/// Cloneable reference to one [`PanelStore`].
///
/// Core events are applied synchronously as they are emitted, so the store
/// reflects every delivered row by the time a pass returns.
#[derive(Debug, Clone, Default)]
pub struct PanelHandle {
    store: Arc<Mutex<PanelStore>>,
}

impl PanelHandle {
    pub fn new(settings: Settings) -> Self {
        Self {
            store: Arc::new(Mutex::new(PanelStore::new(settings))),
        }
    }

    /// Lock the store. Do not hold the guard across an await.
    pub fn lock(&self) -> MutexGuard<'_, PanelStore> {
        self.store.lock()
    }

    /// Load a sheet, describing its headers first when analysis is enabled.
    pub async fn load_sheet(
        &self,
        filename: &str,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        analyzer: Option<&HeaderAnalyzer>,
    ) -> Result<(), PanelError> {
        self.log(&format!("File selected: {}", filename));
        let analyze = self.lock().settings().analyze_headers_with_ai;

        let fields = if headers.is_empty() {
            Vec::new()
        } else {
            let first_row = rows.first().cloned().unwrap_or_default();
            describe_headers(analyze, analyzer, &headers, &first_row, self).await
        };

        self.lock().load_sheet(filename, headers, rows, fields)
    }
}

impl PanelSink for PanelHandle {
    fn emit(&self, event: PanelEvent) {
        self.lock().apply(event);
    }

    // Panel-originated messages are not tagged as core logs.
    fn log(&self, message: &str) {
        self.lock().log(message);
    }

    fn toast(&self, message: &str, severity: ToastSeverity, duration_ms: u64) {
        self.lock().toast(message, severity, duration_ms);
    }
}

#[async_trait]
impl FieldSource for PanelHandle {
    async fn field_request(&self) -> Result<FieldRequest, PanelError> {
        Ok(self.lock().field_request())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pull2sheet_protocols::{ExtractionResult, FieldDescriptor, FieldValue};

    #[tokio::test]
    async fn test_load_sheet_without_analysis() {
        let panel = PanelHandle::new(Settings {
            analyze_headers_with_ai: false,
            batch_mode_enabled: false,
        });

        panel
            .load_sheet(
                "contacts.xlsx",
                vec!["Name".into(), "Email".into()],
                vec![vec!["Ann".into(), "ann@example.com".into()]],
                None,
            )
            .await
            .unwrap();

        let store = panel.lock();
        assert_eq!(store.fields().len(), 2);
        assert_eq!(store.sheet().unwrap().rows.len(), 1);
        assert_eq!(store.last_toast().unwrap().message, "Sheet loaded: contacts.xlsx");
    }

    #[tokio::test]
    async fn test_load_empty_sheet_fails() {
        let panel = PanelHandle::new(Settings::default());
        let err = panel
            .load_sheet("blank.csv", Vec::new(), Vec::new(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, PanelError::EmptySheet));
    }

    #[tokio::test]
    async fn test_handle_answers_field_requests() {
        let panel = PanelHandle::new(Settings {
            analyze_headers_with_ai: true,
            batch_mode_enabled: true,
        });
        panel
            .lock()
            .apply_template(vec![FieldDescriptor::new("Total")], false)
            .unwrap();

        let request = panel.field_request().await.unwrap();
        assert_eq!(request.fields.len(), 1);
        assert!(request.batch_mode);
    }

    #[test]
    fn test_events_reach_the_store() {
        let panel = PanelHandle::new(Settings::default());
        panel
            .lock()
            .apply_template(vec![FieldDescriptor::new("Total")], false)
            .unwrap();

        let sink: &dyn PanelSink = &panel;
        let data: ExtractionResult =
            [("Total".to_string(), FieldValue::Found("$5".into()))].into_iter().collect();
        sink.emit(PanelEvent::FillAndAdd { data });
        sink.log("from the panel");

        let store = panel.lock();
        assert_eq!(store.added_rows(), 1);
        let last = store.log_entries().last().unwrap();
        assert_eq!(last.message, "from the panel");
    }
}
