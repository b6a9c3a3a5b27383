//! # Pull2Sheet Panel
//!
//! The host-side state the extraction core talks to: field descriptors,
//! the working sheet, per-field input values and locks, templates, and the
//! optional AI analysis of sheet headers.
//!
//! [`PanelHandle`] is the shareable front: it consumes core events as a
//! [`PanelSink`](pull2sheet_protocols::PanelSink) and answers field requests
//! as a [`FieldSource`](pull2sheet_protocols::FieldSource).

pub mod analyzer;
pub mod handle;
pub mod sheet;
pub mod store;
pub mod template;

pub use analyzer::{describe_headers, HeaderAnalyzer};
pub use handle::PanelHandle;
pub use sheet::Sheet;
pub use store::{LogEntry, PanelStore, Toast};
pub use template::{parse_template, template_json};
