//! The in-memory working sheet.

use serde::{Deserialize, Serialize};

/// Filename given to sheets started from a template.
pub const TEMPLATE_SHEET_NAME: &str = "Sheet_from_Template.xlsx";

const SHEET_EXTENSIONS: [&str; 3] = [".xlsx", ".xls", ".csv"];

/// Header row plus data rows of the first worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub filename: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(filename: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            filename: filename.into(),
            headers,
            rows,
        }
    }

    /// Empty sheet with the given header row.
    pub fn from_headers(headers: Vec<String>) -> Self {
        Self::new(TEMPLATE_SHEET_NAME, headers, Vec::new())
    }

    pub fn append(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

/// Strip one `.xlsx`, `.xls` or `.csv` suffix, case-insensitively.
pub fn base_name(filename: &str) -> &str {
    let lower = filename.to_ascii_lowercase();
    SHEET_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| &filename[..filename.len() - ext.len()])
        .unwrap_or(filename)
}
