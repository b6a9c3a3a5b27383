//! Templates: a saved list of field descriptors.

use pull2sheet_protocols::{FieldDescriptor, PanelError};

/// Parse a template file. The list must be non-empty and every entry named.
pub fn parse_template(json: &str) -> Result<Vec<FieldDescriptor>, PanelError> {
    let fields: Vec<FieldDescriptor> = serde_json::from_str(json)?;
    if fields.is_empty() {
        return Err(PanelError::InvalidTemplate(
            "Invalid or empty template file.".to_string(),
        ));
    }
    if let Some(index) = fields.iter().position(|f| f.name.trim().is_empty()) {
        return Err(PanelError::InvalidTemplate(format!(
            "Field {} has no name.",
            index + 1
        )));
    }
    Ok(fields)
}

/// Pretty JSON array, the on-disk template format.
pub fn template_json(fields: &[FieldDescriptor]) -> Result<String, PanelError> {
    Ok(serde_json::to_string_pretty(fields)?)
}
