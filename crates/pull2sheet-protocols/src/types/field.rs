//! Field descriptors.

use serde::{Deserialize, Serialize};

/// Describes one column of the working sheet and how to find its value.
///
/// `field_type`, `format` and `keywords` are free-form hints handed to the
/// model; an empty string means "no hint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,

    #[serde(default, rename = "type")]
    pub field_type: String,

    #[serde(default)]
    pub format: String,

    /// Comma-separated aliases.
    #[serde(default)]
    pub keywords: String,
}

impl FieldDescriptor {
    /// Create a descriptor with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = field_type.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    /// Whether any hint besides the name is set.
    pub fn has_metadata(&self) -> bool {
        [&self.field_type, &self.format, &self.keywords]
            .iter()
            .any(|s| !s.trim().is_empty())
    }

    /// Blank all hints, keeping the name.
    pub fn clear_metadata(&mut self) {
        self.field_type.clear();
        self.format.clear();
        self.keywords.clear();
    }
}
