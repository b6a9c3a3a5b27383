//! Extraction results.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Reserved cell value standing in for "this field's extraction failed".
pub const ERROR_MARKER: &str = "AI_ERROR";

/// Literal the model is told to answer when a value is absent.
pub const NOT_AVAILABLE: &str = "N/A";

/// Why a field has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The per-field deadline elapsed.
    Timeout,
    /// The prompt call failed for any other reason.
    Error,
}

/// Outcome of extracting a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Found(String),
    NotFound,
    Failed(FailureKind),
}

impl FieldValue {
    /// Value as delivered to the panel: `""` for not found, the error marker on failure.
    pub fn as_wire(&self) -> &str {
        match self {
            FieldValue::Found(value) => value,
            FieldValue::NotFound => "",
            FieldValue::Failed(_) => ERROR_MARKER,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FieldValue::Failed(_))
    }
}

/// Field name → value for one input item, in field order.
///
/// Fields that were never attempted (cancelled pass) are absent, not failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    entries: Vec<(String, FieldValue)>,
}

impl ExtractionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Whether any field carries a failure sentinel.
    pub fn has_failure(&self) -> bool {
        self.entries.iter().any(|(_, v)| v.is_failure())
    }

    /// Wire value of `name`, if present.
    pub fn wire_value(&self, name: &str) -> Option<&str> {
        self.get(name).map(FieldValue::as_wire)
    }
}

impl FromIterator<(String, FieldValue)> for ExtractionResult {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut result = ExtractionResult::new();
        for (name, value) in iter {
            result.insert(name, value);
        }
        result
    }
}

// Serialized as the FILL_* payload: a flat map of field name to wire value.
impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value.as_wire())?;
        }
        map.end()
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
