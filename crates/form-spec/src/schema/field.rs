use std::{borrow::Cow, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::criteria::CriteriaOutcome;
use crate::schema::order::Order;

/// Semantic kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Number,
    Date,
    Datetime,
    Checkbox,
    Picklist,
    Other,
}

impl FieldKind {
    /// Maps a raw metadata type tag onto a field kind.
    ///
    /// Matching ignores case and surrounding whitespace. Unknown tags become
    /// [`FieldKind::Other`].
    pub fn classify(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "text" | "string" => FieldKind::Text,
            "textarea" | "longtext" => FieldKind::Textarea,
            "number" | "double" | "currency" | "percent" => FieldKind::Number,
            "date" => FieldKind::Date,
            "datetime" => FieldKind::Datetime,
            "checkbox" | "boolean" => FieldKind::Checkbox,
            "picklist" => FieldKind::Picklist,
            _ => FieldKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Textarea => "textarea",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Datetime => "datetime",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Picklist => "picklist",
            FieldKind::Other => "other",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable picklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PickOption {
    pub label: String,
    pub value: String,
}

impl PickOption {
    /// Splits a comma-separated choice list, trimming entries and dropping
    /// empty ones. Label and value are the same text.
    pub fn parse_list(raw: &str) -> Vec<PickOption> {
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| PickOption {
                label: entry.to_string(),
                value: entry.to_string(),
            })
            .collect()
    }
}

/// A value entered by the user: checkbox state or text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
}

impl FieldValue {
    /// String form used by criteria comparisons.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Bool(flag) => Cow::Owned(flag.to_string()),
            FieldValue::Text(text) => Cow::Borrowed(text),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// A single form field owned by its section.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub api_name: String,
    /// 1-based position among its section's rows in the metadata.
    pub position: usize,
    pub kind: FieldKind,
    pub order: Order,
    /// Only populated for picklist fields.
    pub options: Vec<PickOption>,
    pub value: Option<FieldValue>,
    pub raw_criteria: String,
    pub visible: bool,
    /// Result of the field's own criteria on the last visibility pass.
    pub status: CriteriaOutcome,
}

impl FieldDefinition {
    pub fn new(
        api_name: impl Into<String>,
        position: usize,
        kind: FieldKind,
        order: Order,
    ) -> Self {
        Self {
            api_name: api_name.into(),
            position,
            kind,
            order,
            options: Vec::new(),
            value: None,
            raw_criteria: String::new(),
            visible: true,
            status: CriteriaOutcome::default(),
        }
    }
}
