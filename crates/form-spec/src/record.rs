use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One metadata row describing a single form field and its section.
///
/// Every key is optional; missing or malformed data degrades to defaults
/// when the schema is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_name: Option<String>,
    /// Number or numeric string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_order: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_criteria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_order: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_criteria: Option<String>,
    /// Comma-separated picklist choices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picklist_values: Option<String>,
}

/// What a metadata source hands over: the rows, or its failure message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowsDocument {
    Rows(Vec<RawRecord>),
    Failure { error: String },
}

impl RowsDocument {
    pub fn into_result(self) -> Result<Vec<RawRecord>, String> {
        match self {
            RowsDocument::Rows(rows) => Ok(rows),
            RowsDocument::Failure { error } => Err(error),
        }
    }
}
