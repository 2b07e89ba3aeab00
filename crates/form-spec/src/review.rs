use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::schema::{FieldKind, FieldValue, FormSchema, PickOption};

/// Flattened snapshot of a schema with values and visibility diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReviewPayload {
    pub sections: Vec<ReviewSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSection {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub criteria: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub satisfied: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(default)]
    pub fields: Vec<ReviewField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewField {
    pub field_api_name: String,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    /// Outer `None` means the key was absent and the stored value is kept;
    /// `Some(None)` is an explicit `null` that clears it.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<FieldValue>")]
    pub value: Option<Option<FieldValue>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PickOption>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub criteria: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub satisfied: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Option<FieldValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<FieldValue>::deserialize(deserializer).map(Some)
}

impl ReviewPayload {
    pub fn visible_field_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|section| section.fields.iter())
            .filter(|field| field.visible)
            .count()
    }
}

/// Snapshots the schema as a review payload.
pub fn build_review_payload(schema: &FormSchema) -> ReviewPayload {
    let sections = schema
        .sections()
        .iter()
        .map(|section| ReviewSection {
            name: section.name.clone(),
            order: section.order.as_option(),
            criteria: section.raw_criteria.clone(),
            visible: section.visible,
            satisfied: section.status.satisfied,
            details: section.status.details.clone(),
            fields: section
                .fields
                .iter()
                .map(|field| ReviewField {
                    field_api_name: field.api_name.clone(),
                    kind: field.kind,
                    order: field.order.as_option(),
                    value: Some(field.value.clone()),
                    options: field.options.clone(),
                    criteria: field.raw_criteria.clone(),
                    visible: field.visible,
                    satisfied: field.status.satisfied,
                    details: field.status.details.clone(),
                })
                .collect(),
        })
        .collect();
    ReviewPayload { sections }
}

/// Copies values from a review payload back into the schema.
///
/// Sections are matched by name and fields by API name within them; anything
/// unmatched on either side is left alone, as is any field whose entry has no
/// `value` key. Visibility flags in the payload are
/// ignored because they are always recomputed. Returns the number of fields
/// written.
pub(crate) fn apply_review_values(schema: &mut FormSchema, payload: &ReviewPayload) -> usize {
    let mut applied = 0;
    for incoming in &payload.sections {
        let Some(section) = schema
            .sections_mut()
            .iter_mut()
            .find(|section| section.name == incoming.name)
        else {
            tracing::debug!(section = %incoming.name, "review section not in schema");
            continue;
        };
        for incoming_field in &incoming.fields {
            let Some(value) = &incoming_field.value else {
                continue;
            };
            for field in section
                .fields
                .iter_mut()
                .filter(|field| field.api_name == incoming_field.field_api_name)
            {
                field.value = value.clone();
                applied += 1;
            }
        }
    }
    applied
}

/// JSON Schema describing [`ReviewPayload`].
pub fn review_schema() -> Value {
    schemars::schema_for!(ReviewPayload).to_value()
}
