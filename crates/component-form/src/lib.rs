use std::collections::BTreeMap;

use serde_json::{Value, json};
use thiserror::Error;

use form_spec::{
    FieldValue, FormConfig, FormController, FormError, ReviewPayload, RowsDocument,
    render_text as form_render_text, review_schema as form_review_schema,
};

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("failed to parse metadata rows: {0}")]
    RowsParse(#[source] serde_json::Error),
    #[error("failed to parse field values: {0}")]
    ValuesParse(#[source] serde_json::Error),
    #[error("failed to parse review payload: {0}")]
    ReviewParse(#[source] serde_json::Error),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
    #[error(transparent)]
    Form(#[from] FormError),
}

type FieldValues = BTreeMap<String, Option<FieldValue>>;

fn load_controller(config_json: &str, rows_json: &str) -> Result<FormController, ComponentError> {
    let config = FormConfig::from_json(config_json).map_err(ComponentError::ConfigParse)?;
    let document: RowsDocument =
        serde_json::from_str(rows_json).map_err(ComponentError::RowsParse)?;
    let mut controller = FormController::new(config);
    controller.load(document.into_result())?;
    Ok(controller)
}

fn parse_values(values_json: &str) -> Result<FieldValues, ComponentError> {
    if values_json.trim().is_empty() {
        return Ok(FieldValues::new());
    }
    serde_json::from_str(values_json).map_err(ComponentError::ValuesParse)
}

/// Seeds stored values; names missing from the schema are skipped so a saved
/// record with extra columns still loads.
fn seed_values(controller: &mut FormController, values: FieldValues) {
    for (name, value) in values {
        if let Err(err) = controller.set_value(&name, value) {
            tracing::debug!(%err, "skipping stored value");
        }
    }
}

fn encode_review(controller: &FormController) -> Result<Value, ComponentError> {
    serde_json::to_value(controller.review()).map_err(ComponentError::JsonEncode)
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

fn respond_string(result: Result<String, ComponentError>) -> String {
    match result {
        Ok(value) => value,
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

/// Builds the schema from metadata rows and returns its review payload.
pub fn describe(config_json: &str, rows_json: &str) -> String {
    respond(load_controller(config_json, rows_json).and_then(|controller| encode_review(&controller)))
}

/// Builds the schema, seeds stored values and returns the review payload.
pub fn review(config_json: &str, rows_json: &str, values_json: &str) -> String {
    respond(load_controller(config_json, rows_json).and_then(|mut controller| {
        seed_values(&mut controller, parse_values(values_json)?);
        encode_review(&controller)
    }))
}

/// Seeds stored values, applies one user edit and returns the recomputed
/// review payload. Editing an unknown field is an error.
pub fn submit_edit(
    config_json: &str,
    rows_json: &str,
    values_json: &str,
    field_api_name: &str,
    value_json: &str,
) -> String {
    respond(load_controller(config_json, rows_json).and_then(|mut controller| {
        seed_values(&mut controller, parse_values(values_json)?);
        let value: Option<FieldValue> =
            serde_json::from_str(value_json).map_err(ComponentError::ValuesParse)?;
        controller.set_value(field_api_name, value)?;
        encode_review(&controller)
    }))
}

/// Applies a previously produced review payload to a freshly built schema.
pub fn apply_review(config_json: &str, rows_json: &str, review_json: &str) -> String {
    respond(load_controller(config_json, rows_json).and_then(|mut controller| {
        let payload: ReviewPayload =
            serde_json::from_str(review_json).map_err(ComponentError::ReviewParse)?;
        controller.apply_review(&payload);
        encode_review(&controller)
    }))
}

/// Same as [`review`], rendered as text.
pub fn render_text(config_json: &str, rows_json: &str, values_json: &str) -> String {
    respond_string(load_controller(config_json, rows_json).and_then(|mut controller| {
        seed_values(&mut controller, parse_values(values_json)?);
        Ok(form_render_text(&controller.review()))
    }))
}

pub fn review_schema() -> String {
    respond(Ok(form_review_schema()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> String {
        json!([
            { "sectionName": "A", "sectionOrder": 2, "fieldName": "X", "fieldType": "number" },
            { "sectionName": "B", "sectionOrder": 1, "fieldName": "Y", "fieldType": "checkbox",
              "fieldCriteria": "1-1{>5}" }
        ])
        .to_string()
    }

    const POSITIONAL: &str = r#"{"dialect":"positional"}"#;

    #[test]
    fn describe_returns_ordered_review() {
        let payload = describe(POSITIONAL, &rows());
        let parsed: Value = serde_json::from_str(&payload).expect("json");
        assert_eq!(parsed["sections"][0]["name"], "B");
        assert_eq!(parsed["sections"][0]["fields"][0]["visible"], false);
        assert_eq!(parsed["sections"][1]["fields"][0]["fieldApiName"], "X");
    }

    #[test]
    fn upstream_failure_is_reported() {
        let payload = describe("", r#"{"error":"metadata service timed out"}"#);
        let parsed: Value = serde_json::from_str(&payload).expect("json");
        assert_eq!(
            parsed["error"],
            "metadata source failed: metadata service timed out"
        );
    }

    #[test]
    fn malformed_rows_are_reported() {
        let payload = describe("", "not json");
        let parsed: Value = serde_json::from_str(&payload).expect("json");
        assert!(
            parsed["error"]
                .as_str()
                .is_some_and(|message| message.starts_with("failed to parse metadata rows"))
        );
    }

    #[test]
    fn submit_edit_recomputes_visibility() {
        let payload = submit_edit(POSITIONAL, &rows(), "{}", "X", r#""10""#);
        let parsed: Value = serde_json::from_str(&payload).expect("json");
        assert_eq!(parsed["sections"][0]["fields"][0]["visible"], true);
        assert_eq!(parsed["sections"][1]["fields"][0]["value"], "10");
    }

    #[test]
    fn submit_edit_rejects_unknown_field() {
        let payload = submit_edit(POSITIONAL, &rows(), "", "Z", "true");
        let parsed: Value = serde_json::from_str(&payload).expect("json");
        assert_eq!(parsed["error"], "no field named 'Z' in the current schema");
    }

    #[test]
    fn review_seeds_stored_values_and_skips_unknown() {
        let payload = review(POSITIONAL, &rows(), r#"{"X":"7","legacy":"x"}"#);
        let parsed: Value = serde_json::from_str(&payload).expect("json");
        assert_eq!(parsed["sections"][0]["fields"][0]["visible"], true);
    }

    #[test]
    fn apply_review_round_trips() {
        let first = submit_edit(POSITIONAL, &rows(), "", "X", r#""6""#);
        let second = apply_review(POSITIONAL, &rows(), &first);
        assert_eq!(first, second);
    }

    #[test]
    fn render_text_outputs_summary() {
        let output = render_text(POSITIONAL, &rows(), "");
        assert!(output.contains("Form: 2 sections"));
        assert!(output.contains("[-] Y (checkbox)"));
    }

    #[test]
    fn review_schema_is_json_schema() {
        let parsed: Value = serde_json::from_str(&review_schema()).expect("json");
        assert_eq!(parsed["title"], "ReviewPayload");
    }
}
