use std::fmt::Display;

use crate::builder::build_schema;
use crate::config::FormConfig;
use crate::error::FormError;
use crate::record::RawRecord;
use crate::review::{ReviewPayload, apply_review_values, build_review_payload};
use crate::schema::{FieldValue, FormSchema};
use crate::visibility::resolve_visibility;

/// Owns the live form schema and is the only place it is mutated.
///
/// Each entry point runs to completion, including the visibility pass, before
/// returning, so callers always observe flags that reflect their own edit.
#[derive(Debug, Clone, Default)]
pub struct FormController {
    config: FormConfig,
    schema: FormSchema,
    load_error: Option<String>,
}

impl FormController {
    pub fn new(config: FormConfig) -> Self {
        Self {
            config,
            schema: FormSchema::default(),
            load_error: None,
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Message from the last failed load, if the current schema is the
    /// cleared result of one.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Replaces the schema with the outcome of a metadata fetch.
    ///
    /// A failed fetch clears the schema rather than keeping stale or partial
    /// state, and the failure is reported back.
    pub fn load<E: Display>(&mut self, rows: Result<Vec<RawRecord>, E>) -> Result<(), FormError> {
        match rows {
            Ok(rows) => {
                self.rebuild(&rows);
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(error = %message, "metadata load failed; clearing schema");
                self.schema = FormSchema::default();
                self.load_error = Some(message.clone());
                Err(FormError::Upstream(message))
            }
        }
    }

    /// Builds a fresh schema from rows and runs the first visibility pass.
    pub fn rebuild(&mut self, rows: &[RawRecord]) {
        self.schema = build_schema(rows, &self.config.fallback_section);
        self.load_error = None;
        self.recompute();
    }

    /// Re-runs the visibility pass over the whole schema.
    pub fn recompute(&mut self) {
        resolve_visibility(&mut self.schema, self.config.dialect);
    }

    /// Records an edit and recomputes visibility.
    ///
    /// Every field carrying `api_name` receives the value. `None` clears it.
    pub fn set_value(
        &mut self,
        api_name: &str,
        value: Option<FieldValue>,
    ) -> Result<(), FormError> {
        let updated = self.schema.assign(api_name, value);
        if updated == 0 {
            tracing::warn!(field = api_name, "edit targets unknown field");
            return Err(FormError::UnknownField(api_name.to_string()));
        }
        self.recompute();
        Ok(())
    }

    pub fn review(&self) -> ReviewPayload {
        build_review_payload(&self.schema)
    }

    /// Applies values from a review payload and recomputes visibility.
    /// Returns the number of fields written.
    pub fn apply_review(&mut self, payload: &ReviewPayload) -> usize {
        let applied = apply_review_values(&mut self.schema, payload);
        self.recompute();
        applied
    }
}
