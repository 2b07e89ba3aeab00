use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::criteria::Dialect;
use crate::schema::FALLBACK_SECTION;

/// Settings that shape how metadata rows become a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormConfig {
    #[serde(default)]
    pub dialect: Dialect,
    /// Section that collects records without a section name.
    #[serde(default = "default_fallback_section")]
    pub fallback_section: String,
}

fn default_fallback_section() -> String {
    FALLBACK_SECTION.to_string()
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            fallback_section: default_fallback_section(),
        }
    }
}

impl FormConfig {
    /// Parses a JSON config; blank input means the defaults.
    pub fn from_json(config_json: &str) -> Result<Self, serde_json::Error> {
        if config_json.trim().is_empty() {
            Ok(Self::default())
        } else {
            serde_json::from_str(config_json)
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }
}
