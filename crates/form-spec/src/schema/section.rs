use crate::criteria::CriteriaOutcome;
use crate::schema::field::FieldDefinition;
use crate::schema::order::Order;

/// Name given to sections whose records carry no section name.
pub const FALLBACK_SECTION: &str = "Other";

/// A named, ordered group of fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionDefinition {
    pub name: String,
    /// 1-based position in which the section first appeared in the metadata.
    pub position: usize,
    pub order: Order,
    pub raw_criteria: String,
    pub visible: bool,
    pub status: CriteriaOutcome,
    pub fields: Vec<FieldDefinition>,
}

impl SectionDefinition {
    pub fn new(name: impl Into<String>, position: usize, order: Order) -> Self {
        Self {
            name: name.into(),
            position,
            order,
            raw_criteria: String::new(),
            visible: true,
            status: CriteriaOutcome::default(),
            fields: Vec::new(),
        }
    }

    pub fn has_criteria(&self) -> bool {
        !self.raw_criteria.trim().is_empty()
    }

    /// Field by its 1-based declaration position, independent of display order.
    pub fn field_at(&self, position: usize) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.position == position)
    }

    /// Field by API name; an exact match wins over a case-insensitive one.
    pub fn field_named(&self, name: &str) -> Option<&FieldDefinition> {
        let name = name.trim();
        self.fields
            .iter()
            .find(|field| field.api_name == name)
            .or_else(|| {
                self.fields
                    .iter()
                    .find(|field| field.api_name.eq_ignore_ascii_case(name))
            })
    }
}
