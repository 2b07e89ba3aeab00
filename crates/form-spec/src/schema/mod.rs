pub mod field;
pub mod order;
pub mod section;

pub use field::{FieldDefinition, FieldKind, FieldValue, PickOption};
pub use order::Order;
pub use section::{FALLBACK_SECTION, SectionDefinition};

/// Ordered sections produced by one schema load.
///
/// The shape is fixed once built. Only field values and the derived
/// visibility state change afterwards, through [`crate::FormController`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSchema {
    sections: Vec<SectionDefinition>,
}

impl FormSchema {
    pub(crate) fn from_sections(sections: Vec<SectionDefinition>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[SectionDefinition] {
        &self.sections
    }

    pub(crate) fn sections_mut(&mut self) -> &mut [SectionDefinition] {
        &mut self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|section| section.fields.len()).sum()
    }

    /// Section by its 1-based declaration position, independent of display
    /// order.
    pub fn section_at(&self, position: usize) -> Option<&SectionDefinition> {
        self.sections
            .iter()
            .find(|section| section.position == position)
    }

    /// Section by name; an exact match wins over a case-insensitive one.
    pub fn section_named(&self, name: &str) -> Option<&SectionDefinition> {
        let name = name.trim();
        self.sections
            .iter()
            .find(|section| section.name == name)
            .or_else(|| {
                self.sections
                    .iter()
                    .find(|section| section.name.eq_ignore_ascii_case(name))
            })
    }

    /// Iterates every field in display order together with its section.
    pub fn fields(&self) -> impl Iterator<Item = (&SectionDefinition, &FieldDefinition)> {
        self.sections
            .iter()
            .flat_map(|section| section.fields.iter().map(move |field| (section, field)))
    }

    /// Writes `value` into every field named `api_name`, returning how many
    /// fields were updated.
    pub(crate) fn assign(&mut self, api_name: &str, value: Option<FieldValue>) -> usize {
        let mut updated = 0;
        for field in self
            .sections
            .iter_mut()
            .flat_map(|section| section.fields.iter_mut())
            .filter(|field| field.api_name == api_name)
        {
            field.value = value.clone();
            updated += 1;
        }
        updated
    }
}
