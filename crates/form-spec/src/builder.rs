use std::collections::HashMap;

use crate::record::RawRecord;
use crate::schema::{
    FieldDefinition, FieldKind, FormSchema, Order, PickOption, SectionDefinition,
    order::display_order,
};

/// Groups metadata rows into ordered sections and fields.
///
/// Sections and fields also remember the position in which they were first
/// declared, which is what positional criteria address.
/// When several rows name the same section, the smallest declared order is
/// kept and the first non-blank criteria wins. Rows without a section name
/// land in `fallback_section`. Sections and fields are sorted by order, then
/// case-insensitive name. Everything starts visible until the first
/// visibility pass.
pub fn build_schema(records: &[RawRecord], fallback_section: &str) -> FormSchema {
    let mut sections: Vec<SectionDefinition> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let name = non_blank(record.section_name.as_deref()).unwrap_or(fallback_section);
        let order = Order::from_raw(record.section_order.as_ref());
        let slot = *index.entry(name.to_string()).or_insert_with(|| {
            sections.push(SectionDefinition::new(name, sections.len() + 1, order));
            sections.len() - 1
        });
        let section = &mut sections[slot];

        section.order = section.order.min(order);
        if !section.has_criteria()
            && let Some(criteria) = non_blank(record.section_criteria.as_deref())
        {
            section.raw_criteria = criteria.to_string();
        }

        let position = section.fields.len() + 1;
        section.fields.push(build_field(record, position));
    }

    for section in &mut sections {
        section.fields.sort_by(|left, right| {
            display_order(
                (left.order, &left.api_name),
                (right.order, &right.api_name),
            )
        });
    }
    sections.sort_by(|left, right| {
        display_order((left.order, &left.name), (right.order, &right.name))
    });

    tracing::debug!(
        sections = sections.len(),
        records = records.len(),
        "built form schema"
    );
    FormSchema::from_sections(sections)
}

fn build_field(record: &RawRecord, position: usize) -> FieldDefinition {
    let api_name = record.field_name.as_deref().unwrap_or_default().trim();
    if api_name.is_empty() {
        tracing::warn!(section = ?record.section_name, "metadata row has no field name");
    }
    let kind = FieldKind::classify(record.field_type.as_deref().unwrap_or_default());
    let order = Order::from_raw(record.field_order.as_ref());
    let mut field = FieldDefinition::new(api_name, position, kind, order);
    if kind == FieldKind::Picklist {
        field.options = PickOption::parse_list(record.picklist_values.as_deref().unwrap_or_default());
    }
    field.raw_criteria = non_blank(record.field_criteria.as_deref())
        .unwrap_or_default()
        .to_string();
    field
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: serde_json::Value) -> Vec<RawRecord> {
        serde_json::from_value(value).expect("rows")
    }

    #[test]
    fn sections_and_fields_follow_order_then_name() {
        let records = rows(json!([
            { "sectionName": "beta", "sectionOrder": 1, "fieldName": "b", "fieldOrder": 2 },
            { "sectionName": "Alpha", "sectionOrder": 1, "fieldName": "z" },
            { "sectionName": "beta", "fieldName": "A", "fieldOrder": 2 },
            { "sectionName": "beta", "fieldName": "c", "fieldOrder": 1 },
            { "sectionName": "gamma", "fieldName": "q" },
        ]));
        let schema = build_schema(&records, "Other");

        let names: Vec<_> = schema.sections().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "beta", "gamma"]);
        let beta: Vec<_> = schema.sections()[1]
            .fields
            .iter()
            .map(|f| f.api_name.as_str())
            .collect();
        assert_eq!(beta, ["c", "A", "b"]);
        assert_eq!(schema.sections()[1].position, 1);
        assert_eq!(schema.sections()[1].field_at(2).map(|f| f.api_name.as_str()), Some("A"));
    }

    #[test]
    fn duplicate_sections_keep_min_order_and_first_criteria() {
        let records = rows(json!([
            { "sectionName": "S", "sectionOrder": "5", "sectionCriteria": "  ", "fieldName": "a" },
            { "sectionName": "S", "sectionOrder": 3, "sectionCriteria": "[S].[a]{x}", "fieldName": "b" },
            { "sectionName": "S", "sectionOrder": 9, "sectionCriteria": "[S].[b]{y}", "fieldName": "c" },
        ]));
        let schema = build_schema(&records, "Other");
        let section = &schema.sections()[0];
        assert_eq!(section.order, Order::Explicit(3));
        assert_eq!(section.raw_criteria, "[S].[a]{x}");
        assert_eq!(section.fields.len(), 3);
    }

    #[test]
    fn missing_section_and_bad_order_degrade_to_defaults() {
        let records = rows(json!([
            { "fieldName": "loose", "fieldOrder": "first" },
            { "sectionName": "Named", "sectionOrder": 1, "fieldName": "kept" },
        ]));
        let schema = build_schema(&records, "Other");
        let names: Vec<_> = schema.sections().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Named", "Other"]);
        assert_eq!(schema.sections()[1].fields[0].order, Order::Unspecified);
    }

    #[test]
    fn picklist_options_only_for_picklists() {
        let records = rows(json!([
            { "sectionName": "S", "fieldName": "color", "fieldType": "Picklist", "picklistValues": "Red, Blue,," },
            { "sectionName": "S", "fieldName": "note", "fieldType": "text", "picklistValues": "ignored" },
        ]));
        let schema = build_schema(&records, "Other");
        let color = schema.sections()[0].field_named("color").expect("color");
        let note = schema.sections()[0].field_named("note").expect("note");
        assert_eq!(color.kind, FieldKind::Picklist);
        assert_eq!(color.options.len(), 2);
        assert!(note.options.is_empty());
    }

    #[test]
    fn built_schema_starts_visible() {
        let records = rows(json!([
            { "sectionName": "S", "sectionCriteria": "[S].[a]{1}", "fieldName": "a", "fieldCriteria": "[S].[a]{2}" },
        ]));
        let schema = build_schema(&records, "Other");
        assert!(schema.sections()[0].visible);
        assert!(schema.sections()[0].fields[0].visible);
        assert!(schema.sections()[0].fields[0].value.is_none());
    }

    #[test]
    fn empty_input_builds_empty_schema() {
        assert!(build_schema(&[], "Other").is_empty());
    }
}
