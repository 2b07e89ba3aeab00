use crate::criteria::{self, CriteriaOutcome, Dialect};
use crate::schema::FormSchema;

/// Recomputes every section and field visibility flag from current values.
///
/// A section is visible when its criteria hold. A field is visible when its
/// section is visible and its own criteria hold; no criteria always holds.
/// Every call walks the whole schema, which keeps the pass trivially
/// idempotent and is linear in the number of fields.
pub fn resolve_visibility(schema: &mut FormSchema, dialect: Dialect) {
    // Evaluate against a consistent snapshot before writing any flags.
    let snapshot: &FormSchema = schema;
    let outcomes: Vec<(CriteriaOutcome, Vec<CriteriaOutcome>)> = snapshot
        .sections()
        .iter()
        .map(|section| {
            let fields = section
                .fields
                .iter()
                .map(|field| outcome_for(&field.raw_criteria, dialect, snapshot))
                .collect();
            (outcome_for(&section.raw_criteria, dialect, snapshot), fields)
        })
        .collect();

    let mut hidden_fields = 0usize;
    for (section, (section_status, field_statuses)) in
        schema.sections_mut().iter_mut().zip(outcomes)
    {
        section.visible = section_status.satisfied;
        section.status = section_status;
        for (field, mut status) in section.fields.iter_mut().zip(field_statuses) {
            field.visible = section.visible && status.satisfied;
            if !section.visible {
                status
                    .details
                    .push(format!("section `{}` is hidden", section.name));
            }
            field.status = status;
            if !field.visible {
                hidden_fields += 1;
            }
        }
    }

    tracing::debug!(
        fields = schema.field_count(),
        hidden_fields,
        "visibility pass complete"
    );
}

fn outcome_for(raw: &str, dialect: Dialect, schema: &FormSchema) -> CriteriaOutcome {
    if raw.trim().is_empty() {
        return CriteriaOutcome::satisfied();
    }
    criteria::evaluate(&criteria::parse(raw, dialect), schema)
}
