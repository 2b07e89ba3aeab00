use crate::criteria::{CriteriaAtom, CriteriaOutcome, Operator, ParsedCriteria, Target};
use crate::schema::{FieldDefinition, FormSchema, SectionDefinition};

/// Evaluates every atom against the schema's current values and ANDs them.
///
/// All atoms are evaluated so the outcome lists every reason for failure.
/// Fragments the parser rejected are reported but do not affect the result.
pub fn evaluate(criteria: &ParsedCriteria, schema: &FormSchema) -> CriteriaOutcome {
    let mut outcome = CriteriaOutcome::satisfied();
    for fragment in &criteria.rejected {
        outcome
            .details
            .push(format!("ignored malformed criteria `{fragment}`"));
    }
    for atom in &criteria.atoms {
        let (satisfied, detail) = evaluate_atom(atom, schema);
        outcome.satisfied &= satisfied;
        outcome.details.extend(detail);
    }
    outcome
}

/// Evaluates one atom, returning the result and, when it failed, why.
pub fn evaluate_atom(atom: &CriteriaAtom, schema: &FormSchema) -> (bool, Option<String>) {
    let field = match resolve(&atom.target, schema) {
        Ok(field) => field,
        Err(detail) => return (false, Some(detail)),
    };

    let Some(value) = &field.value else {
        return (
            false,
            Some(format!("{} `{}` has no value", atom.target, field.api_name)),
        );
    };

    let actual = value.as_text();
    if atom.op.is_numeric() && (as_number(&actual).is_none() || as_number(&atom.expected).is_none())
    {
        return (
            false,
            Some(format!(
                "{}: cannot compare `{}` {} `{}` numerically",
                atom.target, actual, atom.op, atom.expected
            )),
        );
    }

    if compare(Some(actual.as_ref()), atom.op, &atom.expected) {
        (true, None)
    } else {
        (
            false,
            Some(format!(
                "{}: `{}` does not satisfy {}{}",
                atom.target, actual, atom.op, atom.expected
            )),
        )
    }
}

/// Compares an actual value against an expected literal.
///
/// A missing actual value never satisfies any operator. Ordering operators
/// need both sides to be finite numbers; the others compare text without
/// regard to case.
pub fn compare(actual: Option<&str>, op: Operator, expected: &str) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    match op {
        Operator::Eq => actual.to_lowercase() == expected.to_lowercase(),
        Operator::NotEq => actual.to_lowercase() != expected.to_lowercase(),
        Operator::Contains => actual.to_lowercase().contains(&expected.to_lowercase()),
        Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le => {
            let (Some(left), Some(right)) = (as_number(actual), as_number(expected)) else {
                return false;
            };
            match op {
                Operator::Gt => left > right,
                Operator::Ge => left >= right,
                Operator::Lt => left < right,
                _ => left <= right,
            }
        }
    }
}

fn as_number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn resolve<'a>(target: &Target, schema: &'a FormSchema) -> Result<&'a FieldDefinition, String> {
    match target {
        Target::Position { section, field } => {
            let owner = schema
                .section_at(*section)
                .ok_or_else(|| format!("{target}: no section at position {section}"))?;
            owner
                .field_at(*field)
                .ok_or_else(|| missing_field(target, owner, &field.to_string()))
        }
        Target::Name { section, field } => {
            let owner = schema
                .section_named(section)
                .ok_or_else(|| format!("{target}: no section named `{section}`"))?;
            owner
                .field_named(field)
                .ok_or_else(|| missing_field(target, owner, field))
        }
    }
}

fn missing_field(target: &Target, section: &SectionDefinition, field: &str) -> String {
    format!(
        "{target}: section `{}` has no field `{field}`",
        section.name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_operators_coerce_both_sides() {
        assert!(compare(Some("15"), Operator::Ge, "10"));
        assert!(compare(Some(" 2.5 "), Operator::Lt, "3"));
        assert!(compare(Some("10"), Operator::Le, "10"));
        assert!(!compare(Some("9"), Operator::Gt, "10"));
    }

    #[test]
    fn non_numeric_operands_fail_numeric_operators() {
        assert!(!compare(Some("abc"), Operator::Ge, "10"));
        assert!(!compare(Some("10"), Operator::Gt, "ten"));
        assert!(!compare(Some("inf"), Operator::Gt, "1"));
        assert!(!compare(Some(""), Operator::Lt, "1"));
    }

    #[test]
    fn equality_ignores_case() {
        assert!(compare(Some("Yes"), Operator::Eq, "yes"));
        assert!(!compare(Some("Yes"), Operator::NotEq, "YES"));
        assert!(compare(Some("No"), Operator::NotEq, "yes"));
    }

    #[test]
    fn contains_is_case_insensitive_substring() {
        assert!(compare(Some("ACME Corporation"), Operator::Contains, "corp"));
        assert!(!compare(Some("Initech"), Operator::Contains, "acme"));
    }

    #[test]
    fn missing_value_fails_every_operator() {
        for (_, op) in Operator::SYMBOLS {
            assert!(!compare(None, op, "x"), "operator {op}");
        }
    }
}
