use thiserror::Error;

/// Failures surfaced by the form controller.
///
/// Criteria problems are not errors; they degrade to diagnostics on
/// [`crate::CriteriaOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("metadata source failed: {0}")]
    Upstream(String),
    #[error("no field named '{0}' in the current schema")]
    UnknownField(String),
    #[error("unknown criteria dialect '{0}' (expected 'named' or 'positional')")]
    UnknownDialect(String),
}
