//! Visibility criteria: a tiny rule language attached to sections and fields.
//!
//! Two addressing dialects exist. The named dialect, `[Section].[Field]{op value}`,
//! is the default. The positional dialect, `2-1{op value}` with several rules
//! separated by newlines or semicolons, is kept for legacy metadata.

pub mod eval;
pub mod parse;

use std::{fmt, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::FormError;

pub use eval::{compare, evaluate, evaluate_atom};
pub use parse::parse;

/// How criteria refer to the field they test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `[Section].[Field]{op expected}`, one rule per string.
    #[default]
    Named,
    /// Legacy `section-field{op expected}` with 1-based positions, AND-ed.
    Positional,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Named => "named",
            Dialect::Positional => "positional",
        }
    }
}

impl FromStr for Dialect {
    type Err = FormError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "named" | "name" => Ok(Dialect::Named),
            "positional" | "position" | "legacy" => Ok(Dialect::Positional),
            other => Err(FormError::UnknownDialect(other.to_string())),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operator of a criteria atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// `=` or `==`, case-insensitive text equality.
    Eq,
    NotEq,
    Gt,
    Ge,
    Lt,
    Le,
    /// `~`, case-insensitive substring test.
    Contains,
}

impl Operator {
    /// Longest symbols first so prefixes never shadow them.
    pub const SYMBOLS: [(&'static str, Operator); 8] = [
        ("==", Operator::Eq),
        ("!=", Operator::NotEq),
        (">=", Operator::Ge),
        ("<=", Operator::Le),
        ("=", Operator::Eq),
        (">", Operator::Gt),
        ("<", Operator::Lt),
        ("~", Operator::Contains),
    ];

    /// Parses an operator symbol; the empty symbol means equality.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        if symbol.is_empty() {
            return Some(Operator::Eq);
        }
        Self::SYMBOLS
            .iter()
            .find(|(candidate, _)| *candidate == symbol)
            .map(|(_, op)| *op)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Contains => "~",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The field an atom reads its actual value from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum Target {
    /// 1-based section and field positions in declaration order.
    Position { section: usize, field: usize },
    Name { section: String, field: String },
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Position { section, field } => write!(f, "{section}-{field}"),
            Target::Name { section, field } => write!(f, "[{section}].[{field}]"),
        }
    }
}

/// One `(target, operator, expected)` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CriteriaAtom {
    pub target: Target,
    pub op: Operator,
    pub expected: String,
}

impl CriteriaAtom {
    pub fn new(target: Target, op: Operator, expected: impl Into<String>) -> Self {
        Self {
            target,
            op,
            expected: expected.into(),
        }
    }
}

impl fmt::Display for CriteriaAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{{}{}}}", self.target, self.op, self.expected)
    }
}

/// Atoms recovered from a criteria string plus the fragments that were
/// rejected by the grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCriteria {
    pub atoms: Vec<CriteriaAtom>,
    pub rejected: Vec<String>,
}

impl ParsedCriteria {
    /// No atoms means no rule, which is always satisfied.
    pub fn is_unconditional(&self) -> bool {
        self.atoms.is_empty()
    }
}

/// Result of evaluating criteria, with the reasons it failed or was partly
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CriteriaOutcome {
    pub satisfied: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl CriteriaOutcome {
    pub fn satisfied() -> Self {
        Self {
            satisfied: true,
            details: Vec::new(),
        }
    }
}

impl Default for CriteriaOutcome {
    fn default() -> Self {
        Self::satisfied()
    }
}
