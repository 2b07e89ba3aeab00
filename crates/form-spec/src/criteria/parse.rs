use std::sync::LazyLock;

use regex::Regex;

use crate::criteria::{CriteriaAtom, Dialect, Operator, ParsedCriteria, Target};

static POSITIONAL_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<section>\d+)\s*-\s*(?P<field>\d+)\s*\{(?P<op>==|!=|>=|<=|=|>|<|~)?(?P<expected>[^{}]*)\}$")
        .expect("positional criteria pattern")
});

static NAMED_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\[(?P<section>[^\]]+)\]\s*\.\s*\[(?P<field>[^\]]+)\]\s*\{(?P<op>==|!=|>=|<=|=|>|<|~)?(?P<expected>[^{}]*)\}$")
        .expect("named criteria pattern")
});

/// Parses a raw criteria string in the given dialect.
///
/// Blank input yields no atoms. Malformed input is never an error: the
/// offending text is moved to [`ParsedCriteria::rejected`].
pub fn parse(raw: &str, dialect: Dialect) -> ParsedCriteria {
    match dialect {
        Dialect::Named => parse_named(raw),
        Dialect::Positional => parse_positional(raw),
    }
}

fn parse_positional(raw: &str) -> ParsedCriteria {
    let mut parsed = ParsedCriteria::default();
    for piece in raw
        .split(['\n', '\r', ';'])
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
    {
        match positional_atom(piece) {
            Some(atom) => parsed.atoms.push(atom),
            None => {
                tracing::debug!(fragment = piece, "dropping malformed positional criteria");
                parsed.rejected.push(piece.to_string());
            }
        }
    }
    parsed
}

fn positional_atom(piece: &str) -> Option<CriteriaAtom> {
    let captures = POSITIONAL_RULE.captures(piece)?;
    let section = positive_index(&captures["section"])?;
    let field = positive_index(&captures["field"])?;
    let op = Operator::from_symbol(captures.name("op").map_or("", |m| m.as_str()))?;
    Some(CriteriaAtom::new(
        Target::Position { section, field },
        op,
        unquote(&captures["expected"]),
    ))
}

fn parse_named(raw: &str) -> ParsedCriteria {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ParsedCriteria::default();
    }
    match named_atom(trimmed) {
        Some(atom) => ParsedCriteria {
            atoms: vec![atom],
            rejected: Vec::new(),
        },
        None => {
            tracing::debug!(criteria = trimmed, "dropping malformed named criteria");
            ParsedCriteria {
                atoms: Vec::new(),
                rejected: vec![trimmed.to_string()],
            }
        }
    }
}

fn named_atom(text: &str) -> Option<CriteriaAtom> {
    let captures = NAMED_RULE.captures(text)?;
    let section = captures["section"].trim();
    let field = captures["field"].trim();
    if section.is_empty() || field.is_empty() {
        return None;
    }
    let op = Operator::from_symbol(captures.name("op").map_or("", |m| m.as_str()))?;
    Some(CriteriaAtom::new(
        Target::Name {
            section: section.to_string(),
            field: field.to_string(),
        },
        op,
        unquote(&captures["expected"]),
    ))
}

fn positive_index(digits: &str) -> Option<usize> {
    digits.parse::<usize>().ok().filter(|index| *index > 0)
}

/// Trims and strips one layer of matching single or double quotes.
fn unquote(raw: &str) -> String {
    let trimmed = raw.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2
            && let Some(inner) = trimmed
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.to_string();
        }
    }
    trimmed.to_string()
}
