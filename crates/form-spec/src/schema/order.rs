use std::cmp::Ordering;

use serde_json::Value;

/// Display position of a section or field.
///
/// `Unspecified` sorts after every explicit position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Order {
    Explicit(i64),
    #[default]
    Unspecified,
}

impl Order {
    /// Reads an order from a raw metadata value.
    ///
    /// Accepts JSON integers, finite floats (truncated) and numeric strings.
    /// Anything else, including `null`, yields `Unspecified`.
    pub fn from_raw(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::Number(number)) => number
                .as_i64()
                .or_else(|| number.as_f64().and_then(truncate_finite))
                .map_or(Order::Unspecified, Order::Explicit),
            Some(Value::String(text)) => Self::parse(text),
            _ => Order::Unspecified,
        }
    }

    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        trimmed
            .parse::<i64>()
            .ok()
            .or_else(|| trimmed.parse::<f64>().ok().and_then(truncate_finite))
            .map_or(Order::Unspecified, Order::Explicit)
    }

    pub fn as_option(self) -> Option<i64> {
        match self {
            Order::Explicit(value) => Some(value),
            Order::Unspecified => None,
        }
    }
}

impl From<Option<i64>> for Order {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Order::Unspecified, Order::Explicit)
    }
}

impl From<Order> for Option<i64> {
    fn from(value: Order) -> Self {
        value.as_option()
    }
}

fn truncate_finite(value: f64) -> Option<i64> {
    if value.is_finite() && value.abs() < i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

/// Display ordering shared by sections and fields: explicit order ascending,
/// then case-insensitive name, then the exact name so equal-looking names
/// still sort deterministically.
pub fn display_order(left: (Order, &str), right: (Order, &str)) -> Ordering {
    left.0
        .cmp(&right.0)
        .then_with(|| left.1.to_lowercase().cmp(&right.1.to_lowercase()))
        .then_with(|| left.1.cmp(right.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unspecified_sorts_after_every_explicit_order() {
        assert!(Order::Explicit(i64::MAX) < Order::Unspecified);
        assert!(Order::Explicit(-4) < Order::Explicit(2));
    }

    #[test]
    fn raw_values_degrade_to_unspecified() {
        assert_eq!(Order::from_raw(Some(&json!(3))), Order::Explicit(3));
        assert_eq!(Order::from_raw(Some(&json!(" 7 "))), Order::Explicit(7));
        assert_eq!(Order::from_raw(Some(&json!(2.9))), Order::Explicit(2));
        assert_eq!(Order::from_raw(Some(&json!("second"))), Order::Unspecified);
        assert_eq!(Order::from_raw(Some(&json!(true))), Order::Unspecified);
        assert_eq!(Order::from_raw(None), Order::Unspecified);
    }

    #[test]
    fn names_break_ties_case_insensitively() {
        let alpha = (Order::Explicit(1), "alpha");
        let beta = (Order::Explicit(1), "Beta");
        assert_eq!(display_order(alpha, beta), Ordering::Less);
        assert_eq!(
            display_order((Order::Unspecified, "a"), (Order::Explicit(9), "z")),
            Ordering::Greater
        );
    }
}
