//! Normalization of loosely formatted numeric input
//!
//! Founders type numbers into a chat: `"1.234,56 €"`, `"12,5"`, `2000`,
//! `"1,200.00"`. This module is the single place where such raw values are
//! turned into exact decimals, and the only producer of
//! [`PlanError::InvalidInput`].
//!
//! German conventions win when a string is ambiguous: a lone comma is the
//! decimal separator, and a lone dot followed by exactly three digits is a
//! thousands separator (`"1.500"` is fifteen hundred).

use super::amount::Amount;
use crate::error::{PlanError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A numeric value as supplied by the caller, before validation
#[derive(Debug, Clone, PartialEq)]
pub enum RawNumber {
    /// Exact decimal (integers and values built in code)
    Number(Decimal),
    /// Binary float, possibly non-finite
    Float(f64),
    /// Free text, possibly locale formatted
    Text(String),
}

impl From<Decimal> for RawNumber {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for RawNumber {
    fn from(value: i64) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl Serialize for RawNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Number(d) => Serialize::serialize(d, serializer),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

struct RawNumberVisitor;

impl<'de> Visitor<'de> for RawNumberVisitor {
    type Value = RawNumber;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<RawNumber, E> {
        Ok(RawNumber::Number(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<RawNumber, E> {
        Ok(RawNumber::Number(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<RawNumber, E> {
        Ok(RawNumber::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<RawNumber, E> {
        Ok(RawNumber::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<RawNumber, E> {
        Ok(RawNumber::Text(v))
    }
}

impl<'de> Deserialize<'de> for RawNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(RawNumberVisitor)
    }
}

/// Largest magnitude accepted for any input value (prices, quantities,
/// rates, multipliers)
pub const MAX_INPUT_MAGNITUDE: Decimal = dec!(1000000000000);

/// Convert a raw value into an exact decimal
pub fn normalize_decimal(field: &str, raw: &RawNumber) -> Result<Decimal> {
    let value = match raw {
        RawNumber::Number(d) => *d,
        RawNumber::Float(f) => normalize_float(field, *f)?,
        RawNumber::Text(s) => parse_locale_number(field, s)?,
    };
    if value.abs() > MAX_INPUT_MAGNITUDE {
        return Err(PlanError::invalid_input(
            field,
            format!("{} exceeds the limit of {}", value, MAX_INPUT_MAGNITUDE),
        ));
    }
    Ok(value)
}

/// Convert a raw value into a decimal that must not be negative
pub fn normalize_non_negative(field: &str, raw: &RawNumber) -> Result<Decimal> {
    let value = normalize_decimal(field, raw)?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PlanError::invalid_input(
            field,
            format!("negative value {} is not allowed", value),
        ));
    }
    Ok(value)
}

/// Convert a raw value into a non-negative currency amount (rounded half-up to cents)
pub fn normalize_amount(field: &str, raw: &RawNumber) -> Result<Amount> {
    normalize_non_negative(field, raw).map(Amount::new)
}

/// Convert a raw value into a count (months, days): a non-negative whole number
pub fn normalize_count(field: &str, raw: &RawNumber) -> Result<u32> {
    let value = normalize_non_negative(field, raw)?;
    if !value.fract().is_zero() {
        return Err(PlanError::invalid_input(
            field,
            format!("{} is not a whole number", value),
        ));
    }
    value
        .to_u32()
        .ok_or_else(|| PlanError::invalid_input(field, format!("{} is too large", value)))
}

/// Convert exactly `N` raw values into non-negative decimals (`field[i]` paths)
pub fn normalize_fixed<const N: usize>(field: &str, values: &[RawNumber]) -> Result<[Decimal; N]> {
    if values.len() != N {
        return Err(PlanError::invalid_input(
            field,
            format!("expected {} values, got {}", N, values.len()),
        ));
    }
    let mut out = [Decimal::ZERO; N];
    for (i, (slot, raw)) in out.iter_mut().zip(values).enumerate() {
        *slot = normalize_non_negative(&format!("{}[{}]", field, i), raw)?;
    }
    Ok(out)
}

/// Convert a binary float into a decimal via its shortest round-trip
/// representation, so `0.1` becomes exactly `0.1`
pub fn normalize_float(field: &str, value: f64) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(PlanError::invalid_input(field, format!("non-finite number {}", value)));
    }
    Decimal::from_str(&value.to_string())
        .map_err(|e| PlanError::invalid_input(field, format!("number {} out of range: {}", value, e)))
}

/// Parse a locale formatted numeric string
///
/// Accepts `€`, `EUR` and `%` decorations, spaces (including non-breaking),
/// apostrophe grouping, German (`1.234,56`) and English (`1,234.56`) layouts.
pub fn parse_locale_number(field: &str, text: &str) -> Result<Decimal> {
    let cleaned: String = text
        .replace("EUR", "")
        .replace("eur", "")
        .chars()
        .filter(|c| !matches!(c, '€' | '%' | '\'' | ' ' | '\u{a0}' | '\u{202f}' | '\t'))
        .map(|c| if c == '\u{2212}' { '-' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Err(PlanError::invalid_input(field, "empty value"));
    }

    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return Err(PlanError::invalid_input(field, format!("`{}` is not a number", text)));
    }

    let (integer, fraction) = split_separators(digits)
        .ok_or_else(|| PlanError::invalid_input(field, format!("`{}` has inconsistent separators", text)))?;

    if integer.is_empty() && fraction.is_empty() {
        return Err(PlanError::invalid_input(field, format!("`{}` is not a number", text)));
    }

    let canonical = format!(
        "{}{}{}{}",
        if negative { "-" } else { "" },
        if integer.is_empty() { "0" } else { integer.as_str() },
        if fraction.is_empty() { "" } else { "." },
        fraction
    );

    Decimal::from_str(&canonical)
        .map_err(|e| PlanError::invalid_input(field, format!("`{}` out of range: {}", text, e)))
}

/// Split a digits-and-separators string into integer digits and fraction digits.
/// Returns `None` when the grouping is inconsistent.
fn split_separators(s: &str) -> Option<(String, String)> {
    let commas = s.matches(',').count();
    let dots = s.matches('.').count();

    let (thousands, decimal): (Option<char>, Option<char>) = match (commas, dots) {
        (0, 0) => (None, None),
        (_, 0) if commas > 1 => (Some(','), None),
        (1, 0) => (None, Some(',')),
        (0, _) if dots > 1 => (Some('.'), None),
        (0, 1) => {
            let (head, tail) = s.split_once('.')?;
            if looks_like_grouping(head, tail) {
                (Some('.'), None)
            } else {
                (None, Some('.'))
            }
        }
        _ => {
            // Both present: whichever comes last is the decimal separator
            let last_comma = s.rfind(',')?;
            let last_dot = s.rfind('.')?;
            if last_comma > last_dot {
                if commas != 1 {
                    return None;
                }
                (Some('.'), Some(','))
            } else {
                if dots != 1 {
                    return None;
                }
                (Some(','), Some('.'))
            }
        }
    };

    let (int_part, frac_part) = match decimal {
        Some(sep) => {
            let (i, f) = s.split_once(sep)?;
            (i, f)
        }
        None => (s, ""),
    };

    if frac_part.contains(['.', ',']) {
        return None;
    }

    let integer = match thousands {
        Some(sep) => {
            let groups: Vec<&str> = int_part.split(sep).collect();
            let first_ok = groups
                .first()
                .map(|g| !g.is_empty() && g.len() <= 3)
                .unwrap_or(false);
            if !first_ok || groups.iter().skip(1).any(|g| g.len() != 3) {
                return None;
            }
            groups.concat()
        }
        None => int_part.to_string(),
    };

    Some((integer, frac_part.to_string()))
}

/// `"1.500"` is a grouped integer; `"0.500"` and `"1.5"` are decimals
fn looks_like_grouping(head: &str, tail: &str) -> bool {
    tail.len() == 3 && !head.is_empty() && head.len() <= 3 && !head.starts_with('0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(s: &str) -> Decimal {
        parse_locale_number("test", s).unwrap()
    }

    #[test]
    fn test_german_format() {
        assert_eq!(parse("1.234,56 €"), dec!(1234.56));
        assert_eq!(parse("12,5"), dec!(12.5));
        assert_eq!(parse("€ 2.000"), dec!(2000));
        assert_eq!(parse("1.234.567"), dec!(1234567));
        assert_eq!(parse("-1.200,50"), dec!(-1200.50));
        assert_eq!(parse("1\u{a0}500,00\u{a0}€"), dec!(1500.00));
    }

    #[test]
    fn test_english_format() {
        assert_eq!(parse("1,234.56"), dec!(1234.56));
        assert_eq!(parse("1,234,567"), dec!(1234567));
        assert_eq!(parse("3.5"), dec!(3.5));
        assert_eq!(parse("0.500"), dec!(0.500));
        assert_eq!(parse("2000 EUR"), dec!(2000));
    }

    #[test]
    fn test_percent_and_sign_decorations() {
        assert_eq!(parse("5 %"), dec!(5));
        assert_eq!(parse("+7,25%"), dec!(7.25));
        assert_eq!(parse("\u{2212}3"), dec!(-3));
        assert_eq!(parse(",5"), dec!(0.5));
    }

    #[test]
    fn test_rejects_garbage() {
        let err = parse_locale_number("revenue.unit_price", "abc").unwrap_err();
        assert_eq!(err.field(), Some("revenue.unit_price"));
        assert!(parse_locale_number("x", "").is_err());
        assert!(parse_locale_number("x", "€").is_err());
        assert!(parse_locale_number("x", "1,2,3").is_err());
        assert!(parse_locale_number("x", "1.2.3,4,5").is_err());
        assert!(parse_locale_number("x", "12-3").is_err());
    }

    #[test]
    fn test_oversized_values_rejected() {
        let price = RawNumber::from("100000000000000000000");
        let err = normalize_amount("revenue_streams[0].unit_price", &price).unwrap_err();
        assert_eq!(err.field(), Some("revenue_streams[0].unit_price"));

        assert!(normalize_decimal("q", &RawNumber::from(10_000_000_000_000i64)).is_err());
        assert!(normalize_decimal("q", &RawNumber::from(-10_000_000_000_000i64)).is_err());
        assert!(normalize_decimal("q", &RawNumber::from(1e13)).is_err());
        assert_eq!(
            normalize_decimal("q", &RawNumber::from("1.000.000.000.000")).unwrap(),
            MAX_INPUT_MAGNITUDE
        );
    }

    #[test]
    fn test_float_normalization() {
        assert_eq!(normalize_float("x", 0.1).unwrap(), dec!(0.1));
        assert_eq!(normalize_float("x", 377.42).unwrap(), dec!(377.42));
        assert!(normalize_float("x", f64::NAN).is_err());
        assert!(normalize_float("x", f64::INFINITY).is_err());
        assert!(normalize_float("x", 1e40).is_err());
    }

    #[test]
    fn test_negative_values_rejected_for_amounts() {
        let err = normalize_amount("capital.equipment", &RawNumber::from(-5i64)).unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput { ref field, .. } if field == "capital.equipment"));
        assert_eq!(
            normalize_amount("x", &RawNumber::from("19,999")).unwrap(),
            Amount::new(dec!(20.00))
        );
    }

    #[test]
    fn test_counts() {
        assert_eq!(normalize_count("term", &RawNumber::from("60")).unwrap(), 60);
        assert_eq!(normalize_count("term", &RawNumber::from(12.0)).unwrap(), 12);
        assert!(normalize_count("term", &RawNumber::from("4,5")).is_err());
        assert!(normalize_count("term", &RawNumber::from(-3i64)).is_err());
    }

    #[test]
    fn test_fixed_length() {
        let values = vec![RawNumber::from("0,8"), RawNumber::from(1i64), RawNumber::from(1.2)];
        let parsed: [Decimal; 3] = normalize_fixed("q", &values).unwrap();
        assert_eq!(parsed, [dec!(0.8), dec!(1), dec!(1.2)]);

        let err = normalize_fixed::<4>("q", &values).unwrap_err();
        assert_eq!(err.field(), Some("q"));
        let bad = vec![RawNumber::from(1i64), RawNumber::from("x")];
        assert_eq!(normalize_fixed::<2>("q", &bad).unwrap_err().field(), Some("q[1]"));
    }

    #[test]
    fn test_raw_number_deserialization() {
        let values: Vec<RawNumber> = serde_json::from_str(r#"[12, 2.5, "1.234,5"]"#).unwrap();
        assert_eq!(values[0], RawNumber::Number(dec!(12)));
        assert_eq!(values[1], RawNumber::Float(2.5));
        assert_eq!(values[2], RawNumber::Text("1.234,5".to_string()));
        assert_eq!(normalize_decimal("x", &values[2]).unwrap(), dec!(1234.5));

        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"["12",2.5,"1.234,5"]"#);
        let reparsed: Vec<RawNumber> = serde_json::from_str(&json).unwrap();
        assert_eq!(normalize_decimal("x", &reparsed[0]).unwrap(), dec!(12));
    }
}
