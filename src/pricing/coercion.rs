//! Tolerant numeric coercion for raw form values.
//!
//! Form state arrives as whatever the user typed: numbers, numeric strings,
//! half-typed strings ("12.", "1e"), blanks, or junk. Every numeric field goes
//! through [`parse_decimal`] or [`parse_count`] so the same rule applies
//! everywhere: take the longest numeric prefix, otherwise treat the value as
//! unparsable. Callers substitute their default for unparsable values via
//! [`decimal_or`] / [`count_or`].

use serde::{Deserialize, Serialize};

/// A raw numeric form field as received on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    /// Booleans, arrays, objects. Never numeric.
    Other(serde_json::Value),
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Parse a decimal value. `None` when the value has no finite numeric prefix.
pub fn parse_decimal(value: &FieldValue) -> Option<f64> {
    let parsed = match value {
        FieldValue::Number(n) => Some(*n),
        FieldValue::Text(s) => decimal_prefix(s),
        FieldValue::Other(_) => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Parse a count (pax, nights). Fractions are truncated toward zero.
pub fn parse_count(value: &FieldValue) -> Option<i64> {
    match value {
        FieldValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
        FieldValue::Number(_) => None,
        FieldValue::Text(s) => integer_prefix(s),
        FieldValue::Other(_) => None,
    }
}

/// Parse-or-default for decimal fields.
///
/// A missing field takes `default`; a present but unparsable one is zero.
pub fn decimal_or(value: Option<&FieldValue>, default: f64) -> f64 {
    match value {
        None => default,
        Some(v) => parse_decimal(v).unwrap_or(0.0),
    }
}

/// Parse-or-default for count fields, same rule as [`decimal_or`].
pub fn count_or(value: Option<&FieldValue>, default: i64) -> i64 {
    match value {
        None => default,
        Some(v) => parse_count(v).unwrap_or(0),
    }
}

/// Strict numeric conversion used for display: the whole trimmed string must
/// be a number, and a blank string counts as zero.
pub fn strict_decimal(value: &FieldValue) -> Option<f64> {
    let parsed = match value {
        FieldValue::Number(n) => Some(*n),
        FieldValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else if decimal_prefix(trimmed).is_some() && is_full_literal(trimmed) {
                trimmed.parse::<f64>().ok()
            } else {
                None
            }
        }
        FieldValue::Other(_) => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn is_full_literal(s: &str) -> bool {
    decimal_literal_len(s) == s.len()
}

/// Longest leading decimal literal of `s`, after leading whitespace.
fn decimal_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let len = decimal_literal_len(s);
    if len == 0 {
        return None;
    }
    s[..len].parse::<f64>().ok()
}

/// Byte length of the decimal literal at the start of `s`: `[+-]?digits[.digits][e[+-]digits]`.
/// Returns 0 if there are no mantissa digits.
fn decimal_literal_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        let frac_digits = j - frac_start;
        if mantissa_digits + frac_digits > 0 {
            mantissa_digits += frac_digits;
            i = j;
        }
    }

    if mantissa_digits == 0 {
        return 0;
    }

    // Exponent only counts when it has digits ("1e" parses as 1).
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}

/// Longest leading integer of `s`: decimal digits, or hex after `0x`.
fn integer_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let len = digits
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map(|(idx, _)| idx)
        .unwrap_or(digits.len());
    if len == 0 {
        return None;
    }

    // Saturate absurdly long digit runs rather than reject them.
    let magnitude = i64::from_str_radix(&digits[..len], radix).unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
