//! Pure request predicates shared by every route.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Minimal `local@domain.tld` shape, not RFC 5322
pub static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.+@.+\..+$").expect("email pattern is valid"));

/// True if any value is absent or JSON `null`
pub fn any_nullish(values: &[Option<&Value>]) -> bool {
    values.iter().any(|v| matches!(v, None | Some(Value::Null)))
}

/// True if any value fails strict integer coercion (see [`integerish`])
pub fn not_integerish(values: &[&Value]) -> bool {
    values.iter().any(|v| integerish(v).is_none())
}

/// Strict integer coercion.
///
/// Accepts JSON numbers with no fractional part (`5` and `5.0`) and strings holding a
/// base-10 integer (surrounding whitespace ignored). Fractional numbers, decimal strings,
/// empty strings, booleans and containers are rejected.
pub fn integerish(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral_f64)),
        Value::String(s) => parse_integerish(s),
        _ => None,
    }
}

// i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
fn integral_f64(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Strict integer coercion for path segments and form text
pub fn parse_integerish(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}
