//! Criteria comparator.
//!
//! ```text
//! expr contains ">="  ->  int(actual) >= int(rest)
//! expr contains "<="  ->  int(actual) <= int(rest)
//! otherwise           ->  String(actual) == expr
//! ```
//!
//! Integer coercion mirrors `parseInt`: anything without leading digits is
//! not a number, and a range test against not-a-number is always false.

use crate::Value;

pub(crate) fn matches(actual: &Value, expr: &str) -> bool {
    if let Some((_, bound)) = expr.split_once(">=") {
        return compare_ints(actual, bound, |a, b| a >= b);
    }
    if let Some((_, bound)) = expr.split_once("<=") {
        return compare_ints(actual, bound, |a, b| a <= b);
    }
    actual.to_string() == expr
}

fn compare_ints(actual: &Value, bound: &str, op: fn(i64, i64) -> bool) -> bool {
    match (parse_int(&actual.to_string()), parse_int(bound)) {
        (Some(a), Some(b)) => op(a, b),
        _ => false,
    }
}

/// Leading-integer parse: optional whitespace and sign, then digits.
pub(crate) fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn greater_or_equal() {
        assert!(matches(&Value::from(17i64), ">=17"));
        assert!(matches(&Value::from(20i64), ">=17"));
        assert!(!matches(&Value::from(16i64), ">=17"));
        assert!(matches(&Value::from("18"), ">=17"));
    }

    #[test]
    fn less_or_equal() {
        assert!(matches(&Value::from(3i64), "<=3"));
        assert!(!matches(&Value::from(4i64), "<=3"));
        assert!(matches(&Value::from(-2i64), "<=-1"));
    }

    #[test]
    fn non_numeric_range_operands_never_match() {
        assert!(!matches(&Value::from("evening"), ">=17"));
        assert!(!matches(&Value::Null, ">=0"));
        assert!(!matches(&Value::from(true), "<=1"));
        assert!(!matches(&Value::from(5i64), ">=soon"));
    }

    #[test]
    fn fractional_values_truncate() {
        assert!(matches(&Value::from(17.9), "<=17"));
        assert!(matches(&Value::from("17px"), ">=17"));
    }

    #[test]
    fn equality_uses_string_form() {
        assert!(matches(&Value::from("am"), "am"));
        assert!(matches(&Value::from(18i64), "18"));
        assert!(matches(&Value::from(true), "true"));
        assert!(matches(&Value::from(json!(["a", "b"])), "a,b"));
        assert!(!matches(&Value::from("pm"), "am"));
    }

    #[test]
    fn parse_int_mirrors_leading_digit_parsing() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("  -7px"), Some(-7));
        assert_eq!(parse_int("+3"), Some(3));
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("-"), None);
    }
}
