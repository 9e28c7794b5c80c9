//! Coercion rules for context values.
//!
//! Conditions, comparisons and output all funnel arbitrary [`Value`]s through
//! the functions in this module, so a template sees the same truthiness and
//! string form everywhere.
use crate::{compile::Operator, pipe::Pipe};
use serde_json::Value;
use std::cmp::Ordering;

/// Return true if the given [`Value`] is truthy.
///
/// # Examples
///
/// ```
/// use quill::value::to_boolean;
/// use serde_json::json;
///
/// assert!(!to_boolean(&json!("0")));
/// assert!(!to_boolean(&json!("false")));
/// assert!(!to_boolean(&json!({})));
/// assert!(to_boolean(&json!(" ")));
/// ```
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(bool) => *bool,
        Value::String(string) => !string.is_empty() && string != "false" && string != "0",
        Value::Number(number) => number
            .as_f64()
            .map(|float| float != 0.0 && !float.is_nan())
            .unwrap_or(false),
        Value::Array(array) => !array.is_empty(),
        Value::Object(object) => !object.is_empty(),
    }
}

/// Convert the [`Value`] to a number, if it has a numeric interpretation.
///
/// Strings are parsed as floats after trimming surrounding whitespace and
/// booleans become `0` or `1`. Only finite numbers are returned, so text such
/// as `"inf"` or `"NaN"` has no numeric interpretation.
pub fn to_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(string) => string.trim().parse::<f64>().ok()?,
        Value::Bool(bool) => {
            if *bool {
                1.0
            } else {
                0.0
            }
        }
        _ => return None,
    };

    number.is_finite().then_some(number)
}

/// Convert the [`Value`] to the string that a template would output.
///
/// # Examples
///
/// ```
/// use quill::value::to_string;
/// use serde_json::json;
///
/// assert_eq!(to_string(&json!(null)), "");
/// assert_eq!(to_string(&json!(["a", "b", 1])), "ab1");
/// assert_eq!(to_string(&json!({"a": true})), r#"{"a":true}"#);
/// ```
pub fn to_string(value: &Value) -> String {
    if let Value::String(string) = value {
        return string.clone();
    }

    let mut buffer = String::new();
    // Writing into a String cannot fail.
    let _ = Pipe::new(&mut buffer).write_value(value);
    buffer
}

/// Compare two [`Value`] instances with the given [`Operator`].
///
/// - `==` and `!=` never coerce: both sides must be the same kind of value.
/// - Ordering operators compare numerically when both sides convert with
///   [`to_number`], and compare the [`to_string`] forms otherwise.
/// - `contains` checks whether the string form of the left side contains the
///   string form of the right side.
///
/// # Examples
///
/// ```
/// use quill::{compile::Operator, value::compare_values};
/// use serde_json::json;
///
/// assert!(!compare_values(&json!("10"), Operator::Lesser, &json!("9")));
/// assert!(!compare_values(&json!(1), Operator::Equal, &json!("1")));
/// ```
pub fn compare_values(left: &Value, operator: Operator, right: &Value) -> bool {
    match operator {
        Operator::Equal => strict_equal(left, right),
        Operator::NotEqual => !strict_equal(left, right),
        Operator::Contains => to_string(left).contains(&to_string(right)),
        Operator::Greater
        | Operator::Lesser
        | Operator::GreaterOrEqual
        | Operator::LesserOrEqual => {
            let ordering = match (to_number(left), to_number(right)) {
                (Some(left), Some(right)) => left.partial_cmp(&right),
                _ => Some(to_string(left).cmp(&to_string(right))),
            };
            let Some(ordering) = ordering else {
                return false;
            };

            match operator {
                Operator::Greater => ordering == Ordering::Greater,
                Operator::Lesser => ordering == Ordering::Less,
                Operator::GreaterOrEqual => ordering != Ordering::Less,
                _ => ordering != Ordering::Greater,
            }
        }
    }
}

/// Equality without coercion.
///
/// Numbers are compared by value so that `1` and `1.0` are equal.
fn strict_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => match (left.as_f64(), right.as_f64()) {
            (Some(left), Some(right)) => left == right,
            _ => left == right,
        },
        (left, right) => left == right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthy_table() {
        let false_values = vec![
            json!(null),
            json!(""),
            json!("0"),
            json!("false"),
            json!([]),
            json!({}),
            json!(0),
            json!(0.0),
            json!(false),
        ];
        let true_values = vec![
            json!("lorem"),
            json!("00"),
            json!("False"),
            json!(12),
            json!(-12),
            json!(114.4),
            json!(true),
            json!(["lorem"]),
            json!({"lorem": "ipsum"}),
        ];

        for value in false_values {
            assert!(!to_boolean(&value), "{value} should be falsy");
        }
        for value in true_values {
            assert!(to_boolean(&value), "{value} should be truthy");
        }
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&json!(3)), Some(3.0));
        assert_eq!(to_number(&json!("2.5")), Some(2.5));
        assert_eq!(to_number(&json!(" 7 ")), Some(7.0));
        assert_eq!(to_number(&json!(true)), Some(1.0));
        assert_eq!(to_number(&json!(false)), Some(0.0));
        assert_eq!(to_number(&json!("abc")), None);
        assert_eq!(to_number(&json!("")), None);
        assert_eq!(to_number(&json!("NaN")), None);
        assert_eq!(to_number(&json!("inf")), None);
        assert_eq!(to_number(&json!("-Infinity")), None);
        assert_eq!(to_number(&json!(null)), None);
        assert_eq!(to_number(&json!([1])), None);
    }

    #[test]
    fn test_to_string() {
        assert_eq!(to_string(&json!("plain")), "plain");
        assert_eq!(to_string(&json!(10)), "10");
        assert_eq!(to_string(&json!(1.5)), "1.5");
        assert_eq!(to_string(&json!(false)), "false");
        assert_eq!(to_string(&json!([["a"], "b"])), "ab");
    }

    #[test]
    fn test_to_string_keeps_key_order() {
        let value: Value = serde_json::from_str(r#"{"b":1,"a":{"z":null,"y":[2]}}"#).unwrap();
        assert_eq!(to_string(&value), r#"{"b":1,"a":{"z":null,"y":[2]}}"#);
    }

    #[test]
    fn test_ordering_prefers_numbers() {
        assert!(!compare_values(&json!("10"), Operator::Lesser, &json!("9")));
        assert!(compare_values(&json!("10"), Operator::Greater, &json!(9)));
        assert!(compare_values(&json!(2), Operator::LesserOrEqual, &json!(2.0)));
    }

    #[test]
    fn test_ordering_falls_back_to_strings() {
        assert!(compare_values(&json!("b"), Operator::Greater, &json!("a")));
        assert!(compare_values(&json!("10"), Operator::Lesser, &json!("9a")));
        assert!(compare_values(&json!("a"), Operator::GreaterOrEqual, &json!("a")));
    }

    #[test]
    fn test_equality_is_strict() {
        assert!(compare_values(&json!(1), Operator::Equal, &json!(1.0)));
        assert!(!compare_values(&json!(1), Operator::Equal, &json!("1")));
        assert!(!compare_values(&json!(true), Operator::Equal, &json!("true")));
        assert!(compare_values(&json!(null), Operator::NotEqual, &json!("")));
        assert!(compare_values(&json!("a"), Operator::Equal, &json!("a")));
    }

    #[test]
    fn test_contains() {
        assert!(compare_values(&json!("hello world"), Operator::Contains, &json!("lo w")));
        assert!(compare_values(&json!(["ab", "c"]), Operator::Contains, &json!("bc")));
        assert!(compare_values(&json!(1234), Operator::Contains, &json!(23)));
        assert!(!compare_values(&json!("abc"), Operator::Contains, &json!("d")));
    }
}
