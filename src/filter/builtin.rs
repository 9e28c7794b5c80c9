//! Filters registered by [`Engine::new`][`crate::Engine::new`].
//!
//! String filters convert their input with [`to_string`] first, so they accept
//! any value. Math filters convert both sides with [`to_number`] and fail when
//! either side has no numeric interpretation.
use crate::{
    error::FilterError,
    filter::Filter,
    value::{to_number, to_string},
};
use serde_json::{json, Number, Value};

/// Return every built-in filter along with the name it is registered under.
pub fn all() -> Vec<(&'static str, Box<dyn Filter>)> {
    vec![
        ("upcase", boxed(upcase)),
        ("downcase", boxed(downcase)),
        ("capitalize", boxed(capitalize)),
        ("strip", boxed(strip)),
        ("lstrip", boxed(lstrip)),
        ("rstrip", boxed(rstrip)),
        ("append", boxed(append)),
        ("prepend", boxed(prepend)),
        ("replace", boxed(replace)),
        ("remove", boxed(remove)),
        ("truncate", boxed(truncate)),
        ("split", boxed(split)),
        ("join", boxed(join)),
        ("size", boxed(size)),
        ("first", boxed(first)),
        ("last", boxed(last)),
        ("reverse", boxed(reverse)),
        ("default", boxed(default)),
        ("plus", boxed(plus)),
        ("minus", boxed(minus)),
        ("times", boxed(times)),
        ("divided_by", boxed(divided_by)),
        ("json", boxed(json)),
    ]
}

fn boxed<F>(filter: F) -> Box<dyn Filter>
where
    F: Filter + 'static,
{
    Box::new(filter)
}

pub fn upcase(input: &Value, _: &[Value]) -> Result<Value, FilterError> {
    Ok(Value::String(to_string(input).to_uppercase()))
}

pub fn downcase(input: &Value, _: &[Value]) -> Result<Value, FilterError> {
    Ok(Value::String(to_string(input).to_lowercase()))
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(input: &Value, _: &[Value]) -> Result<Value, FilterError> {
    let string = to_string(input);
    let mut chars = string.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    };

    Ok(Value::String(capitalized))
}

pub fn strip(input: &Value, _: &[Value]) -> Result<Value, FilterError> {
    Ok(json!(to_string(input).trim()))
}

pub fn lstrip(input: &Value, _: &[Value]) -> Result<Value, FilterError> {
    Ok(json!(to_string(input).trim_start()))
}

pub fn rstrip(input: &Value, _: &[Value]) -> Result<Value, FilterError> {
    Ok(json!(to_string(input).trim_end()))
}

pub fn append(input: &Value, args: &[Value]) -> Result<Value, FilterError> {
    let suffix = to_string(required(args, 0)?);

    Ok(Value::String(to_string(input) + &suffix))
}

pub fn prepend(input: &Value, args: &[Value]) -> Result<Value, FilterError> {
    let prefix = to_string(required(args, 0)?);

    Ok(Value::String(prefix + &to_string(input)))
}

/// Replace every occurrence of the first argument with the second.
pub fn replace(input: &Value, args: &[Value]) -> Result<Value, FilterError> {
    let from = to_string(required(args, 0)?);
    let to = args.get(1).map(to_string).unwrap_or_default();

    Ok(Value::String(to_string(input).replace(&from, &to)))
}

pub fn remove(input: &Value, args: &[Value]) -> Result<Value, FilterError> {
    let pattern = to_string(required(args, 0)?);

    Ok(Value::String(to_string(input).replace(&pattern, "")))
}

/// Shorten the input to the given number of characters, which includes the
/// ellipsis.
///
/// The length defaults to 50 and the ellipsis to `...`.
pub fn truncate(input: &Value, args: &[Value]) -> Result<Value, FilterError> {
    let length = match args.first() {
        Some(value) => integer(value)?.max(0) as usize,
        None => 50,
    };
    let ellipsis = args.get(1).map(to_string).unwrap_or_else(|| "...".to_owned());

    let string = to_string(input);
    if string.chars().count() <= length {
        return Ok(Value::String(string));
    }

    let keep = length.saturating_sub(ellipsis.chars().count());
    let mut truncated: String = string.chars().take(keep).collect();
    truncated.push_str(&ellipsis);

    Ok(Value::String(truncated))
}

/// Divide the input into an array on the separator.
///
/// An empty separator splits the input into characters.
pub fn split(input: &Value, args: &[Value]) -> Result<Value, FilterError> {
    let separator = to_string(required(args, 0)?);
    let string = to_string(input);

    let parts: Vec<Value> = if separator.is_empty() {
        string.chars().map(|c| Value::String(c.to_string())).collect()
    } else {
        string
            .split(separator.as_str())
            .map(|part| Value::String(part.to_owned()))
            .collect()
    };

    Ok(Value::Array(parts))
}

/// Join the elements of an array with the separator, a single space by default.
pub fn join(input: &Value, args: &[Value]) -> Result<Value, FilterError> {
    let separator = args.first().map(to_string).unwrap_or_else(|| " ".to_owned());

    match input {
        Value::Array(array) => Ok(Value::String(
            array
                .iter()
                .map(to_string)
                .collect::<Vec<_>>()
                .join(&separator),
        )),
        other => Ok(Value::String(to_string(other))),
    }
}

/// Return the number of elements in an array or object, or the number of
/// characters in a string.
pub fn size(input: &Value, _: &[Value]) -> Result<Value, FilterError> {
    let size = match input {
        Value::Array(array) => array.len(),
        Value::Object(object) => object.len(),
        Value::String(string) => string.chars().count(),
        _ => 0,
    };

    Ok(json!(size))
}

pub fn first(input: &Value, _: &[Value]) -> Result<Value, FilterError> {
    Ok(match input {
        Value::Array(array) => array.first().cloned().unwrap_or(Value::Null),
        Value::String(string) => string
            .chars()
            .next()
            .map(|c| Value::String(c.to_string()))
            .unwrap_or(Value::Null),
        _ => Value::Null,
    })
}

pub fn last(input: &Value, _: &[Value]) -> Result<Value, FilterError> {
    Ok(match input {
        Value::Array(array) => array.last().cloned().unwrap_or(Value::Null),
        Value::String(string) => string
            .chars()
            .last()
            .map(|c| Value::String(c.to_string()))
            .unwrap_or(Value::Null),
        _ => Value::Null,
    })
}

/// Reverse the order of an array, other values are returned unchanged.
pub fn reverse(input: &Value, _: &[Value]) -> Result<Value, FilterError> {
    Ok(match input {
        Value::Array(array) => Value::Array(array.iter().rev().cloned().collect()),
        other => other.clone(),
    })
}

/// Return the argument when the input is `null`, `false` or empty.
pub fn default(input: &Value, args: &[Value]) -> Result<Value, FilterError> {
    let fallback = args.first().cloned().unwrap_or(Value::Null);
    let missing = match input {
        Value::Null | Value::Bool(false) => true,
        Value::String(string) => string.is_empty(),
        Value::Array(array) => array.is_empty(),
        Value::Object(object) => object.is_empty(),
        _ => false,
    };

    Ok(if missing { fallback } else { input.clone() })
}

pub fn plus(input: &Value, args: &[Value]) -> Result<Value, FilterError> {
    arithmetic(input, args, |a, b| Some(a + b), |a, b| a.checked_add(b))
}

pub fn minus(input: &Value, args: &[Value]) -> Result<Value, FilterError> {
    arithmetic(input, args, |a, b| Some(a - b), |a, b| a.checked_sub(b))
}

pub fn times(input: &Value, args: &[Value]) -> Result<Value, FilterError> {
    arithmetic(input, args, |a, b| Some(a * b), |a, b| a.checked_mul(b))
}

/// Divide the input by the argument.
///
/// When both sides are integers the result is rounded down, as in `7 | divided_by: 2`
/// producing `3`.
pub fn divided_by(input: &Value, args: &[Value]) -> Result<Value, FilterError> {
    if to_number(required(args, 0)?) == Some(0.0) {
        return Err(FilterError::build("divided by zero"));
    }

    arithmetic(
        input,
        args,
        |a, b| Some(a / b),
        |a, b| a.checked_div_euclid(b),
    )
}

/// Serialize the input as compact JSON.
pub fn json(input: &Value, _: &[Value]) -> Result<Value, FilterError> {
    serde_json::to_string(input)
        .map(Value::String)
        .map_err(|error| FilterError::build("input could not be serialized").with_cause(error))
}

/// Return the argument at the index, or an error naming how many are needed.
fn required(args: &[Value], index: usize) -> Result<&Value, FilterError> {
    args.get(index).ok_or_else(|| {
        let count = index + 1;
        FilterError::build(format!(
            "expects at least `{count}` argument{}, received `{}`",
            if count == 1 { "" } else { "s" },
            args.len()
        ))
    })
}

/// Return the value as an integer, rounding floats down.
fn integer(value: &Value) -> Result<i64, FilterError> {
    to_number(value)
        .map(|number| number.floor() as i64)
        .ok_or_else(|| FilterError::build(format!("expects a number, received `{value}`")))
}

/// Return the value as an i64 when it is written as an integer.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(string) => string.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Apply an arithmetic operation to the input and the first argument.
///
/// Integer math is used when both sides are integers and the result fits,
/// floating point math otherwise.
fn arithmetic<F, I>(input: &Value, args: &[Value], float: F, int: I) -> Result<Value, FilterError>
where
    F: Fn(f64, f64) -> Option<f64>,
    I: Fn(i64, i64) -> Option<i64>,
{
    let operand = required(args, 0)?;

    if let (Some(left), Some(right)) = (as_integer(input), as_integer(operand)) {
        if let Some(result) = int(left, right) {
            return Ok(json!(result));
        }
    }

    let (Some(left), Some(right)) = (to_number(input), to_number(operand)) else {
        return Err(FilterError::build(format!(
            "expects numbers, received `{input}` and `{operand}`"
        )));
    };

    float(left, right)
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| FilterError::build("result is not a finite number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_filters() {
        assert_eq!(upcase(&json!("bob"), &[]).unwrap(), json!("BOB"));
        assert_eq!(downcase(&json!("BoB"), &[]).unwrap(), json!("bob"));
        assert_eq!(capitalize(&json!("hELLO world"), &[]).unwrap(), json!("Hello world"));
        assert_eq!(capitalize(&json!(""), &[]).unwrap(), json!(""));
        assert_eq!(upcase(&json!(null), &[]).unwrap(), json!(""));
    }

    #[test]
    fn test_strip_filters() {
        assert_eq!(strip(&json!("  a b  "), &[]).unwrap(), json!("a b"));
        assert_eq!(lstrip(&json!("  a "), &[]).unwrap(), json!("a "));
        assert_eq!(rstrip(&json!(" a  "), &[]).unwrap(), json!(" a"));
    }

    #[test]
    fn test_append_prepend() {
        assert_eq!(append(&json!("a"), &[json!("b")]).unwrap(), json!("ab"));
        assert_eq!(prepend(&json!("a"), &[json!(1)]).unwrap(), json!("1a"));
        assert!(append(&json!("a"), &[]).is_err());
    }

    #[test]
    fn test_replace_remove() {
        assert_eq!(
            replace(&json!("a-b-c"), &[json!("-"), json!("+")]).unwrap(),
            json!("a+b+c")
        );
        assert_eq!(remove(&json!("a-b-c"), &[json!("-")]).unwrap(), json!("abc"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(
            truncate(&json!("Ground control to Major Tom."), &[json!(20)]).unwrap(),
            json!("Ground control to...")
        );
        assert_eq!(
            truncate(&json!("Ground control"), &[json!(8), json!(", and so on")]).unwrap(),
            json!(", and so on")
        );
        assert_eq!(truncate(&json!("short"), &[json!(10)]).unwrap(), json!("short"));
        assert!(truncate(&json!("short"), &[json!("x")]).is_err());
    }

    #[test]
    fn test_split_join() {
        assert_eq!(split(&json!("a,b,c"), &[json!(",")]).unwrap(), json!(["a", "b", "c"]));
        assert_eq!(split(&json!("ab"), &[json!("")]).unwrap(), json!(["a", "b"]));
        assert_eq!(join(&json!(["a", 1, true]), &[json!(", ")]).unwrap(), json!("a, 1, true"));
        assert_eq!(join(&json!(["a", "b"]), &[]).unwrap(), json!("a b"));
    }

    #[test]
    fn test_collection_filters() {
        assert_eq!(size(&json!([1, 2, 3]), &[]).unwrap(), json!(3));
        assert_eq!(size(&json!("héllo"), &[]).unwrap(), json!(5));
        assert_eq!(size(&json!(null), &[]).unwrap(), json!(0));
        assert_eq!(first(&json!([1, 2]), &[]).unwrap(), json!(1));
        assert_eq!(last(&json!("abc"), &[]).unwrap(), json!("c"));
        assert_eq!(first(&json!([]), &[]).unwrap(), json!(null));
        assert_eq!(reverse(&json!([1, 2, 3]), &[]).unwrap(), json!([3, 2, 1]));
    }

    #[test]
    fn test_default() {
        assert_eq!(default(&json!(null), &[json!("x")]).unwrap(), json!("x"));
        assert_eq!(default(&json!(""), &[json!("x")]).unwrap(), json!("x"));
        assert_eq!(default(&json!(false), &[json!("x")]).unwrap(), json!("x"));
        assert_eq!(default(&json!(0), &[json!("x")]).unwrap(), json!(0));
        assert_eq!(default(&json!("a"), &[json!("x")]).unwrap(), json!("a"));
    }

    #[test]
    fn test_math() {
        assert_eq!(plus(&json!(1), &[json!(2)]).unwrap(), json!(3));
        assert_eq!(plus(&json!("1.5"), &[json!(2)]).unwrap(), json!(3.5));
        assert_eq!(minus(&json!(10), &[json!(3)]).unwrap(), json!(7));
        assert_eq!(times(&json!(4), &[json!(2.5)]).unwrap(), json!(10.0));
        assert_eq!(divided_by(&json!(7), &[json!(2)]).unwrap(), json!(3));
        assert_eq!(divided_by(&json!(7.0), &[json!(2)]).unwrap(), json!(3.5));
        assert!(divided_by(&json!(7), &[json!(0)]).is_err());
        assert!(plus(&json!("a"), &[json!(1)]).is_err());
        assert!(plus(&json!(1), &[]).is_err());
    }

    #[test]
    fn test_json() {
        assert_eq!(json(&json!({"a": [1, "b"]}), &[]).unwrap(), json!(r#"{"a":[1,"b"]}"#));
        assert_eq!(json(&json!("x"), &[]).unwrap(), json!("\"x\""));
    }
}
