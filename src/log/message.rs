use std::fmt::Display;

pub const UNEXPECTED_TOKEN: &str = "unexpected token";
pub const UNEXPECTED_TAG: &str = "unexpected tag";
pub const UNEXPECTED_EOF: &str = "unexpected eof";
pub const INVALID_SYNTAX: &str = "invalid syntax";
pub const UNCLOSED_TAG: &str = "unclosed tag";
pub const UNKNOWN_FILTER: &str = "unknown filter";
pub const UNKNOWN_TAG: &str = "unknown tag";

/// Return a string describing an unexpected operator.
pub fn expected_operator<T>(received: T) -> String
where
    T: Display,
{
    format!("expected operator like `==`, `!=`, `>=`, `<=`, `>`, `<`, found `{received}`")
}

/// Return a string describing the token that was expected.
pub fn expected_token<T>(expected: T) -> String
where
    T: Display,
{
    format!("expected {expected}")
}
