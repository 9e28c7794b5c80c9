//! Contains the `Filter` trait and other types useful for creating and using filters.
//!
//! A filter is any type which implements the [`Filter`][`crate::filter::Filter`] trait.
//! You can assign a filter to an [`Engine`][`crate::Engine`] with the
//! [`register_filter`][`crate::Engine::register_filter()`] method, and it will be available
//! in any [`Template`][`crate::Template`] rendered by that engine.
//!
//! Given this expression:
//!
//! ```text
//! {{ name | prepend: "hello, " | append: "!" | upcase }}
//! ```
//!
//! The "name" value is not quoted, and so it is perceived to be a path and not a
//! literal string. Upon rendering this expression, the [`Context`][`crate::Context`]
//! is searched for "name" and that value is used as the input for the first filter
//! in the chain.
//!
//! The pipe "|" denotes that the following identifier is the name of a filter.
//! Filters run from left to right, the output of one becoming the input of the next.
//! Arguments follow a colon and are separated by commas. They are passed to the
//! filter in the order they are written.
//!
//! # Examples
//!
//! You can either create a struct and implement the trait on that, or just create
//! a function matching the trait signature. Both are accepted.
//!
//! Here we use a function:
//!
//! ```rust
//! use quill::{error::FilterError, Context, Engine};
//! use serde_json::{json, Value};
//!
//! fn left(value: &Value, args: &[Value]) -> Result<Value, FilterError> {
//!     let count = args
//!         .first()
//!         .and_then(Value::as_u64)
//!         .ok_or_else(|| FilterError::build("expected a positive integer argument"))?;
//!
//!     let string = quill::value::to_string(value);
//!     Ok(json!(string.chars().take(count as usize).collect::<String>()))
//! }
//!
//! let engine = Engine::new().with_filter("left", left);
//! let context = Context::new().with_must("name", "TAYLOR");
//!
//! let result = engine.render("{{ name | left: 3 | downcase }}", &context);
//! assert_eq!(result.unwrap(), "tay");
//! ```
//!
//! A [`FilterError`] returned without a name is given the name the filter was
//! registered under before it reaches the caller.
pub mod builtin;

use crate::error::FilterError;
use serde_json::Value;
use std::collections::HashMap;

/// Registered filters, by name.
pub type Filters = HashMap<String, Box<dyn Filter>>;

/// Describes a type which can be used to transform input in an expression.
pub trait Filter: Sync + Send {
    /// Execute the filter with the given input and return a new Value as output.
    fn apply(&self, input: &Value, args: &[Value]) -> Result<Value, FilterError>;
}

/// Allows assignment of any function matching the signature of `apply` as a `Filter`
/// to `Engine`, instead of requiring a struct be created.
impl<F> Filter for F
where
    F: Fn(&Value, &[Value]) -> Result<Value, FilterError> + Sync + Send,
{
    fn apply(&self, value: &Value, args: &[Value]) -> Result<Value, FilterError> {
        self(value, args)
    }
}
