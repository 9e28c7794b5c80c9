//! Delimiter configuration.
//!
//! Templates are split into text, expressions and tags by searching for a set
//! of markers. The [`Builder`] type describes those markers and compiles them
//! into a [`Syntax`] that an [`Engine`][`crate::Engine`] searches with.
mod builder;

pub use builder::{Builder, Marker};
pub use morel::Syntax;
