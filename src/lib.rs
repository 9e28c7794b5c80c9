//! Quill - Template Engine
//!
//! Quill renders text templates written in a Liquid-like dialect. Expressions
//! output a variable and pass it through filters, tags control what is rendered:
//!
//! ```text
//! Hello, {{ user.name | capitalize }}!
//! {% for item in items reversed limit: 3 %}
//!   {{ forloop.index }}. {{ item }}
//! {% else %}
//!   Nothing to show.
//! {% endfor %}
//! ```
//!
//! Templates are compiled by an [`Engine`], which also holds the filters and
//! tags they may use. A compiled [`Template`] can be rendered any number of
//! times with different [`Context`] instances.
//!
//! # Examples
//!
//! ```
//! use quill::{Context, Engine};
//!
//! let engine = Engine::new();
//! let template = engine.compile("{% if admin %}Hi, {{ name }}{% else %}Hidden{% endif %}").unwrap();
//!
//! let context = Context::new()
//!     .with_must("admin", false)
//!     .with_must("name", "taylor");
//!
//! assert_eq!(engine.render_compiled(&template, &context).unwrap(), "Hidden");
//! ```
pub mod compile;
pub mod context;
pub mod error;
pub mod filter;
pub mod syntax;
pub mod tag;
pub mod value;

mod engine;
mod log;
mod pipe;
mod region;
mod render;

pub use compile::Template;
pub use context::Context;
pub use engine::{Engine, EngineBuilder, DEFAULT_CACHE_CAPACITY};
pub use error::Error;
pub use region::Region;
pub use render::render;
