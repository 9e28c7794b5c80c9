//! Contains the `Tag` trait and other types useful for creating and using tags.
//!
//! A tag is any type which implements the [`Tag`] trait. You can assign a tag to
//! an [`Engine`][`crate::Engine`] with the
//! [`register_tag`][`crate::Engine::register_tag()`] method.
//!
//! Tags are written between tag markers, `{% %}` by default. The first
//! identifier is the name of the tag and everything after it is handed to the
//! tag unevaluated, as a list of [`Argument`] tokens. A tag decides for itself
//! what those tokens mean.
//!
//! A tag registered as [`TagKind::Block`] encloses a [`Body`] that ends at the
//! matching `end<name>` tag. The tag receives a [`Render`] callback which it may
//! call any number of times with the nodes of the body and a
//! [`Context`][`crate::Context`].
//!
//! # Examples
//!
//! ```rust
//! use quill::{
//!     compile::{Argument, Body},
//!     error::RenderError,
//!     tag::Render,
//!     Context, Engine,
//! };
//!
//! fn twice(
//!     _: &[Argument],
//!     body: &Body,
//!     context: &Context,
//!     render: &Render,
//! ) -> Result<String, RenderError> {
//!     Ok(render(&body.nodes, context)?.repeat(2))
//! }
//!
//! let engine = Engine::new().with_tag("twice", twice);
//! let result = engine.render("{% twice %}ha{% endtwice %}", &Context::new());
//!
//! assert_eq!(result.unwrap(), "haha");
//! ```
pub mod builtin;

use crate::{
    compile::{Argument, Body, Node},
    context::Context,
    error::RenderError,
};
use std::collections::HashMap;

/// Registered tags, by name.
pub type Tags = HashMap<String, Box<dyn Tag>>;

/// Callback a [`Tag`] uses to render nodes with a [`Context`].
pub type Render<'r> = dyn Fn(&[Node], &Context<'_>) -> Result<String, RenderError> + 'r;

/// Describes how a tag is written.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TagKind {
    /// The tag encloses nodes and must be closed with `end<name>`.
    Block,
    /// The tag stands alone and has no body.
    Inline,
}

/// Describes a type which can be used to control rendering with a tag.
pub trait Tag: Sync + Send {
    /// Return how the tag is written, [`TagKind::Block`] by default.
    fn kind(&self) -> TagKind {
        TagKind::Block
    }

    /// Execute the tag and return its output.
    ///
    /// The tag is responsible for interpreting `args`, and for deciding
    /// whether and how often `render` is called with the nodes in `body`.
    fn render(
        &self,
        args: &[Argument],
        body: &Body,
        context: &Context<'_>,
        render: &Render<'_>,
    ) -> Result<String, RenderError>;
}

/// Allows assignment of any function matching the signature of `render` as a
/// block `Tag` to `Engine`, instead of requiring a struct be created.
impl<F> Tag for F
where
    F: Fn(&[Argument], &Body, &Context<'_>, &Render<'_>) -> Result<String, RenderError>
        + Sync
        + Send,
{
    fn render(
        &self,
        args: &[Argument],
        body: &Body,
        context: &Context<'_>,
        render: &Render<'_>,
    ) -> Result<String, RenderError> {
        self(args, body, context, render)
    }
}

#[cfg(test)]
mod tests {
    use super::{Render, Tag, TagKind};
    use crate::{
        compile::{Argument, Body},
        error::{RenderError, TagError},
        value::to_string,
        Context, Engine,
    };

    /// Output the value of the first argument, followed by a marker.
    struct Echo;

    impl Tag for Echo {
        fn kind(&self) -> TagKind {
            TagKind::Inline
        }

        fn render(
            &self,
            args: &[Argument],
            _: &Body,
            context: &Context<'_>,
            _: &Render<'_>,
        ) -> Result<String, RenderError> {
            match args.first() {
                Some(Argument::Path(path)) => Ok(to_string(&context.resolve(path)?) + "!"),
                Some(Argument::Literal(value)) => Ok(to_string(value) + "!"),
                _ => Err(TagError::new("echo", "expected a value").into()),
            }
        }
    }

    #[test]
    fn test_inline_tag() {
        let engine = Engine::new().with_tag("echo", Echo);
        let context = Context::new().with_must("name", "taylor");

        assert_eq!(
            engine.render("hi {% echo name %} {% echo 'x' %}", &context).unwrap(),
            "hi taylor! x!"
        );
        assert!(engine.render("{% echo %}", &context).is_err());
    }

    #[test]
    fn test_tag_render_callback_uses_given_context() {
        fn shadow(
            _: &[Argument],
            body: &Body,
            context: &Context<'_>,
            render: &Render<'_>,
        ) -> Result<String, RenderError> {
            let mut child = context.derive();
            child.set("name", serde_json::json!("jordan"));
            Ok(render(&body.nodes, &child)? + &render(&body.nodes, context)?)
        }

        let engine = Engine::new().with_tag("shadow", shadow);
        let context = Context::new().with_must("name", "taylor");

        assert_eq!(
            engine
                .render("{% shadow %}{{ name }} {% endshadow %}", &context)
                .unwrap(),
            "jordan taylor "
        );
    }

    #[test]
    fn test_unknown_tag() {
        let result = Engine::new().render("{% missing %}", &Context::new());

        let Err(crate::Error::Render(RenderError::Tag(error))) = result else {
            panic!("expected a tag error");
        };
        assert_eq!(error.name, "missing");
        assert_eq!(error.message, "unknown tag");
    }
}
