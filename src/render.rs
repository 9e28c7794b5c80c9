use crate::{
    compile::{Base, Block, Node, Variable},
    context::Context,
    error::{ContextError, Error, FilterError, RenderError, TagError},
    filter::Filters,
    log::{UNKNOWN_FILTER, UNKNOWN_TAG},
    pipe::Pipe,
    tag::{Render, Tags},
    Engine,
};
use serde_json::Value;
use std::{borrow::Cow, fmt::Write};
use tracing::trace;

/// Render the template text with the [`Context`].
///
/// Provides a shortcut to quickly render a template when no advanced features
/// are needed, using an [`Engine`] with the built-in filters and tags.
///
/// You may prefer to create an [`Engine`][`crate::Engine`] if you intend to
/// use custom filters or tags, or render the same template more than once.
///
/// # Examples
///
/// ```
/// use quill::{render, Context};
///
/// let output = render("hello, {{ name }}!", &Context::new().with_must("name", "taylor"));
/// assert_eq!(output.unwrap(), "hello, taylor!");
/// ```
pub fn render(text: &str, context: &Context<'_>) -> Result<String, Error> {
    Engine::new().render(text, context)
}

/// Walks a tree of [`Node`] instances and writes the output.
pub struct Renderer<'engine> {
    /// Filters available to variables.
    filters: &'engine Filters,
    /// Tags available to the tree.
    tags: &'engine Tags,
}

impl<'engine> Renderer<'engine> {
    /// Create a new Renderer.
    pub fn new(filters: &'engine Filters, tags: &'engine Tags) -> Self {
        Renderer { filters, tags }
    }

    /// Render the nodes with the [`Context`].
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if rendering any of the nodes fails, or
    /// writing the output to the buffer fails.
    pub fn render(&self, nodes: &[Node], context: &Context<'_>) -> Result<String, RenderError> {
        let mut buffer = String::new();
        let mut pipe = Pipe::new(&mut buffer);

        self.render_nodes(nodes, context, &mut pipe)?;
        Ok(buffer)
    }

    /// Render each of the nodes in order.
    fn render_nodes(
        &self,
        nodes: &[Node],
        context: &Context<'_>,
        pipe: &mut Pipe,
    ) -> Result<(), RenderError> {
        for node in nodes {
            match node {
                Node::Text(text) => pipe.write_str(text)?,
                Node::Variable(variable) => {
                    let value = self.evaluate_variable(variable, context)?;
                    pipe.write_value(&value)?
                }
                Node::Tag(block) => {
                    let output = self.evaluate_tag(block, context)?;
                    pipe.write_str(&output)?
                }
            }
        }

        Ok(())
    }

    /// Evaluate a [`Variable`] to return a [`Value`].
    ///
    /// The base is evaluated first, then each filter is called one by one
    /// with the output of the one before it.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] in these cases:
    ///
    /// - Resolving the base or a filter argument fails.
    /// - A filter is not registered.
    /// - Executing a [`Filter`][`crate::filter::Filter`] returns an error.
    fn evaluate_variable<'a>(
        &self,
        variable: &'a Variable,
        context: &'a Context<'_>,
    ) -> Result<Cow<'a, Value>, RenderError> {
        let mut value = self.evaluate_base(&variable.base, context)?;

        for call in &variable.filters {
            let Some(filter) = self.filters.get(&call.name) else {
                return Err(FilterError::build(UNKNOWN_FILTER)
                    .with_name(&call.name)
                    .into());
            };

            let args = call
                .args
                .iter()
                .map(|arg| self.evaluate_base(arg, context).map(Cow::into_owned))
                .collect::<Result<Vec<Value>, ContextError>>()?;

            let returned = filter.apply(&value, &args).map_err(|mut error| {
                if error.name.is_empty() {
                    error.name = call.name.clone();
                }
                error
            })?;

            value = Cow::Owned(returned);
        }

        Ok(value)
    }

    /// Evaluate a [`Base`] to return a [`Value`].
    ///
    /// # Errors
    ///
    /// Returns a [`ContextError`] if the path cannot be traversed.
    fn evaluate_base<'a>(
        &self,
        base: &'a Base,
        context: &'a Context<'_>,
    ) -> Result<Cow<'a, Value>, ContextError> {
        match base {
            Base::Path(path) => Ok(match context.lookup(path)? {
                Some(value) => Cow::Borrowed(value),
                None => Cow::Owned(Value::Null),
            }),
            Base::Literal(value) => Ok(Cow::Borrowed(value)),
        }
    }

    /// Dispatch a [`Block`] to the registered tag.
    ///
    /// # Errors
    ///
    /// Returns a [`TagError`] if the tag is not registered, or propagates any
    /// error returned by the tag.
    fn evaluate_tag(&self, block: &Block, context: &Context<'_>) -> Result<String, RenderError> {
        let Some(tag) = self.tags.get(&block.name) else {
            return Err(TagError::new(&block.name, UNKNOWN_TAG).into());
        };
        trace!(tag = %block.name, "dispatching tag");

        let render: &Render<'_> = &|nodes, context| self.render(nodes, context);
        tag.render(&block.args, &block.body, context, render)
    }
}

#[cfg(test)]
mod tests {
    use super::Renderer;
    use crate::{
        error::RenderError,
        filter::Filters,
        tag::{builtin, Tags},
        Context, Engine,
    };
    use serde_json::json;

    fn render(source: &str, context: &Context) -> Result<String, RenderError> {
        let engine = Engine::new();
        let nodes = engine.parse(source).unwrap();
        let tags: Tags = builtin::all()
            .into_iter()
            .map(|(name, tag)| (name.to_owned(), tag))
            .collect();
        let filters: Filters = crate::filter::builtin::all()
            .into_iter()
            .map(|(name, filter)| (name.to_owned(), filter))
            .collect();

        Renderer::new(&filters, &tags).render(&nodes, context)
    }

    #[test]
    fn test_render_raw() {
        assert_eq!(render("hello there", &Context::new()).unwrap(), "hello there");
    }

    #[test]
    fn test_render_output() {
        let result = render(
            "hello there, {{ name }}!",
            &Context::new().with_must("name", "taylor"),
        );
        assert_eq!(result.unwrap(), "hello there, taylor!");
    }

    #[test]
    fn test_render_missing_is_empty() {
        let result = render("[{{ user.name.first }}]", &Context::new());
        assert_eq!(result.unwrap(), "[]");
    }

    #[test]
    fn test_render_coercion() {
        let context = Context::from_value(json!({
            "list": ["a", 1, true],
            "object": {"k": [1]},
            "float": 3.0,
        }));

        assert_eq!(
            render("{{ list }} {{ object }} {{ float }}", &context).unwrap(),
            r#"a1true {"k":[1]} 3"#
        );
    }

    #[test]
    fn test_render_if() {
        let result = render(
            "{% if left > 300 %}a\
            {% elsif name == \"taylor\" %}b\
            {% elsif not false %}c\
            {% else %}d\
            {% endif %}",
            &Context::new().with_must("left", 101).with_must("name", ""),
        );
        assert_eq!(result.unwrap(), "c");
    }

    #[test]
    fn test_render_filter_order() {
        let context = Context::new().with_must("name", " bob ");

        assert_eq!(render("[{{ name | upcase | strip }}]", &context).unwrap(), "[BOB]");
        assert_eq!(
            render("[{{ name | append: '!' | strip }}]", &context).unwrap(),
            "[bob !]"
        );
        assert_eq!(
            render("[{{ name | strip | append: '!' }}]", &context).unwrap(),
            "[bob!]"
        );
    }

    #[test]
    fn test_render_unknown_filter() {
        let Err(RenderError::Filter(error)) = render("{{ a | nope }}", &Context::new()) else {
            panic!("expected a filter error");
        };
        assert_eq!(error.name, "nope");
        assert_eq!(error.message, "unknown filter");
    }

    #[test]
    fn test_render_context_error() {
        let context = Context::from_value(json!({"name": "taylor", "items": [1]}));

        assert!(matches!(
            render("{{ name.first }}", &context),
            Err(RenderError::Context(_))
        ));
        assert!(matches!(
            render("{{ items.first }}", &context),
            Err(RenderError::Context(_))
        ));
    }

    #[test]
    fn test_render_context_error_in_body() {
        let context = Context::from_value(json!({"items": [1], "show": true}));

        let Err(RenderError::Context(error)) =
            render("{% for i in items %}{{ i.x }}{% endfor %}", &context)
        else {
            panic!("expected a context error");
        };
        assert_eq!(error.path, "i.x");

        let Err(RenderError::Filter(error)) =
            render("{% if show %}{{ show | nope }}{% endif %}", &context)
        else {
            panic!("expected a filter error");
        };
        assert_eq!(error.name, "nope");
    }

    #[test]
    fn test_render_nested_for() {
        let context = Context::from_value(json!({
            "rows": [[1, 2], [3]],
        }));

        let result = render(
            "{% for row in rows %}{% for cell in row %}{{ cell }}{% unless forloop.last %},{% endunless %}{% endfor %};{% endfor %}",
            &context,
        );
        assert_eq!(result.unwrap(), "1,2;3;");
    }
}
