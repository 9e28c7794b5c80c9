//! Tags registered by [`Engine::new`][`crate::Engine::new`].
use crate::{
    compile::{Argument, Body, Operator},
    context::Context,
    error::{RenderError, TagError},
    tag::{Render, Tag},
    value::{compare_values, to_boolean, to_number},
};
use serde_json::{json, Value};
use std::slice::Iter;

/// Return every built-in tag along with the name it is registered under.
pub fn all() -> Vec<(&'static str, Box<dyn Tag>)> {
    vec![
        ("if", boxed(Conditional { negate: false })),
        ("unless", boxed(Conditional { negate: true })),
        ("for", boxed(ForLoop)),
        ("comment", boxed(Comment)),
        ("include", boxed(Placeholder)),
        ("extends", boxed(Placeholder)),
    ]
}

fn boxed<T>(tag: T) -> Box<dyn Tag>
where
    T: Tag + 'static,
{
    Box::new(tag)
}

/// The "if" and "unless" tags.
///
/// Conditions are evaluated from left to right:
///
/// ```text
/// {% if not user.banned and user.age >= 18 or user.admin %}
/// ```
pub struct Conditional {
    /// True for "unless", which renders its body when the condition is false.
    pub negate: bool,
}

impl Conditional {
    fn name(&self) -> &'static str {
        if self.negate {
            "unless"
        } else {
            "if"
        }
    }
}

impl Tag for Conditional {
    fn render(
        &self,
        args: &[Argument],
        body: &Body,
        context: &Context<'_>,
        render: &Render<'_>,
    ) -> Result<String, RenderError> {
        let condition = evaluate(self.name(), args, context)?;

        if condition != self.negate {
            render(&body.nodes, context)
        } else {
            match &body.alternate {
                Some(alternate) => render(alternate, context),
                None => Ok(String::new()),
            }
        }
    }
}

/// Evaluate a condition written as tag arguments.
///
/// # Errors
///
/// Returns a [`TagError`] when the condition is empty or malformed, and a
/// [`ContextError`][`crate::error::ContextError`] when an operand cannot be
/// resolved.
pub fn evaluate(name: &str, args: &[Argument], context: &Context<'_>) -> Result<bool, RenderError> {
    let mut iter = args.iter();
    let mut result = evaluate_clause(name, &mut iter, context)?;

    while let Some(argument) = iter.next() {
        let next = evaluate_clause(name, &mut iter, context)?;
        result = match argument.as_word() {
            Some("and") => result && next,
            Some("or") => result || next,
            _ => {
                return Err(TagError::new(
                    name,
                    format!("expected `and` or `or`, found {}", describe(argument)),
                )
                .into());
            }
        };
    }

    Ok(result)
}

/// Evaluate `[not] operand [operator operand]`.
fn evaluate_clause(
    name: &str,
    iter: &mut Iter<'_, Argument>,
    context: &Context<'_>,
) -> Result<bool, RenderError> {
    let mut first = iter.next();
    let negate = first.and_then(Argument::as_word) == Some("not");
    if negate {
        first = iter.next();
    }
    let Some(first) = first else {
        return Err(TagError::new(name, "expected a condition").into());
    };
    let left = operand(name, first, context)?;

    let operator = match iter.as_slice().first() {
        Some(Argument::Operator(operator)) => Some(*operator),
        Some(argument) => argument.as_word().and_then(Operator::from_word),
        None => None,
    };

    let result = match operator {
        Some(operator) => {
            iter.next();
            let Some(second) = iter.next() else {
                return Err(TagError::new(
                    name,
                    format!("expected a value after `{operator}`"),
                )
                .into());
            };
            let right = operand(name, second, context)?;
            compare_values(&left, operator, &right)
        }
        None => to_boolean(&left),
    };

    Ok(result != negate)
}

/// Return the value of an argument that is expected to be a path or literal.
fn operand(name: &str, argument: &Argument, context: &Context<'_>) -> Result<Value, RenderError> {
    match argument {
        Argument::Path(path) => Ok(context.resolve(path)?),
        Argument::Literal(value) => Ok(value.clone()),
        other => Err(TagError::new(
            name,
            format!("expected a value, found {}", describe(other)),
        )
        .into()),
    }
}

/// Describe an argument for an error message.
fn describe(argument: &Argument) -> String {
    match argument {
        Argument::Path(path) => format!("`{path}`"),
        Argument::Literal(value) => format!("`{value}`"),
        Argument::Operator(operator) => format!("`{operator}`"),
        Argument::Punct(punct) => format!("`{punct}`"),
    }
}

/// The "for" tag.
///
/// ```text
/// {% for item in items reversed limit: 2 offset: 1 %}
///     {{ forloop.index }}: {{ item }}
/// {% else %}
///     nothing here
/// {% endfor %}
/// ```
///
/// `offset` is applied before `limit`, and both before `reversed`. The
/// `else` branch is rendered when no elements remain.
pub struct ForLoop;

/// Parsed arguments of a "for" tag.
struct Loop<'a> {
    variable: &'a str,
    iterable: Vec<Value>,
    reversed: bool,
    limit: Option<usize>,
    offset: usize,
}

impl ForLoop {
    const NAME: &'static str = "for";

    fn parse<'a>(args: &'a [Argument], context: &Context<'_>) -> Result<Loop<'a>, RenderError> {
        let mut iter = args.iter();

        let variable = match iter.next().and_then(Argument::as_word) {
            Some(variable) => variable,
            None => return Err(TagError::new(Self::NAME, "expected a loop variable").into()),
        };
        if iter.next().and_then(Argument::as_word) != Some("in") {
            return Err(TagError::new(Self::NAME, "expected `in` after the loop variable").into());
        }
        let iterable = match iter.next() {
            Some(argument) => operand(Self::NAME, argument, context)?,
            None => return Err(TagError::new(Self::NAME, "expected a value to iterate").into()),
        };
        let iterable = match iterable {
            Value::Array(array) => array,
            other => {
                return Err(TagError::new(
                    Self::NAME,
                    format!("expected an array to iterate, found `{other}`"),
                )
                .into());
            }
        };

        let mut parsed = Loop {
            variable,
            iterable,
            reversed: false,
            limit: None,
            offset: 0,
        };

        while let Some(argument) = iter.next() {
            match argument.as_word() {
                Some("reversed") => parsed.reversed = true,
                Some(word @ ("limit" | "offset")) => {
                    if iter.next() != Some(&Argument::Punct(':')) {
                        return Err(TagError::new(
                            Self::NAME,
                            format!("expected `:` after `{word}`"),
                        )
                        .into());
                    }
                    let value = match iter.next() {
                        Some(argument) => operand(Self::NAME, argument, context)?,
                        None => Value::Null,
                    };
                    let Some(number) = to_number(&value).filter(|number| *number >= 0.0) else {
                        return Err(TagError::new(
                            Self::NAME,
                            format!("expected a non-negative number for `{word}`"),
                        )
                        .into());
                    };
                    if word == "limit" {
                        parsed.limit = Some(number as usize);
                    } else {
                        parsed.offset = number as usize;
                    }
                }
                _ => {
                    return Err(TagError::new(
                        Self::NAME,
                        format!("unexpected argument {}", describe(argument)),
                    )
                    .into());
                }
            }
        }

        Ok(parsed)
    }
}

impl Tag for ForLoop {
    fn render(
        &self,
        args: &[Argument],
        body: &Body,
        context: &Context<'_>,
        render: &Render<'_>,
    ) -> Result<String, RenderError> {
        let Loop {
            variable,
            iterable,
            reversed,
            limit,
            offset,
        } = Self::parse(args, context)?;

        let mut items: Vec<Value> = iterable
            .into_iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .collect();
        if reversed {
            items.reverse();
        }

        if items.is_empty() {
            return match &body.alternate {
                Some(alternate) => render(alternate, context),
                None => Ok(String::new()),
            };
        }

        let length = items.len();
        let mut buffer = String::new();
        for (index, item) in items.into_iter().enumerate() {
            let mut child = context.derive();
            child.set(variable, item);
            child.set(
                "forloop",
                json!({
                    "index": index + 1,
                    "index0": index,
                    "first": index == 0,
                    "last": index + 1 == length,
                    "length": length,
                }),
            );

            buffer.push_str(&render(&body.nodes, &child)?);
        }

        Ok(buffer)
    }
}

/// The "comment" tag, which renders nothing.
pub struct Comment;

impl Tag for Comment {
    fn render(
        &self,
        _: &[Argument],
        _: &Body,
        _: &Context<'_>,
        _: &Render<'_>,
    ) -> Result<String, RenderError> {
        Ok(String::new())
    }
}

/// The "include" and "extends" tags.
///
/// Neither loads another template, they only render their own body.
pub struct Placeholder;

impl Tag for Placeholder {
    fn render(
        &self,
        _: &[Argument],
        body: &Body,
        context: &Context<'_>,
        render: &Render<'_>,
    ) -> Result<String, RenderError> {
        render(&body.nodes, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile::Node, context::Path, value::to_string};

    fn word(text: &str) -> Argument {
        Argument::Path(Path::parse(text))
    }

    fn body(text: &str) -> Body {
        Body {
            nodes: vec![Node::Text(text.into())],
            alternate: None,
        }
    }

    /// Render nodes as their text, followed by the value of `item` if bound.
    fn stub(nodes: &[Node], context: &Context<'_>) -> Result<String, RenderError> {
        let mut buffer = String::new();
        for node in nodes {
            if let Node::Text(text) = node {
                buffer.push_str(text);
            }
        }
        buffer.push_str(&to_string(&context.resolve(&Path::parse("item"))?));
        Ok(buffer)
    }

    #[test]
    fn test_if_renders_branch() {
        let context = Context::new().with_must("show", false);
        let mut body = body("Visible");
        body.alternate = Some(vec![Node::Text("Hidden".into())]);

        let tag = Conditional { negate: false };
        assert_eq!(tag.render(&[word("show")], &body, &context, &stub).unwrap(), "Hidden");

        let tag = Conditional { negate: true };
        assert_eq!(tag.render(&[word("show")], &body, &context, &stub).unwrap(), "Visible");
    }

    #[test]
    fn test_if_without_alternate() {
        let context = Context::new();
        let tag = Conditional { negate: false };

        assert_eq!(tag.render(&[word("missing")], &body("x"), &context, &stub).unwrap(), "");
    }

    #[test]
    fn test_evaluate_conditions() {
        let context = Context::new()
            .with_must("age", 20)
            .with_must("name", "taylor")
            .with_must("tags", vec!["a", "b"]);

        let cases = vec![
            (
                vec![
                    word("age"),
                    Argument::Operator(Operator::GreaterOrEqual),
                    Argument::Literal(json!(18)),
                ],
                true,
            ),
            (vec![word("not"), word("age")], false),
            (vec![word("name"), word("contains"), Argument::Literal(json!("tay"))], true),
            (vec![word("missing"), word("or"), word("name")], true),
            (vec![word("age"), word("and"), word("missing")], false),
            (vec![word("not"), word("missing"), word("and"), word("tags")], true),
            (
                vec![
                    word("name"),
                    Argument::Operator(Operator::Equal),
                    Argument::Literal(json!("taylor")),
                    word("and"),
                    word("age"),
                    Argument::Operator(Operator::Lesser),
                    Argument::Literal(json!("9")),
                ],
                false,
            ),
        ];

        for (args, expect) in cases {
            assert_eq!(evaluate("if", &args, &context).unwrap(), expect, "{args:?}");
        }
    }

    #[test]
    fn test_evaluate_errors() {
        let context = Context::new().with_must("a", 1);

        assert!(evaluate("if", &[], &context).is_err());
        assert!(evaluate("if", &[word("a"), Argument::Operator(Operator::Equal)], &context).is_err());
        assert!(evaluate("if", &[word("a"), word("a")], &context).is_err());
        assert!(evaluate("if", &[word("a"), word("and")], &context).is_err());
    }

    #[test]
    fn test_for_binds_item() {
        let context = Context::new().with_must("items", vec!["a", "b", "c"]);
        let args = [word("item"), word("in"), word("items")];

        let output = ForLoop.render(&args, &body(", "), &context, &stub).unwrap();
        assert_eq!(output, ", a, b, c");
        // The loop variable is never visible to the parent.
        assert_eq!(context.resolve(&Path::parse("item")).unwrap(), Value::Null);
    }

    #[test]
    fn test_for_modifiers() {
        let context = Context::new().with_must("items", vec![1, 2, 3, 4, 5]);
        let args = [
            word("item"),
            word("in"),
            word("items"),
            word("reversed"),
            word("offset"),
            Argument::Punct(':'),
            Argument::Literal(json!(1)),
            word("limit"),
            Argument::Punct(':'),
            Argument::Literal(json!(3)),
        ];

        assert_eq!(ForLoop.render(&args, &body(""), &context, &stub).unwrap(), "432");
    }

    #[test]
    fn test_for_forloop_object() {
        fn index(_: &[Node], context: &Context<'_>) -> Result<String, RenderError> {
            let first = context.resolve(&Path::parse("forloop.first"))?;
            let index = context.resolve(&Path::parse("forloop.index"))?;
            let length = context.resolve(&Path::parse("forloop.length"))?;
            let marker = if first == json!(true) { "*" } else { "" };

            Ok(format!("{}/{}{marker} ", to_string(&index), to_string(&length)))
        }

        let context = Context::new().with_must("items", vec!["a", "b"]);
        let args = [word("item"), word("in"), word("items")];

        assert_eq!(ForLoop.render(&args, &body(""), &context, &index).unwrap(), "1/2* 2/2 ");
    }

    #[test]
    fn test_for_empty_renders_alternate() {
        let context = Context::new().with_must("items", Vec::<String>::new());
        let args = [word("item"), word("in"), word("items")];
        let mut body = body("x");
        body.alternate = Some(vec![Node::Text("empty".into())]);

        assert_eq!(ForLoop.render(&args, &body, &context, &stub).unwrap(), "empty");
    }

    #[test]
    fn test_for_requires_array() {
        let context = Context::new().with_must("items", "abc");
        let args = [word("item"), word("in"), word("items")];

        let Err(RenderError::Tag(error)) = ForLoop.render(&args, &body(""), &context, &stub) else {
            panic!("expected a tag error");
        };
        assert_eq!(error.name, "for");
    }

    #[test]
    fn test_for_malformed_args() {
        let context = Context::new().with_must("items", vec![1]);

        for args in [
            vec![],
            vec![word("item")],
            vec![word("item"), word("of"), word("items")],
            vec![word("item"), word("in"), word("items"), word("limit")],
            vec![word("item"), word("in"), word("items"), word("sorted")],
        ] {
            assert!(ForLoop.render(&args, &body(""), &context, &stub).is_err(), "{args:?}");
        }
    }

    #[test]
    fn test_comment_and_placeholder() {
        let context = Context::new().with_must("item", "!");

        assert_eq!(Comment.render(&[], &body("hidden"), &context, &stub).unwrap(), "");
        assert_eq!(
            Placeholder
                .render(&[Argument::Literal(json!("base"))], &body("own"), &context, &stub)
                .unwrap(),
            "own!"
        );
    }
}
