use crate::{compile::Operator, context::Path, region::Region};
use serde_json::Value;

/// The Abstract Syntax Tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Raw text.
    Text(String),
    /// Render a variable, passing it through zero or more filters.
    Variable(Variable),
    /// A call to a registered tag.
    Tag(Block),
}

/// Represents data within expression markers, `{{ }}` by default.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// The value the filters are applied to.
    pub base: Base,
    /// Filters, in the order they are applied.
    pub filters: Vec<FilterCall>,
    /// Location of the expression, including the markers.
    pub region: Region,
}

/// Variable types.
///
/// ## Path
///
/// A path such as `person.name` indicates the location of the value within
/// the [`Context`][`crate::Context`].
///
/// ## Literal
///
/// Literal data written directly in the template, such as a string or number.
#[derive(Debug, Clone, PartialEq)]
pub enum Base {
    /// A value located in the Context.
    Path(Path),
    /// A literal value located directly in the template source.
    Literal(Value),
}

impl Base {
    /// Return the literal or path name of this [`Base`] for display.
    pub fn describe(&self) -> String {
        match self {
            Base::Path(path) => path.to_string(),
            Base::Literal(value) => value.to_string(),
        }
    }
}

/// A named filter with its arguments, `replace: "a", "b"` for example.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCall {
    /// Name of the filter.
    pub name: String,
    /// Positional arguments.
    pub args: Vec<Base>,
    /// Location of the call.
    pub region: Region,
}

/// A single argument token passed to a tag.
///
/// Tags receive these unevaluated and decide for themselves what they mean.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// An identifier or path, which may also be a keyword such as `in`.
    Path(Path),
    /// A string, number or boolean literal.
    Literal(Value),
    /// A comparison operator.
    Operator(Operator),
    /// Punctuation, either `:` or `,`.
    Punct(char),
}

impl Argument {
    /// Return the word when this is a single identifier, such as `and`.
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Argument::Path(path) => path.as_word(),
            _ => None,
        }
    }
}

/// A tag and the nodes it encloses.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Name of the tag.
    pub name: String,
    /// Arguments written after the name.
    pub args: Vec<Argument>,
    /// Enclosed nodes, empty for inline tags.
    pub body: Body,
    /// Location of the block, from the opening tag to the end tag.
    pub region: Region,
}

/// The nodes enclosed by a block tag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Body {
    /// Nodes before `{% else %}`, or all of them when there is none.
    pub nodes: Vec<Node>,
    /// Nodes after `{% else %}`.
    pub alternate: Option<Vec<Node>>,
}
