use morel::Syntax;

/// Markers that identify tags and expressions within text.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Marker {
    /// Beginning of an expression, which outputs a variable and passes it
    /// through filters.
    BeginExpression = 0,
    /// End of an expression.
    EndExpression = 1,
    /// Same as BeginExpression, but causes the trailing whitespace of the
    /// preceding text to be removed.
    BeginExpressionTrim = 2,
    /// Same as EndExpression, but causes the leading whitespace of the
    /// following text to be removed.
    EndExpressionTrim = 3,
    /// Beginning of a tag, such as "if" or "for".
    BeginTag = 4,
    /// End of a tag.
    EndTag = 5,
    /// Same as BeginTag, but causes the trailing whitespace of the
    /// preceding text to be removed.
    BeginTagTrim = 6,
    /// Same as EndTag, but causes the leading whitespace of the
    /// following text to be removed.
    EndTagTrim = 7,
}

impl From<usize> for Marker {
    fn from(value: usize) -> Self {
        match value {
            0 => Self::BeginExpression,
            1 => Self::EndExpression,
            2 => Self::BeginExpressionTrim,
            3 => Self::EndExpressionTrim,
            4 => Self::BeginTag,
            5 => Self::EndTag,
            6 => Self::BeginTagTrim,
            7 => Self::EndTagTrim,
            _ => unreachable!("syntax only registers eight markers"),
        }
    }
}

impl From<Marker> for usize {
    fn from(k: Marker) -> Self {
        k as usize
    }
}

/// Provides methods to build a [`Syntax`].
///
/// # Example
///
/// ```
/// use quill::syntax::Builder;
///
/// let syntax = Builder::new()
///     .with_expression("<<", ">>")
///     .with_tag("<%", "%>")
///     .to_syntax();
/// ```
#[derive(Debug, Clone)]
pub struct Builder<'marker> {
    expression: (&'marker str, &'marker str),
    tag: (&'marker str, &'marker str),
    whitespace: char,
}

impl<'marker> Builder<'marker> {
    /// Create a new [`Builder`].
    ///
    /// The `Builder` has the Liquid markers by default:
    ///
    /// ```text
    /// Expressions: {{ name }}
    /// Tags: {% if ... %}
    /// Whitespace:
    ///     Expression: {{- name -}}
    ///     Tag:  {%- if ... -%}
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            expression: ("{{", "}}"),
            tag: ("{%", "%}"),
            whitespace: '-',
        }
    }

    /// Set the expression markers.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::syntax::Builder;
    ///
    /// let mut builder = Builder::new();
    /// builder.set_expression("<<", ">>");
    /// ```
    #[inline]
    pub fn set_expression(&mut self, begin: &'marker str, end: &'marker str) {
        self.expression = (begin, end);
    }

    /// Set the expression markers.
    ///
    /// Returns the [`Builder`], so additional methods may be chained.
    #[inline]
    pub fn with_expression(mut self, begin: &'marker str, end: &'marker str) -> Self {
        self.set_expression(begin, end);

        self
    }

    /// Set the tag markers.
    #[inline]
    pub fn set_tag(&mut self, begin: &'marker str, end: &'marker str) {
        self.tag = (begin, end);
    }

    /// Set the tag markers.
    ///
    /// Returns the [`Builder`], so additional methods may be chained.
    #[inline]
    pub fn with_tag(mut self, begin: &'marker str, end: &'marker str) -> Self {
        self.set_tag(begin, end);

        self
    }

    /// Set the whitespace trim character.
    #[inline]
    pub fn set_whitespace(&mut self, character: char) {
        self.whitespace = character;
    }

    /// Set the whitespace trim character.
    ///
    /// Returns the Builder, so additional methods may be chained.
    #[inline]
    pub fn with_whitespace(mut self, character: char) -> Self {
        self.set_whitespace(character);

        self
    }

    /// Return a Syntax instance from the markers in this [`Builder`].
    pub fn to_syntax(&self) -> Syntax {
        let (left_expression, right_expression) = self.expression;
        let (left_tag, right_tag) = self.tag;
        let whitespace = self.whitespace;

        let markers: Vec<(usize, String)> = vec![
            (Marker::BeginExpression.into(), left_expression.into()),
            (Marker::EndExpression.into(), right_expression.into()),
            (
                Marker::BeginExpressionTrim.into(),
                format!("{left_expression}{whitespace}"),
            ),
            (
                Marker::EndExpressionTrim.into(),
                format!("{whitespace}{right_expression}"),
            ),
            (Marker::BeginTag.into(), left_tag.into()),
            (Marker::EndTag.into(), right_tag.into()),
            (Marker::BeginTagTrim.into(), format!("{left_tag}{whitespace}")),
            (Marker::EndTagTrim.into(), format!("{whitespace}{right_tag}")),
        ];

        Syntax::new(markers)
    }
}

impl Default for Builder<'_> {
    fn default() -> Self {
        Self::new()
    }
}
