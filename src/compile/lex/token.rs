use crate::{compile::Operator, syntax::Marker};
use std::fmt::Display;

/// Types emitted by the Lexer.
///
/// An abstraction over raw text to make construction of Node types easier.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Token {
    /// Raw text.
    Raw,
    /// String literal within a tag.
    String,
    /// Number within a tag.
    Number,
    /// Identifier (unquoted string) within a tag.
    Identifier,
    /// Whitespace within a tag.
    Whitespace,
    /// Beginning of an expression - {{ by default.
    BeginExpression,
    /// End of an expression - }} by default.
    EndExpression,
    /// Beginning of a tag - {% by default.
    BeginTag,
    /// End of a tag - %} by default.
    EndTag,
    /// .
    Period,
    /// ,
    Comma,
    /// :
    Colon,
    /// |
    Pipe,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// -
    Minus,
    /// Describes a comparison between two values.
    Operator(Operator),
}

impl Token {
    /// Convert a Marker into a Token.
    ///
    /// Return value includes the resulting Token and a boolean which indicates
    /// if the Token is whitespace trimmed.
    pub(crate) fn from_usize_trim(id: usize) -> (Self, bool) {
        match Marker::from(id) {
            Marker::BeginExpression => (Self::BeginExpression, false),
            Marker::EndExpression => (Self::EndExpression, false),
            Marker::BeginExpressionTrim => (Self::BeginExpression, true),
            Marker::EndExpressionTrim => (Self::EndExpression, true),
            Marker::BeginTag => (Self::BeginTag, false),
            Marker::EndTag => (Self::EndTag, false),
            Marker::BeginTagTrim => (Self::BeginTag, true),
            Marker::EndTagTrim => (Self::EndTag, true),
        }
    }

    /// Return true if the Token opens an expression or tag.
    pub(crate) fn is_begin(&self) -> bool {
        matches!(self, Token::BeginExpression | Token::BeginTag)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Raw => write!(f, "raw"),
            Token::String => write!(f, "string"),
            Token::Number => write!(f, "number"),
            Token::Identifier => write!(f, "identifier"),
            Token::Whitespace => write!(f, "whitespace"),
            Token::BeginExpression => write!(f, "begin expression"),
            Token::EndExpression => write!(f, "end of expression"),
            Token::BeginTag => write!(f, "begin tag"),
            Token::EndTag => write!(f, "end of tag"),
            Token::Period => write!(f, "period (.)"),
            Token::Comma => write!(f, "comma (,)"),
            Token::Colon => write!(f, "colon (:)"),
            Token::Pipe => write!(f, "pipe (|)"),
            Token::LeftBracket => write!(f, "left bracket ([)"),
            Token::RightBracket => write!(f, "right bracket (])"),
            Token::Minus => write!(f, "minus (-)"),
            Token::Operator(operator) => write!(f, "operator {operator}"),
        }
    }
}
