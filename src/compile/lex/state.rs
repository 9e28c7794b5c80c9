use crate::compile::lex::Token;

/// Where the [`Lexer`][`super::Lexer`] cursor currently sits.
#[derive(Debug, PartialEq)]
pub enum CursorState {
    /// In raw text, outside of any markers.
    Text,
    /// Between the markers of an expression or tag.
    Inside {
        /// The marker that closes the current expression or tag.
        end_token: Token,
    },
}

impl CursorState {
    /// Return the state entered after the given begin marker.
    pub fn after(begin: Token) -> Self {
        let end_token = match begin {
            Token::BeginExpression => Token::EndExpression,
            _ => Token::EndTag,
        };

        Self::Inside { end_token }
    }

    /// Return the marker that would close the current state.
    pub fn end_token(&self) -> Token {
        match self {
            Self::Inside { end_token } => *end_token,
            Self::Text => Token::EndTag,
        }
    }
}
