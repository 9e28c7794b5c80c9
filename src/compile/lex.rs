pub mod token;

mod state;

use crate::{
    compile::{lex::state::CursorState, Operator},
    error::ParseError,
    log::{expected_operator, floor_boundary, INVALID_SYNTAX, UNEXPECTED_TOKEN},
    region::Region,
};

pub use token::Token;

use morel::Finder;

/// Result of asking the [`Lexer`] for the next [`Token`], `None` at the end
/// of the source.
pub type LexResult = Result<Option<(Token, Region)>, ParseError>;

/// Result of requiring another [`Token`] from the [`Lexer`].
pub type LexResultMust = Result<(Token, Region), ParseError>;

/// Provides methods to read a source string as [`Token`] instances.
pub struct Lexer<'source> {
    /// Reference to the source text.
    pub source: &'source str,
    /// Position within source.
    pub cursor: usize,
    /// Compiled [`Finder`] instance used to search for markers
    /// in the source text.
    finder: &'source Finder,
    /// Tracks the [`Lexer`] state and determines the action taken
    /// when `.next` is called.
    state: CursorState,
    /// When true, the following [`Token`] read while in
    /// [`CursorState::Text`] state will be left trimmed.
    left_trim: bool,
    /// True when the previous [`Token`] was [`Token::Period`], so a number
    /// that follows is read as an integer path segment.
    after_period: bool,
    /// Temporary storage for the a [`Token`] that will be read
    /// on the following call to `.next`
    buffer: Option<(Token, Region)>,
}

impl<'source> Lexer<'source> {
    /// Create a new [`Lexer`] from the given source and [`Finder`].
    #[inline]
    pub fn new(source: &'source str, finder: &'source Finder) -> Self {
        Self {
            finder,
            state: CursorState::Text,
            source,
            left_trim: false,
            after_period: false,
            cursor: 0,
            buffer: None,
        }
    }

    /// Return the next [`Token`] and [`Region`].
    ///
    /// Any instance of [`Token::Whitespace`] is ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when an unexpected [`Token`] is found.
    pub fn next(&mut self) -> LexResult {
        loop {
            // Always prefer taking from the buffer when possible.
            if let Some(next) = self.buffer.take() {
                return Ok(Some(next));
            }
            if self.source[self.cursor..].is_empty() {
                return Ok(None);
            }

            let c = self.cursor;
            let result = match self.state {
                CursorState::Text => self.lex_default(c),
                CursorState::Inside { .. } => self.lex_tag(c),
            }?;

            return match result {
                Some((Token::Whitespace, _)) => continue,
                Some((token, region)) => {
                    self.after_period = token == Token::Period;
                    Ok(Some((token, region)))
                }
                None => Ok(None),
            };
        }
    }

    /// Return the next [`Token`] and [`Region`] in [`CursorState::Inside`]
    /// configuration.
    ///
    /// Assumes the cursor is inside of an expression or tag.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when an unexpected [`Token`] is found.
    fn lex_tag(&mut self, from: usize) -> LexResult {
        if let Some((id, length)) = self.finder.starts(self.source, from) {
            let (token, is_trimmed) = Token::from_usize_trim(id);
            let end_token = self.state.end_token();

            if token == end_token {
                self.state = CursorState::Text;
                self.left_trim = is_trimmed;
                self.cursor = length;

                return Ok(Some((token, (from..length).into())));
            }

            let which = if end_token == Token::EndExpression {
                "expression"
            } else {
                "tag"
            };
            return Err(ParseError::build(UNEXPECTED_TOKEN)
                .with_pointer(self.source, from..length)
                .with_help(format!("did you close the previous {which}?")));
        }

        let mut advance = |length: usize, data: Token| {
            self.cursor += length;

            Ok(Some((data, (from..from + length).into())))
        };

        let mut iterator = self.source[from..]
            .char_indices()
            .map(|(d, c)| (from + d, c));
        let Some((index, char)) = iterator.next() else {
            return Ok(None);
        };

        match char {
            '.' => advance(1, Token::Period),
            ',' => advance(1, Token::Comma),
            ':' => advance(1, Token::Colon),
            '[' => advance(1, Token::LeftBracket),
            ']' => advance(1, Token::RightBracket),
            '-' => advance(1, Token::Minus),
            '"' | '\'' => self.lex_string(iterator, index, char),
            '=' | '!' | '>' | '<' | '|' => self.lex_operator(iterator, index, char),
            c if c.is_whitespace() => Ok(Some(self.lex_whitespace(iterator, index))),
            c if c.is_ascii_digit() => Ok(Some(self.lex_digit(index))),
            c if is_ident_start(c) => Ok(Some(self.lex_ident(iterator, index))),
            _ => Err(ParseError::build(UNEXPECTED_TOKEN)
                .with_pointer(self.source, index..index + char.len_utf8())
                .with_help(
                    "expected one of `.`, `,`, `:`, `|`, `[`, `]`, an operator, an identifier, \
                    an ascii digit, or the beginning of a string literal marked with `\"` or `'`",
                )),
        }
    }

    /// Return a [`Token`] and [`Region`] based on the previous character.
    ///
    /// Checks the next character via `.next` to ensure the correct `Token` is
    /// returned. All of these are recognized:
    ///
    /// `==`, `!=`, `>=`, `<=`, `>`, `<`, `|`
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when an unexpected [`Token`] is found.
    fn lex_operator<T>(&mut self, mut iter: T, from: usize, previous: char) -> LexResult
    where
        T: Iterator<Item = (usize, char)>,
    {
        let (position, token) = match (previous, iter.next()) {
            // Double:
            ('=', Some((usize, '='))) => (usize, Token::Operator(Operator::Equal)),
            ('!', Some((usize, '='))) => (usize, Token::Operator(Operator::NotEqual)),
            ('>', Some((usize, '='))) => (usize, Token::Operator(Operator::GreaterOrEqual)),
            ('<', Some((usize, '='))) => (usize, Token::Operator(Operator::LesserOrEqual)),
            // Single:
            ('|', _) => (from, Token::Pipe),
            ('>', _) => (from, Token::Operator(Operator::Greater)),
            ('<', _) => (from, Token::Operator(Operator::Lesser)),
            _ => {
                return Err(ParseError::build(UNEXPECTED_TOKEN)
                    .with_pointer(self.source, from..from + 1)
                    .with_help(expected_operator(previous)));
            }
        };
        let position = position + 1;
        self.cursor = position;

        Ok(Some((token, (from..position).into())))
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::Number`].
    ///
    /// A fractional part is only read when the number does not follow a
    /// period, so `items.0.name` keeps `0` as its own path segment.
    fn lex_digit(&mut self, from: usize) -> (Token, Region) {
        let bytes = self.source.as_bytes();
        let digits = |mut at: usize| {
            while at < bytes.len() && bytes[at].is_ascii_digit() {
                at += 1;
            }
            at
        };

        let mut end = digits(from);
        if !self.after_period
            && end + 1 < bytes.len()
            && bytes[end] == b'.'
            && bytes[end + 1].is_ascii_digit()
        {
            end = digits(end + 1);
        }
        self.cursor = end;

        (Token::Number, (from..end).into())
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::Whitespace`].
    fn lex_whitespace<T>(&mut self, mut iter: T, from: usize) -> (Token, Region)
    where
        T: Iterator<Item = (usize, char)>,
    {
        loop {
            match iter.next() {
                Some((index, char)) if !char.is_whitespace() => {
                    self.cursor = index;

                    break (Token::Whitespace, (from..index).into());
                }
                Some((_, _)) => continue,
                None => {
                    self.cursor = self.source.len();

                    break (Token::Whitespace, (from..self.source.len()).into());
                }
            }
        }
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::String`] using
    /// the given iterator.
    ///
    /// The string ends at the first unescaped `quote` character.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the string is never closed.
    fn lex_string<T>(&mut self, mut iter: T, from: usize, quote: char) -> LexResult
    where
        T: Iterator<Item = (usize, char)>,
    {
        loop {
            match iter.next() {
                Some((index, c)) if c == quote => {
                    // Add one to the index of the character to comply with string slice
                    // semantics.
                    let to = index + 1;
                    self.cursor = to;

                    return Ok(Some((Token::String, (from..to).into())));
                }
                Some((_, '\\')) => {
                    // Skip whatever is escaped, the parser validates it.
                    iter.next();
                }
                Some(_) => continue,
                None => {
                    let take = self.source.len().min(from + 10);

                    return Err(ParseError::build(INVALID_SYNTAX)
                        .with_pointer(self.source, from..floor_boundary(self.source, take))
                        .with_help(format!(
                            "this might be an undelimited string, try closing it with `{quote}`"
                        )));
                }
            }
        }
    }

    /// Return a [`Token::Identifier`] and [`Region`] from the given iterator.
    fn lex_ident<T>(&mut self, mut iter: T, from: usize) -> (Token, Region)
    where
        T: Iterator<Item = (usize, char)>,
    {
        let to = loop {
            match iter.next() {
                Some((index, char)) if !is_ident_continue(char) => break index,
                Some((_, _)) => continue,
                None => break self.source.len(),
            }
        };
        self.cursor = to;

        (Token::Identifier, (from..to).into())
    }

    /// Return the next [`Token`] and [`Region`] in [`CursorState::Text`]
    /// configuration.
    ///
    /// Assumes the cursor is outside of an expression. End markers found
    /// here have nothing to close and are kept as raw text.
    fn lex_default(&mut self, from: usize) -> LexResult {
        let mut search = from;

        loop {
            let Some((id, marker_begin, marker_end)) = self.finder.next(self.source, search) else {
                let end = self.source.len();
                self.cursor = end;

                return Ok(Some(self.trim_region(from, end, false)));
            };

            let (token, is_trimmed) = Token::from_usize_trim(id);
            if !token.is_begin() {
                search = marker_end;
                continue;
            }

            self.state = CursorState::after(token);
            self.cursor = marker_end;

            if from == marker_begin {
                self.left_trim = false;

                return Ok(Some((token, (marker_begin..marker_end).into())));
            }

            self.buffer = Some((token, (marker_begin..marker_end).into()));
            return Ok(Some(self.trim_region(from, marker_begin, is_trimmed)));
        }
    }

    /// Return a [`Token::Raw`] over the given range, removing whitespace
    /// requested by neighboring trim markers.
    fn trim_region(&mut self, begin: usize, end: usize, right_trim: bool) -> (Token, Region) {
        let mut region_begin = begin;
        let mut region_end = end;

        if right_trim {
            region_end = begin + self.source[begin..end].trim_end().len();
        }
        if self.left_trim {
            self.left_trim = false;
            let s = &self.source[region_begin..region_end];
            region_begin = region_begin + s.len() - s.trim_start().len()
        }

        (Token::Raw, (region_begin..region_end).into())
    }
}

/// Return true if the given character is a recognized beginning identifier,
/// meaning '_' or an `xid_start`.
fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

/// Return true if the given character is a recognized continue identifier,
/// meaning an `xid_continue`.
fn is_ident_continue(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}
