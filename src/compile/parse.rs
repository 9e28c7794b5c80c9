//! Template parser.
//!
//! Utilizes a Lexer to receive instances of Token, which it uses to construct
//! the tree of Node instances that a Template is made of.
//!
//! The parser only knows about tags through the registry it is given. A tag
//! registered as a block consumes nodes until its `end<name>` tag, while any
//! other name is parsed as an inline tag.
pub mod tree;

mod fragment;
mod state;

use crate::{
    compile::{
        lex::{LexResult, LexResultMust, Lexer, Token},
        parse::{
            fragment::Fragment,
            state::State,
            tree::{Argument, Base, Block, Body, FilterCall, Node, Variable},
        },
    },
    context::{Path, Segment},
    error::ParseError,
    log::{
        expected_token, INVALID_SYNTAX, UNCLOSED_TAG, UNEXPECTED_EOF, UNEXPECTED_TAG,
        UNEXPECTED_TOKEN,
    },
    region::Region,
    tag::{TagKind, Tags},
};
use morel::Finder;
use serde_json::{Number, Value};

pub struct Parser<'source> {
    /// Lexer used to pull from source as tokens instead of raw text.
    lexer: Lexer<'source>,
    /// Registered tags, consulted to find where blocks end.
    tags: &'source Tags,
    /// Store peeked tokens.
    ///
    /// Double option is used to remember when the next token is None.
    buffer: Option<Option<(Token, Region)>>,
}

impl<'source> Parser<'source> {
    /// Create a new Parser from the given string.
    #[inline]
    pub fn new(source: &'source str, finder: &'source Finder, tags: &'source Tags) -> Self {
        Self {
            lexer: Lexer::new(source, finder),
            tags,
            buffer: None,
        }
    }

    /// Parse the source into a tree of [`Node`] instances.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the source contains malformed syntax, or
    /// a block is never closed.
    pub fn parse(mut self) -> Result<Vec<Node>, ParseError> {
        // Blocks that are open, innermost last.
        let mut states: Vec<State> = vec![];
        let mut nodes: Vec<Node> = vec![];

        while let Some(next) = self.next()? {
            let node = match next {
                (Token::Raw, region) => {
                    let text = &self.lexer.source[region];
                    if text.is_empty() {
                        continue;
                    }
                    Node::Text(text.to_owned())
                }
                (Token::BeginExpression, region) => {
                    let (base, filters) = self.parse_expression()?;
                    let (_, next_region) = self.next_must(Token::EndExpression)?;

                    Node::Variable(Variable {
                        base,
                        filters,
                        region: region.combine(next_region),
                    })
                }
                (Token::BeginTag, region) => match self.parse_tag(region)? {
                    Fragment::Inline(block) => Node::Tag(block),
                    Fragment::Open { name, args, region } => {
                        states.push(State::new(name, args, region, false));
                        continue;
                    }
                    Fragment::Else { region } => {
                        self.open_alternate(&mut states, "else", region)?;
                        continue;
                    }
                    Fragment::ElseIf { args, region } => {
                        self.open_alternate(&mut states, "elsif", region)?;
                        states.push(State::new("if".to_owned(), args, region, true));
                        continue;
                    }
                    Fragment::End { name, region } => {
                        let block = self.close(&mut states, &name, region)?;
                        Node::Tag(block)
                    }
                },
                (token, region) => {
                    return Err(ParseError::build(UNEXPECTED_TOKEN)
                        .with_pointer(self.lexer.source, region)
                        .with_help(format!("unexpected {token} outside of a tag")));
                }
            };

            match states.last_mut() {
                Some(state) => state.target().push(node),
                None => nodes.push(node),
            }
        }

        if let Some(state) = states.iter().rev().find(|state| !state.chained) {
            let name = &state.name;
            return Err(ParseError::build(UNCLOSED_TAG)
                .with_pointer(self.lexer.source, state.region)
                .with_help(format!(
                    "did you close the `{name}` block with `end{name}`?"
                )));
        }

        Ok(nodes)
    }

    /// Start the alternate branch of the innermost open block.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when no block is open, when the block already
    /// has an alternate branch, or when `elsif` is used outside of "if".
    fn open_alternate(
        &self,
        states: &mut [State],
        name: &str,
        region: Region,
    ) -> Result<(), ParseError> {
        let Some(state) = states.last_mut() else {
            return Err(ParseError::build(UNEXPECTED_TAG)
                .with_pointer(self.lexer.source, region)
                .with_help(format!("`{name}` must be used inside of a block")));
        };
        if name == "elsif" && state.name != "if" && state.name != "unless" {
            return Err(ParseError::build(UNEXPECTED_TAG)
                .with_pointer(self.lexer.source, region)
                .with_help(format!(
                    "`elsif` is only valid inside of an `if` block, not `{}`",
                    state.name
                )));
        }
        if state.alternate.is_some() {
            return Err(ParseError::build(UNEXPECTED_TAG)
                .with_pointer(self.lexer.source, region)
                .with_help(format!(
                    "the `{}` block already has an `else` branch",
                    state.name
                )));
        }
        state.alternate = Some(vec![]);

        Ok(())
    }

    /// Close the innermost block opened by a tag with the given name.
    ///
    /// Blocks chained to it with `elsif` are closed along with it.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the innermost block has another name.
    fn close(
        &self,
        states: &mut Vec<State>,
        name: &str,
        region: Region,
    ) -> Result<Block, ParseError> {
        let Some(opener) = states.iter().rev().find(|state| !state.chained) else {
            return Err(ParseError::build(UNEXPECTED_TAG)
                .with_pointer(self.lexer.source, region)
                .with_help(format!("there is no open `{name}` block to close")));
        };
        if opener.name != name {
            return Err(ParseError::build(UNEXPECTED_TAG)
                .with_pointer(self.lexer.source, region)
                .with_help(expected_token(format!("`end{}`", opener.name))));
        }

        loop {
            let Some(state) = states.pop() else {
                unreachable!("an unchained state was found above");
            };
            let chained = state.chained;
            let block = state.into_block(region);
            if !chained {
                return Ok(block);
            }
            if let Some(parent) = states.last_mut() {
                parent.target().push(Node::Tag(block));
            }
        }
    }

    /// Parse the contents of a tag, after the opening marker.
    ///
    /// ```text
    /// {% for item in items %}
    ///    |                   |
    ///    from                to
    /// ```
    fn parse_tag(&mut self, begin: Region) -> Result<Fragment, ParseError> {
        let name = match self.next_any_must()? {
            (Token::Identifier, region) => self.lexer.source[region].to_owned(),
            (_, region) => {
                return Err(ParseError::build(INVALID_SYNTAX)
                    .with_pointer(self.lexer.source, region)
                    .with_help("expected the name of a tag, such as `if` or `for`"));
            }
        };
        let args = self.parse_tag_args()?;
        let (_, end) = self.next_must(Token::EndTag)?;
        let region = begin.combine(end);

        let fragment = match name.as_str() {
            "else" => {
                if !args.is_empty() {
                    return Err(ParseError::build(UNEXPECTED_TOKEN)
                        .with_pointer(self.lexer.source, region)
                        .with_help("`else` does not accept arguments, did you mean `elsif`?"));
                }
                Fragment::Else { region }
            }
            "elsif" => Fragment::ElseIf { args, region },
            name => match (name.strip_prefix("end"), self.kind(name)) {
                (Some(rest), None) if !rest.is_empty() => Fragment::End {
                    name: rest.to_owned(),
                    region,
                },
                (_, Some(TagKind::Block)) => Fragment::Open {
                    name: name.to_owned(),
                    args,
                    region,
                },
                _ => Fragment::Inline(Block {
                    name: name.to_owned(),
                    args,
                    body: Body::default(),
                    region,
                }),
            },
        };

        Ok(fragment)
    }

    /// Return the [`TagKind`] of the registered tag.
    fn kind(&self, name: &str) -> Option<TagKind> {
        self.tags.get(name).map(|tag| tag.kind())
    }

    /// Parse the free-form arguments of a tag, up to the end marker.
    fn parse_tag_args(&mut self) -> Result<Vec<Argument>, ParseError> {
        let mut args = vec![];

        while !self.next_is(Token::EndTag)? {
            let argument = match self.peek()? {
                Some((Token::Operator(operator), _)) => {
                    self.next()?;
                    Argument::Operator(operator)
                }
                Some((Token::Colon, _)) => {
                    self.next()?;
                    Argument::Punct(':')
                }
                Some((Token::Comma, _)) => {
                    self.next()?;
                    Argument::Punct(',')
                }
                _ => match self.parse_base()? {
                    Base::Path(path) => Argument::Path(path),
                    Base::Literal(value) => Argument::Literal(value),
                },
            };
            args.push(argument);
        }

        Ok(args)
    }

    /// Parse an expression.
    ///
    /// An expression is a call to render some kind of data,
    /// and may contain one or more filters which are used to modify the output.
    fn parse_expression(&mut self) -> Result<(Base, Vec<FilterCall>), ParseError> {
        // {{ name | prepend: "hello, " | append: "!" | upcase }}
        //    |                                              |
        //    from                                           to
        if self.next_is(Token::EndExpression)? {
            let (_, region) = self.next_any_must()?;
            return Err(ParseError::build(INVALID_SYNTAX)
                .with_pointer(self.lexer.source, region)
                .with_help("expected a variable or literal, the expression is empty"));
        }

        let base = self.parse_base()?;
        let mut filters = vec![];

        while self.next_is(Token::Pipe)? {
            let (_, pipe) = self.next_must(Token::Pipe)?;
            let (name, name_region) = match self.next_any_must()? {
                (Token::Identifier, region) => (self.lexer.source[region].to_owned(), region),
                (_, region) => {
                    return Err(ParseError::build(INVALID_SYNTAX)
                        .with_pointer(self.lexer.source, pipe.combine(region))
                        .with_help("expected the name of a filter after `|`"));
                }
            };

            let mut args = vec![];
            if self.next_is(Token::Colon)? {
                self.next_must(Token::Colon)?;
                loop {
                    args.push(self.parse_base()?);
                    if !self.next_is(Token::Comma)? {
                        break;
                    }
                    self.next_must(Token::Comma)?;
                }
            }

            filters.push(FilterCall {
                name,
                args,
                region: pipe.combine(name_region),
            });
        }

        Ok((base, filters))
    }

    /// Parse a Base.
    ///
    /// A Base may be returned as a Literal or Path based on the value.
    ///
    /// ## Literal
    ///
    /// "hello world"
    ///
    /// -1000
    ///
    /// 10.2
    ///
    /// true
    ///
    /// ## Path
    ///
    /// person.name
    ///
    /// items[0]
    fn parse_base(&mut self) -> Result<Base, ParseError> {
        let base = match self.next_any_must()? {
            (Token::Minus, region) => {
                let (_, next_region) = self.next_must(Token::Number)?;

                // -1000 <- valid, negative number
                // - 1000 <- invalid
                if !region.is_adjacent(next_region) {
                    return Err(ParseError::build(UNEXPECTED_TOKEN)
                        .with_pointer(self.lexer.source, region)
                        .with_help(format!(
                            "if you want to indicate that {} is a negative number \
                            try removing the separating whitespace",
                            &self.lexer.source[next_region]
                        )));
                }

                Base::Literal(self.parse_number(region.combine(next_region))?)
            }
            (Token::Number, region) => Base::Literal(self.parse_number(region)?),
            (Token::String, region) => Base::Literal(Value::String(self.parse_string(region)?)),
            (Token::Identifier, region) => match &self.lexer.source[region] {
                "true" => Base::Literal(Value::Bool(true)),
                "false" => Base::Literal(Value::Bool(false)),
                "nil" | "null" => Base::Literal(Value::Null),
                key => {
                    let first = Segment::Key(key.to_owned());
                    Base::Path(self.parse_path(first)?)
                }
            },
            (token, region) => {
                return Err(ParseError::build(UNEXPECTED_TOKEN)
                    .with_pointer(self.lexer.source, region)
                    .with_help(format!(
                        "expected a variable or literal, found {token}"
                    )));
            }
        };

        Ok(base)
    }

    /// Parse the remainder of a [`Path`] after the first segment.
    ///
    /// Keeps chaining segments as long as a period or bracket follows.
    fn parse_path(&mut self, first: Segment) -> Result<Path, ParseError> {
        let mut path = Path::new(vec![first]);

        loop {
            if self.next_is(Token::Period)? {
                self.next_must(Token::Period)?;
                let segment = match self.next_any_must()? {
                    (Token::Identifier, region) => {
                        Segment::Key(self.lexer.source[region].to_owned())
                    }
                    (Token::Number, region) => self.parse_index(region)?,
                    (_, region) => {
                        return Err(ParseError::build(UNEXPECTED_TOKEN)
                            .with_pointer(self.lexer.source, region)
                            .with_help("expected an unquoted identifier such as `one.two`"));
                    }
                };
                path.push(segment);
            } else if self.next_is(Token::LeftBracket)? {
                self.next_must(Token::LeftBracket)?;
                let segment = match self.next_any_must()? {
                    (Token::Number, region) => self.parse_index(region)?,
                    (Token::String, region) => Segment::Key(self.parse_string(region)?),
                    (_, region) => {
                        return Err(ParseError::build(UNEXPECTED_TOKEN)
                            .with_pointer(self.lexer.source, region)
                            .with_help("expected an integer index or a string key"));
                    }
                };
                self.next_must(Token::RightBracket)?;
                path.push(segment);
            } else {
                return Ok(path);
            }
        }
    }

    /// Parse an array index from the literal value of the given Region.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a non-negative integer.
    fn parse_index(&self, region: Region) -> Result<Segment, ParseError> {
        self.lexer.source[region]
            .parse::<usize>()
            .map(Segment::Index)
            .map_err(|_| {
                ParseError::build(INVALID_SYNTAX)
                    .with_pointer(self.lexer.source, region)
                    .with_help("array indices must be non-negative integers")
            })
    }

    /// Parse a String from the literal value of the given Region.
    ///
    /// The first character of the window is the quote that delimits it.
    ///
    /// # Errors
    ///
    /// Returns an error if an unrecognized escape character is found.
    fn parse_string(&self, region: Region) -> Result<String, ParseError> {
        let window = &self.lexer.source[region];
        let inner = &window[1..window.len() - 1];
        if !inner.contains('\\') {
            return Ok(inner.to_owned());
        }

        let mut iter = inner.chars();
        let mut string = String::with_capacity(inner.len());
        while let Some(c) = iter.next() {
            if c != '\\' {
                string.push(c);
                continue;
            }
            let c = match iter.next() {
                Some('n') => '\n',
                Some('r') => '\r',
                Some('t') => '\t',
                Some('\\') => '\\',
                Some('"') => '"',
                Some('\'') => '\'',
                _ => {
                    return Err(ParseError::build("unexpected escape character")
                        .with_pointer(self.lexer.source, region)
                        .with_help("recognized escapes are `\\n`, `\\r`, `\\t`, `\\\\`, `\\\"` and `\\'`"));
                }
            };
            string.push(c);
        }

        Ok(string)
    }

    /// Parse a Value::Number from the given Region.
    ///
    /// # Errors
    ///
    /// Returns an error if the literal value of the Region cannot be converted
    /// to a Value::Number.
    fn parse_number(&self, region: Region) -> Result<Value, ParseError> {
        let as_number: Number = self.lexer.source[region].parse().map_err(|_| {
            ParseError::build("unrecognizable number")
                .with_pointer(self.lexer.source, region)
                .with_help(
                    "numbers may begin with `-` to indicate a negative \
                    number and must not end with a decimal",
                )
        })?;

        Ok(Value::Number(as_number))
    }

    /// Peek the next token.
    ///
    /// # Errors
    ///
    /// Propagates any error reported by the underlying Lexer.
    fn peek(&mut self) -> LexResult {
        if let o @ None = &mut self.buffer {
            *o = Some(self.lexer.next()?);
        }

        Ok(self.buffer.flatten())
    }

    /// Get the next token.
    ///
    /// Prefers to pull a token from the internal buffer first, but will pull from
    /// the lexer when the buffer is empty.
    fn next(&mut self) -> LexResult {
        match self.buffer.take() {
            Some(t) => Ok(t),
            None => self.lexer.next(),
        }
    }

    /// Returns true if the given token matches the upcoming token.
    ///
    /// # Errors
    ///
    /// Propagates any errors reported by the underlying lexer.
    fn next_is(&mut self, expect: Token) -> Result<bool, ParseError> {
        Ok(self
            .peek()?
            .map(|(token, _)| token == expect)
            .unwrap_or(false))
    }

    /// Get the next token, and compare it to the given token.
    ///
    /// # Errors
    ///
    /// An error is returned if the next token does not match the given token,
    /// or when [next()] returns None.
    fn next_must(&mut self, expect: Token) -> LexResultMust {
        match self.next()? {
            Some((token, region)) => {
                if token == expect {
                    Ok((token, region))
                } else {
                    Err(ParseError::build(UNEXPECTED_TOKEN)
                        .with_pointer(self.lexer.source, region)
                        .with_help(expected_token(expect)))
                }
            }
            None => {
                let source_len = self.lexer.source.len();
                Err(ParseError::build(UNEXPECTED_EOF)
                    .with_pointer(self.lexer.source, source_len..source_len)
                    .with_help(expected_token(expect)))
            }
        }
    }

    /// Get the next token.
    ///
    /// Similar to "next()" but requires that a token is returned.
    ///
    /// # Errors
    ///
    /// An error is returned if no more tokens are left.
    fn next_any_must(&mut self) -> LexResultMust {
        match self.next()? {
            Some((token, region)) => Ok((token, region)),
            None => {
                let source_len = self.lexer.source.len();
                Err(ParseError::build(UNEXPECTED_EOF)
                    .with_pointer(self.lexer.source, source_len..source_len)
                    .with_help(
                        "expected additional tokens, did you make sure all \
                        blocks and expressions are closed?",
                    ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Parser;
    use crate::{
        compile::{
            lex::Token,
            parse::tree::{Argument, Base, Node},
            Operator,
        },
        context::{Path, Segment},
        syntax::Builder,
        tag::{builtin, Tags},
    };
    use morel::Finder;
    use serde_json::json;

    fn tags() -> Tags {
        builtin::all()
            .into_iter()
            .map(|(name, tag)| (name.to_owned(), tag))
            .collect()
    }

    fn parse(source: &str) -> Result<Vec<Node>, crate::error::ParseError> {
        let finder = Finder::new(Builder::new().to_syntax());
        let tags = tags();
        Parser::new(source, &finder, &tags).parse()
    }

    #[test]
    fn test_parser_lexer_integration() {
        let finder = Finder::new(Builder::new().to_syntax());
        let tags = tags();
        let mut parser = Parser::new("hello", &finder, &tags);
        assert_eq!(parser.next(), Ok(Some((Token::Raw, (0..5).into()))));
        assert_eq!(parser.next(), Ok(None));
    }

    #[test]
    fn test_parse_three_nodes() {
        let nodes = parse("Hello, {{ name }}!").unwrap();

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0], Node::Text("Hello, ".into()));
        let Node::Variable(variable) = &nodes[1] else {
            panic!("expected a variable, found {:?}", nodes[1]);
        };
        assert_eq!(variable.base, Base::Path(Path::parse("name")));
        assert!(variable.filters.is_empty());
        assert_eq!(nodes[2], Node::Text("!".into()));
    }

    #[test]
    fn test_parse_unclosed_expression() {
        let error = parse("{{ invalid").unwrap_err();

        assert_eq!(error.position, Some(10));
        assert_eq!(error.line, Some(1));
    }

    #[test]
    fn test_parse_full_expression() {
        let nodes = parse(r#"{{ name | prepend: "hello, " | replace: 'a', b.c | upcase }}"#).unwrap();
        let Node::Variable(variable) = &nodes[0] else {
            panic!("expected a variable");
        };

        let names: Vec<&str> = variable.filters.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["prepend", "replace", "upcase"]);
        assert_eq!(variable.filters[0].args, [Base::Literal(json!("hello, "))]);
        assert_eq!(
            variable.filters[1].args,
            [Base::Literal(json!("a")), Base::Path(Path::parse("b.c"))]
        );
    }

    #[test]
    fn test_parse_literal_bases() {
        for (source, expect) in [
            ("{{ -10 }}", json!(-10)),
            ("{{ 2.5 }}", json!(2.5)),
            ("{{ true }}", json!(true)),
            ("{{ nil }}", json!(null)),
            (r#"{{ "a\"b" }}"#, json!("a\"b")),
            (r"{{ 'it\'s' }}", json!("it's")),
        ] {
            let nodes = parse(source).unwrap();
            let Node::Variable(variable) = &nodes[0] else {
                panic!("expected a variable for {source}");
            };
            assert_eq!(variable.base, Base::Literal(expect), "{source}");
        }
    }

    #[test]
    fn test_parse_indexed_path() {
        let nodes = parse(r#"{{ users[0]["first name"].tags.1 }}"#).unwrap();
        let Node::Variable(variable) = &nodes[0] else {
            panic!("expected a variable");
        };

        assert_eq!(
            variable.base,
            Base::Path(Path::new(vec![
                Segment::Key("users".into()),
                Segment::Index(0),
                Segment::Key("first name".into()),
                Segment::Key("tags".into()),
                Segment::Index(1),
            ]))
        );
    }

    #[test]
    fn test_parse_negative_num_err() {
        assert!(parse("balance: {{ - 1000 }}").is_err());
    }

    #[test]
    fn test_parse_empty_names() {
        assert!(parse("{{ }}").is_err());
        assert!(parse("{{ name | }}").is_err());
        assert!(parse("{{ name | | upcase }}").is_err());
        assert!(parse("{% %}").is_err());
    }

    #[test]
    fn test_parse_if_else() {
        let nodes = parse("{% if show %}Visible{% else %}Hidden{% endif %}").unwrap();
        let Node::Tag(block) = &nodes[0] else {
            panic!("expected a tag");
        };

        assert_eq!(block.name, "if");
        assert_eq!(block.args, [Argument::Path(Path::parse("show"))]);
        assert_eq!(block.body.nodes, [Node::Text("Visible".into())]);
        assert_eq!(block.body.alternate, Some(vec![Node::Text("Hidden".into())]));
    }

    #[test]
    fn test_parse_elsif_nests() {
        let nodes = parse("{% if a %}1{% elsif b %}2{% else %}3{% endif %}").unwrap();
        let Node::Tag(block) = &nodes[0] else {
            panic!("expected a tag");
        };
        let Some(alternate) = &block.body.alternate else {
            panic!("expected an alternate branch");
        };
        let Node::Tag(nested) = &alternate[0] else {
            panic!("expected a nested tag");
        };

        assert_eq!(alternate.len(), 1);
        assert_eq!(nested.name, "if");
        assert_eq!(nested.args, [Argument::Path(Path::parse("b"))]);
        assert_eq!(nested.body.nodes, [Node::Text("2".into())]);
        assert_eq!(nested.body.alternate, Some(vec![Node::Text("3".into())]));
    }

    #[test]
    fn test_parse_nested_same_name() {
        let source = "{% for a in x %}{% for b in a %}{{ b }}{% endfor %}!{% endfor %}";
        let nodes = parse(source).unwrap();
        let Node::Tag(outer) = &nodes[0] else {
            panic!("expected a tag");
        };

        assert_eq!(nodes.len(), 1);
        assert_eq!(outer.body.nodes.len(), 2);
        assert!(matches!(&outer.body.nodes[0], Node::Tag(inner) if inner.name == "for"));
        assert_eq!(outer.body.nodes[1], Node::Text("!".into()));
    }

    #[test]
    fn test_parse_tag_args() {
        let nodes = parse(r#"{% if a.b >= -1 and c contains "x" %}{% endif %}"#).unwrap();
        let Node::Tag(block) = &nodes[0] else {
            panic!("expected a tag");
        };

        assert_eq!(
            block.args,
            [
                Argument::Path(Path::parse("a.b")),
                Argument::Operator(Operator::GreaterOrEqual),
                Argument::Literal(json!(-1)),
                Argument::Path(Path::parse("and")),
                Argument::Path(Path::parse("c")),
                Argument::Path(Path::parse("contains")),
                Argument::Literal(json!("x")),
            ]
        );
    }

    #[test]
    fn test_parse_unknown_tag_is_inline() {
        let nodes = parse("a{% custom 1, 2 %}b").unwrap();

        assert_eq!(nodes.len(), 3);
        let Node::Tag(block) = &nodes[1] else {
            panic!("expected a tag");
        };
        assert_eq!(block.name, "custom");
        assert_eq!(
            block.args,
            [
                Argument::Literal(json!(1)),
                Argument::Punct(','),
                Argument::Literal(json!(2))
            ]
        );
    }

    #[test]
    fn test_parse_block_errors() {
        assert!(parse("{% if a %}never closed").is_err());
        assert!(parse("{% endif %}").is_err());
        assert!(parse("{% else %}").is_err());
        assert!(parse("{% if a %}{% else %}{% else %}{% endif %}").is_err());
        assert!(parse("{% if a %}{% endfor %}").is_err());
        assert!(parse("{% for a in b %}{% elsif c %}{% endfor %}").is_err());
        assert!(parse("{% if a %}{% elsif b %}").is_err());
    }

    #[test]
    fn test_parse_unclosed_block_points_at_opener() {
        let error = parse("line\n{% for x in y %}").unwrap_err();

        assert_eq!(error.message, "unclosed tag");
        assert_eq!(error.line, Some(2));
        assert_eq!(error.column, Some(1));
    }

    #[test]
    fn test_parse_trim_markers() {
        let nodes = parse("a  {{- b -}}  c").unwrap();

        assert_eq!(nodes[0], Node::Text("a".into()));
        assert_eq!(nodes[2], Node::Text("c".into()));
    }

    #[test]
    fn test_peek_multiple() {
        let finder = Finder::new(Builder::new().to_syntax());
        let tags = tags();
        let mut parser = Parser::new("{{ one two", &finder, &tags);
        assert!(parser.next().is_ok());
        assert_eq!(parser.peek(), Ok(Some((Token::Identifier, (3..6).into()))));
        assert_eq!(parser.peek(), Ok(Some((Token::Identifier, (3..6).into()))));
    }
}
