//! Compilation of template text into a tree of [`Node`] instances.
mod lex;
mod parse;
mod template;

pub use crate::compile::{
    parse::{
        tree::{Argument, Base, Block, Body, FilterCall, Node, Variable},
        Parser,
    },
    template::Template,
};

use std::fmt::Display;

/// Operators recognized by the Lexer and Parser.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Operator {
    /// >
    Greater,
    /// <
    Lesser,
    /// ==
    Equal,
    /// !=
    NotEqual,
    /// >=
    GreaterOrEqual,
    /// <=
    LesserOrEqual,
    /// contains
    Contains,
}

impl Operator {
    /// Return the [`Operator`] spelled as a word, such as `contains`.
    ///
    /// The Lexer reads words as identifiers, so tags convert them with this
    /// when interpreting their arguments.
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "contains" => Some(Operator::Contains),
            _ => None,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Greater => write!(f, ">"),
            Operator::Lesser => write!(f, "<"),
            Operator::Equal => write!(f, "=="),
            Operator::NotEqual => write!(f, "!="),
            Operator::GreaterOrEqual => write!(f, ">="),
            Operator::LesserOrEqual => write!(f, "<="),
            Operator::Contains => write!(f, "contains"),
        }
    }
}
