use super::{
    super::{RESET, YELLOW},
    line_at, Visual, BLANK, EQUAL, HIGHLIGHT, PIPE,
};
use crate::region::Region;
use std::fmt::{Formatter, Result};
use unicode_width::UnicodeWidthStr;

/// Underlines a [`Region`] of the source text, below the line that holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct Pointer {
    /// Zero indexed line of the region.
    line: usize,
    /// Zero indexed display column of the region.
    column: usize,
    /// Display width of the underline, at least one.
    length: usize,
    /// The full line of source text.
    text: String,
}

impl Pointer {
    /// Create a new [`Pointer`] at the region of the source text.
    ///
    /// A region that spans lines is underlined to the end of its first line.
    pub fn new(source: &str, region: Region) -> Self {
        let (line, text, column) = line_at(source, region.begin);
        let highlighted = region.literal(source);
        let first = highlighted.split('\n').next().unwrap_or_default();

        Self {
            line,
            column,
            length: first.width().max(1),
            text: text.to_owned(),
        }
    }
}

impl Visual for Pointer {
    fn display(&self, formatter: &mut Formatter<'_>, help: Option<&str>) -> Result {
        let number = (self.line + 1).to_string();
        let pad = number.width();
        let underline = HIGHLIGHT.repeat(self.length);
        let trail = "-".repeat(3_usize.saturating_sub(self.length));
        let indent = self.column;

        writeln!(formatter)?;
        writeln!(formatter, " {BLANK:pad$}--> {number}:{}", self.column + 1)?;
        writeln!(formatter, " {BLANK:pad$} {PIPE}")?;
        writeln!(formatter, " {number} {PIPE} {}", self.text)?;
        writeln!(
            formatter,
            " {BLANK:pad$} {PIPE} {BLANK:indent$}{YELLOW}{underline}{RESET}{trail}"
        )?;
        writeln!(formatter, " {BLANK:pad$} {PIPE}")?;

        if let Some(help) = help {
            writeln!(formatter, " {BLANK:pad$} {EQUAL} help: {help}")?;
        }

        Ok(())
    }
}
