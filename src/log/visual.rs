mod pointer;

pub use pointer::Pointer;

use super::floor_boundary;
use std::fmt::{Debug, Formatter, Result};
use unicode_width::UnicodeWidthStr;

const BLANK: &str = "";
const PIPE: &str = "|";
const EQUAL: &str = "=";
const HIGHLIGHT: &str = "^";

/// A diagnostic drawing that can be attached to an error.
pub trait Visual: Debug + Send + Sync {
    /// Write the drawing to the formatter.
    ///
    /// The `help` text is included when present.
    fn display(&self, formatter: &mut Formatter<'_>, help: Option<&str>) -> Result;
}

/// Return the zero indexed line that holds the byte `offset`, the text of that
/// line and the display width of the text between the line start and `offset`.
fn line_at(source: &str, offset: usize) -> (usize, &str, usize) {
    let offset = floor_boundary(source, offset);
    let start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = source[offset..]
        .find('\n')
        .map_or(source.len(), |i| offset + i);
    let line = source[..start].matches('\n').count();

    (
        line,
        source[start..end].trim_end_matches('\r'),
        source[start..offset].width(),
    )
}
