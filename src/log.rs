mod message;
mod visual;

pub use message::*;
pub use visual::{Pointer, Visual};

pub(crate) const RED: &str = "\x1B[31m";
pub(crate) const YELLOW: &str = "\x1b[33m";
pub(crate) const RESET: &str = "\x1B[0m";

/// Return the 1-indexed line and column of the byte `offset` within `source`.
///
/// The line increments on every `\n` before the offset, and the column counts
/// the characters between the last newline and the offset.
pub fn locate(source: &str, offset: usize) -> (usize, usize) {
    let offset = floor_boundary(source, offset);
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;

    (line, column)
}

/// Clamp the offset into `source` and move it back to a character boundary.
pub(crate) fn floor_boundary(source: &str, offset: usize) -> usize {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::locate;

    #[test]
    fn test_locate_first_line() {
        assert_eq!(locate("hello {{ name", 6), (1, 7));
    }

    #[test]
    fn test_locate_after_newlines() {
        let source = "one\ntwo\n  {{ three";
        assert_eq!(locate(source, 10), (3, 3));
    }

    #[test]
    fn test_locate_end_of_input() {
        assert_eq!(locate("ab\n", 3), (2, 1));
        assert_eq!(locate("ab", 99), (1, 3));
    }
}
