use std::ops::{Index, Range};

/// Byte range of a token or node within the template source.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub struct Region {
    /// First byte, inclusive.
    pub begin: usize,
    /// Last byte, exclusive.
    pub end: usize,
}

impl Region {
    /// Return true if one of the regions ends exactly where the other begins.
    ///
    /// Used to tell `-1` apart from `- 1`.
    pub fn is_adjacent(&self, other: Self) -> bool {
        self.end == other.begin || other.end == self.begin
    }

    /// Return the smallest [`Region`] covering both regions.
    pub fn combine(self, other: Self) -> Self {
        Self {
            begin: self.begin.min(other.begin),
            end: self.end.max(other.end),
        }
    }

    /// Return the text covered by the [`Region`], or an empty string when the
    /// region does not fit the source.
    pub fn literal<'source>(&self, source: &'source str) -> &'source str {
        source.get(self.begin..self.end).unwrap_or_default()
    }
}

impl Index<Region> for str {
    type Output = str;

    fn index(&self, region: Region) -> &Self::Output {
        &self[region.begin..region.end]
    }
}

impl From<Range<usize>> for Region {
    fn from(range: Range<usize>) -> Self {
        Self {
            begin: range.start,
            end: range.end,
        }
    }
}
