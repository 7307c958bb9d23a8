//! Source location spans.

use std::fmt;

/// Source location of a token or node.
///
/// `start`/`end` are byte offsets (end exclusive); `line` is the 1-based
/// source line the host reports errors against.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
    pub line: u32,
}

impl Span {
    /// Dummy span for synthesized nodes.
    pub const DUMMY: Span = Span {
        start: 0,
        end: 0,
        line: 0,
    };

    #[inline]
    pub const fn new(start: u32, end: u32, line: u32) -> Self {
        Span { start, end, line }
    }

    /// Span covering only a source line, for hosts without byte offsets.
    #[inline]
    pub const fn at_line(line: u32) -> Self {
        Span {
            start: 0,
            end: 0,
            line,
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}@{}", self.start, self.end, self.line)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}]", self.line)
    }
}
