/// Location of a token or node in the source text.
///
/// `start` and `end` are character offsets (not byte offsets), which is what
/// the diagnostic renderer labels against. `line` and `column` are 1-based and
/// point at `start`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

pub type Spanned<T> = (Span, T);

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Smallest span covering both `self` and `other`, positioned at whichever
    /// starts first.
    pub fn to(self, other: Span) -> Span {
        let first = if self.start <= other.start {
            self
        } else {
            other
        };
        Span {
            start: first.start,
            end: self.end.max(other.end),
            line: first.line,
            column: first.column,
        }
    }
}
