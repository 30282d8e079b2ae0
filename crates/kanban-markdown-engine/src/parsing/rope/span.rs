/// Byte range `[start, end)` of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// The smallest span covering both `self` and `other`.
    #[must_use]
    pub fn join(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The covered text, or `None` when the span falls outside `src` or
    /// splits a character.
    pub fn slice(self, src: &str) -> Option<&str> {
        src.get(self.start..self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_covers_both() {
        let a = Span { start: 4, end: 9 };
        let b = Span { start: 0, end: 2 };
        assert_eq!(a.join(b), Span { start: 0, end: 9 });
    }

    #[test]
    fn test_slice_checks_bounds() {
        assert_eq!(Span { start: 2, end: 4 }.slice("# ab"), Some("ab"));
        assert_eq!(Span { start: 2, end: 9 }.slice("# ab"), None);
        assert_eq!(Span { start: 1, end: 2 }.slice("é"), None);
    }
}
