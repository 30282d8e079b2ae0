/// A cursor over inline source, stepping by chars.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being parsed.
    pub s: &'a str,
    /// Current byte index into `s`; always on a char boundary.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    pub fn rest(&self) -> &'a str {
        &self.s[self.i.min(self.s.len())..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// The char immediately before the cursor.
    pub fn prev(&self) -> Option<char> {
        self.s[..self.i.min(self.s.len())].chars().next_back()
    }

    pub fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.i += c.len_utf8();
        Some(c)
    }

    /// Advances by `n` bytes; callers pass lengths of text they matched.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Length of the run of `c` starting at the cursor.
    pub fn run_len(&self, c: char) -> usize {
        self.rest().chars().take_while(|&x| x == c).count()
    }

    /// True at the start of input or right after whitespace.
    pub fn at_word_start(&self) -> bool {
        self.prev().is_none_or(char::is_whitespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("héllo");
        assert_eq!(cur.peek(), Some('h'));
        assert_eq!(cur.bump(), Some('h'));
        assert_eq!(cur.bump(), Some('é'));
        assert_eq!(cur.i, 3);
        assert_eq!(cur.prev(), Some('é'));
        assert_eq!(cur.rest(), "llo");
    }

    #[test]
    fn word_start() {
        let mut cur = Cursor::new("a #b");
        assert!(cur.at_word_start());
        cur.bump();
        assert!(!cur.at_word_start());
        cur.bump();
        assert!(cur.at_word_start());
    }

    #[test]
    fn runs() {
        let cur = Cursor::new("***x");
        assert_eq!(cur.run_len('*'), 3);
        assert_eq!(cur.run_len('_'), 0);
    }

    #[test]
    fn bump_at_eof_returns_none() {
        let mut cur = Cursor::new("x");
        assert_eq!(cur.bump(), Some('x'));
        assert!(cur.eof());
        assert_eq!(cur.bump(), None);
        assert_eq!(cur.peek(), None);
    }
}
