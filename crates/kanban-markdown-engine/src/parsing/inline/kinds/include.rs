pub struct Include;

impl Include {
    pub const OPEN: &'static str = "!!!include(";
    pub const CLOSE: &'static str = ")!!!";

    /// Parses an include at the start of `s`, returning the path and the
    /// number of bytes consumed.
    pub fn parse(s: &str) -> Option<(&str, usize)> {
        let rest = s.strip_prefix(Self::OPEN)?;
        let end = rest.find(Self::CLOSE)?;
        let path = &rest[..end];
        if path.trim().is_empty() || path.contains('\n') {
            return None;
        }
        Some((path, Self::OPEN.len() + end + Self::CLOSE.len()))
    }

    /// A line that consists of exactly one include.
    pub fn parse_line(line: &str) -> Option<&str> {
        let t = line.trim();
        Self::parse(t).and_then(|(path, used)| (used == t.len()).then_some(path))
    }

    pub fn render(path: &str) -> String {
        format!("{}{path}{}", Self::OPEN, Self::CLOSE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_and_line_forms() {
        assert_eq!(Include::parse("!!!include(a.md)!!! rest"), Some(("a.md", 19)));
        assert_eq!(Include::parse_line("  !!!include(a.md)!!!  "), Some("a.md"));
        assert_eq!(Include::parse_line("!!!include(a.md)!!! rest"), None);
        assert_eq!(Include::parse("!!!include()!!!"), None);
        assert_eq!(Include::parse("!!!include(a.md"), None);
    }
}
