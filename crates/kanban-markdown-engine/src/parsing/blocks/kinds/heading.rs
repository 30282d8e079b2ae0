pub struct Heading;

impl Heading {
    pub const MARKER: char = '#';
    pub const MAX_LEVEL: usize = 6;

    /// Parses an ATX heading into its level and trimmed text.
    ///
    /// A marker must be followed by whitespace or end the line, so `#todo`
    /// stays available to the tag rule.
    pub fn parse(line: &str) -> Option<(u8, &str)> {
        let t = line.trim_start_matches(' ');
        if line.len() - t.len() > 3 {
            return None;
        }
        let level = t.chars().take_while(|&c| c == Self::MARKER).count();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }
        let rest = &t[level..];
        if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
            return None;
        }
        Some((level as u8, rest.trim()))
    }

    pub fn marker(level: u64) -> String {
        Self::MARKER
            .to_string()
            .repeat(level.clamp(1, Self::MAX_LEVEL as u64) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels() {
        assert_eq!(Heading::parse("# Title"), Some((1, "Title")));
        assert_eq!(Heading::parse("### Deep  "), Some((3, "Deep")));
        assert_eq!(Heading::parse("##"), Some((2, "")));
    }

    #[test]
    fn rejects_tags_and_overlong_markers() {
        assert_eq!(Heading::parse("#todo"), None);
        assert_eq!(Heading::parse("####### seven"), None);
    }

    #[test]
    fn marker_is_clamped() {
        assert_eq!(Heading::marker(0), "#");
        assert_eq!(Heading::marker(9), "######");
    }
}
