pub struct ThematicBreak;

impl ThematicBreak {
    pub const CHARS: [char; 3] = ['-', '*', '_'];
    pub const CANONICAL: &'static str = "---";

    /// Three or more of the same break character, optionally spaced.
    pub fn matches(line: &str) -> bool {
        let t = line.trim();
        let Some(first) = t.chars().next() else {
            return false;
        };
        if !Self::CHARS.contains(&first) {
            return false;
        }
        let mut count = 0;
        for c in t.chars() {
            if c == first {
                count += 1;
            } else if c != ' ' && c != '\t' {
                return false;
            }
        }
        count >= 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_breaks() {
        assert!(ThematicBreak::matches("---"));
        assert!(ThematicBreak::matches("* * *"));
        assert!(ThematicBreak::matches("_____"));
    }

    #[test]
    fn column_markers_are_not_breaks() {
        assert!(!ThematicBreak::matches("---:"));
        assert!(!ThematicBreak::matches(":---"));
        assert!(!ThematicBreak::matches("--"));
        assert!(!ThematicBreak::matches("-*-"));
    }
}
