use std::sync::LazyLock;

use regex::Regex;

static TASK_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([ xX])\](?:[ \t]+|$)").expect("valid task marker regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    Bullet(char),
    Ordered { start: u64, delim: char },
}

impl ListMarker {
    pub fn is_ordered(self) -> bool {
        matches!(self, ListMarker::Ordered { .. })
    }
}

/// The opening line of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemStart {
    pub marker: ListMarker,
    /// Spaces in front of the marker.
    pub indent: usize,
    /// Byte offset of the item's first content character.
    pub content_offset: usize,
    /// Column width of indent, marker and padding; continuation lines strip
    /// at most this much.
    pub content_indent: usize,
}

pub struct List;

impl List {
    pub const BULLETS: [char; 3] = ['-', '*', '+'];
    pub const ORDERED_DELIMS: [char; 2] = ['.', ')'];
    pub const MAX_ORDINAL_DIGITS: usize = 9;
    /// Minimum indent for a line to continue the current item.
    pub const CONTINUATION_INDENT: usize = 2;
    pub const BULLET: &'static str = "- ";
    pub const INDENT: &'static str = "  ";

    pub fn item_start(line: &str) -> Option<ItemStart> {
        let t = line.trim_start_matches(' ');
        let lead = line.len() - t.len();
        if lead > 3 {
            return None;
        }
        let first = t.chars().next()?;
        let (marker, marker_len) = if Self::BULLETS.contains(&first) {
            (ListMarker::Bullet(first), 1)
        } else {
            let digits = t.chars().take_while(char::is_ascii_digit).count();
            if digits == 0 || digits > Self::MAX_ORDINAL_DIGITS {
                return None;
            }
            let delim = t[digits..].chars().next()?;
            if !Self::ORDERED_DELIMS.contains(&delim) {
                return None;
            }
            let start = t[..digits].parse().ok()?;
            (ListMarker::Ordered { start, delim }, digits + 1)
        };
        let after = &t[marker_len..];
        if !after.is_empty() && !after.starts_with([' ', '\t']) {
            return None;
        }
        let content = after.trim_start_matches([' ', '\t']);
        let padding = (after.len() - content.len()).max(1);
        Some(ItemStart {
            marker,
            indent: lead,
            content_offset: line.len() - content.len(),
            content_indent: lead + marker_len + padding,
        })
    }

    pub const TASK_OPEN: &'static str = "[ ] ";
    pub const TASK_DONE: &'static str = "[x] ";

    /// A `[ ]` / `[x]` marker opening a list item's text: returns whether it
    /// is checked and how many bytes it spans, trailing blanks included.
    pub fn task_marker(text: &str) -> Option<(bool, usize)> {
        let caps = TASK_MARKER.captures(text)?;
        let checked = caps.get(1)?.as_str() != " ";
        Some((checked, caps.get(0)?.end()))
    }

    /// Whether an item start may interrupt a running paragraph.
    ///
    /// Ordered items only interrupt when they start at 1, so prose such as
    /// `2024. was a year` keeps flowing.
    pub fn interrupts_paragraph(start: &ItemStart) -> bool {
        match start.marker {
            ListMarker::Bullet(_) => true,
            ListMarker::Ordered { start, .. } => start == 1,
        }
    }
}

/// Removes up to `columns` of leading whitespace. Tabs count as four columns.
pub fn strip_indent(line: &str, columns: usize) -> &str {
    let mut seen = 0;
    for (i, c) in line.char_indices() {
        if seen >= columns {
            return &line[i..];
        }
        match c {
            ' ' => seen += 1,
            '\t' => seen += 4,
            _ => return &line[i..],
        }
    }
    ""
}

/// Leading whitespace width in columns.
pub fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullet_items() {
        let item = List::item_start("- task").unwrap();
        assert_eq!(item.marker, ListMarker::Bullet('-'));
        assert_eq!(item.content_offset, 2);
        assert_eq!(item.content_indent, 2);
        assert!(List::item_start("-").is_some());
    }

    #[test]
    fn ordered_items() {
        let item = List::item_start("12. twelve").unwrap();
        assert_eq!(
            item.marker,
            ListMarker::Ordered {
                start: 12,
                delim: '.'
            }
        );
        assert_eq!(&"12. twelve"[item.content_offset..], "twelve");
        assert_eq!(item.content_indent, 4);
    }

    #[test]
    fn delimiters_glued_to_text_are_not_items() {
        assert!(List::item_start("--strike--").is_none());
        assert!(List::item_start("**bold**").is_none());
        assert!(List::item_start("++ins++").is_none());
        assert!(List::item_start("3.14").is_none());
    }

    #[test]
    fn only_first_ordinal_interrupts() {
        let one = List::item_start("1. a").unwrap();
        let year = List::item_start("2024. a").unwrap();
        assert!(List::interrupts_paragraph(&one));
        assert!(!List::interrupts_paragraph(&year));
    }

    #[test]
    fn task_markers() {
        assert_eq!(List::task_marker("[ ] todo"), Some((false, 4)));
        assert_eq!(List::task_marker("[X]  done"), Some((true, 5)));
        assert_eq!(List::task_marker("[x]"), Some((true, 3)));
        assert_eq!(List::task_marker("[x](link)"), None);
        assert_eq!(List::task_marker("[-] no"), None);
    }

    #[test]
    fn strip_indent_is_bounded() {
        assert_eq!(strip_indent("    code", 2), "  code");
        assert_eq!(strip_indent(" x", 2), "x");
        assert_eq!(strip_indent("\tx", 2), "x");
        assert_eq!(indent_width("\t  x"), 6);
    }
}
