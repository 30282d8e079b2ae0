use std::sync::LazyLock;

use regex::Regex;

use crate::parsing::inline::kinds::HtmlComment;

static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^ {0,3}</?(address|article|aside|blockquote|center|details|dialog|div|dl|fieldset|figcaption|figure|footer|form|h[1-6]|header|hr|iframe|li|main|nav|ol|p|pre|script|section|style|summary|table|tbody|td|tfoot|th|thead|tr|ul)(\s|/?>|$)",
    )
    .expect("valid html block regex")
});

pub struct HtmlBlock;

impl HtmlBlock {
    /// A raw HTML block starts with a known block-level tag.
    pub fn starts(line: &str) -> bool {
        BLOCK_TAG.is_match(line)
    }

    /// Where a comment opening on `first` ends, searching the joined lines.
    ///
    /// Returns the comment body when the comment closes at the end of one of
    /// the lines; a comment followed by text on its closing line is inline.
    pub fn comment_body(lines: &[&str]) -> Option<(String, usize)> {
        let first = lines.first()?.trim_start();
        let body_start = first.strip_prefix(HtmlComment::OPEN)?;
        let mut joined = body_start.to_string();
        for (idx, line) in lines.iter().enumerate() {
            if idx > 0 {
                joined.push('\n');
                joined.push_str(line);
            }
            if let Some(end) = joined.find(HtmlComment::CLOSE) {
                let after = &joined[end + HtmlComment::CLOSE.len()..];
                if !after.trim().is_empty() {
                    return None;
                }
                return Some((joined[..end].to_string(), idx + 1));
            }
        }
        None
    }
}
