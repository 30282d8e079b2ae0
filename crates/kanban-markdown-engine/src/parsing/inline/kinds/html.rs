use std::sync::LazyLock;

use regex::Regex;

pub struct HtmlComment;

impl HtmlComment {
    pub const OPEN: &'static str = "<!--";
    pub const CLOSE: &'static str = "-->";

    pub fn render(raw: &str) -> String {
        format!("{}{raw}{}", Self::OPEN, Self::CLOSE)
    }
}

static ABBR_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^<abbr\s+title="([^"]*)"\s*>"#).expect("valid abbr regex")
});

static INLINE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^</?[A-Za-z][A-Za-z0-9-]*(?:\s+[^<>]*)?/?>"#).expect("valid inline tag regex")
});

pub struct Abbr;

impl Abbr {
    pub const CLOSE: &'static str = "</abbr>";

    /// Matches `<abbr title="...">` and returns the decoded title and the
    /// opening tag length.
    pub fn open(s: &str) -> Option<(String, usize)> {
        let caps = ABBR_OPEN.captures(s)?;
        let title = html_escape::decode_html_entities(caps.get(1)?.as_str()).into_owned();
        Some((title, caps.get(0)?.end()))
    }

    pub fn render_open(title: &str) -> String {
        format!(
            r#"<abbr title="{}">"#,
            html_escape::encode_double_quoted_attribute(title)
        )
    }
}

pub struct HtmlTag;

impl HtmlTag {
    /// Length of a single inline open/close tag at the start of `s`.
    pub fn len(s: &str) -> Option<usize> {
        INLINE_TAG.find(s).map(|m| m.end())
    }
}
