/// Destination and optional title of a link or media reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub href: String,
    pub title: Option<String>,
    /// Bytes consumed, parentheses included.
    pub len: usize,
}

pub struct Link;

impl Link {
    pub const OPEN: char = '[';
    pub const CLOSE: char = ']';
    pub const TARGET_OPEN: char = '(';
    pub const TARGET_CLOSE: char = ')';
    pub const TITLE_QUOTE: char = '"';

    /// Byte index of the `]` matching a `[` at the start of `s`.
    ///
    /// Nested brackets balance; escaped brackets and code spans are skipped.
    pub fn label_end(s: &str) -> Option<usize> {
        let mut depth = 0usize;
        let mut chars = s.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    chars.next();
                }
                '`' => {
                    let run = 1 + s[i + 1..].chars().take_while(|&x| x == '`').count();
                    let fence = "`".repeat(run);
                    let after = i + run;
                    match s[after..].find(&fence) {
                        Some(end) => {
                            let skip_to = after + end + run;
                            while chars.peek().is_some_and(|(j, _)| *j < skip_to) {
                                chars.next();
                            }
                        }
                        None => {
                            while chars.peek().is_some_and(|(j, _)| *j < after) {
                                chars.next();
                            }
                        }
                    }
                }
                '[' => depth += 1,
                ']' => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                '\n' if depth == 0 => return None,
                _ => {}
            }
        }
        None
    }

    /// Parses `(href "title")` at the start of `s`.
    pub fn target(s: &str) -> Option<LinkTarget> {
        let inner = s.strip_prefix(Self::TARGET_OPEN)?;
        let body = inner.trim_start_matches([' ', '\t']);
        let mut pos = inner.len() - body.len();

        let href = if let Some(rest) = body.strip_prefix('<') {
            let end = rest.find(['>', '\n'])?;
            if !rest[end..].starts_with('>') {
                return None;
            }
            pos += end + 2;
            rest[..end].to_string()
        } else {
            let mut depth = 0usize;
            let mut end = body.len();
            for (i, c) in body.char_indices() {
                match c {
                    '(' => depth += 1,
                    ')' if depth == 0 => {
                        end = i;
                        break;
                    }
                    ')' => depth -= 1,
                    c if c.is_whitespace() => {
                        end = i;
                        break;
                    }
                    _ => {}
                }
            }
            pos += end;
            body[..end].to_string()
        };

        let rest = &inner[pos..];
        let after_ws = rest.trim_start_matches([' ', '\t']);
        pos += rest.len() - after_ws.len();

        let mut title = None;
        if let Some(quoted) = after_ws.strip_prefix(Self::TITLE_QUOTE) {
            let end = quoted.find(Self::TITLE_QUOTE)?;
            title = Some(quoted[..end].to_string());
            pos += end + 2;
            let rest = &inner[pos..];
            let after_ws = rest.trim_start_matches([' ', '\t']);
            pos += rest.len() - after_ws.len();
        }

        if !inner[pos..].starts_with(Self::TARGET_CLOSE) {
            return None;
        }
        Some(LinkTarget {
            href,
            title,
            len: 1 + pos + 1,
        })
    }

    pub fn render_target(href: &str, title: Option<&str>) -> String {
        let href = if href.contains(char::is_whitespace) {
            format!("<{href}>")
        } else {
            href.to_string()
        };
        match title {
            Some(t) if !t.is_empty() => format!("({href} \"{t}\")"),
            _ => format!("({href})"),
        }
    }
}

pub struct Media;

impl Media {
    pub const OPEN: &'static str = "![";
    pub const VIDEO: [&'static str; 5] = ["mp4", "webm", "mov", "ogv", "m4v"];
    pub const AUDIO: [&'static str; 6] = ["mp3", "wav", "ogg", "m4a", "flac", "aac"];

    /// `image`, `audio` or `video`, judged by the source's extension.
    pub fn kind(src: &str) -> &'static str {
        let path = src.split(['?', '#']).next().unwrap_or(src);
        let ext = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if Self::VIDEO.contains(&ext.as_str()) {
            "video"
        } else if Self::AUDIO.contains(&ext.as_str()) {
            "audio"
        } else {
            "image"
        }
    }

    pub fn render(alt: &str, src: &str, title: Option<&str>) -> String {
        format!("![{alt}]{}", Link::render_target(src, title))
    }
}

pub struct FootnoteRef;

impl FootnoteRef {
    pub const OPEN: &'static str = "[^";
    pub const CLOSE: char = ']';

    /// Parses `[^id]`, returning the id and bytes consumed.
    pub fn parse(s: &str) -> Option<(&str, usize)> {
        let rest = s.strip_prefix(Self::OPEN)?;
        let end = rest.find(Self::CLOSE)?;
        let id = &rest[..end];
        if id.is_empty() || id.contains(char::is_whitespace) || id.contains('[') {
            return None;
        }
        Some((id, Self::OPEN.len() + end + 1))
    }

    pub fn render(id: &str) -> String {
        if id.is_empty() {
            String::new()
        } else {
            format!("{}{id}{}", Self::OPEN, Self::CLOSE)
        }
    }
}
