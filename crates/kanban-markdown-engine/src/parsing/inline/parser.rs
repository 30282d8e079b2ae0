use crate::options::DialectOptions;
use crate::parsing::token::{Token, TokenKind};

use super::{
    cursor::Cursor,
    kinds::{
        Abbr, AtTag, CodeSpan, Delimiter, FootnoteRef, HtmlComment, HtmlTag, Include, Link, Media,
        WikiLink, at_tag, hash_tag, temporal_tag,
    },
};

/// A rule either claims input at the cursor, returning tokens and leaving the
/// cursor after what it consumed, or declines and leaves the cursor alone.
type InlineRule = fn(&mut Cursor<'_>, &DialectOptions) -> Option<Vec<Token>>;

/// Rules in precedence order. Code spans come first so they act as raw zones.
const RULES: &[InlineRule] = &[
    try_parse_hard_break,
    try_parse_code_span,
    try_parse_html_comment,
    try_parse_abbr,
    try_parse_html_tag,
    try_parse_include,
    try_parse_media,
    try_parse_wikilink,
    try_parse_footnote_ref,
    try_parse_link,
    try_parse_temporal_tag,
    try_parse_hash_tag,
    try_parse_at_tag,
    try_parse_delimited,
];

/// Parses inline content into a flat token list.
///
/// Marks come out as `Open` / children / `Close` sequences; everything the
/// rules decline stays text. Backslash escapes are kept verbatim in the text
/// so serialization reproduces them.
pub fn parse_inline(s: &str, options: &DialectOptions) -> Vec<Token> {
    let mut cur = Cursor::new(s);
    let mut out = vec![];
    let mut text_start = 0;

    fn flush_text(out: &mut Vec<Token>, text: &str) {
        if !text.is_empty() {
            out.push(Token::text(text));
        }
    }

    'scan: while !cur.eof() {
        let start = cur.i;
        for rule in RULES {
            if let Some(tokens) = rule(&mut cur, options) {
                flush_text(&mut out, &s[text_start..start]);
                out.extend(tokens);
                text_start = cur.i;
                continue 'scan;
            }
        }
        match cur.bump() {
            Some('\\') if cur.peek().is_some_and(|c| c.is_ascii_punctuation()) => {
                cur.bump();
            }
            Some(c) if Delimiter::CHARS.contains(&c) => {
                // A declined run is text as a whole; its tail must not open.
                cur.bump_n(cur.run_len(c) * c.len_utf8());
            }
            _ => {}
        }
    }

    flush_text(&mut out, &s[text_start..]);
    out
}

fn try_parse_hard_break(cur: &mut Cursor<'_>, _: &DialectOptions) -> Option<Vec<Token>> {
    if !cur.starts_with("\\\n") {
        return None;
    }
    cur.bump_n(2);
    Some(vec![Token::leaf(TokenKind::HardBreak, "br").with_markup("\\")])
}

/// Finds a closing backtick run of exactly `run` ticks in `s`.
fn find_tick_run(s: &str, run: usize) -> Option<usize> {
    let mut i = 0;
    while i < s.len() {
        let rest = &s[i..];
        let n = rest.chars().take_while(|&c| c == CodeSpan::TICK).count();
        if n == run {
            return Some(i);
        }
        if n > 0 {
            i += n;
        } else {
            i += rest.chars().next().map_or(1, char::len_utf8);
        }
    }
    None
}

fn try_parse_code_span(cur: &mut Cursor<'_>, _: &DialectOptions) -> Option<Vec<Token>> {
    if cur.peek() != Some(CodeSpan::TICK) {
        return None;
    }
    let run = cur.run_len(CodeSpan::TICK);
    let rest = &cur.rest()[run..];
    let Some(end) = find_tick_run(rest, run) else {
        // An unmatched run is literal; skip it whole so its tail cannot open.
        let token = Token::text(&cur.rest()[..run]);
        cur.bump_n(run);
        return Some(vec![token]);
    };
    let inner = CodeSpan::unpad(&rest[..end]);
    let token = Token::leaf(TokenKind::CodeInline, "code")
        .with_content(inner)
        .with_markup(&cur.rest()[..run]);
    cur.bump_n(run + end + run);
    Some(vec![token])
}

fn try_parse_html_comment(cur: &mut Cursor<'_>, _: &DialectOptions) -> Option<Vec<Token>> {
    let rest = cur.rest().strip_prefix(HtmlComment::OPEN)?;
    let end = rest.find(HtmlComment::CLOSE)?;
    let token = Token::leaf(TokenKind::HtmlCommentInline, "").with_content(&rest[..end]);
    cur.bump_n(HtmlComment::OPEN.len() + end + HtmlComment::CLOSE.len());
    Some(vec![token])
}

fn try_parse_abbr(cur: &mut Cursor<'_>, options: &DialectOptions) -> Option<Vec<Token>> {
    let (title, open_len) = Abbr::open(cur.rest())?;
    let body = &cur.rest()[open_len..];
    // An empty abbr is left to the raw tag rule.
    let end = body.find(Abbr::CLOSE).filter(|end| *end > 0)?;
    let mut tokens = vec![Token::open(TokenKind::Abbr, "abbr").with_attr("title", title)];
    tokens.extend(parse_inline(&body[..end], options));
    tokens.push(Token::close(TokenKind::Abbr, "abbr"));
    cur.bump_n(open_len + end + Abbr::CLOSE.len());
    Some(tokens)
}

fn try_parse_html_tag(cur: &mut Cursor<'_>, _: &DialectOptions) -> Option<Vec<Token>> {
    if cur.peek() != Some('<') {
        return None;
    }
    let len = HtmlTag::len(cur.rest())?;
    let token = Token::leaf(TokenKind::HtmlInline, "").with_content(&cur.rest()[..len]);
    cur.bump_n(len);
    Some(vec![token])
}

fn try_parse_include(cur: &mut Cursor<'_>, _: &DialectOptions) -> Option<Vec<Token>> {
    let (path, len) = Include::parse(cur.rest())?;
    let token = Token::leaf(TokenKind::IncludeInline, "").with_attr("path", path);
    cur.bump_n(len);
    Some(vec![token])
}

fn try_parse_media(cur: &mut Cursor<'_>, _: &DialectOptions) -> Option<Vec<Token>> {
    if !cur.starts_with(Media::OPEN) {
        return None;
    }
    let label = &cur.rest()[1..];
    let label_end = Link::label_end(label)?;
    let target = Link::target(&label[label_end + 1..])?;
    let alt = &label[1..label_end];
    let mut token = Token::leaf(TokenKind::Media, "img")
        .with_attr("src", target.href.as_str())
        .with_attr("alt", alt)
        .with_attr("kind", Media::kind(&target.href));
    if let Some(title) = target.title {
        token = token.with_attr("title", title);
    }
    cur.bump_n(1 + label_end + 1 + target.len);
    Some(vec![token])
}

/// Parses `[[target]]` or `[[target|title]]`; the closer must be on the same line.
fn try_parse_wikilink(cur: &mut Cursor<'_>, _: &DialectOptions) -> Option<Vec<Token>> {
    let rest = cur.rest().strip_prefix(WikiLink::OPEN)?;
    let line = rest.split('\n').next().unwrap_or(rest);
    let end = line.find(WikiLink::CLOSE)?;
    let inner = &line[..end];
    let (document, title) = match inner.split_once(WikiLink::ALIAS) {
        Some((document, title)) => (document.trim(), title.trim()),
        None => (inner.trim(), inner.trim()),
    };
    if document.is_empty() {
        return None;
    }
    let token = Token::leaf(TokenKind::WikiLink, "")
        .with_attr("document", document)
        .with_attr("title", if title.is_empty() { document } else { title });
    cur.bump_n(WikiLink::OPEN.len() + end + WikiLink::CLOSE.len());
    Some(vec![token])
}

fn try_parse_footnote_ref(cur: &mut Cursor<'_>, _: &DialectOptions) -> Option<Vec<Token>> {
    let (id, len) = FootnoteRef::parse(cur.rest())?;
    let token = Token::leaf(TokenKind::FootnoteRef, "sup").with_attr("id", id);
    cur.bump_n(len);
    Some(vec![token])
}

fn try_parse_link(cur: &mut Cursor<'_>, options: &DialectOptions) -> Option<Vec<Token>> {
    if cur.peek() != Some(Link::OPEN) {
        return None;
    }
    let rest = cur.rest();
    let label_end = Link::label_end(rest)?;
    let target = Link::target(&rest[label_end + 1..])?;
    let label = &rest[1..label_end];
    if label.is_empty() {
        return None;
    }
    let mut open = Token::open(TokenKind::Link, "a").with_attr("href", target.href.as_str());
    if let Some(title) = &target.title {
        open = open.with_attr("title", title.as_str());
    }
    let mut tokens = vec![open];
    tokens.extend(parse_inline(label, options));
    tokens.push(Token::close(TokenKind::Link, "a"));
    cur.bump_n(label_end + 1 + target.len);
    Some(tokens)
}

/// Common shape of the three tag families: a prefix at a word start, then a
/// value matched by `matcher`.
fn try_parse_prefixed<'a, T>(
    cur: &mut Cursor<'a>,
    prefix: char,
    matcher: impl Fn(&'a str) -> Option<(&'a str, T)>,
) -> Option<(&'a str, T)> {
    if cur.peek() != Some(prefix) || !cur.at_word_start() {
        return None;
    }
    let rest = &cur.rest()[prefix.len_utf8()..];
    let (value, extra) = matcher(rest)?;
    cur.bump_n(prefix.len_utf8() + value.len());
    Some((value, extra))
}

fn try_parse_temporal_tag(cur: &mut Cursor<'_>, options: &DialectOptions) -> Option<Vec<Token>> {
    let (value, kind) = try_parse_prefixed(cur, options.temporal_prefix, temporal_tag)?;
    Some(vec![
        Token::leaf(TokenKind::TemporalTag, "")
            .with_attr("value", value)
            .with_attr("kind", kind),
    ])
}

fn try_parse_hash_tag(cur: &mut Cursor<'_>, options: &DialectOptions) -> Option<Vec<Token>> {
    let (value, flavor) = try_parse_prefixed(cur, options.tag_prefix, hash_tag)?;
    Some(vec![
        Token::leaf(TokenKind::Tag, "")
            .with_attr("value", value)
            .with_attr("flavor", flavor),
    ])
}

fn try_parse_at_tag(cur: &mut Cursor<'_>, options: &DialectOptions) -> Option<Vec<Token>> {
    let (value, shape) = try_parse_prefixed(cur, options.person_prefix, at_tag)?;
    let token = match shape {
        AtTag::Date(flavor) => Token::leaf(TokenKind::DateTag, "").with_attr("flavor", flavor),
        AtTag::Person => Token::leaf(TokenKind::PersonTag, "").with_attr("flavor", "person"),
    };
    Some(vec![token.with_attr("value", value)])
}

/// Finds where a delimiter run opened with `run` chars of `c` closes.
///
/// Returns the byte range of the closing delimiter within `s`. Runs that can
/// only open push onto a local stack so inner marks of the same character
/// close before the outer one is considered.
fn find_closer(s: &str, c: char, run: usize) -> Option<(usize, usize)> {
    let mut inner_open: Vec<usize> = vec![];
    let mut i = 0;
    while i < s.len() {
        let rest = &s[i..];
        let ch = rest.chars().next()?;
        if ch == '\\' {
            i += 1 + rest[1..].chars().next().map_or(0, char::len_utf8);
            continue;
        }
        if ch == CodeSpan::TICK {
            let ticks = rest.chars().take_while(|&x| x == CodeSpan::TICK).count();
            i += match find_tick_run(&rest[ticks..], ticks) {
                Some(end) => ticks + end + ticks,
                None => ticks,
            };
            continue;
        }
        if ch == '\n' && Delimiter::is_single_line(c) {
            return None;
        }
        if ch != c {
            i += ch.len_utf8();
            continue;
        }

        let len = rest.chars().take_while(|&x| x == c).count();
        let end = i + len * c.len_utf8();
        let prev = s[..i].chars().next_back();
        let next = s[end..].chars().next();
        let can_close = i > 0
            && prev.is_some_and(|p| !p.is_whitespace())
            && !(Delimiter::is_word_bound(c) && next.is_some_and(char::is_alphanumeric));
        let can_open = next.is_some_and(|n| !n.is_whitespace());

        if can_close {
            let available = match inner_open.pop() {
                Some(inner) => len.saturating_sub(inner),
                None => len,
            };
            let fits = if Delimiter::closes_with_surplus(c) {
                available >= run
            } else {
                available == run
            };
            if fits {
                return Some((end - run * c.len_utf8(), end));
            }
        } else if can_open {
            inner_open.push(len);
        }
        i = end;
    }
    None
}

fn try_parse_delimited(cur: &mut Cursor<'_>, options: &DialectOptions) -> Option<Vec<Token>> {
    let c = cur.peek()?;
    if !Delimiter::CHARS.contains(&c) {
        return None;
    }
    let run = cur.run_len(c);
    let marks = Delimiter::marks(c, run);
    if marks.is_empty() {
        return None;
    }
    let open_len = run * c.len_utf8();
    let after = cur.rest()[open_len..].chars().next();
    if after.is_none_or(char::is_whitespace) {
        return None;
    }
    if Delimiter::is_word_bound(c) && cur.prev().is_some_and(char::is_alphanumeric) {
        return None;
    }

    let body = &cur.rest()[open_len..];
    let (close_start, close_end) = find_closer(body, c, run)?;

    let mut tokens = Vec::with_capacity(marks.len() * 2 + 1);
    for mark in marks {
        tokens.push(Token::open(mark.kind, mark.tag).with_markup(mark.markup));
    }
    tokens.extend(parse_inline(&body[..close_start], options));
    for mark in marks.iter().rev() {
        tokens.push(Token::close(mark.kind, mark.tag).with_markup(mark.markup));
    }
    cur.bump_n(open_len + close_end);
    Some(tokens)
}
