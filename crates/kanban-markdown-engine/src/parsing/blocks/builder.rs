use log::trace;

use crate::options::DialectOptions;
use crate::parsing::inline::{kinds::Include, parse_inline};
use crate::parsing::token::{Token, TokenKind, TokenMeta};

use super::{
    classify::LineClass,
    kinds::{
        BlockQuote, CodeFence, ColumnMarker, Container, FenceSig, Heading, HtmlBlock, ItemStart,
        List, ListMarker, Multicolumn, SpeakerNote, Table, ThematicBreak, strip_indent,
    },
    tokenize_blocks,
};

/// Phase 2 of block tokenizing: turns classified lines into block tokens.
///
/// Container bodies (quotes, list items, columns, containers) are collected
/// with their prefixes stripped and tokenized again from scratch.
pub struct BlockBuilder<'o> {
    lines: Vec<LineClass>,
    pos: usize,
    out: Vec<Token>,
    options: &'o DialectOptions,
}

/// Tracks whether a scan is inside fenced code, where no markers count.
fn track_fence(fence: &mut Option<FenceSig>, line: &LineClass) {
    match fence {
        Some(open) => {
            if CodeFence::closes(open, line.fence_sig.as_ref()) {
                *fence = None;
            }
        }
        None => *fence = line.fence_sig.clone(),
    }
}

impl<'o> BlockBuilder<'o> {
    pub fn new(lines: Vec<LineClass>, options: &'o DialectOptions) -> Self {
        Self {
            lines,
            pos: 0,
            out: vec![],
            options,
        }
    }

    /// Block rules in precedence order. A rule either claims lines at `pos`,
    /// emitting tokens and advancing, or declines without touching the
    /// builder. Paragraphs catch whatever none of them claim.
    const RULES: [fn(&mut Self) -> bool; 12] = [
        Self::try_fence,
        Self::try_multicolumn,
        Self::try_container,
        Self::try_speaker_note,
        Self::try_comment_block,
        Self::try_include,
        Self::try_heading,
        Self::try_thematic_break,
        Self::try_blockquote,
        Self::try_list,
        Self::try_table,
        Self::try_html_block,
    ];

    pub fn run(mut self) -> Vec<Token> {
        'lines: while self.pos < self.lines.len() {
            if self.lines[self.pos].is_blank {
                self.pos += 1;
                continue;
            }
            let (start, first) = (self.pos, self.out.len());
            for rule in Self::RULES {
                if rule(&mut self) {
                    self.stamp(start, first);
                    continue 'lines;
                }
            }
            self.paragraph();
            self.stamp(start, first);
        }
        self.out
    }

    /// Records the lines `start..pos` as the span of the block whose first
    /// token sits at `first`.
    fn stamp(&mut self, start: usize, first: usize) {
        let end = self.pos.max(start + 1) - 1;
        let span = self.lines[start].line.join(self.lines[end].line);
        if let Some(token) = self.out.get_mut(first) {
            trace!("{:?} block at {}..{}", token.kind, span.start, span.end);
            token.span = Some(span);
        }
    }

    fn current(&self) -> &LineClass {
        &self.lines[self.pos]
    }

    fn nested(&self, body: &[String]) -> Vec<Token> {
        tokenize_blocks(&body.join("\n"), self.options)
    }

    fn inline(&self, content: &str) -> Token {
        Token::leaf(TokenKind::Inline, "")
            .with_content(content)
            .with_children(parse_inline(content, self.options))
    }

    fn push_paragraph(&mut self, content: &str) {
        let inline = self.inline(content);
        self.out.push(Token::open(TokenKind::Paragraph, "p"));
        self.out.push(inline);
        self.out.push(Token::close(TokenKind::Paragraph, "p"));
    }

    /// Whether `text` opens a block that ends a running paragraph.
    fn starts_block(&self, text: &str) -> bool {
        CodeFence::sig(text).is_some()
            || Heading::parse(text).is_some()
            || ThematicBreak::matches(text)
            || BlockQuote::strip_prefix(text).is_some()
            || List::item_start(text).is_some_and(|s| List::interrupts_paragraph(&s))
            || Multicolumn::marker(text).is_some()
            || Container::open(text).is_some()
            || Container::is_close(text)
            || SpeakerNote::strip_prefix(text).is_some()
            || Include::parse_line(text).is_some()
            || HtmlBlock::starts(text)
            || HtmlBlock::comment_body(&[text]).is_some()
    }

    fn try_fence(&mut self) -> bool {
        let Some(open) = self.current().fence_sig.clone() else {
            return false;
        };
        let indent = self.current().indent;
        let mut body = vec![];
        let mut i = self.pos + 1;
        let mut closed = false;
        while i < self.lines.len() {
            let line = &self.lines[i];
            if CodeFence::closes(&open, line.fence_sig.as_ref()) {
                closed = true;
                break;
            }
            body.push(strip_indent(&line.text, indent).to_string());
            i += 1;
        }
        trace!("fence `{}` with {} body lines, closed: {closed}", open.info, body.len());

        let mut content = body.join("\n");
        if !body.is_empty() {
            content.push('\n');
        }
        let markup = open.kind.char().to_string().repeat(open.len);
        self.out.push(
            Token::leaf(TokenKind::Fence, "code")
                .with_info(open.info)
                .with_markup(markup)
                .with_content(content),
        );
        self.pos = if closed { i + 1 } else { i };
        true
    }

    fn try_multicolumn(&mut self) -> bool {
        let Some(ColumnMarker::Start(growth)) = Multicolumn::marker(&self.current().text) else {
            return false;
        };
        let mut columns: Vec<(u32, Vec<String>)> = vec![(growth, vec![])];
        let mut depth = 0usize;
        let mut fence = None;
        let mut i = self.pos + 1;
        let mut closed = false;
        while i < self.lines.len() {
            let line = &self.lines[i];
            let marker = match fence {
                Some(_) => None,
                None => Multicolumn::marker(&line.text),
            };
            match marker {
                Some(ColumnMarker::End) if depth == 0 => {
                    closed = true;
                    break;
                }
                Some(ColumnMarker::Separator(g)) if depth == 0 => {
                    columns.push((g, vec![]));
                    i += 1;
                    continue;
                }
                Some(ColumnMarker::Start(_)) => depth += 1,
                Some(ColumnMarker::End) => depth -= 1,
                _ => {}
            }
            track_fence(&mut fence, line);
            if let Some((_, body)) = columns.last_mut() {
                body.push(line.text.clone());
            }
            i += 1;
        }
        if !closed {
            return false;
        }
        trace!("multicolumn with {} columns", columns.len());

        self.out.push(Token::open(TokenKind::Multicolumn, "div").with_markup(Multicolumn::START));
        for (growth, body) in &columns {
            let inner = self.nested(body);
            self.out.push(
                Token::open(TokenKind::MulticolumnColumn, "div").with_meta(TokenMeta::Growth(*growth)),
            );
            self.out.extend(inner);
            self.out.push(Token::close(TokenKind::MulticolumnColumn, "div"));
        }
        self.out.push(Token::close(TokenKind::Multicolumn, "div").with_markup(Multicolumn::END));
        self.pos = i + 1;
        true
    }

    fn try_container(&mut self) -> bool {
        let Some(kind) = Container::open(&self.current().text).map(str::to_string) else {
            return false;
        };
        let mut body = vec![];
        let mut depth = 0usize;
        let mut fence = None;
        let mut i = self.pos + 1;
        let mut closed = false;
        while i < self.lines.len() {
            let line = &self.lines[i];
            if fence.is_none() {
                if Container::is_close(&line.text) {
                    if depth == 0 {
                        closed = true;
                        break;
                    }
                    depth -= 1;
                } else if Container::open(&line.text).is_some() {
                    depth += 1;
                }
            }
            track_fence(&mut fence, line);
            body.push(line.text.clone());
            i += 1;
        }
        if !closed {
            return false;
        }

        let inner = self.nested(&body);
        self.out.push(
            Token::open(TokenKind::Container, "div")
                .with_info(kind)
                .with_markup(Container::FENCE),
        );
        self.out.extend(inner);
        self.out.push(Token::close(TokenKind::Container, "div").with_markup(Container::FENCE));
        self.pos = i + 1;
        true
    }

    fn try_speaker_note(&mut self) -> bool {
        let mut body = vec![];
        let mut i = self.pos;
        while i < self.lines.len()
            && let Some(rest) = SpeakerNote::strip_prefix(&self.lines[i].text)
        {
            body.push(rest.to_string());
            i += 1;
        }
        if body.is_empty() {
            return false;
        }
        self.out.push(
            Token::leaf(TokenKind::SpeakerNote, "aside")
                .with_markup(SpeakerNote::PREFIX)
                .with_content(body.join("\n")),
        );
        self.pos = i;
        true
    }

    fn try_comment_block(&mut self) -> bool {
        if !self.current().text.trim_start().starts_with("<!--") {
            return false;
        }
        let texts: Vec<&str> = self.lines[self.pos..]
            .iter()
            .map(|l| l.text.as_str())
            .collect();
        let Some((raw, used)) = HtmlBlock::comment_body(&texts) else {
            return false;
        };
        self.out
            .push(Token::leaf(TokenKind::HtmlCommentBlock, "").with_content(raw));
        self.pos += used;
        true
    }

    fn try_include(&mut self) -> bool {
        let Some(path) = Include::parse_line(&self.current().text).map(str::to_string) else {
            return false;
        };
        self.out
            .push(Token::leaf(TokenKind::IncludeBlock, "").with_attr("path", path));
        self.pos += 1;
        true
    }

    fn try_heading(&mut self) -> bool {
        let Some((level, text)) = Heading::parse(&self.current().text) else {
            return false;
        };
        let tag = format!("h{level}");
        let markup = Heading::marker(u64::from(level));
        let inline = self.inline(text);
        self.out
            .push(Token::open(TokenKind::Heading, &tag).with_markup(markup.as_str()));
        self.out.push(inline);
        self.out
            .push(Token::close(TokenKind::Heading, &tag).with_markup(markup));
        self.pos += 1;
        true
    }

    fn try_thematic_break(&mut self) -> bool {
        if !ThematicBreak::matches(&self.current().text) {
            return false;
        }
        let markup = self.current().text.trim().to_string();
        self.out
            .push(Token::leaf(TokenKind::HorizontalRule, "hr").with_markup(markup));
        self.pos += 1;
        true
    }

    fn try_blockquote(&mut self) -> bool {
        let mut body = vec![];
        let mut i = self.pos;
        while i < self.lines.len()
            && let Some(rest) = BlockQuote::strip_prefix(&self.lines[i].text)
        {
            body.push(rest.to_string());
            i += 1;
        }
        if body.is_empty() {
            return false;
        }
        let inner = self.nested(&body);
        self.out.push(Token::open(TokenKind::Blockquote, "blockquote").with_markup(">"));
        self.out.extend(inner);
        self.out.push(Token::close(TokenKind::Blockquote, "blockquote").with_markup(">"));
        self.pos = i;
        true
    }

    /// Collects the lines of one list item starting at `i`.
    ///
    /// Continuation lines are blank lines followed by more indented content,
    /// lines indented at least two columns past the marker's indent, and lazy
    /// paragraph continuations.
    fn list_item_body(&self, mut i: usize, start: &ItemStart) -> (Vec<String>, usize) {
        let first = &self.lines[i].text;
        let mut body = vec![first[start.content_offset..].to_string()];
        let threshold = start.indent + List::CONTINUATION_INDENT;
        i += 1;
        while i < self.lines.len() {
            let line = &self.lines[i];
            if line.is_blank {
                let resumes = self.lines[i..]
                    .iter()
                    .find(|l| !l.is_blank)
                    .is_some_and(|l| l.indent >= threshold);
                if !resumes {
                    break;
                }
                body.push(String::new());
                i += 1;
                continue;
            }
            if line.indent >= threshold {
                body.push(strip_indent(&line.text, start.content_indent).to_string());
                i += 1;
                continue;
            }
            let lazy = List::item_start(&line.text).is_none()
                && !self.starts_block(&line.text)
                && body
                    .iter()
                    .all(|b| !b.trim().is_empty() && !self.starts_block(b));
            if !lazy {
                break;
            }
            body.push(line.text.trim_start().to_string());
            i += 1;
        }
        (body, i)
    }

    fn try_list(&mut self) -> bool {
        let Some(first) = List::item_start(&self.current().text) else {
            return false;
        };
        let ordered = first.marker.is_ordered();
        let same_list = |text: &str| List::item_start(text).is_some_and(|s| s.marker.is_ordered() == ordered);

        let mut items = vec![];
        let mut i = self.pos;
        while i < self.lines.len() {
            let Some(start) = List::item_start(&self.lines[i].text) else {
                break;
            };
            if start.marker.is_ordered() != ordered {
                break;
            }
            let (body, next) = self.list_item_body(i, &start);
            items.push(body);
            i = next;
            if let Some(k) = (i..self.lines.len()).find(|&k| !self.lines[k].is_blank)
                && k > i
                && same_list(&self.lines[k].text)
            {
                i = k;
            }
        }

        let (kind, tag, markup) = match first.marker {
            ListMarker::Bullet(c) => (TokenKind::BulletList, "ul", c.to_string()),
            ListMarker::Ordered { delim, .. } => (TokenKind::OrderedList, "ol", delim.to_string()),
        };
        let mut open = Token::open(kind, tag).with_markup(markup.as_str());
        if let ListMarker::Ordered { start, .. } = first.marker {
            open = open.with_attr("start", start.to_string());
        }
        self.out.push(open);
        for body in &items {
            let mut inner = self.nested(body);
            self.mark_task_checkbox(&mut inner);
            self.out.push(Token::open(TokenKind::ListItem, "li").with_markup(markup.as_str()));
            self.out.extend(inner);
            self.out.push(Token::close(TokenKind::ListItem, "li"));
        }
        self.out.push(Token::close(kind, tag).with_markup(markup));
        self.pos = i;
        true
    }

    /// Turns a leading `[ ]` / `[x]` in an item's first paragraph into a
    /// checkbox token.
    fn mark_task_checkbox(&self, tokens: &mut [Token]) {
        let [open, inline, ..] = tokens else {
            return;
        };
        if open.kind != TokenKind::Paragraph || inline.kind != TokenKind::Inline {
            return;
        }
        let Some((checked, used)) = List::task_marker(&inline.content) else {
            return;
        };
        let rest = inline.content[used..].to_string();
        let mut children = vec![
            Token::leaf(TokenKind::TaskCheckbox, "input").with_attr("checked", checked.to_string()),
        ];
        children.extend(parse_inline(&rest, self.options));
        inline.children = children;
        inline.content = rest;
    }

    fn try_table(&mut self) -> bool {
        let header = &self.current().text;
        if !header.contains(Table::PIPE) || self.pos + 1 >= self.lines.len() {
            return false;
        }
        let head_cells = Table::split_row(header);
        let Some(aligns) = Table::delimiter_row(&self.lines[self.pos + 1].text) else {
            return false;
        };
        if aligns.len() != head_cells.len() {
            return false;
        }

        let mut rows = vec![head_cells];
        let mut i = self.pos + 2;
        while i < self.lines.len() {
            let line = &self.lines[i];
            if line.is_blank || self.starts_block(&line.text) {
                break;
            }
            rows.push(Table::split_row(&line.text));
            i += 1;
        }
        trace!("table with {} columns and {} rows", aligns.len(), rows.len());

        self.out.push(Token::open(TokenKind::Table, "table"));
        for (r, cells) in rows.iter().enumerate() {
            let (kind, tag) = if r == 0 {
                (TokenKind::TableHeaderCell, "th")
            } else {
                (TokenKind::TableCell, "td")
            };
            self.out.push(Token::open(TokenKind::TableRow, "tr"));
            for (col, align) in aligns.iter().enumerate() {
                let mut open = Token::open(kind, tag);
                if let Some(align) = align {
                    open = open.with_attr("style", format!("text-align:{}", align.as_str()));
                }
                self.out.push(open);
                let text = cells.get(col).map(String::as_str).unwrap_or("");
                for para in Table::cell_paragraphs(text) {
                    self.push_paragraph(para);
                }
                self.out.push(Token::close(kind, tag));
            }
            self.out.push(Token::close(TokenKind::TableRow, "tr"));
        }
        self.out.push(Token::close(TokenKind::Table, "table"));
        self.pos = i;
        true
    }

    fn try_html_block(&mut self) -> bool {
        if !HtmlBlock::starts(&self.current().text) {
            return false;
        }
        let mut body = vec![];
        let mut i = self.pos;
        while i < self.lines.len() && !self.lines[i].is_blank {
            body.push(self.lines[i].text.as_str());
            i += 1;
        }
        let token = Token::leaf(TokenKind::HtmlBlock, "").with_content(body.join("\n"));
        self.out.push(token);
        self.pos = i;
        true
    }

    fn paragraph(&mut self) {
        let mut lines = vec![self.current().text.trim_start().to_string()];
        let mut i = self.pos + 1;
        while i < self.lines.len() {
            let line = &self.lines[i];
            if line.is_blank || self.starts_block(&line.text) {
                break;
            }
            lines.push(line.text.trim_start().to_string());
            i += 1;
        }
        if let Some(last) = lines.last_mut() {
            last.truncate(last.trim_end().len());
        }
        self.push_paragraph(&lines.join("\n"));
        self.pos = i;
    }
}
