use log::debug;

use crate::options::DialectOptions;
use crate::parsing::blocks::kinds::List;
use crate::parsing::inline::kinds::{
    Abbr, CodeSpan, Delimiter, FootnoteRef, HtmlComment, Include, Link, Media, WikiLink,
};
use crate::tree::{MarkType, NodeType, WysiwygMark, WysiwygNode, canonical_marks};

/// Writes inline content while tracking which marks are open.
///
/// A run keeps the leading open marks it still carries, in the order they
/// were opened, and opens the rest in canonical order. Whitespace touching a
/// mark boundary is written outside the delimiters, because `** x**` does not
/// parse as strong.
struct InlineWriter<'o> {
    out: String,
    open: Vec<WysiwygMark>,
    /// Trailing whitespace of the last run, held back until we know whether
    /// marks close after it.
    pending: String,
    options: &'o DialectOptions,
}

fn open_delim(mark: &WysiwygMark) -> String {
    match mark.kind {
        MarkType::Link => Link::OPEN.to_string(),
        MarkType::Abbr => Abbr::render_open(mark.attr_str("title").unwrap_or("")),
        kind => Delimiter::markup(kind, is_dash(mark)).unwrap_or("").to_string(),
    }
}

fn close_delim(mark: &WysiwygMark) -> String {
    match mark.kind {
        MarkType::Link => format!(
            "{}{}",
            Link::CLOSE,
            Link::render_target(mark.attr_str("href").unwrap_or(""), mark.attr_str("title"))
        ),
        MarkType::Abbr => Abbr::CLOSE.to_string(),
        kind => Delimiter::markup(kind, is_dash(mark)).unwrap_or("").to_string(),
    }
}

fn is_dash(mark: &WysiwygMark) -> bool {
    mark.attr_str("style") == Some("dash")
}

/// Splits `text` into leading whitespace, core and trailing whitespace.
fn split_ws(text: &str) -> (&str, &str, &str) {
    let core_start = text.len() - text.trim_start().len();
    let core_end = text.trim_end().len().max(core_start);
    (&text[..core_start], &text[core_start..core_end], &text[core_end..])
}

impl<'o> InlineWriter<'o> {
    fn new(options: &'o DialectOptions) -> Self {
        Self {
            out: String::new(),
            open: vec![],
            pending: String::new(),
            options,
        }
    }

    fn close_to(&mut self, keep: usize) {
        while self.open.len() > keep {
            if let Some(mark) = self.open.pop() {
                self.out.push_str(&close_delim(&mark));
            }
        }
        self.out.push_str(&self.pending);
        self.pending.clear();
    }

    /// How many of the open marks `marks` still carries, counted from the
    /// outermost.
    fn kept(&self, marks: &[WysiwygMark]) -> usize {
        self.open.iter().take_while(|m| marks.contains(m)).count()
    }

    /// Opens the marks of `marks` that are not among the first `kept` open
    /// ones. Callers close down to `kept` first.
    fn open_rest(&mut self, kept: usize, marks: Vec<WysiwygMark>) {
        for mark in marks {
            if !self.open[..kept].contains(&mark) {
                self.out.push_str(&open_delim(&mark));
                self.open.push(mark);
            }
        }
    }

    /// Canonical marks that have delimiters, and whether `code` was among them.
    fn delimited(node: &WysiwygNode) -> (Vec<WysiwygMark>, bool) {
        let mut marks = node.marks.clone();
        canonical_marks(&mut marks);
        let code = marks.iter().any(|m| m.kind == MarkType::Code);
        marks.retain(|m| m.kind != MarkType::Code && m.kind != MarkType::Unknown);
        (marks, code)
    }

    fn text(&mut self, node: &WysiwygNode) {
        let text = node.text_str();
        if text.is_empty() {
            return;
        }
        let (marks, code) = Self::delimited(node);
        let kept = self.kept(&marks);

        if text.trim().is_empty() && !code {
            // Whitespace alone never opens marks.
            self.close_to(kept);
            self.pending.push_str(text);
            return;
        }

        self.close_to(kept);
        let (lead, core, trail) = if code {
            ("", text, "")
        } else {
            split_ws(text)
        };
        self.out.push_str(lead);
        self.open_rest(kept, marks);
        if code {
            self.out.push_str(&CodeSpan::wrap(core));
        } else {
            self.out.push_str(core);
        }
        self.pending.push_str(trail);
    }

    fn atom(&mut self, node: &WysiwygNode) {
        let (marks, _) = Self::delimited(node);
        let kept = self.kept(&marks);
        self.close_to(kept);
        self.open_rest(kept, marks);
        let attr = |key| node.attr_str(key).unwrap_or("");
        let rendered = match node.kind {
            NodeType::HardBreak => "\\\n".to_string(),
            NodeType::Media => Media::render(attr("alt"), attr("src"), node.attr_str("title")),
            NodeType::Include => Include::render(attr("path")),
            NodeType::WikiLink => WikiLink::render(attr("document"), attr("title")),
            NodeType::Tag => format!("{}{}", self.options.tag_prefix, attr("value")),
            NodeType::DateTag | NodeType::PersonTag => {
                format!("{}{}", self.options.person_prefix, attr("value"))
            }
            NodeType::TemporalTag => format!("{}{}", self.options.temporal_prefix, attr("value")),
            NodeType::FootnoteRef => FootnoteRef::render(attr("id")),
            NodeType::HtmlInline if attr("mode") == "comment" => HtmlComment::render(attr("raw")),
            NodeType::HtmlInline => attr("raw").to_string(),
            NodeType::TaskCheckbox if node.attr_bool("checked") => List::TASK_DONE.to_string(),
            NodeType::TaskCheckbox => List::TASK_OPEN.to_string(),
            other => {
                debug!("no inline syntax for {other}, writing its text");
                node.plain_text()
            }
        };
        self.out.push_str(&rendered);
    }

    fn node(&mut self, node: &WysiwygNode) {
        match node.kind {
            NodeType::Text => self.text(node),
            NodeType::Unknown if node.text.is_some() => self.text(node),
            NodeType::Unknown => {
                for child in &node.content {
                    self.node(child);
                }
            }
            _ => self.atom(node),
        }
    }

    fn finish(mut self) -> String {
        self.close_to(0);
        self.out
    }
}

/// Serializes a run of inline nodes.
pub fn write_inline(nodes: &[WysiwygNode], options: &DialectOptions) -> String {
    let mut writer = InlineWriter::new(options);
    for node in nodes {
        writer.node(node);
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn marked(text: &str, kinds: &[MarkType]) -> WysiwygNode {
        WysiwygNode::marked_text(text, kinds.iter().map(|k| WysiwygMark::new(*k)).collect())
    }

    fn write(nodes: &[WysiwygNode]) -> String {
        write_inline(nodes, &DialectOptions::default())
    }

    #[test]
    fn strong_and_em_use_triple_star() {
        assert_eq!(write(&[marked("x", &[MarkType::Strong, MarkType::Em])]), "***x***");
        assert_eq!(write(&[marked("x", &[MarkType::Em, MarkType::Strong])]), "***x***");
    }

    #[test]
    fn shared_marks_stay_open() {
        let nodes = [
            marked("a ", &[MarkType::Em]),
            marked("b", &[MarkType::Strong, MarkType::Em]),
        ];
        assert_eq!(write(&nodes), "*a **b***");
    }

    #[test]
    fn whitespace_moves_outside_delimiters() {
        let nodes = [
            WysiwygNode::text("a"),
            marked(" bold ", &[MarkType::Strong]),
            WysiwygNode::text("b"),
        ];
        assert_eq!(write(&nodes), "a **bold** b");
    }

    #[test]
    fn whitespace_only_run_opens_nothing() {
        assert_eq!(write(&[marked("  ", &[MarkType::Em])]), "  ");
    }

    #[test]
    fn code_is_wrapped_innermost() {
        let nodes = [marked("a`b", &[MarkType::Code, MarkType::Strong])];
        assert_eq!(write(&nodes), "**``a`b``**");
    }

    #[test]
    fn dash_strike_and_link() {
        let nodes = [
            WysiwygNode::marked_text(
                "old",
                vec![WysiwygMark::new(MarkType::Strike).with_attr("style", "dash")],
            ),
            WysiwygNode::text(" "),
            WysiwygNode::marked_text(
                "site",
                vec![
                    WysiwygMark::new(MarkType::Link)
                        .with_attr("href", "https://x.y")
                        .with_attr("title", "X"),
                ],
            ),
        ];
        assert_eq!(write(&nodes), r#"--old-- [site](https://x.y "X")"#);
    }

    #[test]
    fn abbr_title_is_escaped() {
        let nodes = [WysiwygNode::marked_text(
            "HTML",
            vec![WysiwygMark::new(MarkType::Abbr).with_attr("title", "a \"b\"")],
        )];
        assert_eq!(
            write(&nodes),
            r#"<abbr title="a &quot;b&quot;">HTML</abbr>"#
        );
    }

    #[test]
    fn atoms_close_open_marks() {
        let nodes = [
            marked("see", &[MarkType::Em]),
            WysiwygNode::new(NodeType::WikiLink)
                .with_attr("document", "Doc")
                .with_attr("title", "Doc"),
        ];
        assert_eq!(write(&nodes), "*see*[[Doc]]");
    }

    #[test]
    fn marks_stay_open_around_atoms() {
        let strong = vec![WysiwygMark::new(MarkType::Strong)];
        let tag = |marks: Vec<WysiwygMark>| WysiwygNode {
            marks,
            ..WysiwygNode::new(NodeType::Tag).with_attr("value", "todo")
        };
        let nodes = [
            marked("see ", &[MarkType::Strong]),
            tag(strong.clone()),
            marked(" now", &[MarkType::Strong]),
        ];
        assert_eq!(write(&nodes), "**see #todo now**");
        assert_eq!(write(&[tag(strong)]), "**#todo**");
    }

    #[test]
    fn outer_mark_stays_outer_when_later_in_order() {
        let nodes = [
            marked("a ", &[MarkType::Strong]),
            marked("b", &[MarkType::Strong, MarkType::Em]),
            marked(" c", &[MarkType::Strong]),
        ];
        assert_eq!(write(&nodes), "**a *b* c**");
    }

    #[test]
    fn tags_use_configured_prefixes() {
        let options = DialectOptions {
            temporal_prefix: '%',
            ..DialectOptions::default()
        };
        let nodes = [
            WysiwygNode::new(NodeType::Tag).with_attr("value", "todo"),
            WysiwygNode::text(" "),
            WysiwygNode::new(NodeType::PersonTag).with_attr("value", "anna"),
            WysiwygNode::text(" "),
            WysiwygNode::new(NodeType::TemporalTag).with_attr("value", "9am-5pm"),
        ];
        assert_eq!(write_inline(&nodes, &options), "#todo @anna %9am-5pm");
    }

    #[test]
    fn footnote_without_id_is_empty() {
        assert_eq!(write(&[WysiwygNode::new(NodeType::FootnoteRef)]), "");
    }

    #[test]
    fn unknown_inline_writes_its_text() {
        let unknown = WysiwygNode::new(NodeType::Unknown).with_content(vec![WysiwygNode::text("x")]);
        assert_eq!(write(&[unknown]), "x");
    }
}
