use log::debug;
use serde_json::Value;

use crate::options::DialectOptions;
use crate::parsing::blocks::kinds::Align;
use crate::parsing::token::{Nesting, Token, TokenKind, TokenMeta};
use crate::tree::{MarkType, NodeType, WysiwygDoc, WysiwygMark, WysiwygNode, canonical_marks};

/// Builds a document tree from a block token stream.
///
/// Open tokens push onto an explicit node stack whose bottom is the `doc`;
/// close tokens pop back to the matching node. Inline children thread an
/// active-mark stack so every text run carries a copy of the marks around it.
pub struct TreeBuilder<'o> {
    stack: Vec<WysiwygNode>,
    marks: Vec<WysiwygMark>,
    options: &'o DialectOptions,
}

/// Containers that must hold at least one block.
fn needs_block(kind: NodeType) -> bool {
    matches!(
        kind,
        NodeType::ListItem
            | NodeType::Blockquote
            | NodeType::TableHeader
            | NodeType::TableCell
            | NodeType::MulticolumnColumn
            | NodeType::Container
    )
}

fn block_node_type(kind: TokenKind) -> Option<NodeType> {
    Some(match kind {
        TokenKind::Paragraph => NodeType::Paragraph,
        TokenKind::Heading => NodeType::Heading,
        TokenKind::Blockquote => NodeType::Blockquote,
        TokenKind::BulletList => NodeType::BulletList,
        TokenKind::OrderedList => NodeType::OrderedList,
        TokenKind::ListItem => NodeType::ListItem,
        TokenKind::Table => NodeType::Table,
        TokenKind::TableRow => NodeType::TableRow,
        TokenKind::TableHeaderCell => NodeType::TableHeader,
        TokenKind::TableCell => NodeType::TableCell,
        TokenKind::Multicolumn => NodeType::Multicolumn,
        TokenKind::MulticolumnColumn => NodeType::MulticolumnColumn,
        TokenKind::Container => NodeType::Container,
        _ => return None,
    })
}

fn mark_for(token: &Token) -> Option<WysiwygMark> {
    let mark = match token.kind {
        TokenKind::Em => WysiwygMark::new(MarkType::Em),
        TokenKind::Strong => WysiwygMark::new(MarkType::Strong),
        TokenKind::Underline => WysiwygMark::new(MarkType::Underline),
        TokenKind::Strike => WysiwygMark::new(MarkType::Strike),
        TokenKind::DashStrike => WysiwygMark::new(MarkType::Strike).with_attr("style", "dash"),
        TokenKind::Sub => WysiwygMark::new(MarkType::Sub),
        TokenKind::Sup => WysiwygMark::new(MarkType::Sup),
        TokenKind::Ins => WysiwygMark::new(MarkType::Ins),
        TokenKind::Mark => WysiwygMark::new(MarkType::Mark),
        TokenKind::Abbr => {
            WysiwygMark::new(MarkType::Abbr).with_attr("title", token.attr("title").unwrap_or(""))
        }
        TokenKind::Link => {
            let mut mark =
                WysiwygMark::new(MarkType::Link).with_attr("href", token.attr("href").unwrap_or(""));
            if let Some(title) = token.attr("title") {
                mark = mark.with_attr("title", title);
            }
            mark
        }
        _ => return None,
    };
    Some(mark)
}

/// Copies the listed token attrs onto `node` as strings.
fn copy_attrs(mut node: WysiwygNode, token: &Token, names: &[&str]) -> WysiwygNode {
    for name in names {
        if let Some(value) = token.attr(name) {
            node = node.with_attr(name, value);
        }
    }
    node
}

fn cell_align(token: &Token) -> Value {
    token
        .attr("align")
        .and_then(Align::from_name)
        .or_else(|| token.attr("style").and_then(Align::from_style))
        .map_or(Value::Null, |a| Value::from(a.as_str()))
}

impl<'o> TreeBuilder<'o> {
    pub fn new(options: &'o DialectOptions) -> Self {
        Self {
            stack: vec![WysiwygNode::doc(vec![])],
            marks: vec![],
            options,
        }
    }

    pub fn build(mut self, tokens: &[Token]) -> WysiwygDoc {
        for token in tokens {
            match token.nesting {
                Nesting::Open => self.open_block(token),
                Nesting::Close => self.close_block(token),
                Nesting::Leaf => self.leaf_block(token),
            }
        }
        while self.stack.len() > 1 {
            self.pop();
        }
        self.stack.pop().unwrap_or_else(|| WysiwygNode::doc(vec![]))
    }

    fn append(&mut self, node: WysiwygNode) {
        if let Some(top) = self.stack.last_mut() {
            top.content.push(node);
        }
    }

    fn pop(&mut self) {
        let Some(mut node) = self.stack.pop() else {
            return;
        };
        if needs_block(node.kind) && node.content.is_empty() {
            node.content.push(WysiwygNode::paragraph(vec![]));
        }
        self.append(node);
    }

    fn open_block(&mut self, token: &Token) {
        let Some(kind) = block_node_type(token.kind) else {
            debug!("skipping unexpected open token {:?}", token.kind);
            return;
        };
        let node = WysiwygNode::new(kind);
        let node = match kind {
            NodeType::Heading => {
                let level = token
                    .tag
                    .strip_prefix('h')
                    .and_then(|l| l.parse::<u64>().ok())
                    .unwrap_or(1);
                node.with_attr("level", level)
            }
            NodeType::OrderedList => {
                let order = token
                    .attr("start")
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(1);
                node.with_attr("order", order)
            }
            NodeType::TableHeader | NodeType::TableCell => node.with_attr("align", cell_align(token)),
            NodeType::MulticolumnColumn => {
                let growth = match token.meta {
                    TokenMeta::Growth(g) => g.max(1),
                    TokenMeta::None => 1,
                };
                node.with_attr("growth", growth)
            }
            NodeType::Container => node.with_attr("kind", token.info.as_str()),
            _ => node,
        };
        self.stack.push(node);
    }

    fn close_block(&mut self, token: &Token) {
        let Some(kind) = block_node_type(token.kind) else {
            debug!("skipping unexpected close token {:?}", token.kind);
            return;
        };
        // Close back to the nearest node of this type; a stray close is ignored.
        let Some(depth) = self.stack.iter().skip(1).rposition(|n| n.kind == kind) else {
            debug!("no open {kind} for close token");
            return;
        };
        while self.stack.len() > depth + 1 {
            self.pop();
        }
    }

    fn leaf_block(&mut self, token: &Token) {
        let node = match token.kind {
            TokenKind::Inline => {
                self.marks.clear();
                let mut content = vec![];
                self.inline_children(&token.children, &mut content);
                if let Some(top) = self.stack.last_mut() {
                    top.content.extend(merge_text(content));
                }
                return;
            }
            TokenKind::Fence => self.fence(token),
            TokenKind::HorizontalRule => WysiwygNode::new(NodeType::HorizontalRule),
            TokenKind::IncludeBlock => copy_attrs(WysiwygNode::new(NodeType::IncludeBlock), token, &["path"]),
            TokenKind::SpeakerNote => {
                let mut node = WysiwygNode::new(NodeType::SpeakerNote);
                if !token.content.is_empty() {
                    node.content.push(WysiwygNode::text(token.content.as_str()));
                }
                node
            }
            TokenKind::HtmlBlock => WysiwygNode::new(NodeType::HtmlBlock)
                .with_attr("raw", token.content.as_str())
                .with_attr("mode", "html"),
            TokenKind::HtmlCommentBlock => WysiwygNode::new(NodeType::HtmlBlock)
                .with_attr("raw", token.content.as_str())
                .with_attr("mode", "comment"),
            other => {
                debug!("skipping unexpected leaf token {other:?}");
                return;
            }
        };
        self.append(node);
    }

    fn fence(&self, token: &Token) -> WysiwygNode {
        let body = token.content.strip_suffix('\n').unwrap_or(&token.content);
        let lang = token.info.split_whitespace().next().unwrap_or("");
        if self.options.is_diagram_language(lang) {
            let node = WysiwygNode::new(NodeType::DiagramFence)
                .with_attr("lang", lang)
                .with_attr("code", body);
            let info = token.info.trim();
            return if info == lang { node } else { node.with_attr("params", info) };
        }
        let mut node = WysiwygNode::new(NodeType::CodeBlock).with_attr("params", token.info.as_str());
        if !body.is_empty() {
            node.content.push(WysiwygNode::text(body));
        }
        node
    }

    fn text(&self, text: &str, extra: Option<WysiwygMark>) -> WysiwygNode {
        let mut marks = self.marks.clone();
        marks.extend(extra);
        canonical_marks(&mut marks);
        WysiwygNode::marked_text(text, marks)
    }

    fn inline_children(&mut self, tokens: &[Token], out: &mut Vec<WysiwygNode>) {
        for token in tokens {
            match token.nesting {
                Nesting::Open => match mark_for(token) {
                    Some(mark) => self.marks.push(mark),
                    None => debug!("skipping unexpected inline open {:?}", token.kind),
                },
                Nesting::Close => {
                    if let Some(mark) = mark_for(token)
                        && let Some(at) = self.marks.iter().rposition(|m| m.kind == mark.kind)
                    {
                        self.marks.remove(at);
                    }
                }
                Nesting::Leaf => {
                    if let Some(mut node) = self.inline_leaf(token) {
                        if !matches!(node.kind, NodeType::Text | NodeType::TaskCheckbox) {
                            node.marks = self.marks.clone();
                            canonical_marks(&mut node.marks);
                        }
                        out.push(node);
                    }
                }
            }
        }
    }

    fn inline_leaf(&self, token: &Token) -> Option<WysiwygNode> {
        let node = match token.kind {
            TokenKind::Text if token.content.is_empty() => return None,
            TokenKind::Text => self.text(&token.content, None),
            TokenKind::CodeInline => self.text(&token.content, Some(WysiwygMark::new(MarkType::Code))),
            TokenKind::HardBreak => WysiwygNode::new(NodeType::HardBreak),
            TokenKind::Media => {
                copy_attrs(WysiwygNode::new(NodeType::Media), token, &["src", "alt", "title", "kind"])
            }
            TokenKind::WikiLink => {
                copy_attrs(WysiwygNode::new(NodeType::WikiLink), token, &["document", "title"])
            }
            TokenKind::Tag => copy_attrs(WysiwygNode::new(NodeType::Tag), token, &["value", "flavor"]),
            TokenKind::DateTag => {
                copy_attrs(WysiwygNode::new(NodeType::DateTag), token, &["value", "flavor"])
            }
            TokenKind::PersonTag => {
                copy_attrs(WysiwygNode::new(NodeType::PersonTag), token, &["value", "flavor"])
            }
            TokenKind::TemporalTag => {
                copy_attrs(WysiwygNode::new(NodeType::TemporalTag), token, &["value", "kind"])
            }
            TokenKind::IncludeInline => copy_attrs(WysiwygNode::new(NodeType::Include), token, &["path"]),
            TokenKind::FootnoteRef => copy_attrs(WysiwygNode::new(NodeType::FootnoteRef), token, &["id"]),
            TokenKind::HtmlInline => WysiwygNode::new(NodeType::HtmlInline)
                .with_attr("raw", token.content.as_str())
                .with_attr("mode", "html"),
            TokenKind::HtmlCommentInline => WysiwygNode::new(NodeType::HtmlInline)
                .with_attr("raw", token.content.as_str())
                .with_attr("mode", "comment"),
            TokenKind::TaskCheckbox => WysiwygNode::new(NodeType::TaskCheckbox)
                .with_attr("checked", token.attr("checked") == Some("true")),
            other => {
                debug!("skipping unexpected inline token {other:?}");
                return None;
            }
        };
        Some(node)
    }
}

/// Joins adjacent text nodes that carry the same marks.
pub fn merge_text(nodes: Vec<WysiwygNode>) -> Vec<WysiwygNode> {
    let mut out: Vec<WysiwygNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if node.kind == NodeType::Text
            && let Some(prev) = out.last_mut()
            && prev.kind == NodeType::Text
            && prev.marks == node.marks
        {
            let mut text = prev.text.take().unwrap_or_default();
            text.push_str(node.text_str());
            prev.text = Some(text);
            continue;
        }
        out.push(node);
    }
    out
}
