//! Document tree to dialect text.
//!
//! Every delimiter comes from the `kinds` types the tokenizer uses, so the
//! two directions agree on syntax. Blocks are rendered to self-contained
//! strings and joined with one blank line; containers prefix or indent the
//! lines of their rendered children.

mod inline;

use log::debug;

pub use inline::write_inline;

use crate::options::DialectOptions;
use crate::parsing::blocks::kinds::{
    Align, BlockQuote, CodeFence, Container, Heading, List, Multicolumn, SpeakerNote, Table,
    ThematicBreak,
};
use crate::parsing::inline::kinds::{HtmlComment, Include, Media};
use crate::tree::{NodeType, WysiwygDoc, WysiwygNode};

/// Serializes a document. Never fails; unknown nodes fall back to their text.
pub fn serialize(doc: &WysiwygDoc, options: &DialectOptions) -> String {
    let out = BlockWriter { options }.blocks(&doc.content);
    debug!("serialized {} top-level blocks into {} bytes", doc.content.len(), out.len());
    out.trim_matches('\n').to_string()
}

struct BlockWriter<'o> {
    options: &'o DialectOptions,
}

/// Prefixes every line; blank lines get the prefix with trailing spaces trimmed.
fn prefix_lines(body: &str, prefix: &str) -> String {
    body.split('\n')
        .map(|line| {
            if line.is_empty() {
                prefix.trim_end().to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes `marker` before the first line and indents the rest.
fn list_item_lines(marker: &str, body: &str) -> String {
    let mut lines = body.split('\n');
    let first = lines.next().unwrap_or("");
    let mut out = format!("{marker}{first}").trim_end().to_string();
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(List::INDENT);
            out.push_str(line);
        }
    }
    out
}

fn fenced(info: &str, body: &str) -> String {
    let fence = CodeFence::fence_for(body);
    if body.is_empty() {
        format!("{fence}{info}\n{fence}")
    } else {
        format!("{fence}{info}\n{body}\n{fence}")
    }
}

impl BlockWriter<'_> {
    fn blocks(&self, nodes: &[WysiwygNode]) -> String {
        nodes
            .iter()
            .map(|n| self.block(n))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn inline(&self, nodes: &[WysiwygNode]) -> String {
        write_inline(nodes, self.options).trim_end().to_string()
    }

    fn block(&self, node: &WysiwygNode) -> String {
        match node.kind {
            NodeType::Paragraph => self.inline(&node.content),
            NodeType::Heading => {
                let marker = Heading::marker(node.attr_u64("level").unwrap_or(1));
                let text = self.inline(&node.content);
                if text.is_empty() {
                    marker
                } else {
                    format!("{marker} {text}")
                }
            }
            NodeType::Blockquote => {
                prefix_lines(&self.blocks(&node.content), BlockQuote::LINE_PREFIX)
            }
            NodeType::BulletList => self.list(node, |_| List::BULLET.to_string()),
            NodeType::OrderedList => {
                let order = node.attr_u64("order").unwrap_or(1);
                self.list(node, |i| format!("{}. ", order.saturating_add(i as u64)))
            }
            NodeType::CodeBlock => fenced(node.attr_str("params").unwrap_or(""), &node.plain_text()),
            NodeType::DiagramFence => {
                let lang = node.attr_str("lang").unwrap_or("");
                // `params` is only trusted while it still names the language.
                let info = node
                    .attr_str("params")
                    .filter(|p| p.split_whitespace().next() == Some(lang))
                    .unwrap_or(lang);
                fenced(info, node.attr_str("code").unwrap_or(""))
            }
            NodeType::HorizontalRule => ThematicBreak::CANONICAL.to_string(),
            NodeType::Table => self.table(node),
            NodeType::Multicolumn => self.multicolumn(node),
            NodeType::Container => {
                let kind = node.attr_str("kind").unwrap_or("");
                let body = self.blocks(&node.content);
                if kind.trim().is_empty() {
                    debug!("container without a kind, writing its content only");
                    return body;
                }
                let open = format!("{} {kind}", Container::FENCE);
                [open.as_str(), body.as_str(), Container::FENCE]
                    .into_iter()
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            NodeType::IncludeBlock => Include::render(node.attr_str("path").unwrap_or("")),
            NodeType::SpeakerNote => node
                .plain_text()
                .split('\n')
                .map(|line| format!("{}{line}", SpeakerNote::PREFIX))
                .collect::<Vec<_>>()
                .join("\n"),
            NodeType::HtmlBlock => {
                let raw = node.attr_str("raw").unwrap_or("");
                if node.attr_str("mode") == Some("comment") {
                    HtmlComment::render(raw)
                } else {
                    raw.to_string()
                }
            }
            NodeType::MediaBlock => Media::render(
                node.attr_str("alt").unwrap_or(""),
                node.attr_str("src").unwrap_or(""),
                node.attr_str("title"),
            ),
            NodeType::Doc
            | NodeType::ListItem
            | NodeType::TableRow
            | NodeType::TableHeader
            | NodeType::TableCell
            | NodeType::MulticolumnColumn => self.blocks(&node.content),
            NodeType::Unknown if node.content.iter().any(|c| c.kind.is_block()) => {
                self.blocks(&node.content)
            }
            // Inline nodes at block level, and unknown nodes, write as a paragraph.
            _ => self.inline(std::slice::from_ref(node)),
        }
    }

    fn list(&self, node: &WysiwygNode, marker: impl Fn(usize) -> String) -> String {
        node.content
            .iter()
            .enumerate()
            .map(|(i, item)| list_item_lines(&marker(i), &self.blocks(&item.content)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Cell content on one line: paragraphs joined with `<br>`, pipes escaped.
    fn cell(&self, cell: &WysiwygNode) -> String {
        let parts: Vec<String> = cell
            .content
            .iter()
            .map(|block| match block.kind {
                NodeType::Paragraph => self.inline(&block.content),
                _ => self.block(block),
            })
            .collect();
        Table::escape_cell(&parts.join(Table::CELL_BREAK))
    }

    fn table(&self, node: &WysiwygNode) -> String {
        let row = |cells: Vec<String>| {
            if cells.is_empty() {
                format!("{}{}", Table::PIPE, Table::PIPE)
            } else {
                format!("{0} {1} {0}", Table::PIPE, cells.join(" | "))
            }
        };
        let mut lines = vec![];
        for (i, tr) in node.content.iter().enumerate() {
            lines.push(row(tr.content.iter().map(|c| self.cell(c)).collect()));
            if i == 0 {
                let aligns = tr
                    .content
                    .iter()
                    .map(|c| Align::delimiter(c.attr_str("align").and_then(Align::from_name)))
                    .map(str::to_string)
                    .collect();
                lines.push(row(aligns));
            }
        }
        lines.join("\n")
    }

    fn multicolumn(&self, node: &WysiwygNode) -> String {
        let mut parts = vec![];
        for (i, column) in node.content.iter().enumerate() {
            let marker = if i == 0 {
                Multicolumn::START
            } else {
                Multicolumn::SEPARATOR
            };
            let growth = column
                .attr_u64("growth")
                .filter(|g| *g > 0)
                .unwrap_or(u64::from(Multicolumn::DEFAULT_GROWTH));
            parts.push(format!("{marker} {growth}"));
            let body = self.blocks(&column.content);
            if !body.is_empty() {
                parts.push(body);
            }
        }
        if parts.is_empty() {
            return String::new();
        }
        parts.push(Multicolumn::END.to_string());
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{MarkType, WysiwygMark};
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn write(nodes: Vec<WysiwygNode>) -> String {
        serialize(&WysiwygNode::doc(nodes), &DialectOptions::default())
    }

    fn para(text: &str) -> WysiwygNode {
        WysiwygNode::paragraph(vec![WysiwygNode::text(text)])
    }

    #[test]
    fn bold_and_underline_paragraph() {
        let doc = vec![WysiwygNode::paragraph(vec![
            WysiwygNode::marked_text("bold", vec![WysiwygMark::new(MarkType::Strong)]),
            WysiwygNode::text(" and "),
            WysiwygNode::marked_text("under", vec![WysiwygMark::new(MarkType::Underline)]),
        ])];
        assert_eq!(write(doc), "**bold** and _under_");
    }

    #[test]
    fn blocks_are_separated_by_one_blank_line() {
        let doc = vec![
            WysiwygNode::paragraph(vec![]),
            para("a"),
            WysiwygNode::paragraph(vec![]),
            WysiwygNode::paragraph(vec![]),
            para("b"),
        ];
        assert_eq!(write(doc), "a\n\nb");
    }

    #[test]
    fn heading_level_is_clamped() {
        let heading = WysiwygNode::new(NodeType::Heading)
            .with_attr("level", 9)
            .with_content(vec![WysiwygNode::text("Deep")]);
        assert_eq!(write(vec![heading]), "###### Deep");
    }

    #[test]
    fn nested_lists_indent_two_spaces() {
        let inner = WysiwygNode::new(NodeType::BulletList).with_content(vec![
            WysiwygNode::new(NodeType::ListItem).with_content(vec![para("b")]),
        ]);
        let list = WysiwygNode::new(NodeType::OrderedList)
            .with_attr("order", 3)
            .with_content(vec![
                WysiwygNode::new(NodeType::ListItem).with_content(vec![para("a"), inner]),
                WysiwygNode::new(NodeType::ListItem).with_content(vec![para("c")]),
            ]);
        assert_eq!(write(vec![list]), "3. a\n\n  - b\n4. c");
    }

    #[test]
    fn huge_list_start_does_not_overflow() {
        let item = || WysiwygNode::new(NodeType::ListItem).with_content(vec![para("x")]);
        let list = WysiwygNode::new(NodeType::OrderedList)
            .with_attr("order", u64::MAX)
            .with_content(vec![item(), item()]);
        let max = u64::MAX;
        assert_eq!(write(vec![list]), format!("{max}. x\n{max}. x"));
    }

    #[test]
    fn blockquote_prefixes_blank_lines_too() {
        let quote = WysiwygNode::new(NodeType::Blockquote).with_content(vec![para("a"), para("b")]);
        assert_eq!(write(vec![quote]), "> a\n>\n> b");
    }

    #[test]
    fn code_fence_grows_past_inner_backticks() {
        let code = WysiwygNode::new(NodeType::CodeBlock)
            .with_attr("params", "md")
            .with_content(vec![WysiwygNode::text("```\nx\n```")]);
        assert_eq!(write(vec![code]), "````md\n```\nx\n```\n````");
    }

    #[test]
    fn table_with_alignment_and_breaks() {
        let cell = |kind, align: Value, paras: Vec<WysiwygNode>| {
            WysiwygNode::new(kind).with_attr("align", align).with_content(paras)
        };
        let table = WysiwygNode::new(NodeType::Table).with_content(vec![
            WysiwygNode::new(NodeType::TableRow).with_content(vec![
                cell(NodeType::TableHeader, "left".into(), vec![para("a")]),
                cell(NodeType::TableHeader, Value::Null, vec![para("b")]),
            ]),
            WysiwygNode::new(NodeType::TableRow).with_content(vec![
                cell(NodeType::TableCell, "left".into(), vec![para("1"), para("2")]),
                cell(NodeType::TableCell, Value::Null, vec![para("x|y")]),
            ]),
        ]);
        assert_eq!(
            write(vec![table]),
            "| a | b |\n| :--- | --- |\n| 1<br>2 | x\\|y |"
        );
    }

    #[test]
    fn multicolumn_writes_growths() {
        let column = |growth: u64, text: &str| {
            WysiwygNode::new(NodeType::MulticolumnColumn)
                .with_attr("growth", growth)
                .with_content(vec![para(text)])
        };
        let columns =
            WysiwygNode::new(NodeType::Multicolumn).with_content(vec![column(2, "l"), column(3, "r")]);
        assert_eq!(write(vec![columns]), "---: 2\nl\n:--: 3\nr\n:---");
    }

    #[test]
    fn dialect_blocks() {
        let doc = vec![
            WysiwygNode::new(NodeType::Container)
                .with_attr("kind", "warning")
                .with_content(vec![para("careful")]),
            WysiwygNode::new(NodeType::IncludeBlock).with_attr("path", "a.md"),
            WysiwygNode::new(NodeType::SpeakerNote)
                .with_content(vec![WysiwygNode::text(" one\n two")]),
            WysiwygNode::new(NodeType::HtmlBlock)
                .with_attr("raw", " hidden ")
                .with_attr("mode", "comment"),
            WysiwygNode::new(NodeType::DiagramFence)
                .with_attr("lang", "mermaid")
                .with_attr("code", "graph TD"),
        ];
        assert_eq!(
            write(doc),
            "::: warning\ncareful\n:::\n\n!!!include(a.md)!!!\n\n;; one\n;; two\n\n<!-- hidden -->\n\n```mermaid\ngraph TD\n```"
        );
    }

    #[test]
    fn media_block_and_rule() {
        let doc = vec![
            WysiwygNode::new(NodeType::MediaBlock)
                .with_attr("src", "clip.mp4")
                .with_attr("alt", "clip")
                .with_attr("kind", "video"),
            WysiwygNode::new(NodeType::HorizontalRule),
        ];
        assert_eq!(write(doc), "![clip](clip.mp4)\n\n---");
    }

    #[test]
    fn container_without_kind_writes_content_only() {
        let container = WysiwygNode::new(NodeType::Container).with_content(vec![para("body")]);
        assert_eq!(write(vec![container]), "body");
    }

    #[test]
    fn diagram_keeps_full_info_string() {
        let fence = |params: &str| {
            WysiwygNode::new(NodeType::DiagramFence)
                .with_attr("lang", "mermaid")
                .with_attr("params", params)
                .with_attr("code", "graph TD")
        };
        assert_eq!(write(vec![fence("mermaid theme=dark")]), "```mermaid theme=dark\ngraph TD\n```");
        assert_eq!(write(vec![fence("plantuml x")]), "```mermaid\ngraph TD\n```");
    }

    #[test]
    fn task_item_checkbox() {
        let list = WysiwygNode::new(NodeType::BulletList).with_content(vec![
            WysiwygNode::new(NodeType::ListItem).with_content(vec![WysiwygNode::paragraph(vec![
                WysiwygNode::new(NodeType::TaskCheckbox).with_attr("checked", true),
                WysiwygNode::text("task"),
            ])]),
        ]);
        assert_eq!(write(vec![list]), "- [x] task");
    }

    #[test]
    fn unknown_block_writes_its_children() {
        let unknown = WysiwygNode::new(NodeType::Unknown).with_content(vec![para("kept")]);
        assert_eq!(write(vec![unknown]), "kept");
    }
}
