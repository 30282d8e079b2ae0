use std::fmt;

use serde::{Deserialize, Serialize};

/// Node kinds of the portable tree.
///
/// Serialized as snake_case strings. Names that are not recognised parse as
/// [`NodeType::Unknown`] so that foreign trees still deserialize; the editor
/// adapter drops those nodes and the serializer falls back to their text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Doc,
    Paragraph,
    Heading,
    Blockquote,
    BulletList,
    OrderedList,
    ListItem,
    CodeBlock,
    HorizontalRule,
    Table,
    TableRow,
    TableHeader,
    TableCell,
    Multicolumn,
    MulticolumnColumn,
    Container,
    IncludeBlock,
    SpeakerNote,
    HtmlBlock,
    MediaBlock,
    DiagramFence,
    Text,
    HardBreak,
    Media,
    Include,
    WikiLink,
    Tag,
    DateTag,
    PersonTag,
    TemporalTag,
    FootnoteRef,
    HtmlInline,
    TaskCheckbox,
    Unknown,
}

impl NodeType {
    pub const ALL: [NodeType; 33] = [
        NodeType::Doc,
        NodeType::Paragraph,
        NodeType::Heading,
        NodeType::Blockquote,
        NodeType::BulletList,
        NodeType::OrderedList,
        NodeType::ListItem,
        NodeType::CodeBlock,
        NodeType::HorizontalRule,
        NodeType::Table,
        NodeType::TableRow,
        NodeType::TableHeader,
        NodeType::TableCell,
        NodeType::Multicolumn,
        NodeType::MulticolumnColumn,
        NodeType::Container,
        NodeType::IncludeBlock,
        NodeType::SpeakerNote,
        NodeType::HtmlBlock,
        NodeType::MediaBlock,
        NodeType::DiagramFence,
        NodeType::Text,
        NodeType::HardBreak,
        NodeType::Media,
        NodeType::Include,
        NodeType::WikiLink,
        NodeType::Tag,
        NodeType::DateTag,
        NodeType::PersonTag,
        NodeType::TemporalTag,
        NodeType::FootnoteRef,
        NodeType::HtmlInline,
        NodeType::TaskCheckbox,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Doc => "doc",
            NodeType::Paragraph => "paragraph",
            NodeType::Heading => "heading",
            NodeType::Blockquote => "blockquote",
            NodeType::BulletList => "bullet_list",
            NodeType::OrderedList => "ordered_list",
            NodeType::ListItem => "list_item",
            NodeType::CodeBlock => "code_block",
            NodeType::HorizontalRule => "horizontal_rule",
            NodeType::Table => "table",
            NodeType::TableRow => "table_row",
            NodeType::TableHeader => "table_header",
            NodeType::TableCell => "table_cell",
            NodeType::Multicolumn => "multicolumn",
            NodeType::MulticolumnColumn => "multicolumn_column",
            NodeType::Container => "container",
            NodeType::IncludeBlock => "include_block",
            NodeType::SpeakerNote => "speaker_note",
            NodeType::HtmlBlock => "html_block",
            NodeType::MediaBlock => "media_block",
            NodeType::DiagramFence => "diagram_fence",
            NodeType::Text => "text",
            NodeType::HardBreak => "hard_break",
            NodeType::Media => "media",
            NodeType::Include => "include",
            NodeType::WikiLink => "wiki_link",
            NodeType::Tag => "tag",
            NodeType::DateTag => "date_tag",
            NodeType::PersonTag => "person_tag",
            NodeType::TemporalTag => "temporal_tag",
            NodeType::FootnoteRef => "footnote_ref",
            NodeType::HtmlInline => "html_inline",
            NodeType::TaskCheckbox => "task_checkbox",
            NodeType::Unknown => "unknown",
        }
    }

    pub fn from_name(name: &str) -> NodeType {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .unwrap_or(NodeType::Unknown)
    }

    /// Inline-level kinds: text plus every inline atom.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            NodeType::Text
                | NodeType::HardBreak
                | NodeType::Media
                | NodeType::Include
                | NodeType::WikiLink
                | NodeType::Tag
                | NodeType::DateTag
                | NodeType::PersonTag
                | NodeType::TemporalTag
                | NodeType::FootnoteRef
                | NodeType::HtmlInline
                | NodeType::TaskCheckbox
        )
    }

    /// Blocks that may appear as children of a block container.
    ///
    /// Structural children (list items, rows, cells, columns) are excluded;
    /// they are only valid under their specific parent.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            NodeType::Paragraph
                | NodeType::Heading
                | NodeType::Blockquote
                | NodeType::BulletList
                | NodeType::OrderedList
                | NodeType::CodeBlock
                | NodeType::HorizontalRule
                | NodeType::Table
                | NodeType::Multicolumn
                | NodeType::Container
                | NodeType::IncludeBlock
                | NodeType::SpeakerNote
                | NodeType::HtmlBlock
                | NodeType::MediaBlock
                | NodeType::DiagramFence
        )
    }

    /// Blocks holding inline content directly, so a caret can rest in them.
    pub fn is_textblock(self) -> bool {
        matches!(
            self,
            NodeType::Paragraph | NodeType::Heading | NodeType::CodeBlock | NodeType::SpeakerNote
        )
    }

    /// Leaf nodes with no editable content. Text is not an atom.
    pub fn is_atom(self) -> bool {
        (self.is_inline() && self != NodeType::Text) || self.is_block_atom()
    }

    pub fn is_block_atom(self) -> bool {
        matches!(
            self,
            NodeType::HorizontalRule
                | NodeType::IncludeBlock
                | NodeType::HtmlBlock
                | NodeType::MediaBlock
                | NodeType::DiagramFence
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for NodeType {
    fn from(name: String) -> Self {
        NodeType::from_name(&name)
    }
}

impl From<NodeType> for String {
    fn from(kind: NodeType) -> Self {
        kind.as_str().to_string()
    }
}

/// Mark kinds, listed in canonical opening order: earlier kinds wrap later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MarkType {
    Link,
    Sub,
    Sup,
    Ins,
    Mark,
    Strike,
    Underline,
    Em,
    Strong,
    Abbr,
    Code,
    Unknown,
}

impl MarkType {
    pub const ALL: [MarkType; 11] = [
        MarkType::Link,
        MarkType::Sub,
        MarkType::Sup,
        MarkType::Ins,
        MarkType::Mark,
        MarkType::Strike,
        MarkType::Underline,
        MarkType::Em,
        MarkType::Strong,
        MarkType::Abbr,
        MarkType::Code,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MarkType::Link => "link",
            MarkType::Sub => "sub",
            MarkType::Sup => "sup",
            MarkType::Ins => "ins",
            MarkType::Mark => "mark",
            MarkType::Strike => "strike",
            MarkType::Underline => "underline",
            MarkType::Em => "em",
            MarkType::Strong => "strong",
            MarkType::Abbr => "abbr",
            MarkType::Code => "code",
            MarkType::Unknown => "unknown",
        }
    }

    pub fn from_name(name: &str) -> MarkType {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .unwrap_or(MarkType::Unknown)
    }
}

impl fmt::Display for MarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for MarkType {
    fn from(name: String) -> Self {
        MarkType::from_name(&name)
    }
}

impl From<MarkType> for String {
    fn from(kind: MarkType) -> Self {
        kind.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_names_round_trip() {
        for kind in NodeType::ALL {
            assert_eq!(NodeType::from_name(kind.as_str()), kind);
        }
    }

    #[test]
    fn unrecognised_node_name_is_unknown() {
        assert_eq!(NodeType::from_name("kanban_board"), NodeType::Unknown);
    }

    #[test]
    fn mark_names_round_trip() {
        for kind in MarkType::ALL {
            assert_eq!(MarkType::from_name(kind.as_str()), kind);
        }
        assert_eq!(MarkType::from_name("blink"), MarkType::Unknown);
    }

    #[test]
    fn atoms_and_textblocks_are_disjoint() {
        for kind in NodeType::ALL {
            assert!(!(kind.is_atom() && kind.is_textblock()), "{kind}");
        }
    }

    #[test]
    fn mark_order_puts_link_outermost_and_code_innermost() {
        let mut kinds = MarkType::ALL.to_vec();
        kinds.sort();
        assert_eq!(kinds.first(), Some(&MarkType::Link));
        assert_eq!(kinds.last(), Some(&MarkType::Code));
        assert!(MarkType::Em < MarkType::Strong);
        assert!(MarkType::Underline < MarkType::Strong);
    }
}
