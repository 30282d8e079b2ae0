//! Which children each node type may hold.

use crate::tree::NodeType;

/// Containers whose children are blocks.
pub fn holds_blocks(kind: NodeType) -> bool {
    matches!(
        kind,
        NodeType::Doc
            | NodeType::Blockquote
            | NodeType::ListItem
            | NodeType::TableHeader
            | NodeType::TableCell
            | NodeType::MulticolumnColumn
            | NodeType::Container
    )
}

pub fn allows(parent: NodeType, child: NodeType) -> bool {
    match parent {
        _ if child == NodeType::Unknown => false,
        p if holds_blocks(p) => child.is_block(),
        NodeType::BulletList | NodeType::OrderedList => child == NodeType::ListItem,
        NodeType::Table => child == NodeType::TableRow,
        NodeType::TableRow => matches!(child, NodeType::TableHeader | NodeType::TableCell),
        NodeType::Multicolumn => child == NodeType::MulticolumnColumn,
        // Both are written back as raw text.
        NodeType::CodeBlock | NodeType::SpeakerNote => child == NodeType::Text,
        NodeType::Paragraph | NodeType::Heading => child.is_inline(),
        _ => false,
    }
}

/// The child a container gets when it would otherwise be empty.
pub fn filler(kind: NodeType) -> Option<NodeType> {
    match kind {
        k if holds_blocks(k) => Some(NodeType::Paragraph),
        NodeType::BulletList | NodeType::OrderedList => Some(NodeType::ListItem),
        NodeType::Multicolumn => Some(NodeType::MulticolumnColumn),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_and_inline_do_not_mix() {
        assert!(allows(NodeType::Doc, NodeType::Paragraph));
        assert!(!allows(NodeType::Doc, NodeType::Text));
        assert!(allows(NodeType::Paragraph, NodeType::Tag));
        assert!(!allows(NodeType::Paragraph, NodeType::Paragraph));
        assert!(!allows(NodeType::CodeBlock, NodeType::Tag));
        assert!(allows(NodeType::SpeakerNote, NodeType::Text));
        assert!(!allows(NodeType::SpeakerNote, NodeType::Tag));
    }

    #[test]
    fn test_structural_children_need_their_parent() {
        assert!(!allows(NodeType::Doc, NodeType::ListItem));
        assert!(allows(NodeType::BulletList, NodeType::ListItem));
        assert!(!allows(NodeType::Doc, NodeType::MulticolumnColumn));
        assert!(allows(NodeType::Multicolumn, NodeType::MulticolumnColumn));
    }

    #[test]
    fn test_unknown_is_never_allowed() {
        assert!(!allows(NodeType::Doc, NodeType::Unknown));
        assert!(!allows(NodeType::Paragraph, NodeType::Unknown));
    }
}
