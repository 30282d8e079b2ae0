//! Offset-based edits on the inline content of a textblock.
//!
//! Offsets count text bytes plus one per inline atom (see
//! [`EditorNode::inline_len`]).

use std::mem;

use super::state::{EditorNode, IdAllocator};

/// Drops empty text nodes and joins neighbours with equal marks.
pub fn merge_text(nodes: &mut Vec<EditorNode>) {
    let mut out: Vec<EditorNode> = Vec::with_capacity(nodes.len());
    for node in nodes.drain(..) {
        if node.is_text() && node.text.is_empty() {
            continue;
        }
        if node.is_text()
            && let Some(prev) = out.last_mut()
            && prev.is_text()
            && prev.marks == node.marks
        {
            prev.text.push_str(&node.text);
            continue;
        }
        out.push(node);
    }
    *nodes = out;
}

/// Whether `offset` is a valid caret position in `block`.
pub fn is_boundary(block: &EditorNode, offset: usize) -> bool {
    let mut pos = 0;
    for child in &block.children {
        let len = child.unit_len();
        if offset < pos + len {
            return child.is_text() && child.text.is_char_boundary(offset - pos);
        }
        pos += len;
    }
    offset == pos
}

/// Splits inline nodes at `offset`. A text node that straddles the offset is
/// cut in two; the right half gets a fresh id.
pub fn split_at(
    children: Vec<EditorNode>,
    offset: usize,
    ids: &mut IdAllocator,
) -> (Vec<EditorNode>, Vec<EditorNode>) {
    let mut left = vec![];
    let mut right = vec![];
    let mut pos = 0;
    for mut node in children {
        let len = node.unit_len();
        if pos + len <= offset {
            left.push(node);
        } else if pos >= offset {
            right.push(node);
        } else {
            let tail = node.text.split_off(offset - pos);
            right.push(EditorNode::text(ids.next_id(), tail, node.marks.clone()));
            left.push(node);
        }
        pos += len;
    }
    (left, right)
}

pub fn delete_range(block: &mut EditorNode, from: usize, to: usize, ids: &mut IdAllocator) {
    if from >= to {
        return;
    }
    let (rest, tail) = split_at(mem::take(&mut block.children), to, ids);
    let (mut head, _) = split_at(rest, from, ids);
    head.extend(tail);
    merge_text(&mut head);
    block.children = head;
}

/// Inserts text at `offset`, taking the marks of the run it extends: the run
/// ending at the offset, else the run starting there.
pub fn insert_text(block: &mut EditorNode, offset: usize, text: &str, ids: &mut IdAllocator) {
    if text.is_empty() {
        return;
    }
    let (mut left, right) = split_at(mem::take(&mut block.children), offset, ids);
    match left.last_mut() {
        Some(prev) if prev.is_text() => prev.text.push_str(text),
        _ => {
            let marks = right
                .first()
                .filter(|n| n.is_text())
                .map(|n| n.marks.clone())
                .unwrap_or_default();
            left.push(EditorNode::text(ids.next_id(), text, marks));
        }
    }
    left.extend(right);
    merge_text(&mut left);
    block.children = left;
}

pub fn insert_node(block: &mut EditorNode, offset: usize, node: EditorNode, ids: &mut IdAllocator) {
    let (mut left, right) = split_at(mem::take(&mut block.children), offset, ids);
    left.push(node);
    left.extend(right);
    merge_text(&mut left);
    block.children = left;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::state::NodeId;
    use crate::tree::{MarkType, NodeType, WysiwygMark};
    use pretty_assertions::assert_eq;

    fn block(ids: &mut IdAllocator) -> EditorNode {
        let strong = vec![WysiwygMark::new(MarkType::Strong)];
        EditorNode::new(ids.next_id(), NodeType::Paragraph).with_children(vec![
            EditorNode::text(ids.next_id(), "ab", vec![]),
            EditorNode::new(ids.next_id(), NodeType::Tag),
            EditorNode::text(ids.next_id(), "cd", strong),
        ])
    }

    fn texts(block: &EditorNode) -> Vec<String> {
        block
            .children
            .iter()
            .map(|c| if c.is_text() { c.text.clone() } else { c.kind.to_string() })
            .collect()
    }

    #[test]
    fn test_boundaries() {
        let mut ids = IdAllocator::default();
        let mut b = block(&mut ids);
        assert!(is_boundary(&b, 0));
        assert!(is_boundary(&b, 3));
        assert!(is_boundary(&b, 5));
        assert!(!is_boundary(&b, 6));
        b.children[0].text = "é".to_string();
        assert!(!is_boundary(&b, 1));
    }

    #[test]
    fn test_insert_extends_left_run() {
        let mut ids = IdAllocator::default();
        let mut b = block(&mut ids);
        insert_text(&mut b, 5, "e", &mut ids);
        assert_eq!(texts(&b), vec!["ab", "tag", "cde"]);
        assert_eq!(b.children[2].marks.len(), 1);
    }

    #[test]
    fn test_insert_after_atom_takes_right_marks() {
        let mut ids = IdAllocator::default();
        let mut b = block(&mut ids);
        insert_text(&mut b, 3, "x", &mut ids);
        assert_eq!(texts(&b), vec!["ab", "tag", "xcd"]);
    }

    #[test]
    fn test_delete_across_atom() {
        let mut ids = IdAllocator::default();
        let mut b = block(&mut ids);
        delete_range(&mut b, 1, 4, &mut ids);
        assert_eq!(texts(&b), vec!["a", "d"]);
        assert_eq!(b.inline_len(), 2);
    }

    #[test]
    fn test_split_gives_fresh_id() {
        let mut ids = IdAllocator::default();
        let b = block(&mut ids);
        let (left, right) = split_at(b.children, 1, &mut ids);
        assert_eq!(left.len(), 1);
        assert_eq!(right.len(), 3);
        assert_eq!(right[0].text, "b");
        assert_ne!(right[0].id, NodeId(2));
    }
}
