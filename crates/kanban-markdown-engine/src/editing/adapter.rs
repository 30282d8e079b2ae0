//! Conversion between the portable tree and the live model.
//!
//! Loading validates structure against [`super::schema`]: a node that may not
//! appear where it is found is dropped with a warning and its siblings carry
//! on. Unloading strips ids and view state.

use log::warn;

use crate::tree::{NodeType, WysiwygDoc, WysiwygNode, canonical_marks};

use super::inline::merge_text;
use super::schema::{allows, filler};
use super::state::{EditorNode, IdAllocator};

pub fn to_editor(tree: &WysiwygDoc, ids: &mut IdAllocator) -> EditorNode {
    if tree.kind != NodeType::Doc {
        warn!("loading a {} as a document; wrapping its content", tree.kind);
    }
    let mut doc = EditorNode::new(ids.next_id(), NodeType::Doc);
    doc.children = convert_children(NodeType::Doc, &tree.content, ids);
    if doc.children.is_empty() {
        doc.children.push(EditorNode::empty_paragraph(ids));
    }
    pad_atom_ends(&mut doc.children, ids);
    doc
}

pub fn to_tree(node: &EditorNode) -> WysiwygNode {
    if node.is_text() {
        return WysiwygNode::marked_text(node.text.as_str(), node.marks.clone());
    }
    let mut out = WysiwygNode::new(node.kind);
    out.attrs = node.attrs.clone();
    out.marks = node.marks.clone();
    out.content = node
        .children
        .iter()
        .filter(|c| !(c.is_text() && c.text.is_empty()))
        .map(to_tree)
        .collect();
    out
}

/// Builds a node with the minimal content its type requires.
pub fn filled(kind: NodeType, ids: &mut IdAllocator) -> EditorNode {
    let mut node = EditorNode::new(ids.next_id(), kind);
    if kind == NodeType::MulticolumnColumn {
        node = node.with_attr("growth", 1);
    }
    if let Some(child) = filler(kind) {
        node.children.push(filled(child, ids));
    }
    node
}

/// Keeps the caret reachable before a leading and after a trailing atom block.
pub fn pad_atom_ends(children: &mut Vec<EditorNode>, ids: &mut IdAllocator) -> bool {
    let mut changed = false;
    if children.first().is_some_and(|c| c.kind.is_block_atom()) {
        children.insert(0, EditorNode::empty_paragraph(ids));
        changed = true;
    }
    if children.last().is_some_and(|c| c.kind.is_block_atom()) {
        children.push(EditorNode::empty_paragraph(ids));
        changed = true;
    }
    changed
}

pub(crate) fn convert(node: &WysiwygNode, ids: &mut IdAllocator) -> EditorNode {
    if node.kind == NodeType::Text {
        let mut marks = node.marks.clone();
        canonical_marks(&mut marks);
        return EditorNode::text(ids.next_id(), node.text_str(), marks);
    }
    let mut out = EditorNode::new(ids.next_id(), node.kind);
    out.attrs = node.attrs.clone();
    if node.kind.is_inline() {
        out.marks = node.marks.clone();
        canonical_marks(&mut out.marks);
    }
    if node.kind == NodeType::MulticolumnColumn {
        let growth = node.attr_u64("growth").filter(|g| *g > 0).unwrap_or(1);
        out = out.with_attr("growth", growth);
    }
    out.children = convert_children(node.kind, &node.content, ids);
    if out.children.is_empty()
        && let Some(child) = filler(node.kind)
    {
        out.children.push(filled(child, ids));
    }
    out
}

fn convert_children(parent: NodeType, nodes: &[WysiwygNode], ids: &mut IdAllocator) -> Vec<EditorNode> {
    let mut out = Vec::with_capacity(nodes.len());
    for child in nodes {
        if !allows(parent, child.kind) {
            warn!("dropping {} that is not allowed inside {parent}", child.kind);
            continue;
        }
        if child.kind == NodeType::Text && child.text_str().is_empty() {
            continue;
        }
        out.push(convert(child, ids));
    }
    merge_text(&mut out);
    out
}
