use std::mem;

use crate::editing::schema::holds_blocks;
use crate::editing::state::{EditorNode, EditorState, IdAllocator};

/// Makes every run of atom blocks border a textblock or its container's edge,
/// inserting empty paragraphs where needed, so the caret can always reach
/// the space around an atom.
pub fn guard_atom_runs(state: &EditorState) -> Option<EditorState> {
    let mut next = state.clone();
    let changed = guard(&mut next.doc, &mut next.ids);
    changed.then_some(next)
}

fn guard(node: &mut EditorNode, ids: &mut IdAllocator) -> bool {
    let mut changed = false;
    for child in &mut node.children {
        changed |= guard(child, ids);
    }
    if !holds_blocks(node.kind) {
        return changed;
    }

    let children = mem::take(&mut node.children);
    let mut out: Vec<EditorNode> = Vec::with_capacity(children.len());
    for child in children {
        let needs_gap = out.last().is_some_and(|prev| {
            let (a, b) = (prev.kind, child.kind);
            // Entering or leaving an atom run next to a non-textblock.
            (b.is_block_atom() && !a.is_block_atom() && !a.is_textblock())
                || (a.is_block_atom() && !b.is_block_atom() && !b.is_textblock())
        });
        if needs_gap {
            out.push(EditorNode::empty_paragraph(ids));
            changed = true;
        }
        out.push(child);
    }
    node.children = out;
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::normalize::test_support::raw_state;
    use crate::tree::NodeType;

    fn kinds(nodes: &[EditorNode]) -> Vec<NodeType> {
        nodes.iter().map(|n| n.kind).collect()
    }

    #[test]
    fn test_atom_next_to_list_gets_paragraph() {
        let state = raw_state("- a\n\n---\n\n> q");
        let next = guard_atom_runs(&state).unwrap();
        assert_eq!(
            kinds(&next.doc.children),
            vec![
                NodeType::BulletList,
                NodeType::Paragraph,
                NodeType::HorizontalRule,
                NodeType::Paragraph,
                NodeType::Blockquote
            ]
        );
    }

    #[test]
    fn test_consecutive_atoms_form_one_run() {
        let state = raw_state("text\n\n---\n\n!!!include(a.md)!!!\n\ntext");
        assert!(guard_atom_runs(&state).is_none());
    }

    #[test]
    fn test_container_edges_are_fine() {
        let state = raw_state("text\n\n::: note\n---\n:::\n\ntext");
        assert!(guard_atom_runs(&state).is_none());
    }

    #[test]
    fn test_nested_containers_are_scanned() {
        let state = raw_state("text\n\n::: note\n---\n- item\n:::\n\ntext");
        let next = guard_atom_runs(&state).unwrap();
        let container = &next.doc.children[1];
        assert_eq!(
            kinds(&container.children),
            vec![NodeType::HorizontalRule, NodeType::Paragraph, NodeType::BulletList]
        );
    }
}
