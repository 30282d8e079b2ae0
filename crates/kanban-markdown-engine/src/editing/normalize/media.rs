use crate::editing::adapter::pad_atom_ends;
use crate::editing::state::{EditorNode, EditorState, Selection};
use crate::tree::NodeType;

/// Promotes media-only paragraphs to media blocks, then keeps the document's
/// first and last child editable.
///
/// A paragraph holding the selection is left alone so typing next to an
/// image does not yank it out from under the caret.
pub fn place_media(state: &EditorState) -> Option<EditorState> {
    let mut next = state.clone();
    let promoted = promote(&mut next.doc.children, &state.selection);
    let padded = pad_atom_ends(&mut next.doc.children, &mut next.ids);
    (promoted || padded).then_some(next)
}

fn is_media_only(node: &EditorNode) -> bool {
    node.kind == NodeType::Paragraph
        && node.children.iter().any(|c| c.kind == NodeType::Media)
        && node
            .children
            .iter()
            .all(|c| c.kind == NodeType::Media || (c.is_text() && c.text.trim().is_empty()))
}

fn holds_selection(node: &EditorNode, selection: &Selection) -> bool {
    match selection {
        Selection::Text { anchor, head } => anchor.block == node.id || head.block == node.id,
        Selection::Node(id) => *id != node.id && node.find(*id).is_some(),
    }
}

fn promote(children: &mut Vec<EditorNode>, selection: &Selection) -> bool {
    let mut changed = false;
    let mut out = Vec::with_capacity(children.len());
    for mut child in children.drain(..) {
        if is_media_only(&child) && !holds_selection(&child, selection) {
            // The block keeps the inline node's id and attrs.
            out.extend(
                child
                    .children
                    .into_iter()
                    .filter(|c| c.kind == NodeType::Media)
                    .map(|media| EditorNode {
                        kind: NodeType::MediaBlock,
                        marks: vec![],
                        ..media
                    }),
            );
            changed = true;
            continue;
        }
        changed |= promote(&mut child.children, selection);
        out.push(child);
    }
    *children = out;
    changed
}
