use std::sync::LazyLock;

use regex::Regex;

use crate::editing::state::{EditorNode, EditorState, IdAllocator, NodeId, Position, Selection};
use crate::tree::NodeType;

static TYPED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([ xX])\]\s+").expect("valid checkbox regex"));

/// A checkbox split off the front of a list item's first paragraph.
struct Split {
    block: NodeId,
    used: usize,
}

/// Turns a typed `[ ] ` or `[x] ` at the start of a list item into a
/// `task_checkbox` node.
pub fn recognize_checkboxes(state: &EditorState) -> Option<EditorState> {
    let mut next = state.clone();
    let mut splits = vec![];
    recognize(&mut next.doc, &mut next.ids, &mut splits);
    if splits.is_empty() {
        return None;
    }
    for split in &splits {
        next.selection = remap(next.selection, split);
    }
    Some(next)
}

fn recognize(node: &mut EditorNode, ids: &mut IdAllocator, splits: &mut Vec<Split>) {
    if node.kind == NodeType::ListItem
        && let Some(para) = node.children.first_mut()
        && para.kind == NodeType::Paragraph
        && let Some(used) = split_marker(para, ids)
    {
        splits.push(Split {
            block: para.id,
            used,
        });
    }
    for child in &mut node.children {
        recognize(child, ids, splits);
    }
}

fn split_marker(para: &mut EditorNode, ids: &mut IdAllocator) -> Option<usize> {
    let first = para.children.first_mut().filter(|c| c.is_text())?;
    let caps = TYPED_MARKER.captures(&first.text)?;
    let checked = caps.get(1)?.as_str() != " ";
    let used = caps.get(0)?.end();

    let checkbox = EditorNode::new(ids.next_id(), NodeType::TaskCheckbox).with_attr("checked", checked);
    first.text.drain(..used);
    if first.text.is_empty() {
        para.children.remove(0);
    }
    para.children.insert(0, checkbox);
    Some(used)
}

/// The marker's bytes collapse into one atom.
fn remap(selection: Selection, split: &Split) -> Selection {
    let shift = |pos: Position| {
        if pos.block != split.block || pos.offset == 0 {
            return pos;
        }
        let offset = if pos.offset < split.used {
            1
        } else {
            pos.offset - split.used + 1
        };
        Position::new(pos.block, offset)
    };
    match selection {
        Selection::Text { anchor, head } => Selection::range(shift(anchor), shift(head)),
        node => node,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::normalize::test_support::raw_state;
    use crate::tree::{MarkType, WysiwygMark};
    use pretty_assertions::assert_eq;

    /// A one-item list whose paragraph text is replaced by `text`.
    fn typed(text: &str) -> (EditorState, NodeId) {
        let mut state = raw_state("- placeholder");
        let para = &mut state.doc.children[0].children[0].children[0];
        para.children[0].text = text.to_string();
        let id = para.id;
        (state, id)
    }

    #[test]
    fn test_typed_marker_becomes_checkbox() {
        let (state, para) = typed("[x] buy milk");
        let next = recognize_checkboxes(&state).unwrap();
        let block = next.doc.find(para).unwrap();
        assert_eq!(block.children[0].kind, NodeType::TaskCheckbox);
        assert!(block.children[0].attr_bool("checked"));
        assert_eq!(block.children[1].text, "buy milk");
    }

    #[test]
    fn test_marks_are_kept_on_rest() {
        let (mut state, para) = typed("[ ] bold");
        let strong = vec![WysiwygMark::new(MarkType::Strong)];
        state.doc.find_mut(para).unwrap().children[0].marks = strong.clone();
        let next = recognize_checkboxes(&state).unwrap();
        let block = next.doc.find(para).unwrap();
        assert!(!block.children[0].attr_bool("checked"));
        assert_eq!(block.children[1].marks, strong);
    }

    #[test]
    fn test_marker_needs_trailing_space() {
        let (state, _) = typed("[x]done");
        assert!(recognize_checkboxes(&state).is_none());
    }

    #[test]
    fn test_only_list_items_are_scanned() {
        let state = raw_state("\\[x] not a task");
        assert!(recognize_checkboxes(&state).is_none());
    }

    #[test]
    fn test_caret_follows_text() {
        let (mut state, para) = typed("[x] abc");
        state.selection = Selection::range(Position::new(para, 2), Position::new(para, 6));
        let next = recognize_checkboxes(&state).unwrap();
        assert_eq!(
            next.selection,
            Selection::range(Position::new(para, 1), Position::new(para, 3))
        );
    }
}
