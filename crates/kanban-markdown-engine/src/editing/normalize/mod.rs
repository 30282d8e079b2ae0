//! Repair passes run after every content-changing edit.
//!
//! Each pass is a pure function from a state snapshot to `Some(new state)` when
//! it had something to fix, or `None`. Passes are idempotent: feeding a pass
//! its own output yields `None`.

pub mod boundaries;
pub mod checkbox;
pub mod media;

use log::{debug, trace};

use crate::tree::WysiwygDoc;

use super::adapter::to_editor;
use super::state::{EditorState, IdAllocator, Selection, ViewState};

pub type Pass = fn(&EditorState) -> Option<EditorState>;

/// Passes in the order they run.
pub const PASSES: &[(&str, Pass)] = &[
    ("media", media::place_media),
    ("boundaries", boundaries::guard_atom_runs),
    ("checkbox", checkbox::recognize_checkboxes),
];

/// Runs every pass once, in order. Returns the names of the passes that
/// changed something.
pub fn normalize(mut state: EditorState) -> (EditorState, Vec<&'static str>) {
    let mut applied = vec![];
    for (name, pass) in PASSES {
        if let Some(next) = pass(&state) {
            trace!("normalization pass `{name}` applied");
            state = next;
            applied.push(*name);
        }
    }
    if !state.selection_is_valid() {
        trace!("selection no longer valid after normalization, resetting");
        state.selection = EditorState::default_selection(&state.doc);
    }
    (state, applied)
}

/// Loads a tree as a normalized state with the caret at the start of the
/// first textblock.
///
/// Normalization runs before the caret is placed, so media paragraphs are
/// promoted on load.
pub fn loaded(tree: &WysiwygDoc, mut ids: IdAllocator) -> EditorState {
    let doc = to_editor(tree, &mut ids);
    let state = EditorState {
        selection: Selection::Node(doc.id),
        doc,
        view: ViewState::default(),
        ids,
    };
    let (mut state, applied) = normalize(state);
    if !applied.is_empty() {
        debug!("load normalization applied {applied:?}");
    }
    state.selection = EditorState::default_selection(&state.doc);
    state
}


#[cfg(test)]
mod tests {
    use super::test_support::raw_state;
    use super::*;
    use crate::editing::adapter::to_tree;
    use crate::editing::state::Position;
    use crate::options::DialectOptions;
    use crate::parsing::parse;
    use crate::serialize::serialize;
    use crate::tree::NodeType;

    #[test]
    fn test_driver_runs_passes_in_order() {
        let state = raw_state("![a](a.png)");
        let (state, applied) = normalize(state);
        assert_eq!(applied, vec!["media"]);
        let text = serialize(&to_tree(&state.doc), &DialectOptions::default());
        assert_eq!(text, "![a](a.png)");
    }

    #[test]
    fn test_loaded_state_has_caret_in_first_textblock() {
        let tree = parse("![a](a.png)", &DialectOptions::default());
        let state = loaded(&tree, IdAllocator::default());
        let kinds: Vec<_> = state.doc.children.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![NodeType::Paragraph, NodeType::MediaBlock, NodeType::Paragraph]
        );
        assert_eq!(
            state.selection,
            Selection::caret(Position::new(state.doc.children[0].id, 0))
        );
    }

    #[test]
    fn test_every_pass_is_idempotent() {
        let sources = [
            "![a](a.png)\n\n---\n\n- x",
            "- [x] done\n- plain",
            "> !!!include(a.md)!!!\n> - item",
        ];
        for src in sources {
            let mut state = raw_state(src);
            for (name, pass) in PASSES {
                if let Some(next) = pass(&state) {
                    state = next;
                }
                assert!(pass(&state).is_none(), "pass `{name}` not idempotent on {src:?}");
            }
        }
    }
}
