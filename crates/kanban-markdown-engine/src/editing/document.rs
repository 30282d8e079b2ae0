use log::debug;

use crate::options::DialectOptions;
use crate::parsing::parse;
use crate::serialize::serialize;
use crate::tree::WysiwygDoc;

use super::adapter::to_tree;
use super::commands::{Cmd, execute};
use super::error::EditError;
use super::normalize::{loaded, normalize};
use super::patch::Patch;
use super::state::{EditorState, IdAllocator, NodeId, Selection};

type ChangeCallback = Box<dyn FnMut(&str)>;

/// A live, editable document.
///
/// Every command runs the full pipeline before returning: apply the edit,
/// normalize, bump the version, notify. A failed command leaves the document
/// untouched. The change callback only fires for content changes made through
/// [`Editor::apply`]; content replaced with [`Editor::set_content`] is
/// considered already known to the host.
pub struct Editor {
    state: EditorState,
    options: DialectOptions,
    version: u64,
    on_change: Option<ChangeCallback>,
}

impl Editor {
    pub fn new(doc: &WysiwygDoc, options: DialectOptions) -> Self {
        Self {
            state: loaded(doc, IdAllocator::default()),
            options,
            version: 0,
            on_change: None,
        }
    }

    pub fn from_text(text: &str, options: DialectOptions) -> Self {
        let doc = parse(text, &options);
        Self::new(&doc, options)
    }

    /// Registers the callback receiving the serialized document after every
    /// content-changing command.
    pub fn on_change(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Apply a command to the document
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        let mut next = self.state.clone();
        let outcome = execute(&mut next, cmd)?;

        let mut normalized = vec![];
        if outcome.content_changed {
            let (state, applied) = normalize(next);
            next = state;
            normalized = applied;
            self.version += 1;
        }
        self.state = next;

        if outcome.content_changed {
            debug!("document version {} after edit", self.version);
            let text = self.to_text();
            if let Some(callback) = self.on_change.as_mut() {
                callback(&text);
            }
        }

        Ok(Patch {
            changed: outcome.changed,
            new_selection: self.state.selection,
            version: self.version,
            render: outcome.render,
            normalized,
        })
    }

    /// Overwrites the content without notifying the change callback.
    pub fn set_content(&mut self, doc: &WysiwygDoc) {
        let ids = std::mem::take(&mut self.state.ids);
        self.state = loaded(doc, ids);
        self.version += 1;
    }

    pub fn set_content_from_text(&mut self, text: &str) {
        let doc = parse(text, &self.options);
        self.set_content(&doc);
    }

    pub fn to_tree(&self) -> WysiwygDoc {
        to_tree(&self.state.doc)
    }

    pub fn to_text(&self) -> String {
        serialize(&self.to_tree(), &self.options)
    }

    pub fn selection(&self) -> Selection {
        self.state.selection
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn options(&self) -> &DialectOptions {
        &self.options
    }

    /// Whether a diagram fence is shown as editable source.
    pub fn is_source_mode(&self, node: NodeId) -> bool {
        self.state.view.diagram_source.contains(&node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::state::Position;
    use crate::tree::NodeType;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn editor(text: &str) -> Editor {
        Editor::from_text(text, DialectOptions::default())
    }

    fn recorder(editor: &mut Editor) -> Rc<RefCell<Vec<String>>> {
        let seen = Rc::new(RefCell::new(vec![]));
        let sink = Rc::clone(&seen);
        editor.on_change(move |text| sink.borrow_mut().push(text.to_string()));
        seen
    }

    fn first_paragraph(editor: &Editor) -> NodeId {
        editor.state().doc.first_textblock().map(|b| b.id).unwrap()
    }

    #[test]
    fn test_content_change_notifies_and_bumps_version() {
        let mut ed = editor("hello");
        let seen = recorder(&mut ed);
        let para = first_paragraph(&ed);
        ed.apply(Cmd::SetSelection {
            selection: Selection::caret(Position::new(para, 5)),
        })
        .unwrap();
        assert_eq!(ed.version(), 0);
        assert!(seen.borrow().is_empty());

        let patch = ed.apply(Cmd::insert_text("!")).unwrap();
        assert_eq!(patch.version, 1);
        assert_eq!(patch.changed, vec![para]);
        assert_eq!(*seen.borrow(), vec!["hello!".to_string()]);
    }

    #[test]
    fn test_failed_command_leaves_state_untouched() {
        let mut ed = editor("- [ ] task");
        let seen = recorder(&mut ed);
        let before = ed.state().clone();
        let para = first_paragraph(&ed);
        let err = ed.apply(Cmd::ToggleCheckbox { node: para }).unwrap_err();
        assert!(matches!(err, EditError::WrongNodeType { .. }));
        assert_eq!(ed.state(), &before);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_typed_checkbox_is_normalized_in_same_apply() {
        let mut ed = editor("- item");
        let para = first_paragraph(&ed);
        let patch = ed.apply(Cmd::insert_text("[x] ")).unwrap();
        assert_eq!(patch.normalized, vec!["checkbox"]);
        assert_eq!(ed.selection(), Selection::caret(Position::new(para, 1)));
        assert_eq!(ed.to_text(), "- [x] item");
        let first = &ed.state().doc.find(para).unwrap().children[0];
        assert_eq!(first.kind, NodeType::TaskCheckbox);
    }

    #[test]
    fn test_set_content_does_not_notify() {
        let mut ed = editor("old");
        let seen = recorder(&mut ed);
        ed.set_content_from_text("![a](a.png)");
        assert!(seen.borrow().is_empty());
        let kinds: Vec<_> = ed.state().doc.children.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![NodeType::Paragraph, NodeType::MediaBlock, NodeType::Paragraph]
        );
    }

    #[test]
    fn test_ids_survive_content_replacement() {
        let mut ed = editor("one");
        let old = first_paragraph(&ed);
        ed.set_content_from_text("two");
        assert_ne!(first_paragraph(&ed), old);
    }

    #[test]
    fn test_diagram_mode_is_view_state() {
        let mut ed = editor("```mermaid\ngraph TD\n```");
        let seen = recorder(&mut ed);
        let fence = ed
            .state()
            .doc
            .children
            .iter()
            .find(|c| c.kind == NodeType::DiagramFence)
            .map(|c| c.id)
            .unwrap();
        ed.apply(Cmd::ToggleDiagramSource { node: fence }).unwrap();
        assert!(ed.is_source_mode(fence));
        let patch = ed.apply(Cmd::ToggleDiagramSource { node: fence }).unwrap();
        assert!(!ed.is_source_mode(fence));
        assert!(patch.render.is_some());
        assert_eq!(ed.version(), 0);
        assert!(seen.borrow().is_empty());
    }
}
