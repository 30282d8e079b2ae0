use std::collections::BTreeSet;
use std::fmt;

use crate::tree::{Attrs, NodeType, WysiwygMark};

/// Identity of a node in the live model. Never reused within one editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out fresh node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn next_id(&mut self) -> NodeId {
        self.next += 1;
        NodeId(self.next)
    }
}

/// A node of the live model: a tree node plus identity.
///
/// Text nodes keep their text in `text`; every other node leaves it empty.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorNode {
    pub id: NodeId,
    pub kind: NodeType,
    pub attrs: Attrs,
    pub children: Vec<EditorNode>,
    pub marks: Vec<WysiwygMark>,
    pub text: String,
}

impl EditorNode {
    pub fn new(id: NodeId, kind: NodeType) -> Self {
        Self {
            id,
            kind,
            attrs: Attrs::new(),
            children: vec![],
            marks: vec![],
            text: String::new(),
        }
    }

    pub fn text(id: NodeId, text: impl Into<String>, marks: Vec<WysiwygMark>) -> Self {
        Self {
            text: text.into(),
            marks,
            ..Self::new(id, NodeType::Text)
        }
    }

    pub fn empty_paragraph(ids: &mut IdAllocator) -> Self {
        Self::new(ids.next_id(), NodeType::Paragraph)
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<EditorNode>) -> Self {
        self.children = children;
        self
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(serde_json::Value::as_str)
    }

    pub fn attr_bool(&self, key: &str) -> bool {
        self.attrs
            .get(key)
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeType::Text
    }

    /// Index path from `self` to the node with `id`, empty for `self`.
    pub fn path_to(&self, id: NodeId) -> Option<Vec<usize>> {
        if self.id == id {
            return Some(vec![]);
        }
        for (i, child) in self.children.iter().enumerate() {
            if let Some(mut path) = child.path_to(id) {
                path.insert(0, i);
                return Some(path);
            }
        }
        None
    }

    pub fn at(&self, path: &[usize]) -> Option<&EditorNode> {
        match path.split_first() {
            None => Some(self),
            Some((i, rest)) => self.children.get(*i)?.at(rest),
        }
    }

    pub fn at_mut(&mut self, path: &[usize]) -> Option<&mut EditorNode> {
        match path.split_first() {
            None => Some(self),
            Some((i, rest)) => self.children.get_mut(*i)?.at_mut(rest),
        }
    }

    pub fn find(&self, id: NodeId) -> Option<&EditorNode> {
        self.path_to(id).and_then(|path| self.at(&path))
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut EditorNode> {
        let path = self.path_to(id)?;
        self.at_mut(&path)
    }

    /// First textblock in document order.
    pub fn first_textblock(&self) -> Option<&EditorNode> {
        if self.kind.is_textblock() {
            return Some(self);
        }
        self.children.iter().find_map(EditorNode::first_textblock)
    }

    /// Inline length: text counts its bytes, every inline atom counts one.
    pub fn inline_len(&self) -> usize {
        self.children.iter().map(EditorNode::unit_len).sum()
    }

    pub(crate) fn unit_len(&self) -> usize {
        if self.is_text() { self.text.len() } else { 1 }
    }
}

/// A caret location inside a textblock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub block: NodeId,
    pub offset: usize,
}

impl Position {
    pub fn new(block: NodeId, offset: usize) -> Self {
        Self { block, offset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Text { anchor: Position, head: Position },
    /// A whole node is selected, e.g. an atom block.
    Node(NodeId),
}

impl Selection {
    pub fn caret(pos: Position) -> Self {
        Selection::Text {
            anchor: pos,
            head: pos,
        }
    }

    pub fn range(anchor: Position, head: Position) -> Self {
        Selection::Text { anchor, head }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Selection::Text { anchor, head } => anchor == head,
            Selection::Node(_) => false,
        }
    }

    /// Whether the selection touches the node with `id`.
    pub fn touches(&self, id: NodeId) -> bool {
        match self {
            Selection::Text { anchor, head } => anchor.block == id || head.block == id,
            Selection::Node(node) => *node == id,
        }
    }

    /// Start and end of a text selection within one block, in document order.
    pub fn block_range(&self) -> Option<(NodeId, usize, usize)> {
        match self {
            Selection::Text { anchor, head } if anchor.block == head.block => Some((
                anchor.block,
                anchor.offset.min(head.offset),
                anchor.offset.max(head.offset),
            )),
            _ => None,
        }
    }
}

/// Editor-only view state, never serialized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Diagram fences currently shown as editable source.
    pub diagram_source: BTreeSet<NodeId>,
}

/// A snapshot of the live model.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub doc: EditorNode,
    pub selection: Selection,
    pub view: ViewState,
    pub ids: IdAllocator,
}

impl EditorState {
    /// Caret at the start of the first textblock, else the whole document.
    pub fn default_selection(doc: &EditorNode) -> Selection {
        match doc.first_textblock() {
            Some(block) => Selection::caret(Position::new(block.id, 0)),
            None => Selection::Node(doc.id),
        }
    }

    /// Whether the selection still points at existing textblocks in range.
    pub fn selection_is_valid(&self) -> bool {
        let valid_pos = |pos: &Position| {
            self.doc
                .find(pos.block)
                .is_some_and(|b| b.kind.is_textblock() && pos.offset <= b.inline_len())
        };
        match &self.selection {
            Selection::Text { anchor, head } => valid_pos(anchor) && valid_pos(head),
            Selection::Node(id) => self.doc.find(*id).is_some(),
        }
    }
}
