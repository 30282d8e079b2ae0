use std::mem;

use uuid::Uuid;

use crate::tree::{NodeType, WysiwygDoc, WysiwygNode};

use super::adapter::{convert, filled};
use super::error::EditError;
use super::inline;
use super::normalize::loaded;
use super::patch::RenderRequest;
use super::schema::{allows, holds_blocks};
use super::state::{EditorNode, EditorState, NodeId, Position, Selection};

/// Which side of a converted node the caret lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Before,
    After,
}

/// Commands that can be applied to the document
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Replaces the selection with `text`.
    InsertText {
        text: String,
    },
    DeleteRange {
        from: Position,
        to: Position,
    },
    /// Enter: splits the textblock at the caret. Splitting the first
    /// paragraph of a list item starts a new item.
    SplitBlock,
    /// Replaces the selection with an inline atom.
    InsertInline {
        node: WysiwygNode,
    },
    SetSelection {
        selection: Selection,
    },
    ReplaceContent {
        doc: WysiwygDoc,
    },
    /// Moves media between block and inline placement. `insert_text` is
    /// typed next to the node after conversion.
    ConvertMedia {
        node: NodeId,
        side: Option<Side>,
        insert_text: Option<String>,
    },
    ToggleCheckbox {
        node: NodeId,
    },
    AddColumn {
        multicolumn: NodeId,
    },
    /// Removes the last column.
    RemoveColumn {
        multicolumn: NodeId,
    },
    ToggleDiagramSource {
        node: NodeId,
    },
    SetDiagramSource {
        node: NodeId,
        code: String,
    },
    /// Surrounds a non-empty selection with `before` and `after`.
    WrapSelection {
        before: String,
        after: String,
    },
}

impl Cmd {
    pub fn insert_text(text: impl Into<String>) -> Self {
        Cmd::InsertText { text: text.into() }
    }

    pub fn wrap(before: impl Into<String>, after: impl Into<String>) -> Self {
        Cmd::WrapSelection {
            before: before.into(),
            after: after.into(),
        }
    }
}

/// What a command did to the state it ran on.
#[derive(Debug, Default)]
pub(crate) struct Outcome {
    pub changed: Vec<NodeId>,
    pub content_changed: bool,
    pub render: Option<RenderRequest>,
}

impl Outcome {
    fn edited(changed: Vec<NodeId>) -> Self {
        Self {
            changed,
            content_changed: true,
            render: None,
        }
    }
}

/// Runs `cmd` against `state`. On error `state` may be partly modified; the
/// caller works on a copy.
pub(crate) fn execute(state: &mut EditorState, cmd: Cmd) -> Result<Outcome, EditError> {
    match cmd {
        Cmd::InsertText { text } => insert_text(state, &text),
        Cmd::DeleteRange { from, to } => delete_range(state, from, to),
        Cmd::SplitBlock => split_block(state),
        Cmd::InsertInline { node } => insert_inline(state, &node),
        Cmd::SetSelection { selection } => {
            check_selection(&state.doc, &selection)?;
            state.selection = selection;
            Ok(Outcome::default())
        }
        Cmd::ReplaceContent { doc } => {
            *state = loaded(&doc, mem::take(&mut state.ids));
            Ok(Outcome::edited(vec![state.doc.id]))
        }
        Cmd::ConvertMedia {
            node,
            side,
            insert_text,
        } => convert_media(state, node, side, insert_text),
        Cmd::ToggleCheckbox { node } => {
            let checkbox = node_of(&mut state.doc, node, NodeType::TaskCheckbox)?;
            let checked = !checkbox.attr_bool("checked");
            checkbox.attrs.insert("checked".to_string(), checked.into());
            Ok(Outcome::edited(vec![node]))
        }
        Cmd::AddColumn { multicolumn } => {
            let EditorState { doc, ids, .. } = &mut *state;
            let parent = node_of(doc, multicolumn, NodeType::Multicolumn)?;
            parent.children.push(filled(NodeType::MulticolumnColumn, ids));
            Ok(Outcome::edited(vec![multicolumn]))
        }
        Cmd::RemoveColumn { multicolumn } => remove_column(state, multicolumn),
        Cmd::ToggleDiagramSource { node } => toggle_diagram_source(state, node),
        Cmd::SetDiagramSource { node, code } => {
            if !state.view.diagram_source.contains(&node) {
                node_of(&mut state.doc, node, NodeType::DiagramFence)?;
                return Err(EditError::NotInSourceMode(node));
            }
            let fence = node_of(&mut state.doc, node, NodeType::DiagramFence)?;
            fence.attrs.insert("code".to_string(), code.into());
            Ok(Outcome::edited(vec![node]))
        }
        Cmd::WrapSelection { before, after } => wrap_selection(state, &before, &after),
    }
}

fn node_of(doc: &mut EditorNode, id: NodeId, kind: NodeType) -> Result<&mut EditorNode, EditError> {
    let node = doc.find_mut(id).ok_or(EditError::UnknownNode(id))?;
    if node.kind != kind {
        return Err(EditError::WrongNodeType {
            id,
            expected: kind.as_str(),
            found: node.kind,
        });
    }
    Ok(node)
}

fn check_position(doc: &EditorNode, pos: Position) -> Result<(), EditError> {
    let block = doc.find(pos.block).ok_or(EditError::UnknownNode(pos.block))?;
    if !block.kind.is_textblock() {
        return Err(EditError::WrongNodeType {
            id: pos.block,
            expected: "textblock",
            found: block.kind,
        });
    }
    if !inline::is_boundary(block, pos.offset) {
        return Err(EditError::PositionOutOfRange {
            block: pos.block,
            offset: pos.offset,
        });
    }
    Ok(())
}

fn check_selection(doc: &EditorNode, selection: &Selection) -> Result<(), EditError> {
    match *selection {
        Selection::Text { anchor, head } => {
            check_position(doc, anchor)?;
            check_position(doc, head)
        }
        Selection::Node(id) => doc.find(id).map(|_| ()).ok_or(EditError::UnknownNode(id)),
    }
}

/// The selected block and ordered offsets, for commands that edit text.
fn text_range(state: &EditorState) -> Result<(NodeId, usize, usize), EditError> {
    if let Selection::Node(_) = state.selection {
        return Err(EditError::NoTextSelection);
    }
    check_selection(&state.doc, &state.selection)?;
    state
        .selection
        .block_range()
        .ok_or(EditError::CrossBlockSelection)
}

fn textblock(doc: &mut EditorNode, id: NodeId) -> Result<&mut EditorNode, EditError> {
    doc.find_mut(id).ok_or(EditError::UnknownNode(id))
}

fn insert_text(state: &mut EditorState, text: &str) -> Result<Outcome, EditError> {
    let (block, from, to) = text_range(state)?;
    let EditorState { doc, ids, .. } = &mut *state;
    let target = textblock(doc, block)?;
    inline::delete_range(target, from, to, ids);
    inline::insert_text(target, from, text, ids);
    state.selection = Selection::caret(Position::new(block, from + text.len()));
    Ok(Outcome::edited(vec![block]))
}

fn delete_range(state: &mut EditorState, from: Position, to: Position) -> Result<Outcome, EditError> {
    if from.block != to.block {
        return Err(EditError::CrossBlockSelection);
    }
    check_position(&state.doc, from)?;
    check_position(&state.doc, to)?;
    let (start, end) = (from.offset.min(to.offset), from.offset.max(to.offset));
    let EditorState { doc, ids, .. } = &mut *state;
    inline::delete_range(textblock(doc, from.block)?, start, end, ids);
    state.selection = Selection::caret(Position::new(from.block, start));
    Ok(Outcome::edited(vec![from.block]))
}

fn split_block(state: &mut EditorState) -> Result<Outcome, EditError> {
    let (block, from, to) = text_range(state)?;
    let EditorState { doc, ids, .. } = &mut *state;
    let path = doc.path_to(block).ok_or(EditError::UnknownNode(block))?;
    let (&index, parent_path) = path.split_last().ok_or(EditError::UnknownNode(block))?;

    let target = textblock(doc, block)?;
    inline::delete_range(target, from, to, ids);
    if matches!(target.kind, NodeType::CodeBlock | NodeType::SpeakerNote) {
        inline::insert_text(target, from, "\n", ids);
        state.selection = Selection::caret(Position::new(block, from + 1));
        return Ok(Outcome::edited(vec![block]));
    }
    let (left, mut right) = inline::split_at(mem::take(&mut target.children), from, ids);
    target.children = left;
    let had_checkbox = target
        .children
        .first()
        .is_some_and(|c| c.kind == NodeType::TaskCheckbox);

    let parent = doc.at_mut(parent_path).ok_or(EditError::UnknownNode(block))?;
    if parent.kind == NodeType::ListItem && index == 0 {
        let mut offset = 0;
        if had_checkbox {
            let checkbox = EditorNode::new(ids.next_id(), NodeType::TaskCheckbox).with_attr("checked", false);
            right.insert(0, checkbox);
            offset = 1;
        }
        let para = EditorNode::new(ids.next_id(), NodeType::Paragraph).with_children(right);
        let caret = Position::new(para.id, offset);
        let item = EditorNode::new(ids.next_id(), NodeType::ListItem).with_children(vec![para]);

        let (&item_index, list_path) = parent_path.split_last().ok_or(EditError::UnknownNode(block))?;
        let list = doc.at_mut(list_path).ok_or(EditError::UnknownNode(block))?;
        list.children.insert(item_index + 1, item);
        let list_id = list.id;
        state.selection = Selection::caret(caret);
        return Ok(Outcome::edited(vec![list_id]));
    }

    // Headings do not continue past Enter; the tail becomes a paragraph.
    let para = EditorNode::new(ids.next_id(), NodeType::Paragraph).with_children(right);
    let caret = Position::new(para.id, 0);
    parent.children.insert(index + 1, para);
    let parent_id = parent.id;
    state.selection = Selection::caret(caret);
    Ok(Outcome::edited(vec![parent_id]))
}

fn insert_inline(state: &mut EditorState, node: &WysiwygNode) -> Result<Outcome, EditError> {
    if !(node.kind.is_inline() && node.kind.is_atom()) {
        return Err(EditError::NotInline(node.kind));
    }
    let (block, from, to) = text_range(state)?;
    let EditorState { doc, ids, .. } = &mut *state;
    let target = textblock(doc, block)?;
    if !allows(target.kind, node.kind) {
        return Err(EditError::NotInline(node.kind));
    }
    inline::delete_range(target, from, to, ids);
    let atom = convert(node, ids);
    inline::insert_node(target, from, atom, ids);
    state.selection = Selection::caret(Position::new(block, from + 1));
    Ok(Outcome::edited(vec![block]))
}

fn convert_media(
    state: &mut EditorState,
    id: NodeId,
    side: Option<Side>,
    insert_text: Option<String>,
) -> Result<Outcome, EditError> {
    let path = state.doc.path_to(id).ok_or(EditError::UnknownNode(id))?;
    let kind = state.doc.at(&path).map(|n| n.kind).ok_or(EditError::UnknownNode(id))?;
    match kind {
        NodeType::MediaBlock => demote_media(state, &path, side, insert_text),
        NodeType::Media => promote_media(state, &path, side, insert_text),
        found => Err(EditError::WrongNodeType {
            id,
            expected: "media",
            found,
        }),
    }
}

fn demote_media(
    state: &mut EditorState,
    path: &[usize],
    side: Option<Side>,
    insert_text: Option<String>,
) -> Result<Outcome, EditError> {
    let EditorState { doc, ids, .. } = &mut *state;
    let root = doc.id;
    let (&index, parent_path) = path.split_last().ok_or(EditError::UnknownNode(root))?;
    let parent = doc.at_mut(parent_path).ok_or(EditError::UnknownNode(root))?;

    let mut media = parent.children.remove(index);
    media.kind = NodeType::Media;
    let mut para = EditorNode::new(ids.next_id(), NodeType::Paragraph).with_children(vec![media]);
    let mut offset = match side {
        Some(Side::Before) => 0,
        _ => 1,
    };
    if let Some(text) = insert_text {
        inline::insert_text(&mut para, offset, &text, ids);
        offset += text.len();
    }
    let caret = Position::new(para.id, offset);
    parent.children.insert(index, para);
    let parent_id = parent.id;
    state.selection = Selection::caret(caret);
    Ok(Outcome::edited(vec![parent_id]))
}

fn promote_media(
    state: &mut EditorState,
    path: &[usize],
    side: Option<Side>,
    insert_text: Option<String>,
) -> Result<Outcome, EditError> {
    let EditorState { doc, ids, .. } = &mut *state;
    let root = doc.id;
    let (&media_index, para_path) = path.split_last().ok_or(EditError::UnknownNode(root))?;
    let (&para_index, container_path) = para_path.split_last().ok_or(EditError::UnknownNode(root))?;
    let container = doc.at_mut(container_path).ok_or(EditError::UnknownNode(root))?;
    let para_ref = &container.children[para_index];
    if para_ref.kind != NodeType::Paragraph || !holds_blocks(container.kind) {
        return Err(EditError::WrongNodeType {
            id: para_ref.id,
            expected: "paragraph",
            found: para_ref.kind,
        });
    }

    let mut para = container.children.remove(para_index);
    let mut right = para.children.split_off(media_index);
    let mut media = right.remove(0);
    media.kind = NodeType::MediaBlock;
    media.marks.clear();
    let media_id = media.id;
    // Typing always needs a caret; default to after the block.
    let side = side.or(insert_text.as_ref().map(|_| Side::After));

    let mut caret = None;
    let mut blocks = vec![];
    if !para.children.is_empty() || side == Some(Side::Before) {
        if side == Some(Side::Before) {
            caret = Some(Position::new(para.id, para.inline_len()));
        }
        blocks.push(para);
    }
    blocks.push(media);
    if !right.is_empty() || side == Some(Side::After) {
        let tail = EditorNode::new(ids.next_id(), NodeType::Paragraph).with_children(right);
        if side == Some(Side::After) {
            caret = Some(Position::new(tail.id, 0));
        }
        blocks.push(tail);
    }
    let container_id = container.id;
    let rest = container.children.split_off(para_index);
    container.children.extend(blocks);
    container.children.extend(rest);

    state.selection = match caret {
        Some(mut pos) => {
            if let Some(text) = insert_text {
                inline::insert_text(textblock(&mut state.doc, pos.block)?, pos.offset, &text, &mut state.ids);
                pos.offset += text.len();
            }
            Selection::caret(pos)
        }
        None => Selection::Node(media_id),
    };
    Ok(Outcome::edited(vec![container_id]))
}

fn remove_column(state: &mut EditorState, multicolumn: NodeId) -> Result<Outcome, EditError> {
    let parent = node_of(&mut state.doc, multicolumn, NodeType::Multicolumn)?;
    if parent.children.len() <= 1 {
        return Err(EditError::LastColumn(multicolumn));
    }
    let Some(removed) = parent.children.pop() else {
        return Err(EditError::LastColumn(multicolumn));
    };
    let fallback = parent
        .children
        .last()
        .and_then(EditorNode::first_textblock)
        .map(|block| Selection::caret(Position::new(block.id, 0)));

    let selection_lost = match state.selection {
        Selection::Text { anchor, head } => {
            removed.find(anchor.block).is_some() || removed.find(head.block).is_some()
        }
        Selection::Node(id) => removed.find(id).is_some(),
    };
    if selection_lost {
        state.selection = fallback.unwrap_or_else(|| EditorState::default_selection(&state.doc));
    }
    Ok(Outcome::edited(vec![multicolumn]))
}

fn toggle_diagram_source(state: &mut EditorState, node: NodeId) -> Result<Outcome, EditError> {
    let fence = node_of(&mut state.doc, node, NodeType::DiagramFence)?;
    let render = if state.view.diagram_source.remove(&node) {
        Some(RenderRequest {
            id: Uuid::new_v4(),
            node,
            lang: fence.attr_str("lang").unwrap_or_default().to_string(),
            code: fence.attr_str("code").unwrap_or_default().to_string(),
        })
    } else {
        state.view.diagram_source.insert(node);
        None
    };
    Ok(Outcome {
        changed: vec![node],
        content_changed: false,
        render,
    })
}

fn wrap_selection(state: &mut EditorState, before: &str, after: &str) -> Result<Outcome, EditError> {
    let (block, from, to) = text_range(state)?;
    if from == to {
        return Err(EditError::EmptySelection);
    }
    let EditorState { doc, ids, .. } = &mut *state;
    let target = textblock(doc, block)?;
    inline::insert_text(target, to, after, ids);
    inline::insert_text(target, from, before, ids);
    state.selection = Selection::range(
        Position::new(block, from + before.len()),
        Position::new(block, to + before.len()),
    );
    Ok(Outcome::edited(vec![block]))
}
