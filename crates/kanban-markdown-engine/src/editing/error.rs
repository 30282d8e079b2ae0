use crate::tree::NodeType;

use super::state::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("No node with id {0}")]
    UnknownNode(NodeId),
    #[error("Node {id} is a {found}, expected {expected}")]
    WrongNodeType {
        id: NodeId,
        expected: &'static str,
        found: NodeType,
    },
    #[error("Cannot remove the last column of multicolumn {0}")]
    LastColumn(NodeId),
    #[error("No text is selected")]
    NoTextSelection,
    #[error("Selection is empty")]
    EmptySelection,
    #[error("Selection spans more than one block")]
    CrossBlockSelection,
    #[error("Offset {offset} is out of range in block {block}")]
    PositionOutOfRange { block: NodeId, offset: usize },
    #[error("Diagram {0} is not in source mode")]
    NotInSourceMode(NodeId),
    #[error("A {0} cannot be inserted inline")]
    NotInline(NodeType),
}
