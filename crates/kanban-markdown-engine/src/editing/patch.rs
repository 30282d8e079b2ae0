use uuid::Uuid;

use super::state::{NodeId, Selection};

/// Ask the host to render a diagram preview.
///
/// Each request carries a fresh id; a newer request for the same node
/// supersedes older ones.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub id: Uuid,
    pub node: NodeId,
    pub lang: String,
    pub code: String,
}

/// Result of applying a command
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// Nodes whose content or attributes the command touched.
    pub changed: Vec<NodeId>,
    pub new_selection: Selection,
    pub version: u64,
    pub render: Option<RenderRequest>,
    /// Normalization passes that fired after the command.
    pub normalized: Vec<&'static str>,
}
