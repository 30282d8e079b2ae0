//! The live editing model.
//!
//! An [`Editor`] owns a tree of [`EditorNode`]s with stable ids, a selection
//! and view-only state. Hosts drive it with [`Cmd`]s; each command runs
//! through one pipeline:
//!
//! 1. the command edits a copy of the state ([`commands`]),
//! 2. the normalizer repairs structure ([`normalize`]),
//! 3. the version is bumped and the change callback receives the serialized
//!    text.
//!
//! Only the resulting [`Patch`] and the new state are observable; a failing
//! command changes nothing.
//!
//! [`adapter`] converts between this model and the portable
//! [`crate::tree::WysiwygNode`] tree.

pub mod adapter;
pub mod commands;
pub mod document;
pub mod error;
pub mod inline;
pub mod normalize;
pub mod patch;
pub mod schema;
pub mod state;

pub use commands::{Cmd, Side};
pub use document::Editor;
pub use error::EditError;
pub use patch::{Patch, RenderRequest};
pub use state::{EditorNode, EditorState, IdAllocator, NodeId, Position, Selection, ViewState};
