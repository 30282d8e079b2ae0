//! Engine for a Markdown dialect used by kanban note boards.
//!
//! The pipeline is `text -> tokens -> tree -> editor model` and back:
//!
//! - [`tokenize`] and [`parse`] turn dialect text into a [`WysiwygDoc`],
//! - [`serialize`] writes a tree back to dialect text,
//! - [`Editor`] holds a live, normalized model and applies [`Cmd`]s.
//!
//! `serialize(parse(t))` reproduces every supported construct, and
//! `parse(serialize(parse(t))) == parse(t)`.

pub mod editing;
pub mod includes;
pub mod options;
pub mod parsing;
pub mod serialize;
pub mod tree;

pub use editing::{Cmd, EditError, Editor, Patch, RenderRequest, Selection, Side};
pub use includes::{collect_includes, mark_missing_includes};
pub use options::DialectOptions;
pub use parsing::{parse, tokenize};
pub use serialize::serialize;
pub use tree::{MarkType, NodeType, WysiwygDoc, WysiwygMark, WysiwygNode};
