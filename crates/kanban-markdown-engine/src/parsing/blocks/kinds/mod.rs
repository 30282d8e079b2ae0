//! Block kinds own their delimiters; the builder and the serializer both
//! read syntax from here rather than hardcoding it.

pub mod block_quote;
pub mod code_fence;
pub mod container;
pub mod heading;
pub mod html_block;
pub mod list;
pub mod multicolumn;
pub mod speaker_note;
pub mod table;
pub mod thematic_break;

pub use block_quote::BlockQuote;
pub use code_fence::{CodeFence, FenceKind, FenceSig};
pub use container::Container;
pub use heading::Heading;
pub use html_block::HtmlBlock;
pub use list::{ItemStart, List, ListMarker, indent_width, strip_indent};
pub use multicolumn::{ColumnMarker, Multicolumn};
pub use speaker_note::SpeakerNote;
pub use table::{Align, Table};
pub use thematic_break::ThematicBreak;
