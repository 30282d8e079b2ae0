//! # Inline Parsing
//!
//! Cursor-based inline parsing over the content of a leaf block.
//!
//! ## Modules
//!
//! - **`kinds`**: inline kinds that own their delimiters (`WikiLink`, `Include`, tags, ...)
//! - **`cursor`**: `Cursor` for char-by-char scanning
//! - **`parser`**: `parse_inline()` with one `try_parse_*` rule per construct
//!
//! ## Precedence
//!
//! Rules run in a fixed order at each position and the first one that claims
//! the input wins. Code spans run first, so `` `[[not a link]]` `` stays code.
//! Rules that cannot find their closing delimiter decline, and the characters
//! fall through to text.

pub mod cursor;
pub mod kinds;
pub mod parser;

pub use parser::parse_inline;
