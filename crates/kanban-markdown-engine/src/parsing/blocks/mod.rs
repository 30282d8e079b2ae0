//! # Block Tokenizing
//!
//! Two-phase block tokenizing over an `xi_rope::Rope`.
//!
//! ## Phases
//!
//! 1. **Line Classification** (`classify`): each line becomes a `LineClass`
//!    holding local facts (indentation, blank status, fence signature).
//!
//! 2. **Block Construction** (`builder`): `BlockBuilder` walks the classified
//!    lines, trying each block rule in precedence order, and emits open/close
//!    token pairs. Container bodies are collected, stripped of their prefix
//!    and tokenized again.
//!
//! ## Modules
//!
//! - **`kinds`**: block-specific types that own their delimiters. The
//!   serializer asks these for markers, so the two directions cannot drift.
//! - **`classify`**: `MarkdownLineClassifier` produces `LineClass` per line
//! - **`builder`**: `BlockBuilder` and its rule table
//!
//! ## Key Invariants
//!
//! - Nesting depth is unbounded (lists in quotes in columns, etc.)
//! - Fenced code is a raw zone: no block or inline parsing inside
//! - Leaf blocks carry one `Inline` token whose children are inline tokens

pub mod builder;
pub mod classify;
pub mod kinds;

use xi_rope::Rope;

use crate::options::DialectOptions;
use crate::parsing::rope::lines::lines_with_spans;
use crate::parsing::token::Token;

pub use builder::BlockBuilder;
pub use classify::{LineClass, MarkdownLineClassifier};

/// Tokenizes `src` into a flat block token stream.
pub fn tokenize_blocks(src: &str, options: &DialectOptions) -> Vec<Token> {
    let rope = Rope::from(src);
    let classifier = MarkdownLineClassifier;
    let lines = lines_with_spans(&rope)
        .map(|lr| classifier.classify(&lr))
        .collect();
    BlockBuilder::new(lines, options).run()
}
