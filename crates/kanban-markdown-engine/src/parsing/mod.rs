//! Dialect text to document tree.
//!
//! [`tokenize`] produces the block token stream (inline tokens nested as
//! children of `Inline` tokens); [`parse`] maps it onto a [`WysiwygDoc`].
//! Neither fails: constructs without their closing delimiter decline and end
//! up as literal text.

pub mod blocks;
pub mod inline;
pub mod rope;
pub mod token;
pub mod tree_builder;

use log::debug;

use crate::options::DialectOptions;
use crate::tree::WysiwygDoc;

pub use token::{Nesting, Token, TokenKind, TokenMeta};
pub use tree_builder::TreeBuilder;

pub fn tokenize(text: &str, options: &DialectOptions) -> Vec<Token> {
    blocks::tokenize_blocks(text, options)
}

pub fn parse(text: &str, options: &DialectOptions) -> WysiwygDoc {
    let tokens = tokenize(text, options);
    debug!("tokenized {} bytes into {} block tokens", text.len(), tokens.len());
    TreeBuilder::new(options).build(&tokens)
}
