use crate::parsing::rope::{lines::LineRef, span::Span};

use super::kinds::{CodeFence, FenceSig, indent_width};

/// Local facts about one line, computed without looking at its neighbours.
///
/// This is phase 1 of block tokenizing; the builder interprets runs of these.
#[derive(Debug, Clone)]
pub struct LineClass {
    pub line: Span,
    /// Line text without its terminator.
    pub text: String,
    pub is_blank: bool,
    /// Leading whitespace in columns.
    pub indent: usize,
    /// Set when the line looks like a fence opener or closer.
    pub fence_sig: Option<FenceSig>,
}

pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    pub fn classify(&self, lr: &LineRef) -> LineClass {
        LineClass {
            line: lr.span,
            text: lr.text.clone(),
            is_blank: lr.text.trim().is_empty(),
            indent: indent_width(&lr.text),
            fence_sig: CodeFence::sig(&lr.text),
        }
    }
}
