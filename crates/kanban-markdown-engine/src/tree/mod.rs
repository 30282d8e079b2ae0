//! Portable document tree.
//!
//! This is the ProseMirror-shaped JSON document that both the parser produces
//! and the serializer consumes. It carries no identity; the editor assigns
//! node ids when it loads a tree (see [`crate::editing`]).

pub mod types;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use types::{MarkType, NodeType};

/// Node attributes, kept sorted so serialized JSON is stable.
pub type Attrs = BTreeMap<String, Value>;

/// A tree whose root is a `doc` node.
pub type WysiwygDoc = WysiwygNode;

/// A formatting mark applied to a text node or an inline atom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WysiwygMark {
    #[serde(rename = "type")]
    pub kind: MarkType,
    #[serde(default, skip_serializing_if = "Attrs::is_empty")]
    pub attrs: Attrs,
}

impl WysiwygMark {
    pub fn new(kind: MarkType) -> Self {
        Self {
            kind,
            attrs: Attrs::new(),
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }
}

/// A node of the portable tree.
///
/// Only `text` nodes carry `text`. Text and inline atoms carry the `marks`
/// they sit inside; every other node keeps its data in `attrs` and its
/// children in `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WysiwygNode {
    #[serde(rename = "type")]
    pub kind: NodeType,
    #[serde(default, skip_serializing_if = "Attrs::is_empty")]
    pub attrs: Attrs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<WysiwygNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<WysiwygMark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl WysiwygNode {
    pub fn new(kind: NodeType) -> Self {
        Self {
            kind,
            attrs: Attrs::new(),
            content: Vec::new(),
            marks: Vec::new(),
            text: None,
        }
    }

    pub fn doc(content: Vec<WysiwygNode>) -> Self {
        Self::new(NodeType::Doc).with_content(content)
    }

    pub fn paragraph(content: Vec<WysiwygNode>) -> Self {
        Self::new(NodeType::Paragraph).with_content(content)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(NodeType::Text)
        }
    }

    pub fn marked_text(text: impl Into<String>, marks: Vec<WysiwygMark>) -> Self {
        Self {
            marks,
            ..Self::text(text)
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    pub fn with_content(mut self, content: Vec<WysiwygNode>) -> Self {
        self.content = content;
        self
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }

    pub fn attr_u64(&self, key: &str) -> Option<u64> {
        self.attrs.get(key).and_then(Value::as_u64)
    }

    pub fn attr_bool(&self, key: &str) -> bool {
        self.attrs.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn text_str(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Concatenated text of this node and its descendants, atoms excluded.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn collect_text(node: &WysiwygNode, out: &mut String) {
    if let Some(text) = &node.text {
        out.push_str(text);
    }
    for child in &node.content {
        collect_text(child, out);
    }
}

/// Sorts marks into canonical opening order and removes exact duplicates.
pub fn canonical_marks(marks: &mut Vec<WysiwygMark>) {
    marks.sort_by_key(|m| m.kind);
    marks.dedup();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_shape_omits_empty_fields() {
        let doc = WysiwygNode::doc(vec![WysiwygNode::paragraph(vec![WysiwygNode::text("hi")])]);
        assert_eq!(
            doc.to_json().unwrap(),
            r#"{"type":"doc","content":[{"type":"paragraph","content":[{"type":"text","text":"hi"}]}]}"#
        );
    }

    #[test]
    fn marks_and_attrs_serialize_by_name() {
        let node = WysiwygNode::marked_text(
            "x",
            vec![WysiwygMark::new(MarkType::Link).with_attr("href", "https://a.b")],
        );
        assert_eq!(
            node.to_json().unwrap(),
            r#"{"type":"text","marks":[{"type":"link","attrs":{"href":"https://a.b"}}],"text":"x"}"#
        );
    }

    #[test]
    fn unknown_types_deserialize_as_unknown() {
        let node = WysiwygNode::from_json(
            r#"{"type":"doc","content":[{"type":"sparkline","attrs":{"n":3}}]}"#,
        )
        .unwrap();
        assert_eq!(node.content[0].kind, NodeType::Unknown);
        assert_eq!(node.content[0].attr_u64("n"), Some(3));
    }

    #[test]
    fn json_round_trips() {
        let json = r#"{"type":"doc","content":[{"type":"heading","attrs":{"level":2},"content":[{"type":"text","marks":[{"type":"strong"}],"text":"Title"}]}]}"#;
        let node = WysiwygNode::from_json(json).unwrap();
        assert_eq!(node.to_json().unwrap(), json);
    }

    #[test]
    fn canonical_marks_sorts_and_dedups() {
        let mut marks = vec![
            WysiwygMark::new(MarkType::Strong),
            WysiwygMark::new(MarkType::Underline),
            WysiwygMark::new(MarkType::Strong),
        ];
        canonical_marks(&mut marks);
        assert_eq!(
            marks,
            vec![
                WysiwygMark::new(MarkType::Underline),
                WysiwygMark::new(MarkType::Strong)
            ]
        );
    }

    #[test]
    fn plain_text_skips_atoms() {
        let para = WysiwygNode::paragraph(vec![
            WysiwygNode::text("a "),
            WysiwygNode::new(NodeType::Tag).with_attr("value", "x"),
            WysiwygNode::text(" b"),
        ]);
        assert_eq!(para.plain_text(), "a  b");
    }
}
