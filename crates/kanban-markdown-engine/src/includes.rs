//! Include discovery over a parsed document.
//!
//! The engine never touches the file system; hosts resolve the collected
//! paths and report back which ones exist.

use relative_path::{RelativePath, RelativePathBuf};

use crate::tree::{NodeType, WysiwygDoc, WysiwygNode};

fn is_include(node: &WysiwygNode) -> bool {
    matches!(node.kind, NodeType::Include | NodeType::IncludeBlock)
}

/// Every include path in document order, duplicates kept.
pub fn collect_includes(doc: &WysiwygDoc) -> Vec<RelativePathBuf> {
    let mut out = vec![];
    collect(doc, &mut out);
    out
}

fn collect(node: &WysiwygNode, out: &mut Vec<RelativePathBuf>) {
    if is_include(node)
        && let Some(path) = node.attr_str("path")
    {
        out.push(RelativePathBuf::from(path));
    }
    for child in &node.content {
        collect(child, out);
    }
}

/// Flags includes whose path `exists` rejects with `missing: true` and clears
/// the flag on the others. Returns how many are missing.
pub fn mark_missing_includes(doc: &mut WysiwygDoc, exists: impl Fn(&RelativePath) -> bool) -> usize {
    mark(doc, &exists)
}

fn mark(node: &mut WysiwygNode, exists: &impl Fn(&RelativePath) -> bool) -> usize {
    let mut missing = 0;
    if is_include(node) {
        let found = node
            .attr_str("path")
            .is_some_and(|path| exists(RelativePath::new(path)));
        if found {
            node.attrs.remove("missing");
        } else {
            node.attrs.insert("missing".to_string(), true.into());
            missing += 1;
        }
    }
    for child in &mut node.content {
        missing += mark(child, exists);
    }
    missing
}
