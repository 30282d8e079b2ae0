//! End-to-end behaviour of the dialect pipeline on small documents.

use kanban_markdown_engine::editing::Position;
use kanban_markdown_engine::{
    Cmd, DialectOptions, Editor, MarkType, NodeType, Selection, WysiwygMark, WysiwygNode, parse,
    serialize,
};
use pretty_assertions::assert_eq;

fn opts() -> DialectOptions {
    DialectOptions::default()
}

#[test]
fn bold_and_underline_paragraph() {
    let doc = parse("**bold** and _under_", &opts());
    assert_eq!(
        doc,
        WysiwygNode::doc(vec![WysiwygNode::paragraph(vec![
            WysiwygNode::marked_text("bold", vec![WysiwygMark::new(MarkType::Strong)]),
            WysiwygNode::text(" and "),
            WysiwygNode::marked_text("under", vec![WysiwygMark::new(MarkType::Underline)]),
        ])])
    );
    assert_eq!(serialize(&doc, &opts()), "**bold** and _under_");
}

#[test]
fn hash_tag_is_an_atom() {
    let doc = parse("#todo", &opts());
    let para = &doc.content[0];
    assert_eq!(para.kind, NodeType::Paragraph);
    assert_eq!(para.content.len(), 1);
    assert_eq!(para.content[0].kind, NodeType::Tag);
    assert_eq!(para.content[0].attr_str("value"), Some("todo"));
    assert_eq!(serialize(&doc, &opts()), "#todo");
}

#[test]
fn wiki_link_with_title() {
    let doc = parse("[[Doc|Title]]", &opts());
    let link = &doc.content[0].content[0];
    assert_eq!(link.kind, NodeType::WikiLink);
    assert_eq!(link.attr_str("document"), Some("Doc"));
    assert_eq!(link.attr_str("title"), Some("Title"));
    assert_eq!(serialize(&doc, &opts()), "[[Doc|Title]]");
}

#[test]
fn multicolumn_growths() {
    let src = "---: 1\nLeft\n:--: 2\nRight\n:---";
    let doc = parse(src, &opts());
    let columns = &doc.content[0];
    assert_eq!(columns.kind, NodeType::Multicolumn);
    let growths: Vec<_> = columns.content.iter().map(|c| c.attr_u64("growth")).collect();
    assert_eq!(growths, vec![Some(1), Some(2)]);
    assert_eq!(serialize(&doc, &opts()), src);
}

#[test]
fn checkbox_toggle_updates_text() {
    let mut editor = Editor::from_text("- [ ] task", opts());
    let item = &editor.state().doc.children[0].children[0];
    let checkbox = item.children[0].children[0].id;
    editor.apply(Cmd::ToggleCheckbox { node: checkbox }).unwrap();
    assert_eq!(editor.to_text(), "- [x] task");
}

#[test]
fn media_paragraph_is_promoted_once_the_caret_leaves() {
    let mut editor = Editor::from_text("intro", opts());
    let intro = editor.state().doc.children[0].id;
    editor
        .apply(Cmd::SetSelection {
            selection: Selection::caret(Position::new(intro, 5)),
        })
        .unwrap();
    editor.apply(Cmd::SplitBlock).unwrap();
    let media = WysiwygNode::new(NodeType::Media)
        .with_attr("src", "img.png")
        .with_attr("alt", "alt")
        .with_attr("kind", "image");
    let patch = editor.apply(Cmd::InsertInline { node: media }).unwrap();
    assert!(patch.normalized.is_empty());

    editor
        .apply(Cmd::SetSelection {
            selection: Selection::caret(Position::new(intro, 5)),
        })
        .unwrap();
    let patch = editor.apply(Cmd::insert_text("!")).unwrap();
    assert_eq!(patch.normalized, vec!["media"]);

    let kinds: Vec<_> = editor.state().doc.children.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![NodeType::Paragraph, NodeType::MediaBlock, NodeType::Paragraph]
    );
    assert_eq!(editor.to_text(), "intro!\n\n![alt](img.png)");
}
