use kanban_markdown_engine::{DialectOptions, parse, serialize};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn round_trip(src: &str) -> String {
    let options = DialectOptions::default();
    serialize(&parse(src, &options), &options)
}

#[rstest]
#[case::heading("# Title")]
#[case::marks("**bold** and _under_")]
#[case::tags("Plan #todo with @anna")]
#[case::wiki_links("[[Doc|Title]] and [[Doc]]")]
#[case::tasks("- [ ] open\n- [x] done")]
#[case::ordered("3. a\n4. b")]
#[case::blockquote("> a\n>\n> b")]
#[case::table("| a | b |\n| :--- | --- |\n| 1<br>2 | x |")]
#[case::multicolumn("---: 1\nLeft\n:--: 2\nRight\n:---")]
#[case::container("::: warning\ncareful\n:::")]
#[case::include("!!!include(a.md)!!!")]
#[case::speaker_note(";; one\n;; two")]
#[case::html_comment("<!-- hidden -->")]
#[case::diagram("```mermaid\ngraph TD\n```")]
#[case::code("```rust\nfn main() {}\n```")]
#[case::media("![clip](clip.mp4)")]
#[case::rule("a\n\n---\n\nb")]
#[case::inline_include("see !!!include(a.md)!!! here")]
#[case::inline_comment("a <!-- note --> b")]
#[case::footnote("claim[^1] stands")]
#[case::media_title("![clip](a.png \"Shot\")")]
#[case::hard_break("a\\\nb")]
#[case::date_tag("Due @2025-01-31")]
#[case::bold_atom("**[[Doc]]**")]
#[case::bold_around_tag("**see #todo now**")]
#[case::underline_around_person("_meet @anna today_")]
#[case::em_inside_strong("**a *b* c**")]
#[case::diagram_params("```mermaid theme=dark\ngraph TD\n```")]
#[case::empty_abbr("x <abbr title=\"t\"></abbr> y")]
fn round_trip_is_stable(#[case] src: &str) {
    assert_eq!(round_trip(src), src);
}

#[rstest]
#[case::loose_bullets("* one\n\n+ two")]
#[case::paren_ordered("1) one\n2) two")]
#[case::extra_blank_lines("Title\n\n\n\npara")]
#[case::combined_marks("***both*** and ~~gone~~ and --dash--")]
#[case::small_marks("x^2^ and H~2~O, ++ins++ ==mark==")]
#[case::code_and_abbr("`code` and <abbr title=\"Hyper\">HTML</abbr>")]
#[case::link("[link](https://x.y \"T\") after")]
#[case::unclosed("**never closed and [[half")]
#[case::nested_list("- a\n  - b\n- c")]
#[case::temporal("Meet !9am-5pm on @2025-W03")]
fn double_round_trip_is_idempotent(#[case] src: &str) {
    let options = DialectOptions::default();
    let once = parse(src, &options);
    let twice = parse(&serialize(&once, &options), &options);
    assert_eq!(twice, once);
}

#[test]
fn output_does_not_depend_on_mark_order() {
    use kanban_markdown_engine::{MarkType, WysiwygMark, WysiwygNode};

    let run = |marks: Vec<WysiwygMark>| {
        let doc = WysiwygNode::doc(vec![WysiwygNode::paragraph(vec![WysiwygNode::marked_text(
            "text", marks,
        )])]);
        serialize(&doc, &DialectOptions::default())
    };
    let strong = WysiwygMark::new(MarkType::Strong);
    let em = WysiwygMark::new(MarkType::Em);
    assert_eq!(run(vec![strong.clone(), em.clone()]), "***text***");
    assert_eq!(run(vec![em, strong]), "***text***");
}
