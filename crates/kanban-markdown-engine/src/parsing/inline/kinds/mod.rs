//! Inline kinds own their delimiters. The parser and the serializer read
//! syntax from these types; neither hardcodes `[[` or `!!!include(`.

pub mod code_span;
pub mod delimiter;
pub mod html;
pub mod include;
pub mod link;
pub mod tags;
pub mod wikilink;

pub use code_span::CodeSpan;
pub use delimiter::{DelimMark, Delimiter};
pub use html::{Abbr, HtmlComment, HtmlTag};
pub use include::Include;
pub use link::{FootnoteRef, Link, LinkTarget, Media};
pub use tags::{AtTag, at_tag, hash_tag, temporal_tag};
pub use wikilink::WikiLink;
