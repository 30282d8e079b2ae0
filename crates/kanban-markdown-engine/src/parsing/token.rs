use crate::parsing::rope::Span;

/// Whether a token opens, closes, or stands alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    Open,
    Close,
    Leaf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Blocks
    Paragraph,
    Heading,
    Blockquote,
    BulletList,
    OrderedList,
    ListItem,
    Fence,
    HorizontalRule,
    Table,
    TableRow,
    TableHeaderCell,
    TableCell,
    Multicolumn,
    MulticolumnColumn,
    Container,
    IncludeBlock,
    SpeakerNote,
    HtmlBlock,
    HtmlCommentBlock,
    /// Inline content of a leaf block; its `children` hold inline tokens.
    Inline,

    // Inline
    Text,
    HardBreak,
    CodeInline,
    Em,
    Strong,
    Underline,
    Strike,
    DashStrike,
    Sub,
    Sup,
    Ins,
    Mark,
    Abbr,
    Link,
    Media,
    WikiLink,
    Tag,
    DateTag,
    PersonTag,
    TemporalTag,
    IncludeInline,
    FootnoteRef,
    HtmlInline,
    HtmlCommentInline,
    TaskCheckbox,
}

/// Rule-specific payload that does not fit `attrs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenMeta {
    #[default]
    None,
    /// Column growth weight of a multicolumn column.
    Growth(u32),
}

/// A lexical unit in the shape of a generic block/inline tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub nesting: Nesting,
    /// HTML-ish tag name, e.g. `h2`, `td`, `p`.
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub content: String,
    pub children: Vec<Token>,
    /// The delimiter text that produced this token.
    pub markup: String,
    /// Fence info string or container kind.
    pub info: String,
    pub meta: TokenMeta,
    /// Source bytes of the block this token opens, relative to the text the
    /// enclosing tokenize call saw. Only set on a block's first token.
    pub span: Option<Span>,
}

impl Token {
    pub fn new(kind: TokenKind, nesting: Nesting, tag: &str) -> Self {
        Self {
            kind,
            nesting,
            tag: tag.to_string(),
            attrs: Vec::new(),
            content: String::new(),
            children: Vec::new(),
            markup: String::new(),
            info: String::new(),
            meta: TokenMeta::None,
            span: None,
        }
    }

    pub fn open(kind: TokenKind, tag: &str) -> Self {
        Self::new(kind, Nesting::Open, tag)
    }

    pub fn close(kind: TokenKind, tag: &str) -> Self {
        Self::new(kind, Nesting::Close, tag)
    }

    pub fn leaf(kind: TokenKind, tag: &str) -> Self {
        Self::new(kind, Nesting::Leaf, tag)
    }

    pub fn text(content: &str) -> Self {
        Self::leaf(TokenKind::Text, "").with_content(content)
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    pub fn with_meta(mut self, meta: TokenMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_children(mut self, children: Vec<Token>) -> Self {
        self.children = children;
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}
