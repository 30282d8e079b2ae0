use crate::parsing::token::TokenKind;
use crate::tree::MarkType;

/// A mark opened by an emphasis-style delimiter run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimMark {
    pub kind: TokenKind,
    pub tag: &'static str,
    pub markup: &'static str,
}

const EM: DelimMark = DelimMark {
    kind: TokenKind::Em,
    tag: "em",
    markup: "*",
};
const STRONG: DelimMark = DelimMark {
    kind: TokenKind::Strong,
    tag: "strong",
    markup: "**",
};
const STRONG_UNDERSCORE: DelimMark = DelimMark {
    kind: TokenKind::Strong,
    tag: "strong",
    markup: "__",
};
const UNDERLINE: DelimMark = DelimMark {
    kind: TokenKind::Underline,
    tag: "u",
    markup: "_",
};
const SUB: DelimMark = DelimMark {
    kind: TokenKind::Sub,
    tag: "sub",
    markup: "~",
};
const STRIKE: DelimMark = DelimMark {
    kind: TokenKind::Strike,
    tag: "s",
    markup: "~~",
};
const DASH_STRIKE: DelimMark = DelimMark {
    kind: TokenKind::DashStrike,
    tag: "s",
    markup: "--",
};
const SUP: DelimMark = DelimMark {
    kind: TokenKind::Sup,
    tag: "sup",
    markup: "^",
};
const INS: DelimMark = DelimMark {
    kind: TokenKind::Ins,
    tag: "ins",
    markup: "++",
};
const MARK: DelimMark = DelimMark {
    kind: TokenKind::Mark,
    tag: "mark",
    markup: "==",
};

pub struct Delimiter;

impl Delimiter {
    pub const CHARS: [char; 7] = ['*', '_', '~', '-', '^', '+', '='];

    /// Marks opened by a run of `c` of length `run`, outermost first.
    pub fn marks(c: char, run: usize) -> &'static [DelimMark] {
        match (c, run) {
            ('*', 1) => &[EM],
            ('*', 2) => &[STRONG],
            ('*', 3) => &[EM, STRONG],
            ('_', 1) => &[UNDERLINE],
            ('_', 2) => &[STRONG_UNDERSCORE],
            ('_', 3) => &[UNDERLINE, STRONG_UNDERSCORE],
            ('~', 1) => &[SUB],
            ('~', 2) => &[STRIKE],
            ('-', 2) => &[DASH_STRIKE],
            ('^', 1) => &[SUP],
            ('+', 2) => &[INS],
            ('=', 2) => &[MARK],
            _ => &[],
        }
    }

    /// Emphasis runs may close with a longer run whose surplus closes inner
    /// marks; the other delimiters need an exact match.
    pub fn closes_with_surplus(c: char) -> bool {
        matches!(c, '*' | '_')
    }

    /// Delimiters that must not touch a word character on their outer side.
    pub fn is_word_bound(c: char) -> bool {
        matches!(c, '_' | '-')
    }

    /// The delimiter the serializer writes on both sides of `mark`.
    ///
    /// Strong always comes back as `**`; `__` is accepted on input only.
    pub fn markup(mark: MarkType, dash: bool) -> Option<&'static str> {
        let delim = match mark {
            MarkType::Em => EM,
            MarkType::Strong => STRONG,
            MarkType::Underline => UNDERLINE,
            MarkType::Sub => SUB,
            MarkType::Strike if dash => DASH_STRIKE,
            MarkType::Strike => STRIKE,
            MarkType::Sup => SUP,
            MarkType::Ins => INS,
            MarkType::Mark => MARK,
            MarkType::Link | MarkType::Abbr | MarkType::Code | MarkType::Unknown => return None,
        };
        Some(delim.markup)
    }

    /// Delimiters whose span may not cross a soft line break.
    pub fn is_single_line(c: char) -> bool {
        c == '-'
    }
}
