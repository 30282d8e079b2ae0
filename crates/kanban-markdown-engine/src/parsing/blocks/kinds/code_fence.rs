#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

impl FenceKind {
    pub fn char(self) -> char {
        match self {
            FenceKind::Backticks => CodeFence::BACKTICK,
            FenceKind::Tildes => CodeFence::TILDE,
        }
    }
}

/// A line that looks like a fence opener or closer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceSig {
    pub kind: FenceKind,
    /// Length of the delimiter run.
    pub len: usize,
    /// Trimmed info string after the run.
    pub info: String,
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICK: char = '`';
    pub const TILDE: char = '~';
    pub const MIN_LEN: usize = 3;

    pub fn sig(line: &str) -> Option<FenceSig> {
        let t = line.trim_start_matches(' ');
        if line.len() - t.len() > 3 {
            return None;
        }
        let kind = match t.chars().next()? {
            Self::BACKTICK => FenceKind::Backticks,
            Self::TILDE => FenceKind::Tildes,
            _ => return None,
        };
        let len = t.chars().take_while(|&c| c == kind.char()).count();
        if len < Self::MIN_LEN {
            return None;
        }
        let info = t[len..].trim();
        if kind == FenceKind::Backticks && info.contains(Self::BACKTICK) {
            return None;
        }
        Some(FenceSig {
            kind,
            len,
            info: info.to_string(),
        })
    }

    /// A closer uses the opener's character, is at least as long, and has no info.
    pub fn closes(open: &FenceSig, sig: Option<&FenceSig>) -> bool {
        sig.is_some_and(|s| s.kind == open.kind && s.len >= open.len && s.info.is_empty())
    }

    /// The shortest backtick fence that cannot be closed from inside `body`.
    pub fn fence_for(body: &str) -> String {
        let mut longest = 0;
        for line in body.lines() {
            let t = line.trim_start_matches(' ');
            let run = t.chars().take_while(|&c| c == Self::BACKTICK).count();
            longest = longest.max(run);
        }
        Self::BACKTICK
            .to_string()
            .repeat(Self::MIN_LEN.max(longest + 1))
    }
}
