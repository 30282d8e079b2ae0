/// Code spans are raw zones: nothing else is parsed inside them.
pub struct CodeSpan;

impl CodeSpan {
    pub const TICK: char = '`';

    /// Strips one padding space from each side, as CommonMark does.
    pub fn unpad(inner: &str) -> &str {
        if inner.len() >= 2
            && inner.starts_with(' ')
            && inner.ends_with(' ')
            && !inner.trim().is_empty()
        {
            &inner[1..inner.len() - 1]
        } else {
            inner
        }
    }

    /// Wraps `code` in the shortest fence it cannot close itself.
    pub fn wrap(code: &str) -> String {
        let mut longest = 0;
        let mut run = 0;
        for c in code.chars() {
            if c == Self::TICK {
                run += 1;
                longest = longest.max(run);
            } else {
                run = 0;
            }
        }
        let fence = Self::TICK.to_string().repeat(longest + 1);
        let needs_pad = code.starts_with(Self::TICK)
            || code.ends_with(Self::TICK)
            || (code.len() >= 2 && code.starts_with(' ') && code.ends_with(' '));
        if needs_pad {
            format!("{fence} {code} {fence}")
        } else {
            format!("{fence}{code}{fence}")
        }
    }
}
