pub struct Container;

impl Container {
    pub const FENCE: &'static str = ":::";

    /// `::: kind` opens a container; the kind is everything after the colons.
    pub fn open(line: &str) -> Option<&str> {
        let rest = line.trim().strip_prefix(Self::FENCE)?;
        if rest.starts_with(':') {
            return None;
        }
        let kind = rest.trim();
        (!kind.is_empty()).then_some(kind)
    }

    pub fn is_close(line: &str) -> bool {
        line.trim() == Self::FENCE
    }
}
