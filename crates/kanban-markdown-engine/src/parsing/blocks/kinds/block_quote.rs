pub struct BlockQuote;

impl BlockQuote {
    pub const PREFIX: char = '>';
    /// Prefix written by the serializer in front of every quoted line.
    pub const LINE_PREFIX: &'static str = "> ";

    /// Strips one level of quoting: up to three spaces, `>`, one optional space.
    pub fn strip_prefix(line: &str) -> Option<&str> {
        let t = line.trim_start_matches(' ');
        if line.len() - t.len() > 3 {
            return None;
        }
        let rest = t.strip_prefix(Self::PREFIX)?;
        Some(rest.strip_prefix(' ').unwrap_or(rest))
    }
}
