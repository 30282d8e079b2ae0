#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMarker {
    Start(u32),
    Separator(u32),
    End,
}

pub struct Multicolumn;

impl Multicolumn {
    pub const START: &'static str = "---:";
    pub const SEPARATOR: &'static str = ":--:";
    pub const END: &'static str = ":---";
    pub const DEFAULT_GROWTH: u32 = 1;

    pub fn marker(line: &str) -> Option<ColumnMarker> {
        let t = line.trim();
        if t == Self::END {
            return Some(ColumnMarker::End);
        }
        if let Some(rest) = t.strip_prefix(Self::START) {
            return Self::growth(rest).map(ColumnMarker::Start);
        }
        if let Some(rest) = t.strip_prefix(Self::SEPARATOR) {
            return Self::growth(rest).map(ColumnMarker::Separator);
        }
        None
    }

    /// Optional positive weight after a marker; zero counts as the default.
    fn growth(rest: &str) -> Option<u32> {
        let rest = rest.trim();
        if rest.is_empty() {
            return Some(Self::DEFAULT_GROWTH);
        }
        rest.parse::<u32>()
            .ok()
            .map(|g| if g == 0 { Self::DEFAULT_GROWTH } else { g })
    }
}
