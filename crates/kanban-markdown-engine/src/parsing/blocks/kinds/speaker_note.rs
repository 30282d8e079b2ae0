pub struct SpeakerNote;

impl SpeakerNote {
    pub const PREFIX: &'static str = ";;";

    pub fn strip_prefix(line: &str) -> Option<&str> {
        line.trim_start_matches(' ').strip_prefix(Self::PREFIX)
    }
}
