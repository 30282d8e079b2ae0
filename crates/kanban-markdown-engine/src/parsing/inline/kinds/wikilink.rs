pub struct WikiLink;

impl WikiLink {
    pub const OPEN: &'static str = "[[";
    pub const CLOSE: &'static str = "]]";
    pub const ALIAS: char = '|';

    pub fn render(document: &str, title: &str) -> String {
        if title.is_empty() || title == document {
            format!("{}{document}{}", Self::OPEN, Self::CLOSE)
        } else {
            format!("{}{document}{}{title}{}", Self::OPEN, Self::ALIAS, Self::CLOSE)
        }
    }
}
