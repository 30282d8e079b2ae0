use std::sync::LazyLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }

    pub fn from_name(name: &str) -> Option<Align> {
        match name.trim() {
            "left" => Some(Align::Left),
            "center" => Some(Align::Center),
            "right" => Some(Align::Right),
            _ => None,
        }
    }

    /// Reads `text-align:` out of an inline style attribute.
    pub fn from_style(style: &str) -> Option<Align> {
        style
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .find(|(prop, _)| prop.trim() == "text-align")
            .and_then(|(_, value)| Align::from_name(value))
    }

    pub fn delimiter(align: Option<Align>) -> &'static str {
        match align {
            None => "---",
            Some(Align::Left) => ":---",
            Some(Align::Center) => ":---:",
            Some(Align::Right) => "---:",
        }
    }
}

static DELIMITER_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:?-+:?$").expect("valid delimiter cell regex"));

static CELL_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid cell break regex"));

pub struct Table;

impl Table {
    pub const PIPE: char = '|';
    pub const CELL_BREAK: &'static str = "<br>";

    /// Splits a row into trimmed cells. Escaped pipes stay inside their cell.
    pub fn split_row(line: &str) -> Vec<String> {
        let mut t = line.trim();
        if let Some(rest) = t.strip_prefix(Self::PIPE) {
            t = rest;
        }
        if t.ends_with(Self::PIPE) && !t.ends_with("\\|") {
            t = &t[..t.len() - 1];
        }
        let mut cells = vec![];
        let mut cell = String::new();
        let mut escaped = false;
        for c in t.chars() {
            if c == Self::PIPE && !escaped {
                cells.push(cell.trim().to_string());
                cell.clear();
            } else {
                cell.push(c);
            }
            escaped = c == '\\' && !escaped;
        }
        cells.push(cell.trim().to_string());
        cells
    }

    /// Parses an alignment row such as `| --- | :---: |`.
    pub fn delimiter_row(line: &str) -> Option<Vec<Option<Align>>> {
        if !line.contains(Self::PIPE) && !line.contains(':') && !line.contains('-') {
            return None;
        }
        Self::split_row(line)
            .iter()
            .map(|cell| {
                if !DELIMITER_CELL.is_match(cell) {
                    return None;
                }
                Some(match (cell.starts_with(':'), cell.ends_with(':')) {
                    (true, true) => Some(Align::Center),
                    (true, false) => Some(Align::Left),
                    (false, true) => Some(Align::Right),
                    (false, false) => None,
                })
            })
            .collect()
    }

    /// Cell text split at `<br>` into separate paragraphs.
    pub fn cell_paragraphs(cell: &str) -> Vec<&str> {
        if cell.is_empty() {
            return vec![];
        }
        CELL_BREAK.split(cell).map(str::trim).collect()
    }

    /// Escapes pipes that would otherwise end the cell.
    pub fn escape_cell(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut escaped = false;
        for c in text.chars() {
            if c == Self::PIPE && !escaped {
                out.push('\\');
            }
            if c == '\n' {
                out.push(' ');
            } else {
                out.push(c);
            }
            escaped = c == '\\' && !escaped;
        }
        out
    }
}
