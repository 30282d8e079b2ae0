//! Hash, person/date and temporal tag shapes.
//!
//! Each matcher takes the text right after the prefix character and only
//! succeeds when the match is followed by whitespace or the end of input.

use std::sync::LazyLock;

use regex::Regex;

static POLARITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+\+|--|\+|-|ø|Ø)").expect("valid polarity regex"));

static GATHER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^gather_\S+").expect("valid gather regex"));

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{N}_][\p{L}\p{N}_\-]*").expect("valid identifier regex")
});

static WEEK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d{4}-?)?[Ww]\d{1,2}").expect("valid week regex"));

static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{4}-\d{2}-\d{2}|\d{2}-\d{2}-\d{4})").expect("valid date regex")
});

static PERSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{N}_](?:[\p{L}\p{N}_\-.]*[\p{L}\p{N}_])?").expect("valid person regex")
});

/// Temporal shapes in priority order; the first one that fits wins.
static TEMPORAL: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        (
            "time_range",
            r"^(?i:\d{1,2}(?::\d{2})?(?:am|pm)?-\d{1,2}(?::\d{2})?(?:am|pm)?)",
        ),
        ("year_week", r"^\d{4}-?[Ww]\d{1,2}"),
        ("week", r"^[Ww]\d{1,2}"),
        ("date", r"^\d{4}-\d{2}-\d{2}"),
        (
            "weekday",
            r"^(?i:mon(?:day)?|tue(?:s(?:day)?)?|wed(?:nesday)?|thu(?:r(?:s(?:day)?)?)?|fri(?:day)?|sat(?:urday)?|sun(?:day)?)",
        ),
        ("minute_range", r"^:\d{2}-:\d{2}"),
        ("time", r"^(?i:\d{1,2}(?::\d{2})?(?:am|pm)?)"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("valid temporal regex")))
    .collect()
});

fn bounded<'a>(re: &Regex, rest: &'a str) -> Option<&'a str> {
    let m = re.find(rest)?;
    let after = &rest[m.end()..];
    after
        .chars()
        .next()
        .is_none_or(char::is_whitespace)
        .then(|| m.as_str())
}

/// `#value`: returns the value and its flavor (`tag`, `gather`, `polarity`).
pub fn hash_tag(rest: &str) -> Option<(&str, &'static str)> {
    if let Some(value) = bounded(&POLARITY, rest) {
        return Some((value, "polarity"));
    }
    if let Some(value) = bounded(&GATHER, rest) {
        return Some((value, "gather"));
    }
    bounded(&IDENTIFIER, rest).map(|value| (value, "tag"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtTag {
    Date(&'static str),
    Person,
}

/// `@value`: week and date shapes win over person names.
pub fn at_tag(rest: &str) -> Option<(&str, AtTag)> {
    if let Some(value) = bounded(&WEEK, rest) {
        return Some((value, AtTag::Date("week")));
    }
    if let Some(value) = bounded(&DATE, rest) {
        return Some((value, AtTag::Date("date")));
    }
    bounded(&PERSON, rest).map(|value| (value, AtTag::Person))
}

/// `!value`: returns the value and the temporal kind that matched.
pub fn temporal_tag(rest: &str) -> Option<(&str, &'static str)> {
    TEMPORAL
        .iter()
        .find_map(|(kind, re)| bounded(re, rest).map(|value| (value, *kind)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("todo", Some(("todo", "tag")))]
    #[case("todo rest", Some(("todo", "tag")))]
    #[case("gather_Anna&Bo", Some(("gather_Anna&Bo", "gather")))]
    #[case("++", Some(("++", "polarity")))]
    #[case("-", Some(("-", "polarity")))]
    #[case("ø", Some(("ø", "polarity")))]
    #[case("øst", Some(("øst", "tag")))]
    #[case("todo,", None)]
    #[case(" x", None)]
    fn hash_tags(#[case] input: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(hash_tag(input), expected);
    }

    #[rstest]
    #[case("W12", Some(("W12", AtTag::Date("week"))))]
    #[case("2025-W03", Some(("2025-W03", AtTag::Date("week"))))]
    #[case("2025-03-04", Some(("2025-03-04", AtTag::Date("date"))))]
    #[case("04-03-2025", Some(("04-03-2025", AtTag::Date("date"))))]
    #[case("anna", Some(("anna", AtTag::Person)))]
    #[case("anna.b", Some(("anna.b", AtTag::Person)))]
    #[case("anna.", None)]
    fn at_tags(#[case] input: &str, #[case] expected: Option<(&str, AtTag)>) {
        assert_eq!(at_tag(input), expected);
    }

    #[rstest]
    #[case("9am-5pm", "time_range")]
    #[case("10:30-11:00", "time_range")]
    #[case("2025W12", "year_week")]
    #[case("2025-W12", "year_week")]
    #[case("W12", "week")]
    #[case("2025-03-04", "date")]
    #[case("monday", "weekday")]
    #[case("Fri", "weekday")]
    #[case(":15-:45", "minute_range")]
    #[case("9am", "time")]
    #[case("14:30", "time")]
    fn temporal_kinds(#[case] input: &str, #[case] kind: &str) {
        assert_eq!(temporal_tag(input), Some((input, kind)));
    }

    #[test]
    fn temporal_requires_boundary() {
        assert_eq!(temporal_tag("important"), None);
        assert_eq!(temporal_tag("9am!"), None);
    }
}
