use xi_rope::Rope;

use super::span::Span;

/// One source line and its byte span.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// Span of the line including its terminator.
    pub span: Span,
    /// Line text with the `\n` / `\r\n` terminator removed.
    pub text: String,
}

/// Lines of the rope with their spans.
///
/// Built on `lines_raw` so the spans account for terminators.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).map(move |line| {
        let start = offset;
        offset += line.len();
        LineRef {
            span: Span { start, end: offset },
            text: line.trim_end_matches(['\n', '\r']).to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_cover_terminators() {
        let rope = Rope::from("ab\r\ncd\n\nef");
        let lines: Vec<_> = lines_with_spans(&rope).collect();
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["ab", "cd", "", "ef"]);
        assert_eq!(lines[0].span, Span { start: 0, end: 4 });
        assert_eq!(lines[3].span, Span { start: 8, end: 10 });
    }
}
