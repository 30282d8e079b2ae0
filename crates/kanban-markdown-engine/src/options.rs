use serde::{Deserialize, Serialize};

/// Dialect knobs shared by the tokenizer and the serializer.
///
/// Both directions must use the same options for round-trips to hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialectOptions {
    /// Prefix of hash tags (`#todo`).
    pub tag_prefix: char,
    /// Prefix of person and date tags (`@anna`, `@2025-W03`).
    pub person_prefix: char,
    /// Prefix of temporal tags (`!9am-5pm`).
    pub temporal_prefix: char,
    /// Fence info languages rendered as diagrams instead of code blocks.
    pub diagram_languages: Vec<String>,
}

impl Default for DialectOptions {
    fn default() -> Self {
        Self {
            tag_prefix: '#',
            person_prefix: '@',
            temporal_prefix: '!',
            diagram_languages: vec!["mermaid".to_string(), "plantuml".to_string()],
        }
    }
}

impl DialectOptions {
    pub fn is_diagram_language(&self, lang: &str) -> bool {
        !lang.is_empty()
            && self
                .diagram_languages
                .iter()
                .any(|l| l.eq_ignore_ascii_case(lang))
    }
}
