mod error;
mod grammar;
mod parser;
mod reader;

pub use error::ParseError;
pub use parser::Sections;
pub use reader::{read_document, strip_comments, strip_trailing_commas};

/// Scan comment-free text into its top-level [`Sections`].
///
/// Only object and array values are kept; scalar members at depth 1 carry no
/// rules and are dropped.
///
/// # Errors
///
/// Returns [`ParseError`] if the text is not a well-formed object.
pub fn scan(input: &str) -> Result<Sections, ParseError> {
    use winnow::Parser;
    let members = grammar::document
        .parse(input)
        .map_err(|e| ParseError::new(e.to_string()))?;

    let mut sections = Sections::default();
    for (key, raw) in members {
        if raw.starts_with('{') || raw.starts_with('[') {
            sections.push(&key, raw);
        }
    }
    Ok(sections)
}

/// Read raw rule-file text (comments, trailing commas) into its [`Sections`].
///
/// # Errors
///
/// Returns [`ParseError`] if the document structure is malformed.
pub fn parse_document(raw: &str) -> Result<Sections, ParseError> {
    scan(&read_document(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_top_level_keys_survive() {
        let sections = scan(r#"{"remove":{"a":1},"remove":{"b":2}}"#).unwrap();
        assert_eq!(sections.fragments("remove"), [r#"{"a":1}"#, r#"{"b":2}"#]);
    }

    #[test]
    fn scalar_members_are_dropped() {
        let sections = scan(r#"{"version": 3, "add": {"classname": "a"}}"#).unwrap();
        assert_eq!(sections.len(), 1);
        assert!(sections.fragments("version").is_empty());
    }

    #[test]
    fn parse_document_strips_comments_first() {
        let raw = r#"{
            // "remove": {"classname": "commented"},
            "remove": {"targetname": "http://x"}, /* trailing */
            "Remove": [{"classname": "b",},],
        }"#;
        let sections = parse_document(raw).unwrap();
        assert_eq!(
            sections.fragments("remove"),
            [r#"{"targetname": "http://x"}"#, r#"[{"classname": "b"}]"#]
        );
    }

    #[test]
    fn malformed_document_is_an_error() {
        let err = parse_document(r#"{"add": {"a": "1"}"#).unwrap_err();
        assert!(err.to_string().starts_with("parse error:"));
    }
}
