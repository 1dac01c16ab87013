use thiserror::Error;

/// Longest fragment excerpt carried in an error message.
pub(crate) const PREVIEW_LEN: usize = 64;

/// Errors raised while compiling a rule document. Any of them aborts the
/// whole file.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("invalid JSON in fragment `{preview}`: {source}")]
    InvalidJson {
        preview: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to compile pattern '{source_text}': {source}")]
    RegexCompile {
        source_text: String,
        #[source]
        source: regex::Error,
    },

    #[error("missing 'match' block in 'modify' section")]
    MissingMatchBlock,

    #[error("invalid value of [{key}]: expected {expected}, found {found}")]
    InvalidValueType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("'replace' holds more than one connection object (second one under [{key}])")]
    DuplicateReplacement { key: String },

    #[error("section '{section}' must hold an object or an array of objects, found {found}")]
    InvalidSection {
        section: String,
        found: &'static str,
    },
}

/// Errors raised while applying a rule to an entity. They abort one
/// add, insertion or replacement and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("connection is missing required field '{field}'")]
    IncompleteConnection { field: &'static str },
}

/// Cut `text` down to at most [`PREVIEW_LEN`] characters.
pub(crate) fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let mut out: String = chars.by_ref().take(PREVIEW_LEN).collect();
    if chars.next().is_some() {
        out.push_str("...");
    }
    out
}
