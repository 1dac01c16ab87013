use std::path::PathBuf;

use thiserror::Error;

use crate::parse::ParseError;
use crate::CompileError;

/// Unified error type covering parsing, compilation, and I/O.
///
/// Returned by [`RuleFile::from_file()`](crate::RuleFile::from_file) and
/// [`RuleSet::load()`](crate::RuleSet::load).
#[derive(Debug, Error)]
pub enum EntstripError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// Any of the above, attributed to the rule file that caused it.
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<EntstripError>,
    },
}

impl EntstripError {
    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            already @ EntstripError::File { .. } => already,
            other => EntstripError::File {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// The rule file the error came from, if known.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            EntstripError::File { path, .. } => Some(path),
            _ => None,
        }
    }
}
