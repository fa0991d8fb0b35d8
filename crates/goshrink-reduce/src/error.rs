//! Reducer errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for reduction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reducer errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid match regex: {0}")]
    BadRegex(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{}: {}", .path.display(), .err)]
    Parse {
        path: PathBuf,
        err: goshrink_parser::ParseError,
    },

    #[error("expected 1 package, got {0}")]
    PackageCount(usize),

    #[error("top-level func {0} does not exist")]
    FuncNotFound(String),

    #[error("error does not match:\n{0}")]
    NoMatch(String),

    #[error("expected an error to occur")]
    NoError,

    #[error("could not reduce program")]
    NoReduction,

    #[error("could not run verifier: {0}")]
    Verifier(std::io::Error),
}
