use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A match phrase could not be compiled into a fuzzy pattern.
    ///
    /// Tokens are escaped before they are combined, so this only happens on
    /// corrupt input and always aborts index construction.
    #[error("failed to compile pattern for phrase {phrase:?}: {source}")]
    Pattern {
        phrase: String,
        #[source]
        source: regex::Error,
    },

    #[error("placeholder {0} is already registered")]
    DuplicatePlaceholder(String),

    #[error("invalid rule document {path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
