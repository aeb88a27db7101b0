use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Construction-time failures. Per-call operations never return these.
#[derive(Debug, Error)]
pub enum Error {
    #[error("gazetteer contains no cities")]
    EmptyGazetteer,

    #[error("city `{0}` is listed more than once")]
    DuplicateCity(String),

    #[error("alias `{alias}` resolves to both `{existing}` and `{conflicting}`")]
    AliasConflict {
        alias: String,
        existing: String,
        conflicting: String,
    },

    #[error("failed to read gazetteer at {path}: {source}")]
    GazetteerIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid gazetteer JSON: {0}")]
    GazetteerJson(#[from] serde_json::Error),

    #[error("invalid pattern `{name}`: {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

impl Error {
    pub(crate) fn pattern(name: impl Into<String>, source: regex::Error) -> Self {
        Self::Pattern {
            name: name.into(),
            source,
        }
    }
}
