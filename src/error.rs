//! Error types surfaced by the persistence layer, the snippet corpus and the
//! formatter seam

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access profile store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed profile store: {0}")]
    Parse(String),

    #[error("failed to serialize profiles: {0}")]
    Serialization(String),
}

impl StoreError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        StoreError::Parse(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io { path: path.into(), source }
    }
}

/// Failure reported by the external code formatter
#[derive(Debug, Error)]
#[error("formatter failed: {0}")]
pub struct FormatError(pub String);

#[derive(Debug, Error)]
pub enum SnippetError {
    #[error("invalid snippet corpus: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("setting '{key}' refers to unknown snippet '{snippet}'")]
    UnknownSnippet { key: String, snippet: String },
}
