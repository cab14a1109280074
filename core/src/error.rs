use std::path::PathBuf;

use thiserror::Error;

use crate::DocumentId;

/// Errors surfaced by indexing, persistence and search.
#[derive(Error, Debug)]
pub enum TinysearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt postings list for term {term:?}: {source}")]
    CorruptPostings {
        term: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid postings list for term {term:?}: {reason}")]
    InvalidPostings { term: String, reason: String },

    #[error("cannot read document count file {}: {source}", .path.display())]
    DocCount {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt document count: {0:?}")]
    CorruptDocCount(String),

    #[error("document {got} indexed out of order (last indexed document is {last})")]
    OutOfOrderDocument { last: DocumentId, got: DocumentId },

    #[error("document {0} has more tokens than positions can address")]
    DocumentTooLong(DocumentId),

    #[error("document not found: {0}")]
    DocumentNotFound(DocumentId),

    #[error("document store error: {0}")]
    DocumentStore(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, TinysearchError>;
