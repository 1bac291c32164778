use thiserror::Error;

/// Structural errors raised while building an index snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    /// The ingestion stream presented the same document id twice. The build
    /// is abandoned; no partial index is published.
    #[error("duplicate document id: {0}")]
    DuplicateDocument(String),
}

/// Errors raised at the query-dispatch boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The ranking-mode selector was not one of boolean/tfidf/bm25.
    #[error("unrecognized ranking mode: {0:?}")]
    InvalidMode(String),
}
