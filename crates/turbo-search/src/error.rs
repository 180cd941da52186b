//! Error types for the search engine.

use thiserror::Error;
use turbo_db::DbError;

/// Errors a catalog store can report.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store cannot evaluate trigram similarity (e.g. `pg_trgm` is not
    /// installed). Searches recover from this by matching substrings only.
    #[error("Similarity matching is not available: {0}")]
    SimilarityUnavailable(String),

    #[error("Catalog query failed: {0}")]
    Query(String),

    #[error("Catalog connection failed: {0}")]
    Connection(String),

    #[error("Failed to decode catalog row: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn is_similarity_unavailable(&self) -> bool {
        matches!(self, StoreError::SimilarityUnavailable(_))
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        if err.is_missing_function("similarity") {
            return StoreError::SimilarityUnavailable(err.to_string());
        }
        match err {
            DbError::ConnectionError(msg) => StoreError::Connection(msg),
            DbError::QueryError(msg) => StoreError::Query(msg),
            DbError::NotFound => StoreError::Query("no rows returned".to_string()),
            DbError::DeserializeError(msg) | DbError::TypeError(msg) => StoreError::Decode(msg),
        }
    }
}

/// Errors returned by [`SearchEngine`](crate::SearchEngine).
#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for engine operations.
pub type SearchResult<T> = Result<T, SearchError>;
