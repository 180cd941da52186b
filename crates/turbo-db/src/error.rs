//! Database error types.

use thiserror::Error;

/// Errors that can occur when talking to the catalog database.
#[derive(Error, Debug)]
pub enum DbError {
    /// The connection could not be established or was lost.
    #[error("Database connection failed: {0}")]
    ConnectionError(String),

    /// Failed to execute a query.
    #[error("Query execution failed: {0}")]
    QueryError(String),

    /// Failed to deserialize a row.
    #[error("Deserialization error: {0}")]
    DeserializeError(String),

    /// Type conversion error.
    #[error("Type conversion error: {0}")]
    TypeError(String),

    /// No rows returned when one was expected.
    #[error("No rows returned")]
    NotFound,
}

impl DbError {
    /// Whether this error reports that the SQL function `name` is not
    /// installed, e.g. `function similarity(text, unknown) does not exist`.
    pub fn is_missing_function(&self, name: &str) -> bool {
        let DbError::QueryError(message) = self else {
            return false;
        };
        let message = message.to_lowercase();
        let name = name.to_lowercase();
        (message.contains(&format!("function {name}")) && message.contains("does not exist"))
            || message.contains(&format!("no such function: {name}"))
    }
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::DeserializeError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_function_postgres() {
        let err = DbError::QueryError(
            "ERROR: function similarity(text, unknown) does not exist".to_string(),
        );
        assert!(err.is_missing_function("similarity"));
        assert!(!err.is_missing_function("word_similarity"));
    }

    #[test]
    fn test_missing_function_sqlite() {
        let err = DbError::QueryError("no such function: similarity".to_string());
        assert!(err.is_missing_function("similarity"));
    }

    #[test]
    fn test_other_errors_are_not_missing_function() {
        let err = DbError::QueryError("relation \"products\" does not exist".to_string());
        assert!(!err.is_missing_function("similarity"));

        let err = DbError::ConnectionError("function similarity does not exist".to_string());
        assert!(!err.is_missing_function("similarity"));
    }
}
