//! Query execution boundary.

use async_trait::async_trait;

use crate::{DbError, QueryResult, Value};

/// Executes parameterized SQL against the catalog database.
///
/// Implemented by the application's connection pool; placeholders are
/// PostgreSQL-style (`$1`, `$2`, ...) and bind positionally to `params`.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Run a query and return all rows.
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError>;
}

#[async_trait]
impl<E: SqlExecutor + ?Sized> SqlExecutor for std::sync::Arc<E> {
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        (**self).query(sql, params).await
    }
}
