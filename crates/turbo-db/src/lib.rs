//! SQL value types and the executor boundary for the TurboCommerce catalog
//! store.
//!
//! The search engine renders parameterized SQL and hands it to a
//! [`SqlExecutor`]; results come back as [`QueryResult`] rows that
//! deserialize into typed structs.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_db::{params, SqlExecutor};
//!
//! #[derive(serde::Deserialize)]
//! struct CountRow {
//!     count: i64,
//! }
//!
//! let result = executor
//!     .query("SELECT COUNT(*) AS count FROM products WHERE is_published = $1", params![true])
//!     .await?;
//! let rows: Vec<CountRow> = result.deserialize_all()?;
//! ```

mod error;
mod executor;
mod types;

pub use error::DbError;
pub use executor::SqlExecutor;
pub use types::{QueryResult, Row, Value};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{params, DbError, QueryResult, Row, SqlExecutor, Value};
}

/// Create a parameter list for SQL queries.
///
/// ```
/// use turbo_db::{params, Value};
///
/// let params: &[Value] = params!["bateria", 20i64, true];
/// assert_eq!(params.len(), 3);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        &[]
    };
    ($($param:expr),+ $(,)?) => {
        &[$($crate::Value::from($param)),+]
    };
}
