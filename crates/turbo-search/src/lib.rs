//! Product search and filtering for TurboCommerce storefronts.
//!
//! This crate turns listing requests into ranked, paginated product results:
//!
//! - **Filters**: loose request parameters normalized into a canonical filter
//! - **Predicates**: a store-independent condition tree (facets, price, text)
//! - **Search**: multi-token matching with trigram fuzzy matching for typos
//! - **Ranking**: tiered relevance, listing sorts, candidate-window paging
//! - **Stores**: an in-memory catalog and a PostgreSQL-backed catalog
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_search::prelude::*;
//!
//! let engine = SearchEngine::new(InMemoryCatalog::new(snapshot));
//!
//! let params = RawParams::from_query_string("search=bateria+willard&limit=12");
//! let results = engine.search_params(&params).await?;
//! println!("{} matches", results.total_count);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod search;
pub mod store;

pub use config::{ConfigError, ScoringConfig, SearchConfig};
pub use engine::SearchEngine;
pub use error::{SearchError, SearchResult, StoreError};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{ScoringConfig, SearchConfig};
    pub use crate::engine::SearchEngine;
    pub use crate::error::{SearchError, SearchResult, StoreError};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Brand, Category, Gender, Product, ProductImage, ProductVariant};

    // Search
    pub use crate::search::{
        Pagination, ProductFilter, ProductQuery, RankedResult, RawParams, SearchResults,
        SortOption,
    };

    // Stores
    pub use crate::store::{CatalogSnapshot, CatalogStore, InMemoryCatalog, SqlCatalog};
}
