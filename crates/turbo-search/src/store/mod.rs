//! Catalog store boundary.
//!
//! The engine asks a [`CatalogStore`] for a window of candidate rows and for
//! a count, both under the same [`Condition`]. Stores translate conditions
//! and ordering into whatever they execute natively.

mod memory;
mod sql;

pub use memory::{CatalogSnapshot, InMemoryCatalog};
pub use sql::{escape_like, SqlCatalog};

use crate::config::ScoringConfig;
use crate::error::StoreError;
use crate::ids::{BrandId, CategoryId, GenderId, ProductId};
use crate::money::Money;
use crate::search::{Condition, SearchTerms};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Store-side relevance ordering for a fuzzy search.
#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceOrder {
    pub terms: SearchTerms,
    pub scoring: ScoringConfig,
}

/// A product's facets, for ranking other products by how many they share.
///
/// A shared category counts 3, a shared brand 2 and a shared gender 1.
/// Facets the product lacks never match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Affinity {
    pub category_id: Option<CategoryId>,
    pub brand_id: Option<BrandId>,
    pub gender_id: Option<GenderId>,
}

impl Affinity {
    pub const CATEGORY_WEIGHT: u32 = 3;
    pub const BRAND_WEIGHT: u32 = 2;
    pub const GENDER_WEIGHT: u32 = 1;

    /// Affinity of another product with these facets.
    pub fn score(
        &self,
        category_id: Option<&CategoryId>,
        brand_id: Option<&BrandId>,
        gender_id: Option<&GenderId>,
    ) -> u32 {
        fn shared<T: PartialEq>(ours: &Option<T>, theirs: Option<&T>) -> bool {
            ours.as_ref().is_some_and(|ours| theirs == Some(ours))
        }

        let mut score = 0;
        if shared(&self.category_id, category_id) {
            score += Self::CATEGORY_WEIGHT;
        }
        if shared(&self.brand_id, brand_id) {
            score += Self::BRAND_WEIGHT;
        }
        if shared(&self.gender_id, gender_id) {
            score += Self::GENDER_WEIGHT;
        }
        score
    }
}

/// One ordering key; queries list them most significant first.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderKey {
    /// Tiered relevance, highest first.
    Relevance(RelevanceOrder),
    /// Shared facets with a reference product, most first.
    Affinity(Affinity),
    CreatedAtDesc,
    IdAsc,
    /// Cheapest effective price first.
    PriceAsc,
    /// Most expensive effective price first.
    PriceDesc,
}

/// A request for candidate rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateQuery {
    pub condition: Condition,
    pub order: Vec<OrderKey>,
    pub offset: usize,
    pub limit: usize,
}

impl CandidateQuery {
    /// Whether executing this query needs a similarity function.
    pub fn uses_similarity(&self) -> bool {
        self.condition.uses_similarity()
            || self.order.iter().any(|key| match key {
                OrderKey::Relevance(relevance) => relevance.terms.is_fuzzy(),
                _ => false,
            })
    }
}

/// A listing row as a store returns it.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRow {
    pub id: ProductId,
    pub name: String,
    /// Kept for in-engine scoring; not part of the listing output.
    pub description: String,
    pub image_url: Option<String>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub created_at: DateTime<Utc>,
    /// Gender label, shown under the product name.
    pub subtitle: Option<String>,
}

/// Read access to the product catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Rows matching `query.condition`, ordered and windowed.
    async fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<CandidateRow>, StoreError>;

    /// Number of distinct products matching `condition`.
    async fn count(&self, condition: &Condition) -> Result<u64, StoreError>;

    /// Facets of one product, published or not; `None` when it does not
    /// exist.
    async fn affinity(&self, id: &ProductId) -> Result<Option<Affinity>, StoreError>;
}

#[async_trait]
impl<S: CatalogStore + ?Sized> CatalogStore for std::sync::Arc<S> {
    async fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<CandidateRow>, StoreError> {
        (**self).fetch_candidates(query).await
    }

    async fn count(&self, condition: &Condition) -> Result<u64, StoreError> {
        (**self).count(condition).await
    }

    async fn affinity(&self, id: &ProductId) -> Result<Option<Affinity>, StoreError> {
        (**self).affinity(id).await
    }
}
