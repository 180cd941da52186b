//! In-process catalog store.
//!
//! Evaluates conditions directly over a loaded [`CatalogSnapshot`]. Useful
//! for tests, fixtures and the CLI; similarity can be switched off to behave
//! like a database without `pg_trgm`.

use super::{Affinity, CandidateQuery, CandidateRow, CatalogStore, OrderKey};
use crate::catalog::{listing_image, price_spread, Brand, Category, Dimension, Gender};
use crate::catalog::{Product, ProductImage, ProductVariant};
use crate::error::StoreError;
use crate::ids::ProductId;
use crate::money::Money;
use crate::search::condition::{Condition, ConditionSubject, TextField};
use crate::search::scoring::Scorer;
use crate::search::trigram;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// All catalog tables the engine reads, as plain records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub variants: Vec<ProductVariant>,
    pub images: Vec<ProductImage>,
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,
    pub genders: Vec<Gender>,
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    pub fn with_variant(mut self, variant: ProductVariant) -> Self {
        self.variants.push(variant);
        self
    }

    pub fn with_image(mut self, image: ProductImage) -> Self {
        self.images.push(image);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    pub fn with_brand(mut self, brand: Brand) -> Self {
        self.brands.push(brand);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.genders.push(gender);
        self
    }
}

/// A product joined with everything a listing needs.
#[derive(Debug, Clone)]
struct Listing {
    product: Product,
    category_slug: Option<String>,
    brand_slug: Option<String>,
    gender_slug: Option<String>,
    gender_label: Option<String>,
    min_price: Money,
    max_price: Money,
    image_url: Option<String>,
}

impl ConditionSubject for Listing {
    fn id(&self) -> &ProductId {
        &self.product.id
    }

    fn is_published(&self) -> bool {
        self.product.is_published
    }

    fn slug(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Category => self.category_slug.as_deref(),
            Dimension::Brand => self.brand_slug.as_deref(),
            Dimension::Gender => self.gender_slug.as_deref(),
        }
    }

    fn effective_price(&self) -> Money {
        self.product.effective_price()
    }

    fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Name => &self.product.name,
            TextField::Description => &self.product.description,
        }
    }
}

impl Listing {
    fn to_row(&self) -> CandidateRow {
        CandidateRow {
            id: self.product.id.clone(),
            name: self.product.name.clone(),
            description: self.product.description.clone(),
            image_url: self.image_url.clone(),
            min_price: Some(self.min_price),
            max_price: Some(self.max_price),
            created_at: self.product.created_at,
            subtitle: self.gender_label.clone(),
        }
    }
}

/// A [`CatalogStore`] over an in-memory snapshot.
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    listings: Vec<Listing>,
    similarity: bool,
}

impl InMemoryCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        let categories: HashMap<_, _> = snapshot.categories.iter().map(|c| (&c.id, c)).collect();
        let brands: HashMap<_, _> = snapshot.brands.iter().map(|b| (&b.id, b)).collect();
        let genders: HashMap<_, _> = snapshot.genders.iter().map(|g| (&g.id, g)).collect();

        let mut variants: HashMap<&ProductId, Vec<&ProductVariant>> = HashMap::new();
        for variant in &snapshot.variants {
            variants.entry(&variant.product_id).or_default().push(variant);
        }
        let mut images: HashMap<&ProductId, Vec<&ProductImage>> = HashMap::new();
        for image in &snapshot.images {
            images.entry(&image.product_id).or_default().push(image);
        }

        let listings = snapshot
            .products
            .iter()
            .map(|product| {
                let (min_price, max_price) = price_spread(
                    product,
                    variants.get(&product.id).into_iter().flatten().copied(),
                );
                let image_url = listing_image(
                    &product.id,
                    images.get(&product.id).into_iter().flatten().copied(),
                )
                .map(|img| img.url.clone());
                let gender = product.gender_id.as_ref().and_then(|id| genders.get(id));

                Listing {
                    product: product.clone(),
                    category_slug: product
                        .category_id
                        .as_ref()
                        .and_then(|id| categories.get(id))
                        .map(|c| c.slug.clone()),
                    brand_slug: product
                        .brand_id
                        .as_ref()
                        .and_then(|id| brands.get(id))
                        .map(|b| b.slug.clone()),
                    gender_slug: gender.map(|g| g.slug.clone()),
                    gender_label: gender.map(|g| g.label.clone()),
                    min_price,
                    max_price,
                    image_url,
                }
            })
            .collect();

        Self {
            listings,
            similarity: true,
        }
    }

    /// Enable or disable the similarity function. Disabled, any query that
    /// needs it fails with [`StoreError::SimilarityUnavailable`].
    pub fn with_similarity(mut self, enabled: bool) -> Self {
        self.similarity = enabled;
        self
    }

    pub fn supports_similarity(&self) -> bool {
        self.similarity
    }

    /// Number of products loaded, published or not.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    fn ensure_similarity(&self, needed: bool) -> Result<(), StoreError> {
        if needed && !self.similarity {
            return Err(StoreError::SimilarityUnavailable(
                "function similarity(text, text) does not exist".to_string(),
            ));
        }
        Ok(())
    }

    fn matching<'a>(&'a self, condition: &'a Condition) -> impl Iterator<Item = &'a Listing> + 'a {
        self.listings
            .iter()
            .filter(move |listing| condition.evaluate(*listing, &trigram::similarity))
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<CandidateRow>, StoreError> {
        self.ensure_similarity(query.uses_similarity())?;

        let mut keyed: Vec<(Vec<SortValue>, &Listing)> = self
            .matching(&query.condition)
            .map(|listing| (sort_values(&query.order, listing), listing))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| compare_keys(&query.order, a, b));

        let rows: Vec<CandidateRow> = keyed
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .map(|(_, listing)| listing.to_row())
            .collect();
        debug!(rows = rows.len(), "In-memory candidate fetch");
        Ok(rows)
    }

    async fn count(&self, condition: &Condition) -> Result<u64, StoreError> {
        self.ensure_similarity(condition.uses_similarity())?;
        Ok(self.matching(condition).count() as u64)
    }

    async fn affinity(&self, id: &ProductId) -> Result<Option<Affinity>, StoreError> {
        Ok(self
            .listings
            .iter()
            .find(|listing| &listing.product.id == id)
            .map(|listing| Affinity {
                category_id: listing.product.category_id.clone(),
                brand_id: listing.product.brand_id.clone(),
                gender_id: listing.product.gender_id.clone(),
            }))
    }
}

/// A precomputed ordering value.
#[derive(Debug, Clone)]
enum SortValue {
    Score(f64),
    Time(i64),
    Id(ProductId),
    Price(Money),
}

fn sort_values(order: &[OrderKey], listing: &Listing) -> Vec<SortValue> {
    order
        .iter()
        .map(|key| match key {
            OrderKey::Relevance(relevance) => SortValue::Score(Scorer::new(relevance.scoring).score(
                &relevance.terms,
                &listing.product.name,
                &listing.product.description,
            )),
            OrderKey::Affinity(affinity) => SortValue::Score(f64::from(affinity.score(
                listing.product.category_id.as_ref(),
                listing.product.brand_id.as_ref(),
                listing.product.gender_id.as_ref(),
            ))),
            OrderKey::CreatedAtDesc => {
                SortValue::Time(listing.product.created_at.timestamp_micros())
            }
            OrderKey::IdAsc => SortValue::Id(listing.product.id.clone()),
            OrderKey::PriceAsc | OrderKey::PriceDesc => {
                SortValue::Price(listing.product.effective_price())
            }
        })
        .collect()
}

fn compare_keys(order: &[OrderKey], a: &[SortValue], b: &[SortValue]) -> Ordering {
    order
        .iter()
        .zip(a.iter().zip(b))
        .map(|(key, (a, b))| {
            let ascending = match (a, b) {
                (SortValue::Score(x), SortValue::Score(y)) => x.total_cmp(y),
                (SortValue::Time(x), SortValue::Time(y)) => x.cmp(y),
                (SortValue::Id(x), SortValue::Id(y)) => x.cmp(y),
                (SortValue::Price(x), SortValue::Price(y)) => x.cmp(y),
                _ => Ordering::Equal,
            };
            match key {
                OrderKey::IdAsc | OrderKey::PriceAsc => ascending,
                OrderKey::Relevance(_)
                | OrderKey::Affinity(_)
                | OrderKey::CreatedAtDesc
                | OrderKey::PriceDesc => {
                    ascending.reverse()
                }
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
