//! Product and variant records as read from the catalog store.

use crate::ids::{BrandId, CategoryId, GenderId, ProductId, VariantId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// List price.
    pub price: Money,
    /// Sale price, if any.
    #[serde(default)]
    pub sale_price: Option<Money>,
    /// Units in stock.
    #[serde(default)]
    pub in_stock: i64,
    /// Whether the product is visible on the storefront.
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub brand_id: Option<BrandId>,
    #[serde(default)]
    pub gender_id: Option<GenderId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Create a new unpublished product.
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: Money) -> Self {
        Self {
            id: ProductId::generate(),
            name: name.into(),
            description: description.into(),
            price,
            sale_price: None,
            in_stock: 0,
            is_published: false,
            category_id: None,
            brand_id: None,
            gender_id: None,
            created_at: Utc::now(),
        }
    }

    /// Price a customer pays: the sale price when set, else the list price.
    pub fn effective_price(&self) -> Money {
        self.sale_price.unwrap_or(self.price)
    }

    /// Whether the sale price is an actual discount on the list price.
    pub fn is_on_sale(&self) -> bool {
        self.sale_price
            .map(|sale| sale.amount_cents < self.price.amount_cents)
            .unwrap_or(false)
    }
}

/// A purchasable variant of a product (e.g. a size or amperage).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: VariantId,
    /// Parent product.
    pub product_id: ProductId,
    /// Variant name (e.g. "800Amp").
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub sale_price: Option<Money>,
    #[serde(default)]
    pub in_stock: i64,
    /// Inactive variants are ignored for price reporting.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ProductVariant {
    /// Create a new active variant.
    pub fn new(product_id: ProductId, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: VariantId::generate(),
            product_id,
            name: name.into(),
            price,
            sale_price: None,
            in_stock: 0,
            is_active: true,
        }
    }

    /// Sale price when set, else the list price.
    pub fn effective_price(&self) -> Money {
        self.sale_price.unwrap_or(self.price)
    }
}

/// Lowest and highest effective price a product is offered at.
///
/// Spans the product's active variants; a product without active variants
/// reports its own effective price for both ends.
pub fn price_spread<'a>(
    product: &Product,
    variants: impl IntoIterator<Item = &'a ProductVariant>,
) -> (Money, Money) {
    let mut prices = variants
        .into_iter()
        .filter(|v| v.is_active && v.product_id == product.id)
        .map(ProductVariant::effective_price);

    match prices.next() {
        Some(first) => prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))),
        None => {
            let own = product.effective_price();
            (own, own)
        }
    }
}
