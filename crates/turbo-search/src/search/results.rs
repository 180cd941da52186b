//! Search results and pagination.

use crate::ids::ProductId;
use crate::money::{self, Money};
use crate::store::CandidateRow;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A product as shown in a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    pub id: ProductId,
    pub name: String,
    /// The listing image: primary, else lowest sort order.
    pub image_url: Option<String>,
    #[serde(serialize_with = "money::decimal_opt::serialize")]
    pub min_price: Option<Money>,
    #[serde(serialize_with = "money::decimal_opt::serialize")]
    pub max_price: Option<Money>,
    pub created_at: DateTime<Utc>,
    pub subtitle: Option<String>,
    /// Only meaningful while ranking; never serialized.
    #[serde(skip)]
    pub(crate) relevance: f64,
}

impl RankedResult {
    pub(crate) fn from_candidate(row: CandidateRow, relevance: f64) -> Self {
        Self {
            id: row.id,
            name: row.name,
            image_url: row.image_url,
            min_price: row.min_price,
            max_price: row.max_price,
            created_at: row.created_at,
            subtitle: row.subtitle,
            relevance,
        }
    }
}

impl From<CandidateRow> for RankedResult {
    fn from(row: CandidateRow) -> Self {
        Self::from_candidate(row, 0.0)
    }
}

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Whether there's a next page.
    pub has_next: bool,
    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl Pagination {
    /// Create pagination info.
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(per_page as u64)
        };

        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: (page as u64) < total_pages,
            has_prev: page > 1,
        }
    }

    /// Rows before this page.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }

    /// Get start item number (1-indexed), 0 when there is nothing to show.
    pub fn start_item(&self) -> u64 {
        if self.total == 0 || self.offset() >= self.total {
            0
        } else {
            self.offset() + 1
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> u64 {
        (self.page as u64 * self.per_page as u64).min(self.total)
    }
}

/// One page of listing results plus the total match count.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub products: Vec<RankedResult>,
    /// Matches across all pages.
    pub total_count: u64,
}

impl SearchResults {
    pub fn new(products: Vec<RankedResult>, total_count: u64) -> Self {
        Self {
            products,
            total_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Number of products on this page.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Product ids in display order.
    pub fn ids(&self) -> Vec<&str> {
        self.products.iter().map(|p| p.id.as_str()).collect()
    }

    /// Pagination info for the page these results were fetched with.
    pub fn pagination(&self, page: u32, limit: u32) -> Pagination {
        Pagination::new(page, limit, self.total_count)
    }
}
