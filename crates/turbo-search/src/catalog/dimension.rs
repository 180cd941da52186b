//! Lookup dimensions used as facets: categories, brands and genders.

use crate::ids::{BrandId, CategoryId, GenderId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A facet dimension a product can be filtered on by slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Category,
    Brand,
    Gender,
}

impl Dimension {
    /// All dimensions, in filter application order.
    pub const ALL: [Dimension; 3] = [Dimension::Gender, Dimension::Brand, Dimension::Category];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Category => "category",
            Dimension::Brand => "brand",
            Dimension::Gender => "gender",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// URL-friendly slug, the value filters select on.
    pub slug: String,
    /// Parent category (None for root categories).
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            parent_id: None,
        }
    }
}

/// A product brand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Brand {
    pub fn new(id: impl Into<BrandId>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            logo_url: None,
        }
    }
}

/// A gender/audience dimension. Its label doubles as the listing subtitle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Gender {
    pub id: GenderId,
    pub label: String,
    pub slug: String,
}

impl Gender {
    pub fn new(id: impl Into<GenderId>, label: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            slug: slug.into(),
        }
    }
}
