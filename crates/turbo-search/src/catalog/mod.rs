//! Catalog records consumed by the search engine.
//!
//! The engine never writes these; they are owned by the catalog store.

mod dimension;
mod image;
mod product;

pub use dimension::{Brand, Category, Dimension, Gender};
pub use image::{listing_image, ProductImage};
pub use product::{price_spread, Product, ProductVariant};
