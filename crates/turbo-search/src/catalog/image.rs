//! Product images.

use crate::ids::{ImageId, ProductId};
use serde::{Deserialize, Serialize};

/// An image attached to a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: ImageId,
    pub product_id: ProductId,
    pub url: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl ProductImage {
    pub fn new(product_id: ProductId, url: impl Into<String>) -> Self {
        Self {
            id: ImageId::generate(),
            product_id,
            url: url.into(),
            is_primary: false,
            sort_order: 0,
        }
    }

    /// Mark as the primary image.
    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    /// Set the sort position.
    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }
}

/// Pick the one image a listing shows for `product_id`: the primary image if
/// any, else the lowest `sort_order`.
pub fn listing_image<'a>(
    product_id: &ProductId,
    images: impl IntoIterator<Item = &'a ProductImage>,
) -> Option<&'a ProductImage> {
    images
        .into_iter()
        .filter(|img| &img.product_id == product_id)
        .min_by_key(|img| (!img.is_primary, img.sort_order))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_wins_over_sort_order() {
        let pid = ProductId::new("p-1");
        let images = vec![
            ProductImage::new(pid.clone(), "/a.jpg").with_sort_order(0),
            ProductImage::new(pid.clone(), "/b.jpg").with_sort_order(5).primary(),
        ];
        assert_eq!(listing_image(&pid, &images).unwrap().url, "/b.jpg");
    }

    #[test]
    fn test_lowest_sort_order_without_primary() {
        let pid = ProductId::new("p-1");
        let images = vec![
            ProductImage::new(pid.clone(), "/late.jpg").with_sort_order(3),
            ProductImage::new(pid.clone(), "/early.jpg").with_sort_order(1),
            ProductImage::new(ProductId::new("other"), "/other.jpg").primary(),
        ];
        assert_eq!(listing_image(&pid, &images).unwrap().url, "/early.jpg");
    }

    #[test]
    fn test_no_images() {
        let pid = ProductId::new("p-1");
        assert!(listing_image(&pid, &[]).is_none());
    }
}
