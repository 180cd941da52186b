//! Shared fixture: a small hardware-store catalog.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use turbo_search::prelude::*;

pub fn cop(amount: f64) -> Money {
    Money::from_decimal(amount, Currency::COP)
}

pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, d, 10, 0, 0).unwrap()
}

pub struct ProductSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub category: Option<&'static str>,
    pub brand: Option<&'static str>,
    pub published: bool,
    pub day: u32,
}

impl ProductSpec {
    pub const fn new(id: &'static str, name: &'static str, price: f64, day: u32) -> Self {
        Self {
            id,
            name,
            description: "",
            price,
            sale_price: None,
            category: None,
            brand: None,
            published: true,
            day,
        }
    }

    pub fn build(&self) -> Product {
        let mut product = Product::new(self.name, self.description, cop(self.price));
        product.id = ProductId::new(self.id);
        product.sale_price = self.sale_price.map(cop);
        product.category_id = self.category.map(CategoryId::from);
        product.brand_id = self.brand.map(BrandId::from);
        product.gender_id = Some(GenderId::from("unisex"));
        product.is_published = self.published;
        product.in_stock = 5;
        product.created_at = day(self.day);
        product
    }
}

const fn spec(id: &'static str, name: &'static str, price: f64, day: u32) -> ProductSpec {
    ProductSpec::new(id, name, price, day)
}

pub fn products() -> Vec<ProductSpec> {
    vec![
        ProductSpec {
            description: "Bateria para carro 12V",
            sale_price: Some(399_000.0),
            category: Some("baterias"),
            brand: Some("willard"),
            ..spec("p01", "Bateria Willard 800Amp", 450_000.0, 1)
        },
        ProductSpec {
            description: "Bateria libre de mantenimiento",
            category: Some("baterias"),
            brand: Some("mac"),
            ..spec("p02", "Bateria MAC Silver", 380_000.0, 2)
        },
        ProductSpec {
            description: "Bateria Willard estandar",
            category: Some("baterias"),
            brand: Some("willard"),
            ..spec("p03", "Willard", 300_000.0, 3)
        },
        ProductSpec {
            description: "Para bateria willard y mac",
            category: Some("baterias"),
            ..spec("p04", "Kit de bornes", 25_000.0, 4)
        },
        ProductSpec {
            category: Some("electrico"),
            brand: Some("siemens"),
            ..spec("p05", "Breaker Siemens 2x20A", 60_000.0, 5)
        },
        ProductSpec {
            sale_price: Some(40_000.0),
            category: Some("electrico"),
            brand: Some("siemens"),
            ..spec("p06", "Breaker Siemens 1x15A", 45_000.0, 6)
        },
        ProductSpec {
            category: Some("electrico"),
            ..spec("p07", "Breaker Schneider 2x30A", 70_000.0, 7)
        },
        ProductSpec {
            category: Some("herramientas"),
            brand: Some("stanley"),
            ..spec("p08", "Martillo Stanley", 55_000.0, 8)
        },
        spec("p09", "Hyundai", 1_200_000.0, 9),
        ProductSpec {
            category: Some("baterias"),
            brand: Some("willard"),
            published: false,
            ..spec("p10", "Bateria Willard 1100Amp", 520_000.0, 10)
        },
        ProductSpec {
            category: Some("electrico"),
            ..spec("p11", "Cable duplex 2x12", 120_000.0, 11)
        },
        ProductSpec {
            category: Some("herramientas"),
            brand: Some("stanley"),
            ..spec("p12", "Destornillador Stanley", 20_000.0, 12)
        },
    ]
}

pub fn catalog() -> CatalogSnapshot {
    let mut snapshot = CatalogSnapshot::new()
        .with_category(Category::new("baterias", "Baterías", "baterias"))
        .with_category(Category::new("electrico", "Eléctrico", "electrico"))
        .with_category(Category::new("herramientas", "Herramientas", "herramientas"))
        .with_brand(Brand::new("willard", "Willard", "willard"))
        .with_brand(Brand::new("mac", "MAC", "mac"))
        .with_brand(Brand::new("siemens", "Siemens", "siemens"))
        .with_brand(Brand::new("stanley", "Stanley", "stanley"))
        .with_gender(Gender::new("unisex", "Unisex", "unisex"));

    for spec in products() {
        snapshot = snapshot.with_product(spec.build());
    }

    let mut inactive = ProductVariant::new("p11".into(), "Rollo 500m", cop(900_000.0));
    inactive.is_active = false;

    snapshot
        .with_variant(ProductVariant::new("p11".into(), "Rollo 100m", cop(150_000.0)))
        .with_variant(ProductVariant::new("p11".into(), "Metro", cop(100_000.0)))
        .with_variant(inactive)
        .with_image(ProductImage::new("p01".into(), "/img/p01-side.jpg").with_sort_order(0))
        .with_image(ProductImage::new("p01".into(), "/img/p01-front.jpg").with_sort_order(3).primary())
        .with_image(ProductImage::new("p05".into(), "/img/p05-b.jpg").with_sort_order(2))
        .with_image(ProductImage::new("p05".into(), "/img/p05-a.jpg").with_sort_order(1))
}

pub fn engine() -> SearchEngine<InMemoryCatalog> {
    SearchEngine::new(InMemoryCatalog::new(catalog()))
}

pub fn engine_without_similarity() -> SearchEngine<InMemoryCatalog> {
    SearchEngine::new(InMemoryCatalog::new(catalog()).with_similarity(false))
}
