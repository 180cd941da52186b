//! End-to-end search behavior over the in-memory catalog.

mod common;

use common::{cop, engine, engine_without_similarity};
use turbo_search::prelude::*;

async fn ids_for(engine: &SearchEngine<InMemoryCatalog>, qs: &str) -> (Vec<String>, u64) {
    let results = engine
        .search_params(&RawParams::from_query_string(qs))
        .await
        .unwrap();
    let ids = results.ids().into_iter().map(str::to_string).collect();
    (ids, results.total_count)
}

#[tokio::test]
async fn test_bateria_willard_ranks_exact_name_first() {
    let (ids, total) = ids_for(&engine(), "search=bateria+willard").await;
    // p03 is named exactly "Willard" (400 + 300), p01 starts with "Bateria"
    // (300 + 200), p04 only mentions both in its description (200 + 200).
    assert_eq!(ids, vec!["p03", "p01", "p04"]);
    assert_eq!(total, 3);
}

#[tokio::test]
async fn test_price_ranges_sorted_ascending() {
    let (ids, total) = ids_for(&engine(), "price=0-50000&price=200000-&sort=price_asc").await;
    assert_eq!(ids, vec!["p12", "p04", "p06", "p03", "p02", "p01", "p09"]);
    assert_eq!(total, 7);
}

#[tokio::test]
async fn test_category_and_brand_intersect() {
    let (ids, total) = ids_for(&engine(), "category=electrico&brand=siemens").await;
    assert_eq!(ids, vec!["p06", "p05"]);
    assert_eq!(total, 2);
}

#[tokio::test]
async fn test_unpublished_products_never_returned() {
    let engine = engine();

    let (ids, total) = ids_for(&engine, "search=1100Amp").await;
    assert!(ids.is_empty());
    assert_eq!(total, 0);

    let (ids, total) = ids_for(&engine, "brand=willard&limit=60").await;
    assert_eq!(ids, vec!["p03", "p01"]);
    assert_eq!(total, 2);

    let (_, total) = ids_for(&engine, "").await;
    assert_eq!(total, 11);
}

#[tokio::test]
async fn test_every_token_must_match() {
    let (ids, _) = ids_for(&engine(), "search=breaker+siemens").await;
    assert_eq!(ids.len(), 2);
    assert!(ids.iter().all(|id| id == "p05" || id == "p06"));

    let (ids, total) = ids_for(&engine(), "search=breaker+stanley").await;
    assert!(ids.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_browse_pages_are_exact() {
    let engine = engine();
    let (page1, total) = ids_for(&engine, "limit=5").await;
    let (page2, _) = ids_for(&engine, "limit=5&page=2").await;
    let (page3, _) = ids_for(&engine, "limit=5&page=3").await;

    assert_eq!(total, 11);
    assert_eq!(page1, vec!["p12", "p11", "p09", "p08", "p07"]);
    assert_eq!(page2, vec!["p06", "p05", "p04", "p03", "p02"]);
    assert_eq!(page3, vec!["p01"]);
}

#[tokio::test]
async fn test_search_pages_slice_the_ranked_window() {
    let engine = engine();
    let (all, total) = ids_for(&engine, "search=bateria").await;
    let (page1, _) = ids_for(&engine, "search=bateria&limit=2").await;
    let (page2, _) = ids_for(&engine, "search=bateria&limit=2&page=2").await;
    let (page3, page3_total) = ids_for(&engine, "search=bateria&limit=2&page=3").await;

    assert_eq!(total, 4);
    assert_eq!(all, vec!["p03", "p02", "p01", "p04"]);
    assert_eq!([page1, page2].concat(), all);
    assert!(page3.is_empty());
    assert_eq!(page3_total, 4);
}

#[tokio::test]
async fn test_equal_relevance_and_time_break_on_id() {
    let mut snapshot = CatalogSnapshot::new();
    for id in ["c", "a", "b"] {
        let mut product = Product::new("Cable", "", cop(1_000.0));
        product.id = ProductId::new(id);
        product.is_published = true;
        product.created_at = common::day(1);
        snapshot = snapshot.with_product(product);
    }
    let engine = SearchEngine::new(InMemoryCatalog::new(snapshot));

    for qs in ["search=cable", "", "sort=price_asc", "sort=price_desc"] {
        let (ids, _) = ids_for(&engine, qs).await;
        assert_eq!(ids, vec!["a", "b", "c"], "query {qs:?}");
    }
}

#[tokio::test]
async fn test_fuzzy_match_for_misspelling() {
    let (ids, total) = ids_for(&engine(), "search=hiunday").await;
    assert_eq!(ids, vec!["p09"]);
    assert_eq!(total, 1);
}

#[tokio::test]
async fn test_fallback_matches_substring_semantics() {
    let with_similarity = engine();
    let without = engine_without_similarity();

    for qs in [
        "search=bateria+willard",
        "search=breaker&sort=price_desc",
        "search=stanley&limit=1&page=2",
    ] {
        assert_eq!(
            ids_for(&with_similarity, qs).await,
            ids_for(&without, qs).await,
            "query {qs:?}"
        );
    }

    let (ids, total) = ids_for(&without, "search=hiunday").await;
    assert!(ids.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_best_match_survives_a_crowded_window() {
    let mut exact = Product::new("Cable", "", cop(5_000.0));
    exact.id = ProductId::new("best");
    exact.is_published = true;
    exact.created_at = common::day(1);

    let mut snapshot = CatalogSnapshot::new().with_product(exact);
    for n in 0..70 {
        let mut roll = Product::new(format!("Rollo de cable {n}"), "", cop(90_000.0));
        roll.id = ProductId::new(format!("r{n:02}"));
        roll.is_published = true;
        roll.created_at = common::day(2) + chrono::Duration::minutes(n);
        snapshot = snapshot.with_product(roll);
    }

    let with_similarity = SearchEngine::new(InMemoryCatalog::new(snapshot.clone()));
    let without = SearchEngine::new(InMemoryCatalog::new(snapshot).with_similarity(false));

    // 71 matches against a window of 60
    let (ids, total) = ids_for(&with_similarity, "search=cable&limit=10").await;
    assert_eq!(total, 71);
    assert_eq!(&ids[..3], &["best", "r69", "r68"]);
    assert_eq!(ids_for(&without, "search=cable&limit=10").await, (ids, total));
}

#[tokio::test]
async fn test_fuzzy_disabled_by_config_equals_fallback() {
    let config = SearchConfig {
        fuzzy_enabled: false,
        ..SearchConfig::default()
    };
    let disabled = SearchEngine::with_config(
        InMemoryCatalog::new(common::catalog()).with_similarity(false),
        config,
    );
    let fallback = engine_without_similarity();

    for qs in ["search=bateria+willard", "search=hiunday", "search=siemens"] {
        assert_eq!(ids_for(&disabled, qs).await, ids_for(&fallback, qs).await);
    }
}

#[tokio::test]
async fn test_price_bounds_or_named_ranges() {
    let (ids, total) = ids_for(
        &engine(),
        "priceMin=30000&priceMax=50000&price=1000000-",
    )
    .await;
    assert_eq!(ids, vec!["p09", "p06"]);
    assert_eq!(total, 2);
}

#[tokio::test]
async fn test_sale_price_is_the_effective_price() {
    // p06 lists at 45000 but sells at 40000
    let (ids, _) = ids_for(&engine(), "priceMax=42000&category=electrico").await;
    assert_eq!(ids, vec!["p06"]);
}

#[tokio::test]
async fn test_price_sort_ignores_variant_spread() {
    let mut lamp = Product::new("Lampara", "", cop(50_000.0));
    lamp.id = ProductId::new("lamp");
    lamp.sale_price = Some(cop(40_000.0));
    lamp.is_published = true;
    lamp.created_at = common::day(1);

    let mut bulb = Product::new("Bombillo", "", cop(45_000.0));
    bulb.id = ProductId::new("bulb");
    bulb.is_published = true;
    bulb.created_at = common::day(2);

    let snapshot = CatalogSnapshot::new()
        .with_product(lamp)
        .with_product(bulb)
        .with_variant(ProductVariant::new("lamp".into(), "Pie", cop(95_000.0)));
    let engine = SearchEngine::new(InMemoryCatalog::new(snapshot));

    let (ids, total) = ids_for(&engine, "price=0-50000&sort=price_asc").await;
    assert_eq!(ids, vec!["lamp", "bulb"]);
    assert_eq!(total, 2);

    let (ids, _) = ids_for(&engine, "price=0-50000&sort=price_desc").await;
    assert_eq!(ids, vec!["bulb", "lamp"]);
}

#[tokio::test]
async fn test_listing_fields() {
    let results = engine()
        .search(&ProductQuery::new().with_categories(["electrico"]))
        .await
        .unwrap();

    let cable = results.products.iter().find(|p| p.id.as_str() == "p11").unwrap();
    assert_eq!(cable.min_price, Some(cop(100_000.0)));
    assert_eq!(cable.max_price, Some(cop(150_000.0)));
    assert_eq!(cable.subtitle.as_deref(), Some("Unisex"));
    assert_eq!(cable.image_url, None);

    let breaker = results.products.iter().find(|p| p.id.as_str() == "p05").unwrap();
    assert_eq!(breaker.image_url.as_deref(), Some("/img/p05-a.jpg"));

    let results = engine()
        .search(&ProductQuery::new().with_search("800amp"))
        .await
        .unwrap();
    assert_eq!(results.products[0].image_url.as_deref(), Some("/img/p01-front.jpg"));
    assert_eq!(results.products[0].min_price, Some(cop(399_000.0)));
}

#[tokio::test]
async fn test_malformed_input_is_normalized() {
    let (ids, total) = ids_for(
        &engine(),
        "search=%20%20&page=-3&limit=abc&sort=bogus&priceMin=cheap&price=x-y&category=",
    )
    .await;
    assert_eq!(total, 11);
    assert_eq!(ids.len(), 11);
    assert_eq!(ids[0], "p12");
}

#[tokio::test]
async fn test_results_json_shape() {
    let results = engine()
        .search(&ProductQuery::new().with_search("martillo"))
        .await
        .unwrap();
    let json = serde_json::to_value(&results).unwrap();

    assert_eq!(json["totalCount"], 1);
    let product = &json["products"][0];
    assert_eq!(product["id"], "p08");
    assert_eq!(product["name"], "Martillo Stanley");
    assert_eq!(product["minPrice"], 55_000.0);
    assert_eq!(product["maxPrice"], 55_000.0);
    assert_eq!(product["subtitle"], "Unisex");
    assert!(product["imageUrl"].is_null());
    assert!(product["createdAt"].is_string());
    assert!(product.get("relevance").is_none());
}

#[tokio::test]
async fn test_latest_products() {
    let latest = engine().latest(Some(3)).await.unwrap();
    let ids: Vec<&str> = latest.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p12", "p11", "p09"]);

    assert_eq!(engine().latest(None).await.unwrap().len(), 6);
}

#[tokio::test]
async fn test_recommended_products() {
    let snapshot = common::catalog()
        .with_image(ProductImage::new("p03".into(), "/img/p03.jpg"))
        .with_image(ProductImage::new("p02".into(), "/img/p02.jpg"))
        .with_image(ProductImage::new("p12".into(), "/img/p12.jpg"))
        .with_image(ProductImage::new("p06".into(), "/img/p06.jpg"));
    let engine = SearchEngine::new(InMemoryCatalog::new(snapshot));

    // p03 shares category, brand and gender with p01; p04 and p02 share
    // category and gender; the rest only gender. Of the first eight, p04 and
    // the gender-only p11, p09, p08, p07 have no image. p06 has one but
    // ranks ninth.
    let products = engine.recommended(&ProductId::new("p01")).await.unwrap();
    let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p03", "p02", "p12"]);

    // unpublished products get recommendations but never appear in them
    let products = engine.recommended(&ProductId::new("p10")).await.unwrap();
    assert!(products.iter().all(|p| p.id.as_str() != "p10"));
    assert_eq!(products[0].id.as_str(), "p03");
}

#[tokio::test]
async fn test_pagination_from_results() {
    let results = engine()
        .search_params(&RawParams::from_query_string("limit=5&page=2"))
        .await
        .unwrap();
    let pagination = results.pagination(2, 5);
    assert_eq!(pagination.total_pages, 3);
    assert!(pagination.has_next && pagination.has_prev);
    assert_eq!((pagination.start_item(), pagination.end_item()), (6, 10));
}
