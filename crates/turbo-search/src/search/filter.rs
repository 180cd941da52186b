//! Canonical product filter and the normalizer that produces it.
//!
//! Filter input is never a reason to fail a request: anything that does not
//! parse is dropped or replaced by its default.

use crate::catalog::Dimension;
use crate::config::SearchConfig;
use crate::money::{Currency, Money};
use crate::search::RawParams;
use serde::{Deserialize, Serialize};

/// Sort modes offered on listing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Newest first.
    #[default]
    Featured,
    /// Creation time, newest first.
    Newest,
    /// Lowest effective price first.
    PriceAsc,
    /// Highest effective price first.
    PriceDesc,
}

impl SortOption {
    /// Parse a request value; unknown values yield `None`.
    pub fn from_param(s: &str) -> Option<Self> {
        match s.trim() {
            "featured" => Some(SortOption::Featured),
            "newest" => Some(SortOption::Newest),
            "price_asc" => Some(SortOption::PriceAsc),
            "price_desc" => Some(SortOption::PriceDesc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Featured => "featured",
            SortOption::Newest => "newest",
            SortOption::PriceAsc => "price_asc",
            SortOption::PriceDesc => "price_desc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Featured => "Featured",
            SortOption::Newest => "Newest",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
        }
    }
}

/// An inclusive price band; either end may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<Money>,
    pub max: Option<Money>,
}

impl PriceRange {
    pub fn new(min: Option<Money>, max: Option<Money>) -> Self {
        Self { min, max }
    }

    /// True when neither end is set.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Check whether `price` falls inside the band.
    pub fn contains(&self, price: Money) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }

    /// Parse a named range such as `"50000-100000"`, `"200000-"` or `"-50000"`.
    ///
    /// Returns `None` when a present end does not parse or both ends are
    /// empty; dropping the range never widens what it selects.
    pub fn parse(s: &str, currency: Currency) -> Option<Self> {
        let (min, max) = s.trim().split_once('-')?;
        let min = parse_bound(min, currency)?;
        let max = parse_bound(max, currency)?;
        let range = Self::new(min, max);
        (!range.is_unbounded()).then_some(range)
    }
}

/// `Some(None)` for an empty end, `None` for garbage.
fn parse_bound(s: &str, currency: Currency) -> Option<Option<Money>> {
    let s = s.trim();
    if s.is_empty() {
        return Some(None);
    }
    parse_amount(s, currency).map(Some)
}

fn parse_amount(s: &str, currency: Currency) -> Option<Money> {
    let amount: f64 = s.trim().parse().ok()?;
    finite_amount(amount, currency)
}

fn finite_amount(amount: f64, currency: Currency) -> Option<Money> {
    amount
        .is_finite()
        .then(|| Money::from_decimal(amount, currency))
}

/// The canonical, fully-defaulted filter the planner works from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductFilter {
    /// Trimmed search text; `None` when absent or blank.
    pub search: Option<String>,
    pub category_slugs: Vec<String>,
    pub brand_slugs: Vec<String>,
    pub gender_slugs: Vec<String>,
    pub price_min: Option<Money>,
    pub price_max: Option<Money>,
    /// Named price bands, any of which may match.
    pub price_ranges: Vec<PriceRange>,
    pub sort: SortOption,
    /// 1-indexed page.
    pub page: u32,
    /// Page size, within `[1, max_limit]`.
    pub limit: u32,
}

impl Default for ProductFilter {
    fn default() -> Self {
        let config = SearchConfig::default();
        Self {
            search: None,
            category_slugs: Vec::new(),
            brand_slugs: Vec::new(),
            gender_slugs: Vec::new(),
            price_min: None,
            price_max: None,
            price_ranges: Vec::new(),
            sort: SortOption::default(),
            page: 1,
            limit: config.default_limit,
        }
    }
}

impl ProductFilter {
    /// Selected slugs for a dimension.
    pub fn slugs(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Category => &self.category_slugs,
            Dimension::Brand => &self.brand_slugs,
            Dimension::Gender => &self.gender_slugs,
        }
    }

    /// The explicit min/max bounds as a range, when either is set.
    pub fn explicit_price_bounds(&self) -> Option<PriceRange> {
        let range = PriceRange::new(self.price_min, self.price_max);
        (!range.is_unbounded()).then_some(range)
    }

    /// Number of rows before the requested page.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.limit as usize)
    }

    /// Whether a free-text search is active.
    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }
}

/// Typed search input, shaped like the public request contract.
///
/// Every field is optional; [`FilterNormalizer::normalize_query`] applies
/// defaults and clamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category_slugs: Vec<String>,
    pub brand_slugs: Vec<String>,
    pub gender_slugs: Vec<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    /// `[min, max]` pairs; `null` leaves an end open.
    pub price_ranges: Vec<(Option<f64>, Option<f64>)>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, q: impl Into<String>) -> Self {
        self.search = Some(q.into());
        self
    }

    pub fn with_categories<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_slugs.extend(slugs.into_iter().map(Into::into));
        self
    }

    pub fn with_brands<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brand_slugs.extend(slugs.into_iter().map(Into::into));
        self
    }

    pub fn with_genders<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gender_slugs.extend(slugs.into_iter().map(Into::into));
        self
    }

    pub fn with_price_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.price_min = min;
        self.price_max = max;
        self
    }

    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.price_ranges.push((min, max));
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Turns raw or typed request input into a [`ProductFilter`].
#[derive(Debug, Clone, Copy)]
pub struct FilterNormalizer {
    currency: Currency,
    default_limit: u32,
    max_limit: u32,
}

impl FilterNormalizer {
    pub fn new(config: &SearchConfig) -> Self {
        let max_limit = config.max_limit.max(1);
        Self {
            currency: config.currency,
            default_limit: config.default_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    /// Normalize query-string style parameters.
    ///
    /// Keys: `search` (or `q`), `category`, `brand`, `gender` (repeated or
    /// comma-separated), `priceMin`, `priceMax`, `price` (named ranges),
    /// `sort`, `page`, `limit`.
    pub fn normalize_params(&self, params: &RawParams) -> ProductFilter {
        let search = params.first("search").or_else(|| params.first("q"));

        let price_ranges = params
            .all("price")
            .into_iter()
            .flat_map(|v| v.split(','))
            .filter_map(|v| PriceRange::parse(v, self.currency))
            .collect();

        ProductFilter {
            search: normalize_search(search),
            category_slugs: slug_set(params.all("category")),
            brand_slugs: slug_set(params.all("brand")),
            gender_slugs: slug_set(params.all("gender")),
            price_min: params
                .first("priceMin")
                .and_then(|v| parse_amount(v, self.currency)),
            price_max: params
                .first("priceMax")
                .and_then(|v| parse_amount(v, self.currency)),
            price_ranges,
            sort: params
                .first("sort")
                .and_then(SortOption::from_param)
                .unwrap_or_default(),
            page: self.page(params.first("page").and_then(parse_int)),
            limit: self.limit(params.first("limit").and_then(parse_int)),
        }
    }

    /// Normalize typed input.
    pub fn normalize_query(&self, query: &ProductQuery) -> ProductFilter {
        let price_ranges = query
            .price_ranges
            .iter()
            .filter_map(|&(min, max)| {
                let min = min.and_then(|v| finite_amount(v, self.currency));
                let max = max.and_then(|v| finite_amount(v, self.currency));
                let range = PriceRange::new(min, max);
                (!range.is_unbounded()).then_some(range)
            })
            .collect();

        ProductFilter {
            search: normalize_search(query.search.as_deref()),
            category_slugs: slug_set(query.category_slugs.iter().map(String::as_str)),
            brand_slugs: slug_set(query.brand_slugs.iter().map(String::as_str)),
            gender_slugs: slug_set(query.gender_slugs.iter().map(String::as_str)),
            price_min: query.price_min.and_then(|v| finite_amount(v, self.currency)),
            price_max: query.price_max.and_then(|v| finite_amount(v, self.currency)),
            price_ranges,
            sort: query
                .sort
                .as_deref()
                .and_then(SortOption::from_param)
                .unwrap_or_default(),
            page: self.page(query.page),
            limit: self.limit(query.limit),
        }
    }

    /// Re-apply the page and limit bounds to a filter built by hand.
    pub fn clamp_paging(&self, filter: &ProductFilter) -> ProductFilter {
        ProductFilter {
            page: self.page(Some(i64::from(filter.page))),
            limit: self.limit(Some(i64::from(filter.limit))),
            ..filter.clone()
        }
    }

    fn page(&self, page: Option<i64>) -> u32 {
        page.unwrap_or(1).clamp(1, u32::MAX as i64) as u32
    }

    /// Missing or zero means the default; everything else is clamped.
    fn limit(&self, limit: Option<i64>) -> u32 {
        match limit {
            None | Some(0) => self.default_limit,
            Some(n) => n.clamp(1, self.max_limit as i64) as u32,
        }
    }
}

fn normalize_search(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}

/// Split comma-separated values, drop blanks, de-duplicate keeping the first
/// occurrence.
fn slug_set<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for slug in values.into_iter().flat_map(|v| v.split(',')).map(str::trim) {
        if !slug.is_empty() && !out.iter().any(|s| s == slug) {
            out.push(slug.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cop(amount: f64) -> Money {
        Money::from_decimal(amount, Currency::COP)
    }

    fn normalizer() -> FilterNormalizer {
        FilterNormalizer::new(&SearchConfig::default())
    }

    #[test]
    fn test_defaults_from_empty_input() {
        let filter = normalizer().normalize_params(&RawParams::new());
        assert_eq!(filter, ProductFilter::default());
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 20);
        assert_eq!(filter.sort, SortOption::Featured);
    }

    #[test]
    fn test_search_is_trimmed_and_blank_dropped() {
        let n = normalizer();
        let filter = n.normalize_params(&RawParams::new().with("search", "  brake pad  "));
        assert_eq!(filter.search.as_deref(), Some("brake pad"));

        let filter = n.normalize_params(&RawParams::new().with("q", "   "));
        assert_eq!(filter.search, None);
    }

    #[test]
    fn test_slugs_deduplicated_in_first_seen_order() {
        let params = RawParams::from_query_string(
            "category=cableado&category=herramientas,cableado&brand=&brand=siemens",
        );
        let filter = normalizer().normalize_params(&params);
        assert_eq!(filter.category_slugs, vec!["cableado", "herramientas"]);
        assert_eq!(filter.brand_slugs, vec!["siemens"]);
        assert!(filter.gender_slugs.is_empty());
    }

    #[test]
    fn test_bad_numbers_are_dropped() {
        let params = RawParams::new()
            .with("priceMin", "cheap")
            .with("priceMax", "100000")
            .with("page", "two")
            .with("limit", "lots");
        let filter = normalizer().normalize_params(&params);
        assert_eq!(filter.price_min, None);
        assert_eq!(filter.price_max, Some(cop(100_000.0)));
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 20);
    }

    #[test]
    fn test_page_and_limit_clamping() {
        let n = normalizer();
        let clamp = |page: &str, limit: &str| {
            let f = n.normalize_params(&RawParams::new().with("page", page).with("limit", limit));
            (f.page, f.limit)
        };
        assert_eq!(clamp("0", "500"), (1, 60));
        assert_eq!(clamp("-4", "-3"), (1, 1));
        assert_eq!(clamp("3", "0"), (3, 20));
        assert_eq!(clamp("7", "15"), (7, 15));
    }

    #[test]
    fn test_clamp_paging_on_hand_built_filter() {
        let filter = ProductFilter {
            search: Some("cable".into()),
            page: 0,
            limit: 500,
            ..ProductFilter::default()
        };
        let clamped = normalizer().clamp_paging(&filter);
        assert_eq!((clamped.page, clamped.limit), (1, 60));
        assert_eq!(clamped.search, filter.search);

        let zero = ProductFilter {
            limit: 0,
            ..ProductFilter::default()
        };
        assert_eq!(normalizer().clamp_paging(&zero).limit, 20);
    }

    #[test]
    fn test_unknown_sort_falls_back_to_featured() {
        let n = normalizer();
        let f = n.normalize_params(&RawParams::new().with("sort", "price_asc"));
        assert_eq!(f.sort, SortOption::PriceAsc);
        let f = n.normalize_params(&RawParams::new().with("sort", "rating"));
        assert_eq!(f.sort, SortOption::Featured);
    }

    #[test]
    fn test_named_price_ranges() {
        let params = RawParams::new()
            .with("price", "0-50000")
            .with("price", "200000-")
            .with("price", "-")
            .with("price", "abc-100");
        let filter = normalizer().normalize_params(&params);
        assert_eq!(
            filter.price_ranges,
            vec![
                PriceRange::new(Some(cop(0.0)), Some(cop(50_000.0))),
                PriceRange::new(Some(cop(200_000.0)), None),
            ]
        );
    }

    #[test]
    fn test_price_range_parse_open_min() {
        let range = PriceRange::parse("-50000", Currency::COP).unwrap();
        assert_eq!(range, PriceRange::new(None, Some(cop(50_000.0))));
        assert!(range.contains(cop(10.0)));
        assert!(!range.contains(cop(50_000.01)));
    }

    #[test]
    fn test_normalize_typed_query() {
        let query = ProductQuery::new()
            .with_search(" bateria ")
            .with_brands(["siemens", "siemens", " osram "])
            .with_price_bounds(Some(f64::NAN), Some(90_000.0))
            .with_price_range(None, None)
            .with_price_range(Some(50_000.0), Some(100_000.0))
            .with_sort("newest")
            .with_page(0)
            .with_limit(99);
        let filter = normalizer().normalize_query(&query);

        assert_eq!(filter.search.as_deref(), Some("bateria"));
        assert_eq!(filter.brand_slugs, vec!["siemens", "osram"]);
        assert_eq!(filter.price_min, None);
        assert_eq!(filter.price_max, Some(cop(90_000.0)));
        assert_eq!(filter.price_ranges.len(), 1);
        assert_eq!(filter.sort, SortOption::Newest);
        assert_eq!((filter.page, filter.limit), (1, 60));
    }

    #[test]
    fn test_query_deserializes_from_camel_case_json() {
        let query: ProductQuery = serde_json::from_str(
            r#"{"search":"willard","brandSlugs":["willard"],"priceRanges":[[0,50000],[200000,null]],"limit":10}"#,
        )
        .unwrap();
        assert_eq!(query.brand_slugs, vec!["willard"]);
        assert_eq!(query.price_ranges, vec![(Some(0.0), Some(50_000.0)), (Some(200_000.0), None)]);
        assert_eq!(query.limit, Some(10));
    }

    #[test]
    fn test_offset() {
        let filter = ProductFilter {
            page: 3,
            limit: 10,
            ..ProductFilter::default()
        };
        assert_eq!(filter.offset(), 20);
    }
}
