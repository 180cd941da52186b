//! Turns a [`ProductFilter`] into the conditions a store evaluates.

use crate::catalog::Dimension;
use crate::config::SearchConfig;
use crate::search::condition::{Condition, TextField};
use crate::search::filter::{PriceRange, ProductFilter};
use crate::search::tokenizer::SearchTerms;

/// The two renderings of a text search: with and without trigram similarity.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPredicate {
    pub terms: SearchTerms,
    /// Substring-or-similarity per token; `None` when no token is long
    /// enough for fuzzy matching.
    pub fuzzy: Option<Condition>,
    /// Substring-only per token.
    pub substring: Condition,
}

/// Everything the planner needs to ask a store for a filter's products.
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateSet {
    /// Publish, facet and price conditions.
    pub base: Condition,
    pub search: Option<SearchPredicate>,
}

impl PredicateSet {
    /// The primary condition: fuzzy when available, else substring-only.
    pub fn primary(&self) -> Condition {
        match &self.search {
            Some(SearchPredicate {
                fuzzy: Some(fuzzy), ..
            }) => Condition::all([self.base.clone(), fuzzy.clone()]),
            Some(search) => Condition::all([self.base.clone(), search.substring.clone()]),
            None => self.base.clone(),
        }
    }

    /// The substring-only condition, present only when the primary one
    /// depends on similarity.
    pub fn fallback(&self) -> Option<Condition> {
        let search = self.search.as_ref()?;
        search.fuzzy.as_ref()?;
        Some(Condition::all([self.base.clone(), search.substring.clone()]))
    }

    pub fn is_fuzzy(&self) -> bool {
        self.search.as_ref().is_some_and(|s| s.fuzzy.is_some())
    }
}

/// Builds [`PredicateSet`]s.
#[derive(Debug, Clone, Copy)]
pub struct PredicateBuilder {
    similarity_threshold: f64,
    min_fuzzy_token_len: usize,
    fuzzy_enabled: bool,
}

impl PredicateBuilder {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            similarity_threshold: config.scoring.similarity_threshold,
            min_fuzzy_token_len: config.min_fuzzy_token_len,
            fuzzy_enabled: config.fuzzy_enabled,
        }
    }

    pub fn build(&self, filter: &ProductFilter) -> PredicateSet {
        PredicateSet {
            base: self.base(filter),
            search: filter.search.as_deref().and_then(|text| self.search(text)),
        }
    }

    /// Published, every non-empty facet, and the price condition.
    pub fn base(&self, filter: &ProductFilter) -> Condition {
        let facets = Dimension::ALL.into_iter().filter_map(|dimension| {
            let slugs = filter.slugs(dimension);
            (!slugs.is_empty()).then(|| Condition::slug_in(dimension, slugs.iter().cloned()))
        });

        Condition::all(
            std::iter::once(Condition::Published)
                .chain(facets)
                .chain(price_condition(filter)),
        )
    }

    /// Tokenize `text` and build both renderings; `None` for blank text.
    pub fn search(&self, text: &str) -> Option<SearchPredicate> {
        let mut terms = SearchTerms::parse(text, self.min_fuzzy_token_len);
        if terms.is_empty() {
            return None;
        }
        if !self.fuzzy_enabled {
            terms = terms.without_fuzzy();
        }

        let fuzzy = terms
            .is_fuzzy()
            .then(|| self.tokens_condition(&terms, true));
        let substring = self.tokens_condition(&terms, false);

        Some(SearchPredicate {
            terms,
            fuzzy,
            substring,
        })
    }

    /// Every token must match.
    fn tokens_condition(&self, terms: &SearchTerms, fuzzy: bool) -> Condition {
        Condition::all(
            terms
                .tokens()
                .iter()
                .map(|token| self.token_condition(token, fuzzy)),
        )
    }

    /// A token matches when either text field contains it or, in fuzzy
    /// mode, is similar enough to it.
    fn token_condition(&self, token: &str, fuzzy: bool) -> Condition {
        let contains = TextField::ALL
            .into_iter()
            .map(|field| Condition::contains(field, token));

        if !fuzzy {
            return Condition::any(contains);
        }

        let similar = TextField::ALL
            .into_iter()
            .map(|field| Condition::similar(field, token, self.similarity_threshold));
        Condition::any(contains.chain(similar))
    }
}

/// Explicit bounds OR any named range; `None` when no price input is set.
fn price_condition(filter: &ProductFilter) -> Option<Condition> {
    let ranges: Vec<Condition> = filter
        .explicit_price_bounds()
        .iter()
        .chain(filter.price_ranges.iter())
        .map(range_condition)
        .collect();

    (!ranges.is_empty()).then(|| Condition::any(ranges))
}

fn range_condition(range: &PriceRange) -> Condition {
    Condition::all(
        range
            .min
            .map(Condition::price_at_least)
            .into_iter()
            .chain(range.max.map(Condition::price_at_most)),
    )
}
