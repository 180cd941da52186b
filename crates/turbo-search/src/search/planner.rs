//! Ranking and pagination planning.
//!
//! Browsing (no search text) lets the store sort and page. A text search
//! fetches a bounded candidate window from the top of the result set, then
//! re-ranks and slices the requested page inside the engine.

use crate::config::SearchConfig;
use crate::search::condition::Condition;
use crate::search::filter::{ProductFilter, SortOption};
use crate::search::predicate::{PredicateBuilder, PredicateSet};
use crate::search::results::RankedResult;
use crate::search::scoring::Scorer;
use crate::search::tokenizer::SearchTerms;
use crate::ids::ProductId;
use crate::store::{Affinity, CandidateQuery, CandidateRow, OrderKey, RelevanceOrder};
use std::cmp::Ordering;

/// A fetch/count pair under one condition.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRequest {
    pub fetch: CandidateQuery,
    pub count: Condition,
}

/// How fetched rows become the requested page.
#[derive(Debug, Clone, PartialEq)]
pub enum Finish {
    /// The store already returned exactly the page, in order.
    AsFetched,
    /// Score with `terms`, sort by relevance, then slice
    /// `[offset, offset + limit)`.
    Rerank {
        terms: SearchTerms,
        offset: usize,
        limit: usize,
    },
}

/// Everything needed to execute one filter.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub primary: StoreRequest,
    pub finish: Finish,
    /// Substring-only retry, used when the store lacks similarity.
    pub fallback: Option<(StoreRequest, Finish)>,
}

impl QueryPlan {
    pub fn is_search(&self) -> bool {
        matches!(self.finish, Finish::Rerank { .. })
    }
}

/// Builds [`QueryPlan`]s from filters.
#[derive(Debug, Clone)]
pub struct QueryPlanner {
    config: SearchConfig,
    predicates: PredicateBuilder,
}

impl QueryPlanner {
    pub fn new(config: SearchConfig) -> Self {
        let predicates = PredicateBuilder::new(&config);
        Self { config, predicates }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn plan(&self, filter: &ProductFilter) -> QueryPlan {
        let predicates = self.predicates.build(filter);
        match &predicates.search {
            None => self.browse_plan(filter, &predicates),
            Some(_) => self.search_plan(filter, &predicates),
        }
    }

    /// The newest published products. Missing or zero `limit` means
    /// `latest_limit`.
    pub fn latest_query(&self, limit: Option<u32>) -> CandidateQuery {
        let limit = match limit {
            None | Some(0) => self.config.latest_limit,
            Some(n) => n,
        };
        CandidateQuery {
            condition: Condition::Published,
            order: sort_order(SortOption::Newest),
            offset: 0,
            limit: limit.clamp(1, self.config.max_limit.max(1)) as usize,
        }
    }

    /// Published products other than `id`, most shared facets first.
    pub fn recommendation_query(&self, id: &ProductId, affinity: Affinity) -> CandidateQuery {
        CandidateQuery {
            condition: Condition::all([
                Condition::Published,
                Condition::negate(Condition::Product(id.clone())),
            ]),
            order: vec![
                OrderKey::Affinity(affinity),
                OrderKey::CreatedAtDesc,
                OrderKey::IdAsc,
            ],
            offset: 0,
            limit: self.config.recommendation_candidates as usize,
        }
    }

    fn browse_plan(&self, filter: &ProductFilter, predicates: &PredicateSet) -> QueryPlan {
        let condition = predicates.primary();
        QueryPlan {
            primary: StoreRequest {
                fetch: CandidateQuery {
                    condition: condition.clone(),
                    order: sort_order(filter.sort),
                    offset: filter.offset(),
                    limit: filter.limit as usize,
                },
                count: condition,
            },
            finish: Finish::AsFetched,
            fallback: None,
        }
    }

    fn search_plan(&self, filter: &ProductFilter, predicates: &PredicateSet) -> QueryPlan {
        let window = self.config.candidate_window(filter.limit) as usize;
        let terms = predicates
            .search
            .as_ref()
            .map(|s| s.terms.clone())
            .unwrap_or_default();
        let rerank = |terms: SearchTerms| Finish::Rerank {
            terms,
            offset: filter.offset(),
            limit: filter.limit as usize,
        };
        let request = |condition: Condition, order: Vec<OrderKey>| StoreRequest {
            fetch: CandidateQuery {
                condition: condition.clone(),
                order,
                offset: 0,
                limit: window,
            },
            count: condition,
        };

        // The window is cut by the same tiers the engine ranks with, so the
        // best matches are always inside it. Without fuzzy terms the store
        // ordering needs no similarity function.
        let relevance = |terms: &SearchTerms| {
            relevance_order(RelevanceOrder {
                terms: terms.clone(),
                scoring: self.config.scoring,
            })
        };

        let fallback = predicates.fallback().map(|condition| {
            let terms = terms.without_fuzzy();
            (request(condition, relevance(&terms)), rerank(terms))
        });

        QueryPlan {
            primary: request(predicates.primary(), relevance(&terms)),
            finish: rerank(terms),
            fallback,
        }
    }
}

/// Store ordering for a listing sort, with the standard tie-breaks.
pub fn sort_order(sort: SortOption) -> Vec<OrderKey> {
    let primary = match sort {
        SortOption::Featured | SortOption::Newest => None,
        SortOption::PriceAsc => Some(OrderKey::PriceAsc),
        SortOption::PriceDesc => Some(OrderKey::PriceDesc),
    };
    primary
        .into_iter()
        .chain([OrderKey::CreatedAtDesc, OrderKey::IdAsc])
        .collect()
}

fn relevance_order(relevance: RelevanceOrder) -> Vec<OrderKey> {
    vec![
        OrderKey::Relevance(relevance),
        OrderKey::CreatedAtDesc,
        OrderKey::IdAsc,
    ]
}

/// Apply `finish` to fetched rows.
pub fn finish_rows(rows: Vec<CandidateRow>, finish: &Finish, scorer: &Scorer) -> Vec<RankedResult> {
    match finish {
        Finish::AsFetched => rows.into_iter().map(RankedResult::from).collect(),
        Finish::Rerank {
            terms,
            offset,
            limit,
        } => rank(rows, terms, scorer)
            .into_iter()
            .skip(*offset)
            .take(*limit)
            .collect(),
    }
}

/// Score every row and order by relevance desc, created_at desc, id asc.
pub fn rank(rows: Vec<CandidateRow>, terms: &SearchTerms, scorer: &Scorer) -> Vec<RankedResult> {
    let mut ranked: Vec<RankedResult> = rows
        .into_iter()
        .map(|row| {
            let relevance = scorer.score(terms, &row.name, &row.description);
            RankedResult::from_candidate(row, relevance)
        })
        .collect();
    ranked.sort_by(compare_ranked);
    ranked
}

fn compare_ranked(a: &RankedResult, b: &RankedResult) -> Ordering {
    b.relevance
        .total_cmp(&a.relevance)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}
