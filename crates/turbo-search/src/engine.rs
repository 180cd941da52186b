//! The search engine: normalize, plan, execute, rank.

use crate::config::SearchConfig;
use crate::error::{SearchResult, StoreError};
use crate::search::planner::{self, Finish, QueryPlanner, StoreRequest};
use crate::ids::ProductId;
use crate::search::{
    FilterNormalizer, ProductFilter, ProductQuery, RankedResult, RawParams, Scorer, SearchResults,
};
use crate::store::CatalogStore;
use tracing::{debug, instrument, warn};

/// Product search over a [`CatalogStore`].
///
/// Stateless per request: every call issues a candidate fetch and a count
/// concurrently, and at most one substring-only retry of both when the store
/// cannot evaluate similarity.
#[derive(Debug, Clone)]
pub struct SearchEngine<S> {
    store: S,
    normalizer: FilterNormalizer,
    planner: QueryPlanner,
    scorer: Scorer,
}

impl<S: CatalogStore> SearchEngine<S> {
    /// Create an engine with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, SearchConfig::default())
    }

    pub fn with_config(store: S, config: SearchConfig) -> Self {
        Self {
            store,
            normalizer: FilterNormalizer::new(&config),
            scorer: Scorer::new(config.scoring),
            planner: QueryPlanner::new(config),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        self.planner.config()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The normalizer requests are run through.
    pub fn normalizer(&self) -> &FilterNormalizer {
        &self.normalizer
    }

    /// Search with typed input.
    pub async fn search(&self, query: &ProductQuery) -> SearchResult<SearchResults> {
        let filter = self.normalizer.normalize_query(query);
        self.search_filter(&filter).await
    }

    /// Search with raw request parameters.
    pub async fn search_params(&self, params: &RawParams) -> SearchResult<SearchResults> {
        let filter = self.normalizer.normalize_params(params);
        self.search_filter(&filter).await
    }

    /// Search with an already-normalized filter.
    #[instrument(
        skip_all,
        fields(
            search = filter.search.as_deref().unwrap_or(""),
            sort = filter.sort.as_str(),
            page = filter.page,
            limit = filter.limit,
        )
    )]
    pub async fn search_filter(&self, filter: &ProductFilter) -> SearchResult<SearchResults> {
        let plan = self.planner.plan(&self.normalizer.clamp_paging(filter));
        debug!(
            search = plan.is_search(),
            window = plan.primary.fetch.limit,
            offset = plan.primary.fetch.offset,
            "Planned product query"
        );

        match self.run(&plan.primary, &plan.finish).await {
            Ok(results) => Ok(results),
            Err(err) if err.is_similarity_unavailable() => {
                let Some((request, finish)) = &plan.fallback else {
                    return Err(err.into());
                };
                warn!(error = %err, "Similarity matching unavailable, retrying with substring matching");
                Ok(self.run(request, finish).await?)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// The newest published products; `None` uses the configured
    /// `latest_limit`.
    pub async fn latest(&self, limit: Option<u32>) -> SearchResult<Vec<RankedResult>> {
        let query = self.planner.latest_query(limit);
        let rows = self.store.fetch_candidates(&query).await?;
        Ok(rows.into_iter().map(RankedResult::from).collect())
    }

    /// Published products related to `id` by shared category, brand and
    /// gender. Only products with an image are listed.
    #[instrument(skip_all, fields(product = %id))]
    pub async fn recommended(&self, id: &ProductId) -> SearchResult<Vec<RankedResult>> {
        let Some(affinity) = self.store.affinity(id).await? else {
            debug!("Unknown product, nothing to recommend");
            return Ok(Vec::new());
        };

        let query = self.planner.recommendation_query(id, affinity);
        let rows = self.store.fetch_candidates(&query).await?;
        let candidates = rows.len();
        let products: Vec<RankedResult> = rows
            .into_iter()
            .filter_map(|mut row| {
                let url = row.image_url.take()?.trim().to_string();
                if url.is_empty() {
                    return None;
                }
                row.image_url = Some(url);
                Some(RankedResult::from(row))
            })
            .take(self.config().recommendation_limit as usize)
            .collect();
        debug!(candidates, recommended = products.len(), "Ranked recommendations");
        Ok(products)
    }

    async fn run(&self, request: &StoreRequest, finish: &Finish) -> Result<SearchResults, StoreError> {
        let (rows, total) = futures::join!(
            self.store.fetch_candidates(&request.fetch),
            self.store.count(&request.count)
        );

        let (rows, total) = match (rows, total) {
            (Ok(rows), Ok(total)) => (rows, total),
            (Err(err), Ok(_)) | (Ok(_), Err(err)) => return Err(err),
            // Report a real failure over a missing capability.
            (Err(fetch), Err(count)) => {
                return Err(if fetch.is_similarity_unavailable() { count } else { fetch })
            }
        };

        debug!(candidates = rows.len(), total, "Fetched candidates");
        let products = planner::finish_rows(rows, finish, &self.scorer);
        Ok(SearchResults::new(products, total))
    }
}
