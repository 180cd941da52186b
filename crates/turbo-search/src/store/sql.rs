//! PostgreSQL-backed catalog store.
//!
//! Renders conditions and orderings into parameterized SQL and runs them
//! through a [`SqlExecutor`]. Similarity uses `pg_trgm`'s `similarity()`;
//! when the extension is missing the database error is reported as
//! [`StoreError::SimilarityUnavailable`].

use super::{Affinity, CandidateQuery, CandidateRow, CatalogStore, OrderKey, RelevanceOrder};
use crate::catalog::Dimension;
use crate::error::StoreError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use crate::search::condition::{Bound, Condition, TextField};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use tracing::debug;
use turbo_db::{SqlExecutor, Value};

const EFFECTIVE_PRICE: &str = "COALESCE(p.sale_price, p.price)";
const LISTING_PRICE: &str = "COALESCE(v.sale_price, v.price, p.sale_price, p.price)";

const FROM_JOINS: &str = "FROM products p
LEFT JOIN genders g ON g.id = p.gender_id
LEFT JOIN brands b ON b.id = p.brand_id
LEFT JOIN categories c ON c.id = p.category_id";

/// Escape `LIKE` metacharacters so `input` matches literally.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Accumulates SQL text and its positional parameters.
#[derive(Debug, Default)]
struct SqlBuilder {
    params: Vec<Value>,
}

impl SqlBuilder {
    /// Bind a value and return its placeholder.
    fn bind(&mut self, value: impl Into<Value>) -> String {
        self.params.push(value.into());
        format!("${}", self.params.len())
    }

    fn condition(&mut self, condition: &Condition) -> String {
        match condition {
            Condition::True => "TRUE".to_string(),
            Condition::Published => "p.is_published = TRUE".to_string(),
            Condition::Product(id) => format!("p.id = {}", self.bind(id.as_str())),
            Condition::SlugIn { dimension, slugs } => {
                let placeholder = self.bind(slugs.clone());
                format!("{}.slug = ANY({placeholder})", dimension_alias(*dimension))
            }
            Condition::Price { bound, value } => {
                let op = match bound {
                    Bound::AtLeast => ">=",
                    Bound::AtMost => "<=",
                };
                let placeholder = self.bind(value.to_decimal());
                format!("{EFFECTIVE_PRICE} {op} {placeholder}::numeric")
            }
            Condition::Contains { field, needle } => {
                let placeholder = self.bind(format!("%{}%", escape_like(needle)));
                format!("{} ILIKE {placeholder} ESCAPE '\\'", column(*field))
            }
            Condition::Similar {
                field,
                needle,
                threshold,
            } => {
                let needle = self.bind(needle.as_str());
                let threshold = self.bind(*threshold);
                format!("similarity({}, {needle}) > {threshold}", column(*field))
            }
            Condition::And(parts) => self.join(parts, " AND ", "TRUE"),
            Condition::Or(parts) => self.join(parts, " OR ", "FALSE"),
            Condition::Not(inner) => format!("NOT ({})", self.condition(inner)),
        }
    }

    fn join(&mut self, parts: &[Condition], separator: &str, empty: &str) -> String {
        if parts.is_empty() {
            return empty.to_string();
        }
        let rendered: Vec<String> = parts.iter().map(|c| self.condition(c)).collect();
        format!("({})", rendered.join(separator))
    }

    /// Sum of per-token `CASE` tiers.
    fn relevance(&mut self, relevance: &RelevanceOrder) -> String {
        let scoring = &relevance.scoring;
        let fuzzy = relevance.terms.is_fuzzy();
        let parts: Vec<String> = relevance
            .terms
            .tokens()
            .iter()
            .map(|token| {
                let exact = self.bind(token.to_lowercase());
                let prefix = self.bind(format!("{}%", escape_like(token)));
                let contains = self.bind(format!("%{}%", escape_like(token)));
                let exact_weight = self.bind(scoring.exact_weight);
                let prefix_weight = self.bind(scoring.prefix_weight);
                let contains_weight = self.bind(scoring.contains_weight);

                let mut case = format!(
                    "CASE \
                     WHEN lower(trim(p.name)) = {exact} OR lower(trim(p.description)) = {exact} THEN {exact_weight} \
                     WHEN trim(p.name) ILIKE {prefix} ESCAPE '\\' OR trim(p.description) ILIKE {prefix} ESCAPE '\\' THEN {prefix_weight} \
                     WHEN p.name ILIKE {contains} ESCAPE '\\' OR p.description ILIKE {contains} ESCAPE '\\' THEN {contains_weight} "
                );
                if fuzzy {
                    let raw = self.bind(token.as_str());
                    let threshold = self.bind(scoring.similarity_threshold);
                    let base = self.bind(scoring.fuzzy_base);
                    let weight = self.bind(scoring.fuzzy_similarity_weight);
                    case.push_str(&format!(
                        "WHEN similarity(p.name, {raw}) > {threshold} OR similarity(p.description, {raw}) > {threshold} \
                         THEN {base} + {weight} * GREATEST(similarity(p.name, {raw}), similarity(p.description, {raw})) "
                    ));
                }
                case.push_str("ELSE 0 END");
                format!("({case})")
            })
            .collect();

        match parts.len() {
            0 => "0".to_string(),
            1 => parts.concat(),
            _ => format!("({})", parts.join(" + ")),
        }
    }

    /// Sum of shared-facet weights; `None` when no facet can match.
    fn affinity(&mut self, affinity: &Affinity) -> Option<String> {
        let facets = [
            (
                "p.category_id",
                affinity.category_id.as_ref().map(|id| id.as_str()),
                Affinity::CATEGORY_WEIGHT,
            ),
            (
                "p.brand_id",
                affinity.brand_id.as_ref().map(|id| id.as_str()),
                Affinity::BRAND_WEIGHT,
            ),
            (
                "p.gender_id",
                affinity.gender_id.as_ref().map(|id| id.as_str()),
                Affinity::GENDER_WEIGHT,
            ),
        ];
        let parts: Vec<String> = facets
            .into_iter()
            .filter_map(|(column, id, weight)| {
                let id = id?;
                Some(format!("(CASE WHEN {column} = {} THEN {weight} ELSE 0 END)", self.bind(id)))
            })
            .collect();
        (!parts.is_empty()).then(|| format!("({})", parts.join(" + ")))
    }

    fn order_by(&mut self, order: &[OrderKey]) -> String {
        let keys: Vec<String> = order
            .iter()
            .filter_map(|key| match key {
                OrderKey::Relevance(relevance) => Some(format!("{} DESC", self.relevance(relevance))),
                OrderKey::Affinity(affinity) => {
                    self.affinity(affinity).map(|expr| format!("{expr} DESC"))
                }
                OrderKey::CreatedAtDesc => Some("p.created_at DESC".to_string()),
                OrderKey::IdAsc => Some("p.id ASC".to_string()),
                OrderKey::PriceAsc => Some(format!("{EFFECTIVE_PRICE} ASC")),
                OrderKey::PriceDesc => Some(format!("{EFFECTIVE_PRICE} DESC")),
            })
            .collect();
        if keys.is_empty() {
            "p.id ASC".to_string()
        } else {
            keys.join(", ")
        }
    }
}

fn dimension_alias(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Category => "c",
        Dimension::Brand => "b",
        Dimension::Gender => "g",
    }
}

fn column(field: TextField) -> &'static str {
    match field {
        TextField::Name => "p.name",
        TextField::Description => "p.description",
    }
}

/// Render the candidate query. Returns the SQL and its parameters.
pub(crate) fn candidate_sql(query: &CandidateQuery) -> (String, Vec<Value>) {
    let mut builder = SqlBuilder::default();
    let where_clause = builder.condition(&query.condition);
    let order_by = builder.order_by(&query.order);
    let limit = builder.bind(query.limit);
    let offset = builder.bind(query.offset);

    let sql = format!(
        "WITH ranked_images AS (
    SELECT product_id, url,
           row_number() OVER (PARTITION BY product_id ORDER BY is_primary DESC, sort_order ASC) AS rn
    FROM product_images
)
SELECT p.id, p.name, COALESCE(p.description, '') AS description,
       pi.url AS image_url,
       MIN({LISTING_PRICE})::float8 AS min_price,
       MAX({LISTING_PRICE})::float8 AS max_price,
       (EXTRACT(EPOCH FROM p.created_at) * 1000000)::bigint AS created_at_micros,
       g.label AS subtitle
{FROM_JOINS}
LEFT JOIN product_variants v ON v.product_id = p.id AND v.is_active = TRUE
LEFT JOIN ranked_images pi ON pi.product_id = p.id AND pi.rn = 1
WHERE {where_clause}
GROUP BY p.id, p.name, p.description, p.created_at, g.label, pi.url
ORDER BY {order_by}
LIMIT {limit} OFFSET {offset}"
    );
    (sql, builder.params)
}

/// Render the count query. Returns the SQL and its parameters.
pub(crate) fn count_sql(condition: &Condition) -> (String, Vec<Value>) {
    let mut builder = SqlBuilder::default();
    let where_clause = builder.condition(condition);
    let sql = format!("SELECT COUNT(DISTINCT p.id) AS count\n{FROM_JOINS}\nWHERE {where_clause}");
    (sql, builder.params)
}

#[derive(Debug, Deserialize)]
struct ListingRecord {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    image_url: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    created_at_micros: i64,
    subtitle: Option<String>,
}

impl ListingRecord {
    fn into_row(self, currency: Currency) -> Result<CandidateRow, StoreError> {
        let created_at = DateTime::from_timestamp_micros(self.created_at_micros).ok_or_else(|| {
            StoreError::Decode(format!("created_at out of range for product {}", self.id))
        })?;
        Ok(CandidateRow {
            id: ProductId::new(self.id),
            name: self.name,
            description: self.description.unwrap_or_default(),
            image_url: self.image_url,
            min_price: self.min_price.map(|v| Money::from_decimal(v, currency)),
            max_price: self.max_price.map(|v| Money::from_decimal(v, currency)),
            created_at,
            subtitle: self.subtitle,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CountRecord {
    count: i64,
}

#[derive(Debug, Deserialize)]
struct AffinityRecord {
    category_id: Option<String>,
    brand_id: Option<String>,
    gender_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExtensionRecord {
    has_trgm: bool,
}

/// A [`CatalogStore`] over a PostgreSQL catalog schema.
#[derive(Debug, Clone)]
pub struct SqlCatalog<E> {
    executor: E,
    currency: Currency,
}

impl<E: SqlExecutor> SqlCatalog<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            currency: Currency::default(),
        }
    }

    /// Currency numeric price columns are read in.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Check whether the `pg_trgm` extension is installed.
    pub async fn has_trigram_extension(&self) -> Result<bool, StoreError> {
        let result = self
            .executor
            .query(
                "SELECT EXISTS(SELECT 1 FROM pg_extension WHERE extname = 'pg_trgm') AS has_trgm",
                &[],
            )
            .await?;
        let records: Vec<ExtensionRecord> = result.deserialize_all()?;
        Ok(records.first().is_some_and(|r| r.has_trgm))
    }
}

#[async_trait]
impl<E: SqlExecutor> CatalogStore for SqlCatalog<E> {
    async fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<CandidateRow>, StoreError> {
        let (sql, params) = candidate_sql(query);
        debug!(params = params.len(), "Fetching candidates");

        let result = self.executor.query(&sql, &params).await?;
        let records: Vec<ListingRecord> = result.deserialize_all()?;
        records
            .into_iter()
            .map(|record| record.into_row(self.currency))
            .collect()
    }

    async fn count(&self, condition: &Condition) -> Result<u64, StoreError> {
        let (sql, params) = count_sql(condition);
        let result = self.executor.query(&sql, &params).await?;
        let records: Vec<CountRecord> = result.deserialize_all()?;
        let count = records.first().map_or(0, |r| r.count);
        Ok(count.max(0) as u64)
    }

    async fn affinity(&self, id: &ProductId) -> Result<Option<Affinity>, StoreError> {
        let result = self
            .executor
            .query(
                "SELECT p.category_id, p.brand_id, p.gender_id FROM products p WHERE p.id = $1",
                &[Value::from(id.as_str())],
            )
            .await?;
        let records: Vec<AffinityRecord> = result.deserialize_all()?;
        Ok(records.into_iter().next().map(|r| Affinity {
            category_id: r.category_id.map(Into::into),
            brand_id: r.brand_id.map(Into::into),
            gender_id: r.gender_id.map(Into::into),
        }))
    }
}
