//! Search and filtering: request normalization, predicates, scoring and
//! planning.

pub mod condition;
pub mod filter;
pub mod params;
pub mod planner;
pub mod predicate;
pub mod results;
pub mod scoring;
pub mod tokenizer;
pub mod trigram;

pub use condition::{Bound, Condition, ConditionSubject, TextField};
pub use filter::{FilterNormalizer, PriceRange, ProductFilter, ProductQuery, SortOption};
pub use params::{ParamValue, RawParams};
pub use planner::{Finish, QueryPlan, QueryPlanner, StoreRequest};
pub use predicate::{PredicateBuilder, PredicateSet, SearchPredicate};
pub use results::{Pagination, RankedResult, SearchResults};
pub use scoring::{MatchTier, Scorer};
pub use tokenizer::SearchTerms;
