//! Store-independent boolean condition algebra.
//!
//! The predicate builder and scorer assemble a [`Condition`] tree; each
//! catalog store translates it into its own query language at the boundary.

use crate::catalog::Dimension;
use crate::ids::ProductId;
use crate::money::Money;
use serde::Serialize;

/// Free-text product fields searches run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextField {
    Name,
    Description,
}

impl TextField {
    pub const ALL: [TextField; 2] = [TextField::Name, TextField::Description];
}

/// Direction of a price comparison (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    AtLeast,
    AtMost,
}

/// A boolean condition over a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Matches everything.
    True,
    /// `is_published = true`.
    Published,
    /// The product with this id.
    Product(ProductId),
    /// The product's slug in `dimension` is one of `slugs`.
    SlugIn {
        dimension: Dimension,
        slugs: Vec<String>,
    },
    /// Effective price compared against `value`.
    Price { bound: Bound, value: Money },
    /// Case-insensitive literal substring match.
    Contains { field: TextField, needle: String },
    /// Trigram similarity strictly above `threshold`.
    Similar {
        field: TextField,
        needle: String,
        threshold: f64,
    },
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn slug_in(dimension: Dimension, slugs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Condition::SlugIn {
            dimension,
            slugs: slugs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn price_at_least(value: Money) -> Self {
        Condition::Price {
            bound: Bound::AtLeast,
            value,
        }
    }

    pub fn price_at_most(value: Money) -> Self {
        Condition::Price {
            bound: Bound::AtMost,
            value,
        }
    }

    pub fn contains(field: TextField, needle: impl Into<String>) -> Self {
        Condition::Contains {
            field,
            needle: needle.into(),
        }
    }

    pub fn similar(field: TextField, needle: impl Into<String>, threshold: f64) -> Self {
        Condition::Similar {
            field,
            needle: needle.into(),
            threshold,
        }
    }

    /// Conjunction that flattens nested `And`s and drops `True`.
    /// An empty conjunction is `True`; a single operand is returned as is.
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        let mut parts = Vec::new();
        for condition in conditions {
            match condition {
                Condition::True => {}
                Condition::And(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        match parts.len() {
            0 => Condition::True,
            1 => parts.pop().unwrap_or(Condition::True),
            _ => Condition::And(parts),
        }
    }

    /// Disjunction that flattens nested `Or`s. Any `True` operand makes the
    /// whole disjunction `True`. An empty disjunction is `Not(True)`.
    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        let mut parts = Vec::new();
        for condition in conditions {
            match condition {
                Condition::True => return Condition::True,
                Condition::Or(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        match parts.len() {
            0 => Condition::negate(Condition::True),
            1 => parts.pop().unwrap_or(Condition::True),
            _ => Condition::Or(parts),
        }
    }

    pub fn negate(condition: Condition) -> Self {
        match condition {
            Condition::Not(inner) => *inner,
            other => Condition::Not(Box::new(other)),
        }
    }

    /// Whether evaluating this condition needs a similarity function.
    pub fn uses_similarity(&self) -> bool {
        match self {
            Condition::Similar { .. } => true,
            Condition::And(parts) | Condition::Or(parts) => parts.iter().any(Self::uses_similarity),
            Condition::Not(inner) => inner.uses_similarity(),
            _ => false,
        }
    }

    /// Evaluate against a product view, using `similarity` for
    /// [`Condition::Similar`] leaves.
    pub fn evaluate<S, F>(&self, subject: &S, similarity: &F) -> bool
    where
        S: ConditionSubject + ?Sized,
        F: Fn(&str, &str) -> f64,
    {
        match self {
            Condition::True => true,
            Condition::Published => subject.is_published(),
            Condition::Product(id) => subject.id() == id,
            Condition::SlugIn { dimension, slugs } => subject
                .slug(*dimension)
                .is_some_and(|slug| slugs.iter().any(|s| s == slug)),
            Condition::Price { bound, value } => {
                let price = subject.effective_price();
                match bound {
                    Bound::AtLeast => price >= *value,
                    Bound::AtMost => price <= *value,
                }
            }
            Condition::Contains { field, needle } => {
                contains_ignore_case(subject.text(*field), needle)
            }
            Condition::Similar {
                field,
                needle,
                threshold,
            } => similarity(subject.text(*field), needle) > *threshold,
            Condition::And(parts) => parts.iter().all(|c| c.evaluate(subject, similarity)),
            Condition::Or(parts) => parts.iter().any(|c| c.evaluate(subject, similarity)),
            Condition::Not(inner) => !inner.evaluate(subject, similarity),
        }
    }
}

/// The product facts a [`Condition`] can inspect.
pub trait ConditionSubject {
    fn id(&self) -> &ProductId;
    fn is_published(&self) -> bool;
    fn slug(&self, dimension: Dimension) -> Option<&str>;
    fn effective_price(&self) -> Money;
    fn text(&self, field: TextField) -> &str;
}

/// Case-insensitive substring test; the needle is matched literally.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
