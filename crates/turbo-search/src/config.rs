//! Engine configuration.
//!
//! Every tunable the planner and scorer use lives here so tests and
//! deployments can adjust them without touching query construction.

use crate::money::Currency;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },
}

/// Relevance tier weights and the fuzzy-match cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Trigram similarity a token must exceed to count as a fuzzy match.
    pub similarity_threshold: f64,
    /// Token equals the whole (trimmed) field.
    pub exact_weight: f64,
    /// Field starts with the token.
    pub prefix_weight: f64,
    /// Field contains the token.
    pub contains_weight: f64,
    /// Base score of a fuzzy-only match.
    pub fuzzy_base: f64,
    /// Added per unit of similarity on a fuzzy-only match.
    pub fuzzy_similarity_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.2,
            exact_weight: 400.0,
            prefix_weight: 300.0,
            contains_weight: 200.0,
            fuzzy_base: 100.0,
            fuzzy_similarity_weight: 50.0,
        }
    }
}

/// Search engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Currency catalog prices and filter bounds are expressed in.
    pub currency: Currency,
    /// Page size when the request gives none.
    pub default_limit: u32,
    /// Largest page size a request may ask for.
    pub max_limit: u32,
    /// Text searches fetch `limit * candidate_multiplier` rows...
    pub candidate_multiplier: u32,
    /// ...but never more than this many.
    pub candidate_cap: u32,
    /// Fuzzy matching turns on when any token is at least this long.
    pub min_fuzzy_token_len: usize,
    /// Set to false when the store is known to lack a similarity function;
    /// searches then go straight to substring matching.
    pub fuzzy_enabled: bool,
    pub scoring: ScoringConfig,
    /// Size of the newest-products listing when the caller gives none.
    pub latest_limit: u32,
    /// Related products considered before dropping those without an image.
    pub recommendation_candidates: u32,
    /// Related products returned.
    pub recommendation_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            currency: Currency::COP,
            default_limit: 20,
            max_limit: 60,
            candidate_multiplier: 6,
            candidate_cap: 100,
            min_fuzzy_token_len: 2,
            fuzzy_enabled: true,
            scoring: ScoringConfig::default(),
            latest_limit: 6,
            recommendation_candidates: 8,
            recommendation_limit: 6,
        }
    }
}

impl SearchConfig {
    /// Load config from a TOML or JSON file (chosen by extension).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: display,
                message: e.to_string(),
            })
        } else {
            Self::from_toml_str(&content).map_err(|e| match e {
                ConfigError::Parse { message, .. } => ConfigError::Parse {
                    path: display,
                    message,
                },
                other => other,
            })
        }
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Size of the candidate window fetched for a text search.
    pub fn candidate_window(&self, limit: u32) -> u32 {
        limit
            .saturating_mul(self.candidate_multiplier)
            .min(self.candidate_cap)
            .max(limit)
    }
}
