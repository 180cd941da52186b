//! Tiered relevance scoring.
//!
//! Each token scores against the product name and description; the product's
//! relevance is the sum over tokens. Stores that rank server-side render the
//! same tiers from the same [`ScoringConfig`].

use crate::config::ScoringConfig;
use crate::search::tokenizer::SearchTerms;
use crate::search::trigram;

/// Which tier a token landed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchTier {
    Exact,
    Prefix,
    Contains,
    /// Carries the best similarity across fields.
    Fuzzy(f64),
    None,
}

/// Computes relevance from a [`ScoringConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Best tier `token` reaches against either field. The fuzzy tier is
    /// only considered when `fuzzy` is set and similarity clears the
    /// threshold.
    pub fn tier(&self, token: &str, name: &str, description: &str, fuzzy: bool) -> MatchTier {
        let needle = token.to_lowercase();
        let fields = [name.trim().to_lowercase(), description.trim().to_lowercase()];

        if fields.iter().any(|f| *f == needle) {
            return MatchTier::Exact;
        }
        if fields.iter().any(|f| f.starts_with(&needle)) {
            return MatchTier::Prefix;
        }
        if fields.iter().any(|f| f.contains(&needle)) {
            return MatchTier::Contains;
        }
        if fuzzy {
            let best = trigram::similarity(name, token).max(trigram::similarity(description, token));
            if best > self.config.similarity_threshold {
                return MatchTier::Fuzzy(best);
            }
        }
        MatchTier::None
    }

    pub fn tier_weight(&self, tier: MatchTier) -> f64 {
        match tier {
            MatchTier::Exact => self.config.exact_weight,
            MatchTier::Prefix => self.config.prefix_weight,
            MatchTier::Contains => self.config.contains_weight,
            MatchTier::Fuzzy(similarity) => {
                self.config.fuzzy_base + self.config.fuzzy_similarity_weight * similarity
            }
            MatchTier::None => 0.0,
        }
    }

    /// Sum of token weights for one product.
    pub fn score(&self, terms: &SearchTerms, name: &str, description: &str) -> f64 {
        terms
            .tokens()
            .iter()
            .map(|token| self.tier_weight(self.tier(token, name, description, terms.is_fuzzy())))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(text: &str) -> SearchTerms {
        SearchTerms::parse(text, 2)
    }

    #[test]
    fn test_tiers() {
        let scorer = Scorer::default();
        assert_eq!(scorer.tier("willard", " Willard ", "", true), MatchTier::Exact);
        assert_eq!(scorer.tier("bat", "Bateria Willard", "", true), MatchTier::Prefix);
        assert_eq!(scorer.tier("will", "Bateria Willard", "", true), MatchTier::Contains);
        assert_eq!(scorer.tier("xyz", "Bateria Willard", "", true), MatchTier::None);
    }

    #[test]
    fn test_description_counts() {
        let scorer = Scorer::default();
        assert_eq!(
            scorer.tier("800amp", "Bateria", "800Amp", true),
            MatchTier::Exact
        );
    }

    #[test]
    fn test_fuzzy_tier_only_when_enabled() {
        let scorer = Scorer::default();
        match scorer.tier("hiunday", "Hyundai", "", true) {
            MatchTier::Fuzzy(sim) => assert!((sim - 3.0 / 13.0).abs() < 1e-9),
            other => panic!("expected fuzzy tier, got {other:?}"),
        }
        assert_eq!(scorer.tier("hiunday", "Hyundai", "", false), MatchTier::None);
    }

    #[test]
    fn test_score_sums_tokens() {
        let scorer = Scorer::default();
        // "bateria" prefix (300) + "willard" contains (200)
        assert_eq!(
            scorer.score(&terms("bateria willard"), "Bateria Willard 800Amp", ""),
            500.0
        );
        // both tokens contained only
        assert_eq!(
            scorer.score(&terms("bateria willard"), "Kit Bateria Willard", ""),
            400.0
        );
    }

    #[test]
    fn test_fuzzy_score() {
        let scorer = Scorer::default();
        let score = scorer.score(&terms("hiunday"), "Hyundai", "");
        assert!((score - (100.0 + 50.0 * 3.0 / 13.0)).abs() < 1e-9);
    }

    #[test]
    fn test_custom_weights() {
        let scorer = Scorer::new(ScoringConfig {
            contains_weight: 7.0,
            ..ScoringConfig::default()
        });
        assert_eq!(scorer.score(&terms("will"), "Bateria Willard", ""), 7.0);
    }
}
