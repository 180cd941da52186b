//! Search text tokenization.

/// Tokens of a search string plus whether fuzzy matching applies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchTerms {
    tokens: Vec<String>,
    fuzzy: bool,
}

impl SearchTerms {
    /// Split `text` on whitespace. Fuzzy matching is enabled when at least one
    /// token has `min_fuzzy_len` or more characters; single letters are too
    /// short for trigram similarity to mean anything.
    pub fn parse(text: &str, min_fuzzy_len: usize) -> Self {
        let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        let fuzzy = tokens.iter().any(|t| t.chars().count() >= min_fuzzy_len);
        Self { tokens, fuzzy }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_fuzzy(&self) -> bool {
        self.fuzzy
    }

    /// Same tokens with fuzzy matching forced off.
    pub fn without_fuzzy(&self) -> Self {
        Self {
            tokens: self.tokens.clone(),
            fuzzy: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_any_whitespace() {
        let terms = SearchTerms::parse("  brake\tpad \n kit ", 2);
        assert_eq!(terms.tokens(), ["brake", "pad", "kit"]);
        assert!(terms.is_fuzzy());
    }

    #[test]
    fn test_empty_input() {
        let terms = SearchTerms::parse("   ", 2);
        assert!(terms.is_empty());
        assert!(!terms.is_fuzzy());
    }

    #[test]
    fn test_single_letters_disable_fuzzy() {
        let terms = SearchTerms::parse("a b c", 2);
        assert_eq!(terms.tokens().len(), 3);
        assert!(!terms.is_fuzzy());
    }

    #[test]
    fn test_fuzzy_counts_characters_not_bytes() {
        assert!(!SearchTerms::parse("ñ", 2).is_fuzzy());
        assert!(SearchTerms::parse("ñ x añ", 2).is_fuzzy());
    }
}
