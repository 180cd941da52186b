//! Trigram similarity with PostgreSQL `pg_trgm` semantics.
//!
//! Text is lowercased and split into words (maximal alphanumeric runs). Each
//! word is padded with two spaces in front and one behind, and every
//! three-character window becomes a trigram. Similarity is the number of
//! shared trigrams over the size of the union.

use std::collections::HashSet;

type Trigram = [char; 3];

/// The set of trigrams in `text`.
pub fn trigrams(text: &str) -> HashSet<Trigram> {
    let mut set = HashSet::new();
    let lower = text.to_lowercase();

    for word in lower.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
        let padded: Vec<char> = [' ', ' ']
            .into_iter()
            .chain(word.chars())
            .chain([' '])
            .collect();
        for window in padded.windows(3) {
            set.insert([window[0], window[1], window[2]]);
        }
    }

    set
}

/// Similarity of `a` and `b` in `[0, 1]`; `0.0` when either has no words.
pub fn similarity(a: &str, b: &str) -> f64 {
    let left = trigrams(a);
    let right = trigrams(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = left.intersection(&right).count();
    let union = left.len() + right.len() - shared;
    shared as f64 / union as f64
}
