//! Phrase-level token document frequency.
//!
//! `df(token)` is the number of *phrases* (not rules, not occurrences) that
//! contain `token` at least once. The map is computed in a single pass over
//! the whole corpus and returned by value; the index builder only ever sees
//! it through a shared reference, so anchor selection cannot observe a
//! partially counted corpus.

use super::trigger::tokenize;
use crate::rules::RuleRecord;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFrequency {
    counts: HashMap<String, usize>,
}

impl DocumentFrequency {
    pub fn build(records: &[RuleRecord]) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for phrase in records.iter().flat_map(|r| r.match_phrases.iter()) {
            let distinct: HashSet<String> = tokenize(phrase).into_iter().collect();
            for token in distinct {
                *counts.entry(token).or_insert(0) += 1;
            }
        }
        DocumentFrequency { counts }
    }

    /// Frequency of `token`; zero when it never appears.
    pub fn get(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.counts.contains_key(token)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(t, c)| (t.as_str(), *c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_token_once_per_phrase() {
        let records = vec![
            RuleRecord::new(["the the cat", "The dog"], "a"),
            RuleRecord::new(["a cat"], "b"),
        ];
        let df = DocumentFrequency::build(&records);

        assert_eq!(df.get("the"), 2);
        assert_eq!(df.get("cat"), 2);
        assert_eq!(df.get("dog"), 1);
        assert_eq!(df.get("a"), 1);
        assert_eq!(df.get("bird"), 0);
        assert_eq!(df.len(), 4);
    }

    #[test]
    fn empty_phrases_contribute_nothing() {
        let df = DocumentFrequency::build(&[RuleRecord::new(["", "   "], "x")]);
        assert!(df.is_empty());
    }
}
