//! Rule compilation and indexing.
//!
//! This module holds the *static* side of the engine: everything derived from
//! the rule corpus once, at construction, and only read afterwards.
//!
//! Construction is two-phase:
//!
//! 1. **Count** (`frequency.rs`): document frequency of every token across all
//!    phrases.
//! 2. **Index** (this module): for every phrase pick the rarest token as its
//!    *anchor*, compile the phrase into a fuzzy pattern, and append the entry
//!    to the anchor's bucket.
//!
//! ```text
//! "what is my name?"   df: what=40 is=31 my=22 name?=1
//!                                                 ^ anchor
//! buckets["name?"] += CompiledEntry { (?is)what.*is.*my.*name\? , "Your name is {player_name}." }
//! ```
//!
//! Picking the rarest token keeps buckets small for the common case where
//! most phrases share a few frequent words.
//!
//! ## Invariants
//!
//! - `EntryId` is an index into `CompiledRules::entries`.
//! - Every entry id appears in exactly one bucket, or in the fallback bucket.
//! - Buckets keep insertion (load) order.

use super::frequency::DocumentFrequency;
use super::trigger::tokenize;
use crate::error::{Error, Result};
use crate::rules::RuleRecord;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

/// Entry identifier (index into `CompiledRules::entries`).
pub type EntryId = usize;

/// One compiled match phrase.
#[derive(Debug, Clone)]
pub struct CompiledEntry {
    pub pattern: Regex,
    pub response_template: String,
    /// The phrase the pattern was compiled from.
    pub phrase: String,
    /// Load position of the rule this phrase belongs to.
    pub rule: usize,
}

/// Anchor token → bucket of entry ids, plus the fallback bucket.
#[derive(Debug, Default)]
pub struct DecisionIndex {
    buckets: HashMap<String, Vec<EntryId>>,
    fallback: Vec<EntryId>,
}

impl DecisionIndex {
    fn insert(&mut self, anchor: Option<&str>, id: EntryId) {
        match anchor {
            Some(token) => self.buckets.entry(token.to_string()).or_default().push(id),
            None => self.fallback.push(id),
        }
    }

    pub fn bucket(&self, token: &str) -> Option<&[EntryId]> {
        self.buckets.get(token).map(Vec::as_slice)
    }

    /// Entries whose phrase had no tokens. Evaluated on every query.
    pub fn fallback(&self) -> &[EntryId] {
        &self.fallback
    }

    /// Anchor buckets, plus one for the fallback bucket when it is in use.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len() + usize::from(!self.fallback.is_empty())
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&str, &[EntryId])> {
        self.buckets.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Pre-compiled rule corpus.
#[derive(Debug, Default)]
pub struct CompiledRules {
    pub entries: Vec<CompiledEntry>,
    pub index: DecisionIndex,
    pub frequencies: DocumentFrequency,
    pub rule_count: usize,
}

impl CompiledRules {
    /// Count token frequencies, then compile and index every phrase.
    ///
    /// Fails only if a pattern cannot be compiled, which should never happen
    /// for escaped tokens; the error names the offending phrase.
    pub fn new(records: &[RuleRecord]) -> Result<Self> {
        let frequencies = DocumentFrequency::build(records);
        let mut entries = Vec::new();
        let mut index = DecisionIndex::default();

        for (rule, record) in records.iter().enumerate() {
            for phrase in &record.match_phrases {
                let tokens = tokenize(phrase);
                let pattern = compile_pattern(&tokens).map_err(|source| {
                    log::error!("Failed to compile pattern for phrase {phrase:?}: {source}");
                    Error::Pattern { phrase: phrase.clone(), source }
                })?;

                let id = entries.len();
                index.insert(select_anchor(&tokens, &frequencies), id);
                entries.push(CompiledEntry {
                    pattern,
                    response_template: record.response_template.clone(),
                    phrase: phrase.clone(),
                    rule,
                });
            }
        }

        log::info!(
            "Loaded {} rules ({} phrases); indexed into {} buckets.",
            records.len(),
            entries.len(),
            index.bucket_count()
        );

        Ok(CompiledRules { entries, index, frequencies, rule_count: records.len() })
    }

    pub fn entry(&self, id: EntryId) -> &CompiledEntry {
        &self.entries[id]
    }
}

/// The rarest token of a phrase; ties go to the earliest token.
///
/// Returns `None` for a phrase without tokens.
pub fn select_anchor<'t>(tokens: &'t [String], frequencies: &DocumentFrequency) -> Option<&'t str> {
    let mut best: Option<(&str, usize)> = None;
    for token in tokens {
        let df = frequencies.get(token);
        // Strict `<` keeps the first of equally rare tokens.
        if best.is_none_or(|(_, best_df)| df < best_df) {
            best = Some((token.as_str(), df));
        }
    }
    best.map(|(token, _)| token)
}

/// Compile tokens into an in-order, gap-tolerant, case-insensitive pattern.
///
/// Each token is escaped, so `"c++ (beta)"` matches literally. The pattern is
/// unanchored and `.` spans newlines: `["hello", "world"]` finds
/// `"…hello…\n…world…"` anywhere in the input. No tokens yields the empty
/// pattern, which matches every input.
pub fn compile_pattern(tokens: &[String]) -> std::result::Result<Regex, regex::Error> {
    let source = tokens.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join(".*");
    RegexBuilder::new(&source).case_insensitive(true).dot_matches_new_line(true).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn toks(s: &str) -> Vec<String> {
        tokenize(s)
    }

    #[test]
    fn anchor_is_rarest_token_with_first_occurrence_tiebreak() {
        let records = vec![
            RuleRecord::new(["what is my name"], "a"),
            RuleRecord::new(["what is my level"], "b"),
            RuleRecord::new(["what is the seed"], "c"),
        ];
        let df = DocumentFrequency::build(&records);

        assert_eq!(select_anchor(&toks("what is my name"), &df), Some("name"));
        // "the" and "seed" both have df 1; "the" comes first.
        assert_eq!(select_anchor(&toks("what is the seed"), &df), Some("the"));
        assert_eq!(select_anchor(&[], &df), None);
    }

    #[test]
    fn pattern_requires_order_but_allows_gaps() {
        let re = compile_pattern(&toks("hello world")).unwrap();
        assert!(re.is_match("well HELLO there, the world is big"));
        assert!(re.is_match("hello\nworld"));
        assert!(!re.is_match("world hello"));
    }

    #[test]
    fn pattern_tokens_are_literal() {
        let re = compile_pattern(&toks("c++ (beta) a.b")).unwrap();
        assert!(re.is_match("try c++ (beta) on a.b now"));
        assert!(!re.is_match("ccc (beta) on axb"));
    }

    #[test]
    fn every_entry_lands_in_exactly_one_bucket() {
        let records = vec![
            RuleRecord::new(["hello world", "hi"], "greet"),
            RuleRecord::new(["world news", ""], "news"),
            RuleRecord::new(["hello"], "hello"),
        ];
        let compiled = CompiledRules::new(&records).unwrap();
        assert_eq!(compiled.entries.len(), 5);
        assert_eq!(compiled.rule_count, 3);

        let mut seen: Vec<EntryId> = compiled.index.buckets().flat_map(|(_, ids)| ids.iter().copied()).collect();
        seen.extend(compiled.index.fallback());
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);

        // "" has no tokens.
        assert_eq!(compiled.index.fallback(), &[3]);
        assert_eq!(compiled.entry(3).response_template, "news");
    }

    #[test]
    fn buckets_keep_insertion_order() {
        let records = vec![
            RuleRecord::new(["alpha rare"], "first"),
            RuleRecord::new(["beta rare"], "second"),
            RuleRecord::new(["alpha beta", "gamma beta"], "third"),
        ];
        let compiled = CompiledRules::new(&records).unwrap();
        // df: alpha=2, rare=2, beta=3, gamma=1.
        assert_eq!(compiled.index.bucket("alpha"), Some(&[0, 2][..]));
        assert_eq!(compiled.index.bucket("rare"), Some(&[1][..]));
        assert_eq!(compiled.index.bucket("gamma"), Some(&[3][..]));
        assert_eq!(compiled.index.bucket("beta"), None);
        assert_eq!(compiled.index.bucket_count(), 3);
    }
}
