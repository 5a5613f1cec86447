//! Query evaluation.
//!
//! This module is the per-input side of the engine:
//!
//! ```text
//! input ── TriggerInfo::scan ──▶ distinct lowercase tokens
//!                                   │ look up buckets, drop misses
//!                                   ▼
//!                          hits sorted by bucket size
//!                                   │ candidate heuristic
//!                                   ▼
//!        ┌── ≥2 hits and smallest ∩ second-smallest ≠ ∅ ──▶ intersection
//!        └── otherwise ────────────────────────────────────▶ union of all hits
//!                                   │ + fallback bucket (always)
//!                                   ▼
//!            pattern.is_match(trimmed input) ──▶ resolve template
//! ```
//!
//! The intersection path is a throughput heuristic, not a completeness
//! guarantee: it never visits buckets beyond the two smallest. Because every
//! entry lives in exactly one bucket, two distinct buckets never share an
//! entry, so with the built-in index the intersection is empty and the union
//! path runs. [`CandidateStrategy::Exhaustive`] skips the heuristic
//! altogether.
//!
//! Queries only read the compiled rules and the registry; any number of them
//! can run concurrently against the same `CompiledRules`.

use super::compiled_rules::{CompiledRules, EntryId};
use super::dedup::{CandidateSet, intersect};
use super::metrics::{BucketHit, QueryMetrics, QueryRun, Selection, SelectionPath};
use super::trigger::TriggerInfo;
use crate::Context;
use crate::placeholders::PlaceholderRegistry;
use std::time::Instant;

/// How candidate buckets are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CandidateStrategy {
    /// Intersect the two smallest buckets, falling back to the union.
    #[default]
    Heuristic,
    /// Always take the union of every bucket hit by the input.
    Exhaustive,
}

/// A single query against compiled rules.
///
/// Usage: `Query::new(input, &compiled, strategy)` then `run(context, registry)`.
/// Scanning and candidate selection happen in `new`; `run` evaluates.
#[derive(Debug)]
pub struct Query<'a> {
    /// Trimmed input, as patterns see it.
    input: &'a str,
    compiled: &'a CompiledRules,
    tokens: Vec<String>,
    selection: Selection,
    metrics: QueryMetrics,
}

impl<'a> Query<'a> {
    pub fn new(input: &'a str, compiled: &'a CompiledRules, strategy: CandidateStrategy) -> Self {
        let input = input.trim();
        let mut metrics = QueryMetrics::default();

        if input.is_empty() {
            let selection =
                Selection { buckets: Vec::new(), path: SelectionPath::NoBuckets, candidates: Vec::new(), fallback: 0 };
            return Query { input, compiled, tokens: Vec::new(), selection, metrics };
        }

        let scan_start = Instant::now();
        let trigger = TriggerInfo::scan(input);
        metrics.scan = scan_start.elapsed();

        let select_start = Instant::now();
        let selection = select(&trigger, compiled, strategy);
        metrics.select = select_start.elapsed();

        log::debug!(
            "[select] tokens={:?} buckets={:?} path={:?} candidates={} (fallback {})",
            trigger.tokens,
            selection.buckets,
            selection.path,
            selection.candidates.len(),
            selection.fallback
        );

        Query { input, compiled, tokens: trigger.tokens, selection, metrics }
    }

    /// Candidates in evaluation order.
    pub fn candidates(&self) -> &[EntryId] {
        &self.selection.candidates
    }

    /// Evaluate candidates and resolve matching templates, with details.
    pub fn run_with_metrics(self, context: &dyn Context, registry: &PlaceholderRegistry) -> QueryRun {
        let mut metrics = self.metrics;
        let mut responses = Vec::new();
        let mut matched = Vec::new();

        let evaluate_start = Instant::now();
        for &id in &self.selection.candidates {
            let entry = self.compiled.entry(id);
            if entry.pattern.is_match(self.input) {
                log::trace!("[match] phrase={:?} rule={}", entry.phrase, entry.rule);
                matched.push(id);
                responses.push(registry.resolve(&entry.response_template, context));
            }
        }
        metrics.evaluate = evaluate_start.elapsed();
        metrics.total = metrics.scan + metrics.select + metrics.evaluate;

        QueryRun { responses, matched, tokens: self.tokens, selection: self.selection, metrics }
    }

    /// Evaluate candidates and return the resolved responses.
    pub fn run(self, context: &dyn Context, registry: &PlaceholderRegistry) -> Vec<String> {
        self.run_with_metrics(context, registry).responses
    }
}

fn select(trigger: &TriggerInfo, compiled: &CompiledRules, strategy: CandidateStrategy) -> Selection {
    let mut hits: Vec<(&str, &[EntryId])> =
        trigger.tokens.iter().filter_map(|t| compiled.index.bucket(t).map(|b| (t.as_str(), b))).collect();
    // Stable: equal sizes keep input order.
    hits.sort_by_key(|(_, bucket)| bucket.len());

    let mut candidates = CandidateSet::default();
    let path = if hits.is_empty() {
        SelectionPath::NoBuckets
    } else {
        let narrowed = match (strategy, hits.as_slice()) {
            (CandidateStrategy::Heuristic, [(_, smallest), (_, second), ..]) => intersect(smallest, second),
            _ => Vec::new(),
        };
        if narrowed.is_empty() {
            for (_, bucket) in &hits {
                candidates.extend(bucket);
            }
            SelectionPath::Union
        } else {
            candidates.extend(&narrowed);
            SelectionPath::Intersection
        }
    };

    let before_fallback = candidates.len();
    candidates.extend(compiled.index.fallback());
    let fallback = candidates.len() - before_fallback;

    Selection {
        buckets: hits.iter().map(|(token, bucket)| BucketHit { token: token.to_string(), size: bucket.len() }).collect(),
        path,
        candidates: candidates.into_vec(),
        fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Attributes;
    use crate::rules::RuleRecord;

    fn compiled(records: &[RuleRecord]) -> CompiledRules {
        CompiledRules::new(records).unwrap()
    }

    #[test]
    fn empty_input_selects_nothing() {
        let rules = compiled(&[RuleRecord::new([""], "always")]);
        let query = Query::new("   ", &rules, CandidateStrategy::Heuristic);
        assert!(query.candidates().is_empty());
        assert!(query.run(&Attributes::new(), &PlaceholderRegistry::new()).is_empty());
    }

    #[test]
    fn unknown_tokens_only_reach_fallback() {
        let rules = compiled(&[RuleRecord::new(["hello world"], "hi"), RuleRecord::new([""], "catch-all")]);
        let run = Query::new("completely unrelated", &rules, CandidateStrategy::Heuristic)
            .run_with_metrics(&Attributes::new(), &PlaceholderRegistry::new());

        assert_eq!(run.selection.path, SelectionPath::NoBuckets);
        assert_eq!(run.selection.candidates, vec![1]);
        assert_eq!(run.selection.fallback, 1);
        assert_eq!(run.responses, ["catch-all"]);
    }

    #[test]
    fn buckets_are_unioned_smallest_first() {
        let rules = compiled(&[
            RuleRecord::new(["hello"], "h1"),
            RuleRecord::new(["hello"], "h2"),
            RuleRecord::new(["world"], "w"),
        ]);
        let run = Query::new("hello world", &rules, CandidateStrategy::Heuristic)
            .run_with_metrics(&Attributes::new(), &PlaceholderRegistry::new());

        assert_eq!(run.selection.path, SelectionPath::Union);
        assert_eq!(
            run.selection.buckets,
            vec![BucketHit { token: "world".into(), size: 1 }, BucketHit { token: "hello".into(), size: 2 }]
        );
        assert_eq!(run.selection.candidates, vec![2, 0, 1]);
        assert_eq!(run.responses, ["w", "h1", "h2"]);
    }

    #[test]
    fn exhaustive_strategy_always_unions() {
        let rules = compiled(&[RuleRecord::new(["one x"], "1"), RuleRecord::new(["two y"], "2")]);
        let run = Query::new("one two", &rules, CandidateStrategy::Exhaustive)
            .run_with_metrics(&Attributes::new(), &PlaceholderRegistry::new());
        assert_eq!(run.selection.path, SelectionPath::Union);
        assert_eq!(run.selection.candidates.len(), 2);
        assert!(run.responses.is_empty());
    }

    #[test]
    fn patterns_see_trimmed_input() {
        let rules = compiled(&[RuleRecord::new(["Hello World"], "hi")]);
        let out = Query::new("  say HELLO to the WORLD  ", &rules, CandidateStrategy::Heuristic)
            .run(&Attributes::new(), &PlaceholderRegistry::new());
        assert_eq!(out, ["hi"]);
    }
}
