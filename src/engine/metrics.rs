//! Query run metrics.
//!
//! `Query::run` returns only the resolved responses. `Query::run_with_metrics`
//! additionally reports how the candidate set was chosen and how long each
//! stage took; the verbose API and the CLI report are built from it.

use super::compiled_rules::EntryId;
use std::time::Duration;

/// How the candidate set for a query was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPath {
    /// No input token has a bucket; only the fallback bucket is evaluated.
    NoBuckets,
    /// The two smallest buckets had a non-empty intersection.
    Intersection,
    /// Union of every bucket present in the input.
    Union,
}

/// A bucket hit by one input token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketHit {
    pub token: String,
    pub size: usize,
}

/// Outcome of candidate selection, before evaluation.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Hit buckets, smallest first.
    pub buckets: Vec<BucketHit>,
    pub path: SelectionPath,
    /// Candidates in evaluation order, fallback entries last.
    pub candidates: Vec<EntryId>,
    /// How many of `candidates` came from the fallback bucket.
    pub fallback: usize,
}

#[derive(Debug, Default, Clone)]
pub struct QueryMetrics {
    /// Total elapsed time for scan + select + evaluate.
    pub total: Duration,
    pub scan: Duration,
    pub select: Duration,
    /// Pattern evaluation plus placeholder resolution.
    pub evaluate: Duration,
}

/// Query output bundled with selection details and timings.
#[derive(Debug, Clone)]
pub struct QueryRun {
    pub responses: Vec<String>,
    /// Entries whose pattern matched, in evaluation order.
    pub matched: Vec<EntryId>,
    pub tokens: Vec<String>,
    pub selection: Selection,
    pub metrics: QueryMetrics,
}
