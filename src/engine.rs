//! Indexing and matching engine.
//!
//! This module is the entry point for the phrase matcher. The engine is split
//! into focused submodules under `src/engine/` with a small set of re-exports
//! here (for example `crate::engine::CompiledRules` and `crate::engine::Query`).
//!
//! ## How the parts work together
//!
//! Matching an input string is a pipeline with a one-time build step:
//!
//! ```text
//! rule records ──┐
//!                │  DocumentFrequency::build     (frequency.rs)
//!                │  CompiledRules::new           (compiled_rules.rs)
//!                │    - anchor = rarest token
//!                │    - phrase → fuzzy pattern
//!                └───────────────┬──────────────
//!                                │
//! input ── TriggerInfo::scan ────┼─ look up anchor buckets
//!          (trigger.rs)          │
//!                                v
//!                      Query::new (query.rs)
//!                        - sort hits by bucket size
//!                        - intersect or union (dedup.rs)
//!                        - append fallback bucket
//!                                │
//!                                v
//!                      Query::run (query.rs)
//!                        - pattern.is_match(input)
//!                        - PlaceholderRegistry::resolve
//!                                │
//!                                v
//!                           Vec<String>
//! ```
//!
//! The build step is the only place that writes. Everything a query touches
//! is read-only, so a single `CompiledRules` serves any number of concurrent
//! queries.
//!
//! ## Responsibilities by module
//!
//! - `frequency.rs`: phrase-level document frequency of every token.
//! - `compiled_rules.rs`: anchor selection, pattern compilation, and the
//!   bucket index (`DecisionIndex`).
//! - `trigger.rs`: tokenization shared by indexing and querying.
//! - `dedup.rs`: order-preserving intersection and union of buckets.
//! - `query.rs`: candidate selection and evaluation for one input.
//! - `metrics.rs`: selection details and stage timings for a query.
//!
//! ## Public surface
//!
//! Most code interacts with the engine through [`crate::Matcher`]. The types
//! re-exported here are what the verbose API and the CLI report expose.
//!
//! ## Debugging
//!
//! Run with `RUST_LOG=phrasebook=debug` to log candidate selection for every
//! query, or `trace` to also log each matching phrase.

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/dedup.rs"]
mod dedup;
#[path = "engine/frequency.rs"]
mod frequency;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/query.rs"]
mod query;
#[path = "engine/trigger.rs"]
mod trigger;


#[allow(unused_imports)]
pub use compiled_rules::{CompiledEntry, CompiledRules, DecisionIndex, EntryId, compile_pattern, select_anchor};
pub use frequency::DocumentFrequency;
#[allow(unused_imports)]
pub use metrics::{BucketHit, QueryMetrics, QueryRun, Selection, SelectionPath};
pub use query::{CandidateStrategy, Query};
#[allow(unused_imports)]
pub use trigger::{TriggerInfo, tokenize};
