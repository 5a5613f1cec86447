//! Indexed fuzzy phrase matching with templated responses.
//!
//! A rule pairs one or more *match phrases* with a *response template*. At
//! build time every phrase is compiled into an in-order, gap-tolerant pattern
//! and filed under its rarest token. At query time the input's tokens pick a
//! handful of buckets, the candidate patterns are tested, and the templates
//! of the ones that match are resolved against a caller-supplied [`Context`].
//!
//! ```
//! use phrasebook::{Attributes, Categories, Matcher, PlaceholderRegistry, RuleRecord};
//!
//! let rules = vec![RuleRecord::new(["where am i"], "You are at {player_location}.")];
//! let matcher = Matcher::new(&rules, PlaceholderRegistry::builtin(Categories::ACTOR)).unwrap();
//!
//! let ctx = Attributes::new().with("player_x", "1").with("player_y", "64").with("player_z", "-2");
//! assert_eq!(
//!     matcher.match_input(&ctx, "Where am I right now?"),
//!     ["You are at X: 1.0, Y: 64.0, Z: -2.0."]
//! );
//! ```
//!
//! Rules usually come from a directory of JSON documents; see
//! [`rules::JsonRuleSource`].

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
pub mod placeholders;
pub mod rules;

pub use api::{Attributes, Context, MatchDetails, MatchResultVerbose, Matcher, Options, ReloadableMatcher};
pub use engine::{BucketHit, CandidateStrategy, DocumentFrequency, QueryMetrics, SelectionPath};
pub use error::{Error, Result};
pub use placeholders::{Categories, PlaceholderRegistry};
pub use rules::{JsonRuleSource, RuleRecord, RuleSource};
