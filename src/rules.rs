//! Rule records and where they come from.
//!
//! - `record.rs`: the [`RuleRecord`] data type as stored in documents.
//! - `source.rs`: the [`RuleSource`] seam plus sources built by composition.
//! - `tree.rs`: storage backends the JSON reader walks.
//! - `json.rs`: recursive, partial-failure tolerant JSON document reader.
//! - `lenient.rs`: comment/trailing-comma stripping applied before parsing.
//! - `defaults.rs`: the document seeded into an empty tree.

pub mod defaults;
pub mod json;
pub mod lenient;
pub mod record;
pub mod source;
pub mod tree;

pub use json::JsonRuleSource;
pub use record::RuleRecord;
pub use source::{CompositeRuleSource, RuleSource, StaticRuleSource};
pub use tree::{DocumentTree, EntryKind, FsTree, MemoryTree, TreeEntry};
