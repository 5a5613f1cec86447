//! Trigger scanning (input tokenization).
//!
//! Both sides of the index use the same tokenizer: rule phrases when the
//! index is built, and raw input at query time. A token is a maximal run of
//! non-whitespace, lowercased. Punctuation stays attached (`"me?"` is one
//! token), which keeps anchors literal and cheap to compute.
//!
//! ```text
//! "Where am I?  where"  ──▶  ["where", "am", "i?", "where"]   (tokenize)
//!                       ──▶  ["where", "am", "i?"]            (TriggerInfo::scan)
//! ```
//!
//! Lowercasing uses full Unicode `to_lowercase()` because the compiled
//! patterns are Unicode case-insensitive; ASCII folding would let a phrase
//! match an input whose tokens never reach its bucket.

use std::collections::HashSet;

/// Lowercase `text` and split it on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// Distinct tokens of a query, in the order they first appear.
#[derive(Debug, Clone, Default)]
pub struct TriggerInfo {
    pub tokens: Vec<String>,
}

impl TriggerInfo {
    pub fn scan(input: &str) -> Self {
        let mut seen = HashSet::new();
        let tokens = tokenize(input).into_iter().filter(|t| seen.insert(t.clone())).collect();
        TriggerInfo { tokens }
    }
}
