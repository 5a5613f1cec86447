//! JSON rule documents.
//!
//! [`JsonRuleSource`] loads every `*.json` document below the root of a
//! [`DocumentTree`] and merges their records in traversal order:
//!
//! ```text
//! root/
//!   data.json          ──┐
//!   addons/              │ a directory's documents first, then its
//!     shop.json        ──┤ subdirectories; siblings in name order
//!     quests/extra.json ─┘ ──▶ Vec<RuleRecord>
//! ```
//!
//! A document that cannot be read or parsed is skipped with a warning; the
//! rest of the tree still loads. An empty or missing tree is seeded with the
//! default document (see [`super::defaults`]).

use super::defaults;
use super::lenient;
use super::record::RuleRecord;
use super::source::RuleSource;
use super::tree::{DocumentTree, EntryKind};
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct JsonRuleSource<T> {
    tree: T,
    seed_default: bool,
}

impl<T: DocumentTree> JsonRuleSource<T> {
    pub fn new(tree: T) -> Self {
        Self { tree, seed_default: true }
    }

    /// Enable or disable seeding an empty tree with the default document.
    pub fn with_default_document(mut self, enabled: bool) -> Self {
        self.seed_default = enabled;
        self
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    /// Every JSON document below the root.
    ///
    /// Uses an explicit worklist rather than recursion; directories that
    /// cannot be listed are logged and skipped. Linked directories are walked,
    /// but each directory at most once, so link cycles terminate.
    pub fn discover(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        let root = PathBuf::new();
        if !self.tree.exists(&root) {
            return found;
        }

        let mut visited = HashSet::new();
        let mut pending = vec![root];
        while let Some(dir) = pending.pop() {
            if let Some(id) = self.tree.canonical(&dir)
                && !visited.insert(id)
            {
                log::debug!("Skipping already visited rule directory {}", self.tree.describe(&dir));
                continue;
            }
            let mut entries = match self.tree.list(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("Failed to list rule directory {}: {e}", self.tree.describe(&dir));
                    continue;
                }
            };
            entries.sort_by(|a, b| a.path.cmp(&b.path));

            let mut subdirs = Vec::new();
            for entry in entries {
                match entry.kind {
                    EntryKind::Directory => subdirs.push(entry.path),
                    EntryKind::Document if is_json(&entry.path) => found.push(entry.path),
                    EntryKind::Document => {}
                }
            }
            // Reversed so the stack pops them in name order.
            pending.extend(subdirs.into_iter().rev());
        }

        found
    }

    /// Parse one document into records.
    pub fn parse_document(&self, path: &Path) -> Result<Vec<RuleRecord>> {
        let raw = self.tree.read(path)?;
        let cleaned = lenient::strip(&raw);
        let parsed: Option<Vec<RuleRecord>> = serde_json::from_str(&cleaned)
            .map_err(|source| Error::Document { path: PathBuf::from(self.tree.describe(path)), source })?;

        let mut records = parsed.unwrap_or_default();
        records.retain(|r| {
            if r.match_phrases.is_empty() {
                log::warn!(
                    "Skipping rule without match phrases in {} (response: {:?})",
                    self.tree.describe(path),
                    r.response_template
                );
                false
            } else {
                true
            }
        });
        Ok(records)
    }

    /// Seed an empty or missing tree with the default document.
    ///
    /// Returns the default records when they could not be written, so the
    /// caller can still serve them from memory. Returns `None` when the tree
    /// already had content or the document was written.
    fn ensure_default(&self) -> Option<Vec<RuleRecord>> {
        let root = PathBuf::new();
        let is_empty = !self.tree.exists(&root) || self.tree.list(&root).map(|e| e.is_empty()).unwrap_or(false);
        if !is_empty {
            return None;
        }

        let path = Path::new(defaults::DEFAULT_DOCUMENT_NAME);
        match self.tree.write(path, &defaults::document()) {
            Ok(()) => {
                log::info!("Created default rule document at {}", self.tree.describe(path));
                None
            }
            Err(e) => {
                log::warn!(
                    "Failed to write default rule document to {}: {e}; using built-in rules in memory",
                    self.tree.describe(path)
                );
                Some(defaults::records())
            }
        }
    }
}

impl<T: DocumentTree> RuleSource for JsonRuleSource<T> {
    fn load_rules(&self) -> Vec<RuleRecord> {
        if self.seed_default
            && let Some(in_memory) = self.ensure_default()
        {
            return in_memory;
        }

        let mut all = Vec::new();
        for path in self.discover() {
            match self.parse_document(&path) {
                Ok(records) => {
                    log::debug!("Loaded {} rules from {}", records.len(), self.tree.describe(&path));
                    all.extend(records);
                }
                Err(e) => log::warn!("Skipping rule document {}: {e}", self.tree.describe(&path)),
            }
        }
        all
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()).map(|ext| ext.eq_ignore_ascii_case("json")).unwrap_or(false)
}
