//! Document trees.
//!
//! Rule documents live in a tree of directories. The reader walks that tree
//! through the small [`DocumentTree`] trait so the same traversal works over
//! the filesystem ([`FsTree`]) and over in-memory data ([`MemoryTree`]).
//!
//! All paths handed to a tree are *relative to its root*; the empty path is
//! the root itself.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Document,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path relative to the tree root.
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Minimal storage backend for rule documents.
pub trait DocumentTree {
    /// Whether `path` exists (as a directory or a document).
    fn exists(&self, path: &Path) -> bool;

    /// Immediate children of directory `dir`.
    fn list(&self, dir: &Path) -> io::Result<Vec<TreeEntry>>;

    fn read(&self, path: &Path) -> io::Result<String>;

    /// Write a document, creating missing parent directories.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Human-readable location used in log messages.
    fn describe(&self, path: &Path) -> String {
        path.display().to_string()
    }

    /// Identity of directory `dir` after resolving links, when the backend
    /// has links. Two paths with the same identity are the same directory.
    fn canonical(&self, _dir: &Path) -> Option<PathBuf> {
        None
    }
}

/// A [`DocumentTree`] rooted at a filesystem directory.
#[derive(Debug, Clone)]
pub struct FsTree {
    root: PathBuf,
}

impl FsTree {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.as_os_str().is_empty() { self.root.clone() } else { self.root.join(path) }
    }
}

impl DocumentTree for FsTree {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<TreeEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(self.resolve(dir))? {
            let entry = entry?;
            // Follows symlinks, so a linked directory is walked like a real one.
            let kind = if entry.path().is_dir() { EntryKind::Directory } else { EntryKind::Document };
            entries.push(TreeEntry { path: dir.join(entry.file_name()), kind });
        }
        Ok(entries)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(self.resolve(path))
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, contents)
    }

    fn describe(&self, path: &Path) -> String {
        self.resolve(path).display().to_string()
    }

    fn canonical(&self, dir: &Path) -> Option<PathBuf> {
        fs::canonicalize(self.resolve(dir)).ok()
    }
}

/// An in-memory [`DocumentTree`].
///
/// Directories are implied by the documents inserted below them; an empty
/// root still exists unless the tree was created with [`MemoryTree::missing`].
#[derive(Debug, Default)]
pub struct MemoryTree {
    documents: RwLock<BTreeMap<PathBuf, String>>,
    dirs: RwLock<BTreeSet<PathBuf>>,
    read_only: bool,
}

impl MemoryTree {
    /// An existing, empty tree.
    pub fn new() -> Self {
        let tree = Self::default();
        tree.add_dirs(Path::new(""));
        tree
    }

    /// A tree whose root does not exist yet.
    pub fn missing() -> Self {
        Self::default()
    }

    /// Reject every write with `PermissionDenied`.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn with_document(self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&self, path: impl AsRef<Path>, contents: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            self.add_dirs(parent);
        }
        self.documents.write().unwrap_or_else(|e| e.into_inner()).insert(path, contents.into());
    }

    /// Current contents of a document, if present.
    pub fn document(&self, path: impl AsRef<Path>) -> Option<String> {
        self.documents.read().unwrap_or_else(|e| e.into_inner()).get(path.as_ref()).cloned()
    }

    fn add_dirs(&self, dir: &Path) {
        let mut dirs = self.dirs.write().unwrap_or_else(|e| e.into_inner());
        let mut current = Some(dir);
        while let Some(d) = current {
            dirs.insert(d.to_path_buf());
            current = d.parent();
        }
    }
}

impl DocumentTree for MemoryTree {
    fn exists(&self, path: &Path) -> bool {
        self.dirs.read().unwrap_or_else(|e| e.into_inner()).contains(path)
            || self.documents.read().unwrap_or_else(|e| e.into_inner()).contains_key(path)
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<TreeEntry>> {
        let dirs = self.dirs.read().unwrap_or_else(|e| e.into_inner());
        if !dirs.contains(dir) {
            return Err(io::Error::new(io::ErrorKind::NotFound, format!("no directory {}", dir.display())));
        }

        let mut entries: Vec<TreeEntry> = dirs
            .iter()
            .filter(|d| d.parent() == Some(dir))
            .map(|d| TreeEntry { path: d.clone(), kind: EntryKind::Directory })
            .collect();
        let documents = self.documents.read().unwrap_or_else(|e| e.into_inner());
        entries.extend(
            documents
                .keys()
                .filter(|p| p.parent() == Some(dir))
                .map(|p| TreeEntry { path: p.clone(), kind: EntryKind::Document }),
        );
        Ok(entries)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        self.document(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no document {}", path.display())))
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if self.read_only {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "memory tree is read-only"));
        }
        self.insert(path, contents);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn memory_tree_lists_implied_directories() {
        let tree = MemoryTree::new().with_document("a.json", "[]").with_document("nested/deeper/b.json", "[]");

        let mut root = tree.list(Path::new("")).unwrap();
        root.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(
            root,
            vec![
                TreeEntry { path: PathBuf::from("a.json"), kind: EntryKind::Document },
                TreeEntry { path: PathBuf::from("nested"), kind: EntryKind::Directory },
            ]
        );
        assert!(tree.exists(Path::new("nested/deeper")));
        assert_eq!(tree.read(Path::new("nested/deeper/b.json")).unwrap(), "[]");
    }

    #[test]
    fn missing_memory_tree_has_no_root() {
        let tree = MemoryTree::missing();
        assert!(!tree.exists(Path::new("")));
        assert!(tree.list(Path::new("")).is_err());

        tree.write(Path::new("data.json"), "[]").unwrap();
        assert!(tree.exists(Path::new("")));
    }

    #[test]
    fn read_only_memory_tree_rejects_writes() {
        let tree = MemoryTree::new().read_only();
        let err = tree.write(Path::new("data.json"), "[]").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(tree.document("data.json").is_none());
    }

    #[test]
    fn fs_tree_writes_and_lists_under_root() {
        let temp = tempfile::TempDir::new().unwrap();
        let tree = FsTree::new(temp.path().join("rules"));
        assert!(!tree.exists(Path::new("")));

        tree.write(Path::new("sub/one.json"), "[]").unwrap();
        let entries = tree.list(Path::new("")).unwrap();
        assert_eq!(entries, vec![TreeEntry { path: PathBuf::from("sub"), kind: EntryKind::Directory }]);
        assert_eq!(tree.read(Path::new("sub/one.json")).unwrap(), "[]");
    }
}
