//! core::index
//!
//! The staging area: pending additions and pending removals.
//!
//! # Formats
//!
//! The staging index is stored as `path:hash\n` lines sorted by path. The
//! literal text `{}` denotes an empty index.
//!
//! The removal set is stored as one path per line. The literal text `[]`
//! denotes an empty set.
//!
//! Both sentinels are written by `init` and after every commit, and both
//! are accepted (along with an empty or missing file) when reading.
//!
//! # Invariants
//!
//! - A path appears at most once in each collection
//! - Both collections are empty immediately after a commit

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use thiserror::Error;

use crate::core::fsio;
use crate::core::object::Tree;
use crate::core::paths::RepoPaths;
use crate::core::types::ObjectId;

/// On-disk text for an empty staging index.
pub const EMPTY_INDEX: &str = "{}";

/// On-disk text for an empty removal set.
pub const EMPTY_REMOVALS: &str = "[]";

/// Errors from staging area operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// A line of the staging index could not be parsed.
    #[error("staging index line {line} is malformed")]
    Corrupt { line: usize },

    #[error("staging area i/o error at '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Files staged for the next commit, keyed by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingIndex {
    entries: BTreeMap<String, ObjectId>,
}

impl StagingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry.
    pub fn insert(&mut self, path: impl Into<String>, blob: ObjectId) {
        self.entries.insert(path.into(), blob);
    }

    /// Remove an entry, returning whether it was present.
    pub fn remove(&mut self, path: &str) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn get(&self, path: &str) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate entries in ascending path order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.entries.iter()
    }

    /// Build a tree with exactly the staged entries.
    pub fn to_tree(&self) -> Tree {
        Tree::from(self.entries.clone())
    }

    /// Encode as sorted `path:hash` lines, or `{}` when empty.
    pub fn encode(&self) -> String {
        if self.entries.is_empty() {
            return EMPTY_INDEX.to_string();
        }
        self.entries
            .iter()
            .map(|(path, hash)| format!("{}:{}\n", path, hash))
            .collect()
    }

    /// Decode the on-disk text.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::Corrupt` if a line lacks a `:` separator or
    /// carries an invalid hash.
    pub fn decode(text: &str) -> Result<Self, IndexError> {
        let mut entries = BTreeMap::new();
        if text == EMPTY_INDEX {
            return Ok(Self { entries });
        }
        for (idx, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let (path, hash) = line
                .rsplit_once(':')
                .ok_or(IndexError::Corrupt { line: idx + 1 })?;
            let hash = ObjectId::new(hash).map_err(|_| IndexError::Corrupt { line: idx + 1 })?;
            entries.insert(path.to_string(), hash);
        }
        Ok(Self { entries })
    }
}

/// Paths staged for deletion in the next commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalSet {
    paths: BTreeSet<String>,
}

impl RemovalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path, returning false if it was already present.
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        self.paths.insert(path.into())
    }

    /// Drop a path, returning whether it was present.
    pub fn remove(&mut self, path: &str) -> bool {
        self.paths.remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.paths.iter()
    }

    /// Encode as one path per line, or `[]` when empty.
    pub fn encode(&self) -> String {
        if self.paths.is_empty() {
            return EMPTY_REMOVALS.to_string();
        }
        self.paths.iter().map(|p| format!("{}\n", p)).collect()
    }

    /// Decode the on-disk text. Blank lines are skipped.
    pub fn decode(text: &str) -> Self {
        if text == EMPTY_REMOVALS {
            return Self::default();
        }
        Self {
            paths: text
                .lines()
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Persistent staging area for a repository.
pub struct StagingArea<'a> {
    paths: &'a RepoPaths,
}

impl<'a> StagingArea<'a> {
    pub fn new(paths: &'a RepoPaths) -> Self {
        Self { paths }
    }

    /// Read the staging index. A missing file reads as empty.
    pub fn index(&self) -> Result<StagingIndex, IndexError> {
        let path = self.paths.index_path();
        match fsio::read_optional_string(&path).map_err(|source| IndexError::Io { path, source })? {
            Some(text) => StagingIndex::decode(&text),
            None => Ok(StagingIndex::new()),
        }
    }

    /// Read the removal set. A missing file reads as empty.
    pub fn removals(&self) -> Result<RemovalSet, IndexError> {
        let path = self.paths.removals_path();
        match fsio::read_optional_string(&path).map_err(|source| IndexError::Io { path, source })? {
            Some(text) => Ok(RemovalSet::decode(&text)),
            None => Ok(RemovalSet::new()),
        }
    }

    pub fn write_index(&self, index: &StagingIndex) -> Result<(), IndexError> {
        let path = self.paths.index_path();
        fsio::write_atomic(&path, index.encode().as_bytes())
            .map_err(|source| IndexError::Io { path, source })
    }

    pub fn write_removals(&self, removals: &RemovalSet) -> Result<(), IndexError> {
        let path = self.paths.removals_path();
        fsio::write_atomic(&path, removals.encode().as_bytes())
            .map_err(|source| IndexError::Io { path, source })
    }

    /// Stage a file, overwriting any previous entry.
    ///
    /// The path is also dropped from the removal set, since a re-added file
    /// is no longer pending deletion.
    pub fn stage(&self, path: &str, blob: ObjectId) -> Result<(), IndexError> {
        let mut index = self.index()?;
        index.insert(path, blob);
        self.write_index(&index)?;

        let mut removals = self.removals()?;
        if removals.remove(path) {
            self.write_removals(&removals)?;
        }
        Ok(())
    }

    /// Unstage a file, returning whether it was staged.
    pub fn unstage(&self, path: &str) -> Result<bool, IndexError> {
        let mut index = self.index()?;
        if !index.remove(path) {
            return Ok(false);
        }
        self.write_index(&index)?;
        Ok(true)
    }

    /// Mark a tracked path for removal.
    ///
    /// Only paths present in `head_tree` and not currently staged qualify.
    /// Returns `true` if the path is (now) in the removal set, `false` if
    /// there was nothing to remove. Deleting the working file is left to
    /// the caller.
    pub fn stage_removal(&self, path: &str, head_tree: &Tree) -> Result<bool, IndexError> {
        if !head_tree.contains(path) || self.index()?.contains(path) {
            return Ok(false);
        }
        let mut removals = self.removals()?;
        if removals.insert(path) {
            self.write_removals(&removals)?;
        }
        Ok(true)
    }

    /// Read both collections at once.
    pub fn snapshot(&self) -> Result<(StagingIndex, RemovalSet), IndexError> {
        Ok((self.index()?, self.removals()?))
    }

    /// Reset both collections to their empty sentinels.
    pub fn clear(&self) -> Result<(), IndexError> {
        self.write_index(&StagingIndex::new())?;
        self.write_removals(&RemovalSet::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn id(s: &str) -> ObjectId {
        ObjectId::hash_bytes(s.as_bytes())
    }

    mod codec {
        use super::*;

        #[test]
        fn empty_index_sentinel() {
            assert_eq!(StagingIndex::new().encode(), "{}");
            assert!(StagingIndex::decode("{}").unwrap().is_empty());
            assert!(StagingIndex::decode("").unwrap().is_empty());
        }

        #[test]
        fn empty_removals_sentinel() {
            assert_eq!(RemovalSet::new().encode(), "[]");
            assert!(RemovalSet::decode("[]").is_empty());
            assert!(RemovalSet::decode("").is_empty());
        }

        #[test]
        fn index_sorted_lines() {
            let mut index = StagingIndex::new();
            index.insert("z", id("z"));
            index.insert("a", id("a"));
            assert_eq!(index.encode(), format!("a:{}\nz:{}\n", id("a"), id("z")));
        }

        #[test]
        fn index_rejects_bad_line() {
            assert!(matches!(
                StagingIndex::decode("nocolon\n"),
                Err(IndexError::Corrupt { line: 1 })
            ));
        }

        #[test]
        fn removal_of_file_named_like_sentinel_survives() {
            let mut set = RemovalSet::new();
            set.insert("[]");
            let decoded = RemovalSet::decode(&set.encode());
            assert!(decoded.contains("[]"));
            assert_eq!(decoded.len(), 1);
        }

        #[test]
        fn index_entry_named_like_sentinel_survives() {
            let mut index = StagingIndex::new();
            index.insert("{}", id("braces"));
            let decoded = StagingIndex::decode(&index.encode()).unwrap();
            assert_eq!(decoded.get("{}"), Some(&id("braces")));
        }

        #[test]
        fn removals_dedup() {
            let set = RemovalSet::decode("b\na\nb\n");
            assert_eq!(set.len(), 2);
            assert_eq!(set.encode(), "a\nb\n");
        }
    }

    mod area {
        use super::*;

        struct Fixture {
            _dir: TempDir,
            paths: RepoPaths,
        }

        fn fixture() -> Fixture {
            let dir = TempDir::new().unwrap();
            let paths = RepoPaths::new(dir.path().to_path_buf());
            paths.ensure_dirs().unwrap();
            Fixture { _dir: dir, paths }
        }

        #[test]
        fn missing_files_read_empty() {
            let f = fixture();
            let area = StagingArea::new(&f.paths);
            let (index, removals) = area.snapshot().unwrap();
            assert!(index.is_empty());
            assert!(removals.is_empty());
        }

        #[test]
        fn stage_and_unstage() {
            let f = fixture();
            let area = StagingArea::new(&f.paths);

            area.stage("a.txt", id("a")).unwrap();
            assert_eq!(area.index().unwrap().get("a.txt"), Some(&id("a")));

            assert!(area.unstage("a.txt").unwrap());
            assert!(!area.unstage("a.txt").unwrap());
            assert!(area.index().unwrap().is_empty());
        }

        #[test]
        fn stage_drops_pending_removal() {
            let f = fixture();
            let area = StagingArea::new(&f.paths);
            let mut head = Tree::new();
            head.insert("a.txt", id("a"));

            assert!(area.stage_removal("a.txt", &head).unwrap());
            area.stage("a.txt", id("a2")).unwrap();
            assert!(!area.removals().unwrap().contains("a.txt"));
        }

        #[test]
        fn stage_removal_requires_tracked_path() {
            let f = fixture();
            let area = StagingArea::new(&f.paths);
            assert!(!area.stage_removal("ghost", &Tree::new()).unwrap());
            assert!(area.removals().unwrap().is_empty());
        }

        #[test]
        fn stage_removal_skips_staged_path() {
            let f = fixture();
            let area = StagingArea::new(&f.paths);
            let mut head = Tree::new();
            head.insert("a.txt", id("a"));

            area.stage("a.txt", id("a2")).unwrap();
            assert!(!area.stage_removal("a.txt", &head).unwrap());
        }

        #[test]
        fn stage_removal_is_idempotent() {
            let f = fixture();
            let area = StagingArea::new(&f.paths);
            let mut head = Tree::new();
            head.insert("a.txt", id("a"));

            assert!(area.stage_removal("a.txt", &head).unwrap());
            assert!(area.stage_removal("a.txt", &head).unwrap());
            assert_eq!(area.removals().unwrap().len(), 1);
        }

        #[test]
        fn clear_writes_sentinels() {
            let f = fixture();
            let area = StagingArea::new(&f.paths);
            area.stage("a.txt", id("a")).unwrap();
            area.clear().unwrap();

            assert_eq!(std::fs::read_to_string(f.paths.index_path()).unwrap(), "{}");
            assert_eq!(std::fs::read_to_string(f.paths.removals_path()).unwrap(), "[]");
        }
    }
}
