//! core::refs
//!
//! Branch refs and the current-branch pointer.
//!
//! # Storage
//!
//! Each branch is a file under `heads/` holding its head commit id as hex
//! text, or nothing at all when the branch has no commits yet. Nested
//! names like `feature/x` map to nested files. `HEAD` holds the plain
//! name of the current branch.
//!
//! # Invariants
//!
//! - A non-empty ref always names an existing commit (enforced by writers
//!   storing objects before moving refs)
//! - Ref updates are atomic, so a ref update is the commit point of every
//!   history-changing operation

use std::path::PathBuf;

use thiserror::Error;
use walkdir::WalkDir;

use crate::core::fsio;
use crate::core::paths::RepoPaths;
use crate::core::types::{BranchName, ObjectId};

/// Errors from ref operations.
#[derive(Debug, Error)]
pub enum RefError {
    #[error("branch not found: {0}")]
    BranchNotFound(BranchName),

    /// A ref file holds something other than a commit id.
    #[error("corrupt ref '{name}': {content:?}")]
    Corrupt { name: String, content: String },

    #[error("ref i/o error at '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Reads and writes branch refs and `HEAD`.
pub struct RefStore<'a> {
    paths: &'a RepoPaths,
}

impl<'a> RefStore<'a> {
    pub fn new(paths: &'a RepoPaths) -> Self {
        Self { paths }
    }

    /// Check whether a branch ref exists.
    pub fn branch_exists(&self, branch: &BranchName) -> bool {
        self.paths.branch_path(branch).is_file()
    }

    /// Read a branch's head commit.
    ///
    /// Returns `Ok(None)` for a branch that exists but has no commits.
    ///
    /// # Errors
    ///
    /// - `RefError::BranchNotFound` if the branch does not exist
    /// - `RefError::Corrupt` if the ref holds something other than an id
    pub fn read_branch(&self, branch: &BranchName) -> Result<Option<ObjectId>, RefError> {
        let path = self.paths.branch_path(branch);
        let text = fsio::read_optional_string(&path)
            .map_err(|source| RefError::Io { path, source })?
            .ok_or_else(|| RefError::BranchNotFound(branch.clone()))?;

        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        ObjectId::new(text).map(Some).map_err(|_| RefError::Corrupt {
            name: branch.to_string(),
            content: text.to_string(),
        })
    }

    /// Point a branch at a commit, or at nothing.
    ///
    /// Creates the branch if it does not exist.
    pub fn write_branch(
        &self,
        branch: &BranchName,
        target: Option<&ObjectId>,
    ) -> Result<(), RefError> {
        let path = self.paths.branch_path(branch);
        let content = target.map(|id| id.as_str()).unwrap_or("");
        fsio::write_atomic(&path, content.as_bytes()).map_err(|source| RefError::Io { path, source })
    }

    /// Delete a branch ref. Only the ref is removed, never commits.
    pub fn delete_branch(&self, branch: &BranchName) -> Result<(), RefError> {
        let path = self.paths.branch_path(branch);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RefError::BranchNotFound(branch.clone()))
            }
            Err(source) => Err(RefError::Io { path, source }),
        }
    }

    /// List all branches, sorted by name.
    ///
    /// Files under `heads/` whose relative path is not a valid branch
    /// name are ignored.
    pub fn list_branches(&self) -> Result<Vec<BranchName>, RefError> {
        let heads = self.paths.heads_dir();
        if !heads.is_dir() {
            return Ok(Vec::new());
        }

        let mut branches = Vec::new();
        for entry in WalkDir::new(&heads).min_depth(1) {
            let entry = entry.map_err(|e| RefError::Io {
                path: heads.clone(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&heads) else {
                continue;
            };
            let name = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if let Ok(branch) = BranchName::new(name) {
                branches.push(branch);
            }
        }
        branches.sort();
        Ok(branches)
    }

    /// Read the current branch name from `HEAD`.
    ///
    /// # Errors
    ///
    /// Returns `RefError::Corrupt` if `HEAD` is missing or does not hold a
    /// valid branch name.
    pub fn current_branch(&self) -> Result<BranchName, RefError> {
        let path = self.paths.head_path();
        let text = fsio::read_optional_string(&path)
            .map_err(|source| RefError::Io { path, source })?
            .unwrap_or_default();
        let name = text.trim();
        BranchName::new(name).map_err(|_| RefError::Corrupt {
            name: "HEAD".to_string(),
            content: name.to_string(),
        })
    }

    /// Make `branch` the current branch.
    pub fn set_current_branch(&self, branch: &BranchName) -> Result<(), RefError> {
        let path = self.paths.head_path();
        fsio::write_atomic(&path, branch.as_str().as_bytes())
            .map_err(|source| RefError::Io { path, source })
    }

    /// The head commit of the current branch, if any.
    pub fn head_commit(&self) -> Result<Option<ObjectId>, RefError> {
        let branch = self.current_branch()?;
        self.read_branch(&branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

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

    fn branch(name: &str) -> BranchName {
        BranchName::new(name).unwrap()
    }

    #[test]
    fn empty_ref_reads_none() {
        let f = fixture();
        let refs = RefStore::new(&f.paths);
        refs.write_branch(&branch("main"), None).unwrap();

        assert!(refs.branch_exists(&branch("main")));
        assert_eq!(refs.read_branch(&branch("main")).unwrap(), None);
    }

    #[test]
    fn write_then_read() {
        let f = fixture();
        let refs = RefStore::new(&f.paths);
        let id = ObjectId::hash_bytes(b"c");
        refs.write_branch(&branch("main"), Some(&id)).unwrap();
        assert_eq!(refs.read_branch(&branch("main")).unwrap(), Some(id));
    }

    #[test]
    fn missing_branch_not_found() {
        let f = fixture();
        let refs = RefStore::new(&f.paths);
        assert!(matches!(
            refs.read_branch(&branch("ghost")),
            Err(RefError::BranchNotFound(_))
        ));
        assert!(matches!(
            refs.delete_branch(&branch("ghost")),
            Err(RefError::BranchNotFound(_))
        ));
    }

    #[test]
    fn garbage_ref_is_corrupt() {
        let f = fixture();
        let refs = RefStore::new(&f.paths);
        std::fs::write(f.paths.branch_path(&branch("main")), "not a hash").unwrap();
        assert!(matches!(
            refs.read_branch(&branch("main")),
            Err(RefError::Corrupt { .. })
        ));
    }

    #[test]
    fn list_includes_nested_sorted() {
        let f = fixture();
        let refs = RefStore::new(&f.paths);
        for name in ["main", "feature/x", "alpha"] {
            refs.write_branch(&branch(name), None).unwrap();
        }

        let names: Vec<_> = refs
            .list_branches()
            .unwrap()
            .into_iter()
            .map(|b| b.to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "feature/x", "main"]);
    }

    #[test]
    fn updating_ref_keeps_tmp_suffixed_branch() {
        let f = fixture();
        let refs = RefStore::new(&f.paths);
        let first = ObjectId::hash_bytes(b"first");
        let second = ObjectId::hash_bytes(b"second");
        refs.write_branch(&branch("main"), Some(&first)).unwrap();
        refs.write_branch(&branch("main.tmp"), Some(&first)).unwrap();

        refs.write_branch(&branch("main"), Some(&second)).unwrap();

        assert_eq!(refs.read_branch(&branch("main")).unwrap(), Some(second));
        assert_eq!(refs.read_branch(&branch("main.tmp")).unwrap(), Some(first));
        assert_eq!(refs.list_branches().unwrap().len(), 2);
    }

    #[test]
    fn stale_lock_file_is_not_listed() {
        let f = fixture();
        let refs = RefStore::new(&f.paths);
        refs.write_branch(&branch("main"), None).unwrap();
        std::fs::write(f.paths.heads_dir().join("main.lock"), "").unwrap();

        assert_eq!(refs.list_branches().unwrap(), vec![branch("main")]);
    }

    #[test]
    fn head_roundtrip() {
        let f = fixture();
        let refs = RefStore::new(&f.paths);
        let id = ObjectId::hash_bytes(b"c");
        refs.write_branch(&branch("dev"), Some(&id)).unwrap();
        refs.set_current_branch(&branch("dev")).unwrap();

        assert_eq!(refs.current_branch().unwrap(), branch("dev"));
        assert_eq!(refs.head_commit().unwrap(), Some(id));
    }

    #[test]
    fn missing_head_is_corrupt() {
        let f = fixture();
        let refs = RefStore::new(&f.paths);
        assert!(matches!(
            refs.current_branch(),
            Err(RefError::Corrupt { .. })
        ));
    }
}
