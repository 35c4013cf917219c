//! core::worktree
//!
//! Reading, writing, and scanning files in the working directory.
//!
//! # Scanning
//!
//! [`WorkTree::walk`] lazily yields repository-relative, `/`-separated
//! paths of regular files. The caller supplies the entry predicate
//! ([`not_hidden`] for the usual scan); the control directory is always
//! pruned regardless of the predicate.
//!
//! # Checkout
//!
//! [`WorkTree::checkout_tree`] only writes. Deciding which files to delete
//! beforehand is a policy of the calling operation (branch switch deletes
//! the old branch's tracked files, reset deletes everything untracked by
//! the target).

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::core::object::{ObjectError, ObjectStore, Tree};
use crate::core::paths::{RepoPaths, CONTROL_DIR_NAME};

/// Errors from working-directory operations.
#[derive(Debug, Error)]
pub enum WorkTreeError {
    #[error("file does not exist: {0}")]
    NotFound(String),

    #[error("working tree i/o error at '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Object(#[from] ObjectError),
}

/// Entry predicate that skips hidden files and directories.
///
/// The walk root itself is never treated as hidden.
pub fn not_hidden(entry: &DirEntry) -> bool {
    entry.depth() == 0
        || !entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

fn is_control_dir(entry: &DirEntry) -> bool {
    entry.depth() == 1 && entry.file_name() == CONTROL_DIR_NAME
}

/// The working directory of a repository.
pub struct WorkTree<'a> {
    paths: &'a RepoPaths,
}

impl<'a> WorkTree<'a> {
    pub fn new(paths: &'a RepoPaths) -> Self {
        Self { paths }
    }

    /// Lazily walk regular files accepted by `filter`.
    ///
    /// Directories rejected by `filter` are not descended into.
    pub fn walk<F>(&self, mut filter: F) -> impl Iterator<Item = Result<String, WorkTreeError>> + 'a
    where
        F: FnMut(&DirEntry) -> bool + 'a,
    {
        let root = self.paths.work_dir.clone();
        WalkDir::new(&self.paths.work_dir)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| !is_control_dir(e) && filter(e))
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    Some(Ok(relative_path(&root, entry.path())))
                }
                Ok(_) => None,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                    Some(Err(WorkTreeError::Io {
                        path,
                        source: e.into(),
                    }))
                }
            })
    }

    /// All non-hidden files, sorted.
    pub fn files(&self) -> Result<Vec<String>, WorkTreeError> {
        let mut files = self.walk(not_hidden).collect::<Result<Vec<_>, _>>()?;
        files.sort();
        Ok(files)
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.paths.work_file(rel).is_file()
    }

    /// Read a working file.
    pub fn read(&self, rel: &str) -> Result<Vec<u8>, WorkTreeError> {
        let path = self.paths.work_file(rel);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(WorkTreeError::NotFound(rel.to_string()))
            }
            Err(source) => Err(WorkTreeError::Io { path, source }),
        }
    }

    /// Write a working file, creating parent directories as needed.
    pub fn write(&self, rel: &str, bytes: &[u8]) -> Result<(), WorkTreeError> {
        let path = self.paths.work_file(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| WorkTreeError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, bytes).map_err(|source| WorkTreeError::Io { path, source })
    }

    /// Delete a working file. Returns whether a file was removed.
    pub fn delete(&self, rel: &str) -> Result<bool, WorkTreeError> {
        let path = self.paths.work_file(rel);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(WorkTreeError::Io { path, source }),
        }
    }

    /// Write every file of `tree` into the working directory.
    ///
    /// Returns the number of files written.
    pub fn checkout_tree(&self, tree: &Tree, store: &ObjectStore<'_>) -> Result<usize, WorkTreeError> {
        for (path, blob) in tree.iter() {
            let bytes = store.get_blob(blob)?;
            self.write(path, &bytes)?;
        }
        Ok(tree.len())
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
