//! core::object::store
//!
//! Content-addressed persistence for blobs, trees, and commits.
//!
//! # Architecture
//!
//! Blobs and trees share the flat `objects/` directory, keyed by the plain
//! SHA-1 of their bytes. Commits live in `commits/`, keyed by the SHA-1 of
//! their framed encoding. No type tag is stored with an object.
//!
//! # Invariants
//!
//! - Identical bytes always produce the same id
//! - An object that already exists is never rewritten
//! - Objects are written atomically (temp file + rename)

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::schema::{Commit, SchemaError, Tree};
use crate::core::fsio;
use crate::core::paths::RepoPaths;
use crate::core::types::ObjectId;

/// Minimum length of an abbreviated commit id.
pub const MIN_PREFIX_LEN: usize = 4;

/// The kind of object an id was expected to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
        };
        write!(f, "{}", s)
    }
}

/// Errors from object store operations.
#[derive(Debug, Error)]
pub enum ObjectError {
    /// The referenced object does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: ObjectKind, id: String },

    /// The stored object is malformed.
    #[error("corrupt {kind} {id}: {source}")]
    Corrupt {
        kind: ObjectKind,
        id: ObjectId,
        source: SchemaError,
    },

    /// An abbreviated id matched more than one commit.
    #[error("ambiguous commit id '{prefix}' matches {count} commits")]
    AmbiguousPrefix { prefix: String, count: usize },

    /// Underlying read or write failure.
    #[error("object store i/o error at '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ObjectError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        ObjectError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Object store rooted at a repository's control directory.
///
/// # Example
///
/// ```no_run
/// use strata::core::object::ObjectStore;
/// use strata::core::paths::RepoPaths;
/// use std::path::PathBuf;
///
/// let paths = RepoPaths::new(PathBuf::from("/work"));
/// let store = ObjectStore::new(&paths);
/// let id = store.put_blob(b"hello").unwrap();
/// assert_eq!(store.get_blob(&id).unwrap(), b"hello");
/// ```
pub struct ObjectStore<'a> {
    paths: &'a RepoPaths,
}

impl<'a> ObjectStore<'a> {
    /// Create a store over the given repository paths.
    pub fn new(paths: &'a RepoPaths) -> Self {
        Self { paths }
    }

    // =========================================================================
    // Blobs
    // =========================================================================

    /// Store raw bytes and return their id.
    ///
    /// If an object with the same id already exists, nothing is written.
    pub fn put_blob(&self, bytes: &[u8]) -> Result<ObjectId, ObjectError> {
        let id = ObjectId::hash_bytes(bytes);
        self.write_if_absent(&self.paths.object_path(&id), bytes)?;
        Ok(id)
    }

    /// Read a blob's bytes.
    ///
    /// # Errors
    ///
    /// Returns `ObjectError::NotFound` if the blob does not exist.
    pub fn get_blob(&self, id: &ObjectId) -> Result<Vec<u8>, ObjectError> {
        self.read(&self.paths.object_path(id), ObjectKind::Blob, id)
    }

    // =========================================================================
    // Trees
    // =========================================================================

    /// Store a tree and return its id.
    pub fn put_tree(&self, tree: &Tree) -> Result<ObjectId, ObjectError> {
        let text = tree.encode();
        let id = ObjectId::hash_bytes(text.as_bytes());
        self.write_if_absent(&self.paths.object_path(&id), text.as_bytes())?;
        Ok(id)
    }

    /// Read and parse a tree.
    ///
    /// # Errors
    ///
    /// Returns `ObjectError::NotFound` if absent, `ObjectError::Corrupt` if a
    /// line lacks its separator or carries a bad hash.
    pub fn get_tree(&self, id: &ObjectId) -> Result<Tree, ObjectError> {
        let bytes = self.read(&self.paths.object_path(id), ObjectKind::Tree, id)?;
        let corrupt = |source| ObjectError::Corrupt {
            kind: ObjectKind::Tree,
            id: id.clone(),
            source,
        };
        let text = String::from_utf8(bytes).map_err(|_| corrupt(SchemaError::InvalidUtf8))?;
        Tree::decode(&text).map_err(corrupt)
    }

    // =========================================================================
    // Commits
    // =========================================================================

    /// Store a commit and return its id.
    pub fn put_commit(&self, commit: &Commit) -> Result<ObjectId, ObjectError> {
        let bytes = commit.encode();
        let id = ObjectId::hash_bytes(&bytes);
        self.write_if_absent(&self.paths.commit_path(&id), &bytes)?;
        Ok(id)
    }

    /// Read and parse a commit.
    ///
    /// # Errors
    ///
    /// Returns `ObjectError::NotFound` if absent, `ObjectError::Corrupt` if
    /// the header separator or tree line is missing.
    pub fn get_commit(&self, id: &ObjectId) -> Result<Commit, ObjectError> {
        let bytes = self.read(&self.paths.commit_path(id), ObjectKind::Commit, id)?;
        Commit::decode(&bytes).map_err(|source| ObjectError::Corrupt {
            kind: ObjectKind::Commit,
            id: id.clone(),
            source,
        })
    }

    /// Read the tree a commit points at.
    pub fn commit_tree(&self, id: &ObjectId) -> Result<Tree, ObjectError> {
        let commit = self.get_commit(id)?;
        self.get_tree(&commit.tree)
    }

    /// Check whether a commit object exists.
    pub fn has_commit(&self, id: &ObjectId) -> bool {
        self.paths.commit_path(id).is_file()
    }

    /// Check whether a blob or tree object exists.
    pub fn has_object(&self, id: &ObjectId) -> bool {
        self.paths.object_path(id).is_file()
    }

    /// List every stored commit whose file name is a well-formed id,
    /// sorted ascending by id.
    pub fn list_commits(&self) -> Result<Vec<ObjectId>, ObjectError> {
        let dir = self.paths.commits_dir();
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ObjectError::io(&dir, e)),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ObjectError::io(&dir, e))?;
            if !entry.path().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if ObjectId::is_well_formed(name) {
                    if let Ok(id) = ObjectId::new(name) {
                        ids.push(id);
                    }
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Resolve a full or abbreviated commit id.
    ///
    /// # Errors
    ///
    /// - `ObjectError::NotFound` if nothing matches or the prefix is too short
    /// - `ObjectError::AmbiguousPrefix` if several commits match
    pub fn resolve_commit(&self, prefix: &str) -> Result<ObjectId, ObjectError> {
        let prefix = prefix.trim().to_ascii_lowercase();
        let not_found = || ObjectError::NotFound {
            kind: ObjectKind::Commit,
            id: prefix.clone(),
        };

        if let Ok(id) = ObjectId::new(prefix.as_str()) {
            return if self.has_commit(&id) {
                Ok(id)
            } else {
                Err(not_found())
            };
        }

        if prefix.len() < MIN_PREFIX_LEN || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(not_found());
        }

        let mut matches: Vec<ObjectId> = self
            .list_commits()?
            .into_iter()
            .filter(|id| id.as_str().starts_with(&prefix))
            .collect();

        match matches.len() {
            0 => Err(not_found()),
            1 => Ok(matches.remove(0)),
            count => Err(ObjectError::AmbiguousPrefix { prefix, count }),
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn write_if_absent(&self, path: &Path, bytes: &[u8]) -> Result<bool, ObjectError> {
        if path.exists() {
            return Ok(false);
        }
        fsio::write_atomic(path, bytes).map_err(|e| ObjectError::io(path, e))?;
        Ok(true)
    }

    fn read(&self, path: &Path, kind: ObjectKind, id: &ObjectId) -> Result<Vec<u8>, ObjectError> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ObjectError::NotFound {
                kind,
                id: id.to_string(),
            }),
            Err(e) => Err(ObjectError::io(path, e)),
        }
    }
}
