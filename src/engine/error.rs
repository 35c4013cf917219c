//! engine::error
//!
//! The error type returned by every repository operation.
//!
//! Expected refusals (a branch that already exists, merging a branch with
//! itself) carry the exact human-readable message shown to users. Failures
//! from the storage layers are wrapped unchanged.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::config::ConfigError;
use crate::core::index::IndexError;
use crate::core::object::ObjectError;
use crate::core::refs::RefError;
use crate::core::types::{BranchName, TypeError};
use crate::core::worktree::WorkTreeError;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not in an initialized strata directory.")]
    NotInitialized,

    #[error("A strata version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("A branch with that name already exists.")]
    BranchExists(BranchName),

    #[error("A branch with that name does not exist.")]
    BranchNotFound(BranchName),

    #[error("Cannot create branch before initial commit.")]
    NoInitialCommit,

    #[error("No commits yet.")]
    NoCommitsYet,

    #[error("No commit with that id exists.")]
    CommitNotFound(String),

    #[error("Commit id '{prefix}' is ambiguous ({count} matches).")]
    AmbiguousCommitId { prefix: String, count: usize },

    #[error("File does not exist in that commit.")]
    FileNotInCommit(String),

    #[error("File does not exist: {0}")]
    FileNotFound(String),

    #[error("Path is outside the repository: {}", .0.display())]
    OutsideRepository(PathBuf),

    #[error("Cannot merge a branch with itself.")]
    MergeWithSelf,

    #[error("Cannot remove the current branch.")]
    RemoveCurrentBranch,

    #[error("Please enter a commit message.")]
    EmptyMessage,

    #[error(transparent)]
    InvalidName(#[from] TypeError),

    #[error(transparent)]
    Object(#[from] ObjectError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Ref(#[from] RefError),

    #[error(transparent)]
    WorkTree(#[from] WorkTreeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("i/o error at '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl RepoError {
    /// Whether the error signals an unexpected failure rather than a
    /// refusal the user can act on.
    ///
    /// Only I/O failures and corrupt stored data are fatal.
    pub fn is_fatal(&self) -> bool {
        match self {
            RepoError::Io { .. } => true,
            RepoError::Object(e) => object_is_fatal(e),
            RepoError::Index(_) => true,
            RepoError::Ref(e) => !matches!(e, RefError::BranchNotFound(_)),
            RepoError::WorkTree(WorkTreeError::Io { .. }) => true,
            RepoError::WorkTree(WorkTreeError::Object(e)) => object_is_fatal(e),
            RepoError::Config(
                ConfigError::ReadError { .. } | ConfigError::WriteError { .. },
            ) => true,
            _ => false,
        }
    }

    /// Build an I/O error for a path.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RepoError::Io {
            path: path.into(),
            source,
        }
    }
}

fn object_is_fatal(e: &ObjectError) -> bool {
    matches!(e, ObjectError::Corrupt { .. } | ObjectError::Io { .. })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::object::{ObjectKind, SchemaError};
    use crate::core::types::ObjectId;

    #[test]
    fn refusals_are_not_fatal() {
        assert!(!RepoError::MergeWithSelf.is_fatal());
        assert!(!RepoError::NoCommitsYet.is_fatal());
        assert!(!RepoError::CommitNotFound("abc".into()).is_fatal());
    }

    #[test]
    fn corrupt_objects_are_fatal() {
        let err = RepoError::Object(ObjectError::Corrupt {
            kind: ObjectKind::Commit,
            id: ObjectId::hash_bytes(b"x"),
            source: SchemaError::MissingTree,
        });
        assert!(err.is_fatal());
    }

    #[test]
    fn missing_objects_are_not_fatal() {
        let err = RepoError::Object(ObjectError::NotFound {
            kind: ObjectKind::Blob,
            id: "abc".into(),
        });
        assert!(!err.is_fatal());
    }

    #[test]
    fn io_is_fatal() {
        let err = RepoError::io("/x", std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert!(err.is_fatal());
    }

    #[test]
    fn messages_match_user_text() {
        assert_eq!(
            RepoError::RemoveCurrentBranch.to_string(),
            "Cannot remove the current branch."
        );
        assert_eq!(
            RepoError::FileNotInCommit("a".into()).to_string(),
            "File does not exist in that commit."
        );
    }
}
