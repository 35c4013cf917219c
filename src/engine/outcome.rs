//! engine::outcome
//!
//! Typed results of repository operations.
//!
//! Informational no-ops ("nothing to commit", "already up to date") and
//! merge conflicts are outcomes, not errors: the operation ran to
//! completion and the repository is in a well-defined state. Each outcome
//! renders its user-facing message through `Display`.

use std::fmt;

use serde::Serialize;

use crate::core::types::{BranchName, ObjectId};

/// Abbreviation length used in human-readable messages.
pub const SHORT_ID_LEN: usize = 7;

/// Result of `commit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommitOutcome {
    Created {
        id: ObjectId,
        branch: BranchName,
        message: String,
        files: usize,
    },
    NothingToCommit,
}

impl fmt::Display for CommitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitOutcome::Created {
                id,
                branch,
                message,
                files,
            } => {
                let subject = message.lines().next().unwrap_or("");
                write!(
                    f,
                    "[{} {}] {} ({} file{})",
                    branch,
                    id.short(SHORT_ID_LEN),
                    subject,
                    files,
                    if *files == 1 { "" } else { "s" }
                )
            }
            CommitOutcome::NothingToCommit => write!(f, "Nothing to commit, working tree clean"),
        }
    }
}

/// Result of `remove`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemoveOutcome {
    /// The path was staged and is now unstaged.
    Unstaged { path: String },
    /// The tracked path is staged for removal and deleted from disk.
    StagedForRemoval { path: String },
    NothingToRemove,
}

impl fmt::Display for RemoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoveOutcome::Unstaged { path } => write!(f, "Unstaged {}", path),
            RemoveOutcome::StagedForRemoval { path } => write!(f, "Removed {}", path),
            RemoveOutcome::NothingToRemove => write!(f, "No reason to remove the file."),
        }
    }
}

/// Result of `switch_branch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SwitchOutcome {
    Switched { branch: BranchName },
    AlreadyOn { branch: BranchName },
}

impl fmt::Display for SwitchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchOutcome::Switched { branch } => write!(f, "Switched to branch '{}'", branch),
            SwitchOutcome::AlreadyOn { branch } => write!(f, "Already on '{}'", branch),
        }
    }
}

/// Result of `restore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreOutcome {
    pub path: String,
    pub commit: ObjectId,
}

impl fmt::Display for RestoreOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Restored {} from commit {}", self.path, self.commit)
    }
}

/// Result of `reset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetOutcome {
    pub commit: ObjectId,
    /// Working files deleted because the target does not track them.
    pub removed: Vec<String>,
    /// Number of files written from the target tree.
    pub written: usize,
}

impl fmt::Display for ResetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reset to commit {}", self.commit)
    }
}

/// Result of `merge`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MergeOutcome {
    /// Current already contains the other branch's history.
    AlreadyUpToDate,
    /// The current branch ref moved forward to the other head.
    FastForward {
        branch: BranchName,
        into: BranchName,
        head: ObjectId,
    },
    /// A two-parent merge commit was created.
    Merged {
        branch: BranchName,
        into: BranchName,
        id: ObjectId,
    },
    /// Conflict markers were written; no commit was created.
    Conflicted { paths: Vec<String> },
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeOutcome::AlreadyUpToDate => write!(f, "Already up to date."),
            MergeOutcome::FastForward { branch, into, .. } => write!(
                f,
                "Fast-forward merge completed. Merged branch '{}' into '{}'.",
                branch, into
            ),
            MergeOutcome::Merged { branch, into, id } => write!(
                f,
                "Merged branch '{}' into '{}' as {}.",
                branch,
                into,
                id.short(SHORT_ID_LEN)
            ),
            MergeOutcome::Conflicted { paths } => {
                for path in paths {
                    writeln!(f, "CONFLICT (content): Merge conflict in {}", path)?;
                }
                write!(
                    f,
                    "Automatic merge failed; fix conflicts and then commit the result."
                )
            }
        }
    }
}

impl MergeOutcome {
    pub fn is_conflicted(&self) -> bool {
        matches!(self, MergeOutcome::Conflicted { .. })
    }
}
