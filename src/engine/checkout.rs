//! engine::checkout
//!
//! Operations that write commit contents into the working directory.
//!
//! # Deletion Policies
//!
//! The two operations that replace the working tree clear it differently,
//! and the difference is intentional:
//!
//! - **switch** deletes only the files tracked by the current branch's head
//!   tree. Untracked files survive.
//! - **reset** scans the working directory (skipping hidden entries) and
//!   deletes every file the target tree does not track.

use crate::core::types::BranchName;

use super::error::RepoError;
use super::outcome::{ResetOutcome, RestoreOutcome, SwitchOutcome};
use super::repository::Repository;

impl Repository {
    /// Write one file's version from a commit into the working directory.
    ///
    /// `commit` defaults to the current head and may be abbreviated. The
    /// staging area and refs are untouched.
    ///
    /// # Errors
    ///
    /// - `RepoError::NoCommitsYet` if no commit is given and the branch is empty
    /// - `RepoError::CommitNotFound` if the id matches no commit
    /// - `RepoError::FileNotInCommit` if the commit does not track `path`
    pub fn restore(&self, commit: Option<&str>, path: &str) -> Result<RestoreOutcome, RepoError> {
        let id = match commit {
            Some(prefix) => self.resolve_commit(prefix)?,
            None => self.head()?.1.ok_or(RepoError::NoCommitsYet)?,
        };

        let tree = self.tree_of(Some(&id))?;
        let blob = tree
            .get(path)
            .ok_or_else(|| RepoError::FileNotInCommit(path.to_string()))?;
        let bytes = self.objects().get_blob(blob)?;
        self.worktree().write(path, &bytes)?;
        self.debug(format_args!("restored {} from {}", path, id.short(7)));

        Ok(RestoreOutcome {
            path: path.to_string(),
            commit: id,
        })
    }

    /// Make another branch current and check out its head.
    ///
    /// Files tracked by the current head are deleted first; then the target
    /// head's files are written. A target without commits leaves the
    /// tracked files deleted and writes nothing.
    pub fn switch_branch(&self, name: &str) -> Result<SwitchOutcome, RepoError> {
        let target = BranchName::new(name)?;
        let target_head = self.branch_head(&target)?;

        let (current, current_head) = self.head()?;
        if current == target {
            return Ok(SwitchOutcome::AlreadyOn { branch: target });
        }

        let worktree = self.worktree();
        let current_tree = self.tree_of(current_head.as_ref())?;
        for path in current_tree.paths() {
            worktree.delete(path)?;
        }
        self.debug(format_args!(
            "deleted {} file(s) tracked on {}",
            current_tree.len(),
            current
        ));

        let target_tree = self.tree_of(target_head.as_ref())?;
        let written = worktree.checkout_tree(&target_tree, &self.objects())?;
        self.debug(format_args!("checked out {} file(s) from {}", written, target));

        self.refs().set_current_branch(&target)?;
        Ok(SwitchOutcome::Switched { branch: target })
    }

    /// Move the current branch to a commit and make the working directory
    /// match it.
    ///
    /// Every non-hidden working file the target does not track is deleted,
    /// the target's files are written, the branch ref moves, and the
    /// staging area is cleared.
    pub fn reset(&self, commit: &str) -> Result<ResetOutcome, RepoError> {
        let id = self.resolve_commit(commit)?;
        let tree = self.tree_of(Some(&id))?;
        let worktree = self.worktree();

        let mut removed = Vec::new();
        for path in worktree.files()? {
            if !tree.contains(&path) && worktree.delete(&path)? {
                removed.push(path);
            }
        }
        self.debug(format_args!("reset removed {} untracked file(s)", removed.len()));

        let written = worktree.checkout_tree(&tree, &self.objects())?;

        let branch = self.current_branch()?;
        self.refs().write_branch(&branch, Some(&id))?;
        self.debug(format_args!("moved {} to {}", branch, id.short(7)));
        self.staging().clear()?;

        Ok(ResetOutcome {
            commit: id,
            removed,
            written,
        })
    }
}
