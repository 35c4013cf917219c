//! core::graph
//!
//! Commit history traversal.
//!
//! # Architecture
//!
//! The history is a DAG where:
//! - Nodes are commits
//! - Edges point from child to parent (stored in the commit's parent lines)
//! - Roots are commits with no parents
//!
//! Nothing is cached; every query walks the stored commit objects.
//!
//! # Merge base
//!
//! [`CommitGraph::merge_base`] intersects the two ancestor sets and returns
//! the common ancestor with the smallest id. This is *a* common ancestor,
//! not necessarily the nearest one.

use std::collections::{BTreeSet, VecDeque};

use serde::Serialize;

use crate::core::object::{Commit, ObjectError, ObjectStore};
use crate::core::paths::RepoPaths;
use crate::core::types::ObjectId;

/// One commit in a history listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub id: ObjectId,
    pub commit: Commit,
}

/// Read-only view over the stored commit graph.
pub struct CommitGraph<'a> {
    store: ObjectStore<'a>,
}

impl<'a> CommitGraph<'a> {
    pub fn new(paths: &'a RepoPaths) -> Self {
        Self {
            store: ObjectStore::new(paths),
        }
    }

    /// Every commit reachable from `start` through any parent link,
    /// including `start` itself.
    ///
    /// Uses breadth-first traversal. `None` yields an empty set.
    ///
    /// # Errors
    ///
    /// Fails with `ObjectError::NotFound` or `ObjectError::Corrupt` on the
    /// first commit that cannot be read.
    pub fn ancestors(&self, start: Option<&ObjectId>) -> Result<BTreeSet<ObjectId>, ObjectError> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::new();
        queue.extend(start.cloned());

        while let Some(current) = queue.pop_front() {
            if seen.contains(&current) {
                continue;
            }
            let commit = self.store.get_commit(&current)?;
            for parent in commit.parents {
                if !seen.contains(&parent) {
                    queue.push_back(parent);
                }
            }
            seen.insert(current);
        }
        Ok(seen)
    }

    /// A common ancestor of `a` and `b`, or `None` if they share no history.
    ///
    /// Ties are broken by ascending id, not by distance. A commit is
    /// always its own merge base.
    pub fn merge_base(
        &self,
        a: Option<&ObjectId>,
        b: Option<&ObjectId>,
    ) -> Result<Option<ObjectId>, ObjectError> {
        if let (Some(a), Some(b)) = (a, b) {
            if a == b && self.store.has_commit(a) {
                return Ok(Some(a.clone()));
            }
        }
        let left = self.ancestors(a)?;
        if left.is_empty() {
            return Ok(None);
        }
        let right = self.ancestors(b)?;
        Ok(left.into_iter().find(|id| right.contains(id)))
    }

    /// Check whether `ancestor` is reachable from `descendant`.
    pub fn is_ancestor(
        &self,
        ancestor: &ObjectId,
        descendant: &ObjectId,
    ) -> Result<bool, ObjectError> {
        Ok(self.ancestors(Some(descendant))?.contains(ancestor))
    }

    /// Walk first parents from `head` back to a root.
    ///
    /// Merge commits are followed through their first parent only, so the
    /// result is a single line of history, newest first.
    pub fn first_parent_log(&self, head: Option<&ObjectId>) -> Result<Vec<LogEntry>, ObjectError> {
        let mut entries = Vec::new();
        let mut next = head.cloned();

        while let Some(id) = next {
            let commit = self.store.get_commit(&id)?;
            next = commit.first_parent().cloned();
            entries.push(LogEntry { id, commit });
        }
        Ok(entries)
    }

    /// Every stored commit, sorted by id.
    pub fn all_commits(&self) -> Result<Vec<LogEntry>, ObjectError> {
        self.store
            .list_commits()?
            .into_iter()
            .map(|id| {
                let commit = self.store.get_commit(&id)?;
                Ok(LogEntry { id, commit })
            })
            .collect()
    }
}
