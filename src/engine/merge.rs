//! engine::merge
//!
//! Merging another branch into the current one.
//!
//! # Decision Order
//!
//! 1. Refuse unknown branches and self-merges
//! 2. Equal heads: already up to date
//! 3. Current head is an ancestor of the other head: fast-forward
//! 4. Other head is an ancestor of the current head: already up to date
//! 5. Otherwise: three-way merge against the merge base
//!
//! Steps 3 and 4 accept either the merge base matching a head or direct
//! reachability, since the merge base is picked by smallest id and can
//! skip past a head that is itself a common ancestor.
//!
//! # Conflicts
//!
//! Every conflicting path gets a marker file. No commit is created and
//! the staging area is left alone, so the user resolves, adds, and
//! commits normally.

use crate::core::merge::{self, Resolution};
use crate::core::types::{BranchName, ObjectId};

use super::error::RepoError;
use super::outcome::MergeOutcome;
use super::repository::Repository;

impl Repository {
    /// Merge `name` into the current branch.
    pub fn merge(&self, name: &str) -> Result<MergeOutcome, RepoError> {
        let other = BranchName::new(name)?;
        let other_head = self.branch_head(&other)?;

        let (current, current_head) = self.head()?;
        if current == other {
            return Err(RepoError::MergeWithSelf);
        }
        if current_head == other_head {
            return Ok(MergeOutcome::AlreadyUpToDate);
        }

        let base = self
            .graph()
            .merge_base(current_head.as_ref(), other_head.as_ref())?;
        self.debug(format_args!(
            "merge base of {} and {}: {}",
            current,
            other,
            base.as_ref().map(|id| id.as_str()).unwrap_or("(none)")
        ));

        if base == current_head || self.reaches(other_head.as_ref(), current_head.as_ref())? {
            return self.fast_forward(current, other, other_head);
        }
        if base == other_head || self.reaches(current_head.as_ref(), other_head.as_ref())? {
            return Ok(MergeOutcome::AlreadyUpToDate);
        }

        self.three_way_merge(current, current_head, other, other_head, base)
    }

    /// Whether `ancestor` is reachable from `from`.
    fn reaches(
        &self,
        from: Option<&ObjectId>,
        ancestor: Option<&ObjectId>,
    ) -> Result<bool, RepoError> {
        match (from, ancestor) {
            (Some(from), Some(ancestor)) => Ok(self.graph().is_ancestor(ancestor, from)?),
            _ => Ok(false),
        }
    }

    fn fast_forward(
        &self,
        current: BranchName,
        other: BranchName,
        other_head: Option<ObjectId>,
    ) -> Result<MergeOutcome, RepoError> {
        // Equal heads were handled already, so the other side has a commit
        let head = other_head.ok_or_else(|| RepoError::BranchNotFound(other.clone()))?;

        self.refs().write_branch(&current, Some(&head))?;
        self.debug(format_args!("fast-forwarded {} to {}", current, head.short(7)));

        let tree = self.tree_of(Some(&head))?;
        let written = self.worktree().checkout_tree(&tree, &self.objects())?;
        self.debug(format_args!("checked out {} file(s)", written));

        Ok(MergeOutcome::FastForward {
            branch: other,
            into: current,
            head,
        })
    }

    fn three_way_merge(
        &self,
        current: BranchName,
        current_head: Option<ObjectId>,
        other: BranchName,
        other_head: Option<ObjectId>,
        base: Option<ObjectId>,
    ) -> Result<MergeOutcome, RepoError> {
        let current_tree = self.tree_of(current_head.as_ref())?;
        let other_tree = self.tree_of(other_head.as_ref())?;
        let base_tree = self.tree_of(base.as_ref())?;
        self.debug(format_args!(
            "three-way merge: {} current, {} other, {} base file(s)",
            current_tree.len(),
            other_tree.len(),
            base_tree.len()
        ));

        let plan = merge::three_way(&current_tree, &other_tree, &base_tree);
        for file in &plan.files {
            let decision = match file.resolution {
                Resolution::Current => "keep current",
                Resolution::Other => "take other",
                Resolution::Conflict => "conflict",
            };
            self.debug(format_args!("  {}: {}", file.path, decision));
        }

        if plan.has_conflicts() {
            let objects = self.objects();
            let worktree = self.worktree();
            let mut paths = Vec::new();
            for file in plan.conflicts() {
                let ours = match &file.current {
                    Some(id) => objects.get_blob(id)?,
                    None => Vec::new(),
                };
                let theirs = match &file.other {
                    Some(id) => objects.get_blob(id)?,
                    None => Vec::new(),
                };
                worktree.write(&file.path, &merge::conflict_markers(&file.path, &ours, &theirs))?;
                paths.push(file.path.clone());
            }
            return Ok(MergeOutcome::Conflicted { paths });
        }

        let merged = plan.merged_tree();
        let taken = plan.files.iter().filter(|f| f.changes_current()).count();
        self.debug(format_args!("{} path(s) changed by {}", taken, other));
        let parents = current_head.into_iter().chain(other_head).collect();
        let message = format!("Merge branch '{}'", other);
        let id = self.record_commit(&current, &merged, parents, message)?;

        let written = self.worktree().checkout_tree(&merged, &self.objects())?;
        self.debug(format_args!("checked out {} merged file(s)", written));

        Ok(MergeOutcome::Merged {
            branch: other,
            into: current,
            id,
        })
    }
}
