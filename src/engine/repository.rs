//! engine::repository
//!
//! The repository context value and its staging and branch operations.
//!
//! # Architecture
//!
//! A [`Repository`] owns the [`RepoPaths`], the loaded [`Config`], and the
//! output verbosity. Every storage component is created on demand by
//! borrowing the paths, so nothing in the process is global and several
//! repositories can be driven side by side.
//!
//! Operations are split across sibling modules by concern:
//! - this module: init, open, add, commit, remove, branches
//! - `history`: log, global log, find
//! - `checkout`: restore, switch, reset
//! - `merge`: merge
//! - `status`: status
//!
//! # Write Order
//!
//! Every history-changing operation persists objects first, moves the
//! branch ref second, and clears staging last. The ref update is the
//! commit point: a crash before it leaves only unreachable objects.

use std::path::{Component, Path, PathBuf};

use crate::core::config::{Config, TreeMode};
use crate::core::graph::CommitGraph;
use crate::core::index::StagingArea;
use crate::core::object::{Commit, ObjectError, ObjectStore, Signature, Tree};
use crate::core::paths::RepoPaths;
use crate::core::refs::{RefError, RefStore};
use crate::core::types::{BranchName, ObjectId};
use crate::core::worktree::WorkTree;
use crate::ui::output::{self, Verbosity};

use super::error::RepoError;
use super::outcome::{CommitOutcome, RemoveOutcome};

/// An opened repository.
#[derive(Debug)]
pub struct Repository {
    paths: RepoPaths,
    config: Config,
    verbosity: Verbosity,
}

impl Repository {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a new repository in `work_dir`, using global configuration.
    pub fn init(work_dir: &Path, verbosity: Verbosity) -> Result<Self, RepoError> {
        let loaded = Config::load(None)?;
        for warning in &loaded.warnings {
            output::warn(&warning.message, verbosity);
        }
        Self::init_with_config(work_dir, loaded.config, verbosity)
    }

    /// Create a new repository in `work_dir` with explicit configuration.
    ///
    /// Creates the control directory, an empty initial branch (named by
    /// `init.default_branch`, default `main`), and empty staging files.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::AlreadyInitialized` if `work_dir` already holds
    /// a control directory.
    pub fn init_with_config(
        work_dir: &Path,
        config: Config,
        verbosity: Verbosity,
    ) -> Result<Self, RepoError> {
        let paths = RepoPaths::new(work_dir.to_path_buf());
        if paths.is_initialized() {
            return Err(RepoError::AlreadyInitialized);
        }

        let branch = BranchName::new(config.default_branch())?;
        paths
            .ensure_dirs()
            .map_err(|e| RepoError::io(&paths.control_dir, e))?;

        let repo = Self {
            paths,
            config,
            verbosity,
        };
        repo.refs().write_branch(&branch, None)?;
        repo.refs().set_current_branch(&branch)?;
        repo.staging().clear()?;

        repo.debug(format_args!(
            "initialized {} on branch {}",
            repo.paths.control_dir.display(),
            branch
        ));
        Ok(repo)
    }

    /// Open the repository enclosing `start`, loading its configuration.
    pub fn open(start: &Path, verbosity: Verbosity) -> Result<Self, RepoError> {
        let paths = RepoPaths::discover(start).ok_or(RepoError::NotInitialized)?;
        let loaded = Config::load(Some(&paths))?;
        for warning in &loaded.warnings {
            output::warn(&warning.message, verbosity);
        }
        Ok(Self {
            paths,
            config: loaded.config,
            verbosity,
        })
    }

    /// Open the repository enclosing `start` with explicit configuration.
    pub fn open_with_config(
        start: &Path,
        config: Config,
        verbosity: Verbosity,
    ) -> Result<Self, RepoError> {
        let paths = RepoPaths::discover(start).ok_or(RepoError::NotInitialized)?;
        Ok(Self {
            paths,
            config,
            verbosity,
        })
    }

    pub fn paths(&self) -> &RepoPaths {
        &self.paths
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    // =========================================================================
    // Component access
    // =========================================================================

    pub(crate) fn objects(&self) -> ObjectStore<'_> {
        ObjectStore::new(&self.paths)
    }

    pub(crate) fn staging(&self) -> StagingArea<'_> {
        StagingArea::new(&self.paths)
    }

    pub(crate) fn refs(&self) -> RefStore<'_> {
        RefStore::new(&self.paths)
    }

    pub(crate) fn graph(&self) -> CommitGraph<'_> {
        CommitGraph::new(&self.paths)
    }

    pub(crate) fn worktree(&self) -> WorkTree<'_> {
        WorkTree::new(&self.paths)
    }

    pub(crate) fn debug(&self, message: impl std::fmt::Display) {
        output::debug(message, self.verbosity);
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    /// The current branch and its head commit.
    pub fn head(&self) -> Result<(BranchName, Option<ObjectId>), RepoError> {
        let refs = self.refs();
        let branch = refs.current_branch()?;
        let head = refs.read_branch(&branch)?;
        Ok((branch, head))
    }

    pub fn current_branch(&self) -> Result<BranchName, RepoError> {
        Ok(self.refs().current_branch()?)
    }

    /// The tree of a commit, or an empty tree for `None`.
    pub(crate) fn tree_of(&self, commit: Option<&ObjectId>) -> Result<Tree, RepoError> {
        match commit {
            Some(id) => Ok(self.objects().commit_tree(id)?),
            None => Ok(Tree::new()),
        }
    }

    /// Read a branch head, mapping a missing ref to `BranchNotFound`.
    pub(crate) fn branch_head(&self, branch: &BranchName) -> Result<Option<ObjectId>, RepoError> {
        match self.refs().read_branch(branch) {
            Err(RefError::BranchNotFound(name)) => Err(RepoError::BranchNotFound(name)),
            other => Ok(other?),
        }
    }

    /// Resolve a full or abbreviated commit id.
    pub fn resolve_commit(&self, prefix: &str) -> Result<ObjectId, RepoError> {
        match self.objects().resolve_commit(prefix) {
            Ok(id) => Ok(id),
            Err(ObjectError::NotFound { id, .. }) => Err(RepoError::CommitNotFound(id)),
            Err(ObjectError::AmbiguousPrefix { prefix, count }) => {
                Err(RepoError::AmbiguousCommitId { prefix, count })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist a tree and commit, move the current branch, clear staging.
    pub(crate) fn record_commit(
        &self,
        branch: &BranchName,
        tree: &Tree,
        parents: Vec<ObjectId>,
        message: String,
    ) -> Result<ObjectId, RepoError> {
        let objects = self.objects();
        let tree_id = objects.put_tree(tree)?;
        self.debug(format_args!("wrote tree {} ({} entries)", tree_id, tree.len()));

        let author = Signature::now(self.config.user_name());
        let commit = Commit {
            tree: tree_id,
            parents,
            committer: author.clone(),
            author,
            message,
        };
        let id = objects.put_commit(&commit)?;
        self.debug(format_args!("wrote commit {}", id));

        self.refs().write_branch(branch, Some(&id))?;
        self.debug(format_args!("moved {} to {}", branch, id.short(7)));

        self.staging().clear()?;
        self.debug("cleared staging area");
        Ok(id)
    }

    /// Convert a user-supplied path into a repository-relative one.
    ///
    /// Relative paths are taken from `cwd`. `.` and `..` components are
    /// resolved lexically; symlinks are not followed.
    pub fn repo_path(&self, cwd: &Path, arg: &str) -> Result<String, RepoError> {
        let joined = cwd.join(arg);
        let mut normalized = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other.as_os_str()),
            }
        }

        let rel = normalized
            .strip_prefix(&self.paths.work_dir)
            .map_err(|_| RepoError::OutsideRepository(normalized.clone()))?;
        let parts: Vec<_> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.is_empty() {
            return Err(RepoError::OutsideRepository(normalized));
        }
        Ok(parts.join("/"))
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Stage a working file.
    ///
    /// Stores the file's bytes as a blob and records it in the staging
    /// index. A path pending removal is no longer pending.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::FileNotFound` if the working file does not exist.
    pub fn add(&self, path: &str) -> Result<ObjectId, RepoError> {
        let worktree = self.worktree();
        if !worktree.exists(path) {
            return Err(RepoError::FileNotFound(path.to_string()));
        }
        let bytes = worktree.read(path)?;
        let blob = self.objects().put_blob(&bytes)?;
        self.staging().stage(path, blob.clone())?;
        self.debug(format_args!("staged {} as {}", path, blob.short(7)));
        Ok(blob)
    }

    /// Record staged changes as a new commit on the current branch.
    ///
    /// With the default `staged` tree mode the new tree holds exactly the
    /// staged entries. With `overlay` it is the parent's tree with staged
    /// entries applied and pending removals dropped.
    pub fn commit(&self, message: &str) -> Result<CommitOutcome, RepoError> {
        if message.trim().is_empty() {
            return Err(RepoError::EmptyMessage);
        }

        let (index, removals) = self.staging().snapshot()?;
        if index.is_empty() && removals.is_empty() {
            return Ok(CommitOutcome::NothingToCommit);
        }

        let (branch, head) = self.head()?;
        let tree = match self.config.tree_mode() {
            TreeMode::Staged => index.to_tree(),
            TreeMode::Overlay => {
                let mut tree = self.tree_of(head.as_ref())?;
                for (path, blob) in index.iter() {
                    tree.insert(path.clone(), blob.clone());
                }
                for path in removals.iter() {
                    tree.remove(path);
                }
                tree
            }
        };
        self.debug(format_args!(
            "committing {} staged, {} removed ({} mode)",
            index.len(),
            removals.len(),
            self.config.tree_mode()
        ));

        let files = tree.len();
        let id = self.record_commit(&branch, &tree, head.into_iter().collect(), message.to_string())?;
        Ok(CommitOutcome::Created {
            id,
            branch,
            message: message.to_string(),
            files,
        })
    }

    /// Unstage a file, or stage a tracked file for removal.
    ///
    /// A staged path is simply unstaged. Otherwise, a path tracked by the
    /// head commit is added to the removal set and deleted from the
    /// working directory.
    pub fn remove(&self, path: &str) -> Result<RemoveOutcome, RepoError> {
        let staging = self.staging();
        if staging.unstage(path)? {
            self.debug(format_args!("unstaged {}", path));
            return Ok(RemoveOutcome::Unstaged {
                path: path.to_string(),
            });
        }

        let (_, head) = self.head()?;
        let head_tree = self.tree_of(head.as_ref())?;
        if staging.stage_removal(path, &head_tree)? {
            let deleted = self.worktree().delete(path)?;
            self.debug(format_args!(
                "staged {} for removal (working file deleted: {})",
                path, deleted
            ));
            return Ok(RemoveOutcome::StagedForRemoval {
                path: path.to_string(),
            });
        }

        Ok(RemoveOutcome::NothingToRemove)
    }

    /// Create a branch at the current head.
    ///
    /// # Errors
    ///
    /// - `RepoError::BranchExists` if the name is taken
    /// - `RepoError::NoInitialCommit` if the current branch has no commits
    pub fn branch(&self, name: &str) -> Result<ObjectId, RepoError> {
        let branch = BranchName::new(name)?;
        let refs = self.refs();
        if refs.branch_exists(&branch) {
            return Err(RepoError::BranchExists(branch));
        }
        let (_, head) = self.head()?;
        let head = head.ok_or(RepoError::NoInitialCommit)?;
        refs.write_branch(&branch, Some(&head))?;
        self.debug(format_args!("created branch {} at {}", branch, head.short(7)));
        Ok(head)
    }

    /// Delete a branch ref. Commits are never deleted.
    ///
    /// # Errors
    ///
    /// - `RepoError::BranchNotFound` if the branch does not exist
    /// - `RepoError::RemoveCurrentBranch` if it is the current branch
    pub fn remove_branch(&self, name: &str) -> Result<(), RepoError> {
        let branch = BranchName::new(name)?;
        let refs = self.refs();
        if !refs.branch_exists(&branch) {
            return Err(RepoError::BranchNotFound(branch));
        }
        if refs.current_branch()? == branch {
            return Err(RepoError::RemoveCurrentBranch);
        }
        refs.delete_branch(&branch)?;
        self.debug(format_args!("deleted branch {}", branch));
        Ok(())
    }

    /// All branch names, sorted.
    pub fn list_branches(&self) -> Result<Vec<BranchName>, RepoError> {
        Ok(self.refs().list_branches()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let repo =
            Repository::init_with_config(dir.path(), Config::default(), Verbosity::Quiet).unwrap();
        (dir, repo)
    }

    fn write(dir: &TempDir, path: &str, content: &str) {
        let full = dir.path().join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, content).unwrap();
    }

    #[test]
    fn init_creates_layout() {
        let (dir, repo) = repo();
        let paths = repo.paths();
        assert!(paths.objects_dir().is_dir());
        assert!(paths.commits_dir().is_dir());
        assert_eq!(std::fs::read_to_string(paths.head_path()).unwrap(), "main");
        assert_eq!(std::fs::read_to_string(paths.index_path()).unwrap(), "{}");
        assert_eq!(std::fs::read_to_string(paths.removals_path()).unwrap(), "[]");
        assert_eq!(repo.head().unwrap().1, None);
        drop(dir);
    }

    #[test]
    fn init_twice_fails() {
        let (dir, _repo) = repo();
        let err =
            Repository::init_with_config(dir.path(), Config::default(), Verbosity::Quiet).unwrap_err();
        assert!(matches!(err, RepoError::AlreadyInitialized));
    }

    #[test]
    fn open_outside_repo_fails() {
        let dir = TempDir::new().unwrap();
        if RepoPaths::discover(dir.path()).is_none() {
            assert!(matches!(
                Repository::open_with_config(dir.path(), Config::default(), Verbosity::Quiet),
                Err(RepoError::NotInitialized)
            ));
        }
    }

    #[test]
    fn add_missing_file_fails() {
        let (_dir, repo) = repo();
        assert!(matches!(
            repo.add("ghost.txt"),
            Err(RepoError::FileNotFound(_))
        ));
    }

    #[test]
    fn commit_without_changes_is_noop() {
        let (_dir, repo) = repo();
        assert_eq!(repo.commit("msg").unwrap(), CommitOutcome::NothingToCommit);
        assert_eq!(repo.head().unwrap().1, None);
    }

    #[test]
    fn empty_message_rejected() {
        let (dir, repo) = repo();
        write(&dir, "a.txt", "a");
        repo.add("a.txt").unwrap();
        assert!(matches!(repo.commit("   "), Err(RepoError::EmptyMessage)));
    }

    #[test]
    fn commit_moves_branch_and_clears_staging() {
        let (dir, repo) = repo();
        write(&dir, "a.txt", "a");
        repo.add("a.txt").unwrap();

        let CommitOutcome::Created { id, .. } = repo.commit("first").unwrap() else {
            panic!("expected a commit");
        };
        assert_eq!(repo.head().unwrap().1, Some(id));
        let (index, removals) = repo.staging().snapshot().unwrap();
        assert!(index.is_empty() && removals.is_empty());
    }

    #[test]
    fn remove_unstages_first() {
        let (dir, repo) = repo();
        write(&dir, "a.txt", "a");
        repo.add("a.txt").unwrap();
        assert!(matches!(
            repo.remove("a.txt").unwrap(),
            RemoveOutcome::Unstaged { .. }
        ));
        assert!(dir.path().join("a.txt").exists());
    }

    #[test]
    fn remove_tracked_file_deletes_it() {
        let (dir, repo) = repo();
        write(&dir, "a.txt", "a");
        repo.add("a.txt").unwrap();
        repo.commit("first").unwrap();

        assert!(matches!(
            repo.remove("a.txt").unwrap(),
            RemoveOutcome::StagedForRemoval { .. }
        ));
        assert!(!dir.path().join("a.txt").exists());
        assert!(repo.staging().removals().unwrap().contains("a.txt"));
    }

    #[test]
    fn remove_untracked_is_noop() {
        let (dir, repo) = repo();
        write(&dir, "a.txt", "a");
        assert_eq!(repo.remove("a.txt").unwrap(), RemoveOutcome::NothingToRemove);
        assert!(dir.path().join("a.txt").exists());
    }

    #[test]
    fn branch_requires_initial_commit() {
        let (_dir, repo) = repo();
        assert!(matches!(repo.branch("feat"), Err(RepoError::NoInitialCommit)));
    }

    #[test]
    fn branch_lifecycle() {
        let (dir, repo) = repo();
        write(&dir, "a.txt", "a");
        repo.add("a.txt").unwrap();
        repo.commit("first").unwrap();

        repo.branch("feat").unwrap();
        assert!(matches!(repo.branch("feat"), Err(RepoError::BranchExists(_))));
        assert_eq!(repo.list_branches().unwrap().len(), 2);

        assert!(matches!(
            repo.remove_branch("main"),
            Err(RepoError::RemoveCurrentBranch)
        ));
        repo.remove_branch("feat").unwrap();
        assert!(matches!(
            repo.remove_branch("feat"),
            Err(RepoError::BranchNotFound(_))
        ));
    }

    #[test]
    fn repo_path_normalizes() {
        let (dir, repo) = repo();
        let root = repo.paths().work_dir.clone();
        assert_eq!(repo.repo_path(&root.join("sub"), "../a.txt").unwrap(), "a.txt");
        assert_eq!(repo.repo_path(&root, "./dir/b.txt").unwrap(), "dir/b.txt");
        assert!(matches!(
            repo.repo_path(&root, "../outside.txt"),
            Err(RepoError::OutsideRepository(_))
        ));
        drop(dir);
    }
}
