//! engine::status
//!
//! Read-only summary of branches, staging, and working-directory changes.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::core::ignore::IgnoreRules;
use crate::core::types::{BranchName, ObjectId};

use super::error::RepoError;
use super::repository::Repository;

/// How a tracked file differs from the head commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileChange {
    Modified,
    Deleted,
}

impl FileChange {
    pub fn label(self) -> &'static str {
        match self {
            FileChange::Modified => "modified",
            FileChange::Deleted => "deleted",
        }
    }
}

/// Everything `status` reports. Every list is sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub branches: Vec<BranchName>,
    pub current: BranchName,
    pub staged: Vec<String>,
    pub removed: Vec<String>,
    /// Head-tracked files that are neither staged nor pending removal.
    pub modified: Vec<(String, FileChange)>,
    /// Working files unknown to the head commit and the staging area.
    pub untracked: Vec<String>,
}

impl Repository {
    /// Compose the status report without touching anything on disk.
    pub fn status(&self) -> Result<StatusReport, RepoError> {
        let branches = self.list_branches()?;
        let (current, head) = self.head()?;
        let (index, removals) = self.staging().snapshot()?;
        let head_tree = self.tree_of(head.as_ref())?;
        let worktree = self.worktree();

        let mut modified = Vec::new();
        for (path, blob) in head_tree.iter() {
            if index.contains(path) || removals.contains(path) {
                continue;
            }
            if !worktree.exists(path) {
                modified.push((path.clone(), FileChange::Deleted));
            } else if ObjectId::hash_bytes(&worktree.read(path)?) != *blob {
                modified.push((path.clone(), FileChange::Modified));
            }
        }

        let ignore_path = self.paths().ignore_path();
        let rules = IgnoreRules::load(&ignore_path).map_err(|e| RepoError::io(&ignore_path, e))?;
        let untracked: BTreeSet<String> = worktree
            .files()?
            .into_iter()
            .filter(|path| {
                !head_tree.contains(path) && !index.contains(path) && !rules.is_ignored(path)
            })
            .collect();
        self.debug(format_args!(
            "status: {} modified, {} untracked, ignore rules loaded: {}",
            modified.len(),
            untracked.len(),
            !rules.is_empty()
        ));

        Ok(StatusReport {
            branches,
            current,
            staged: index.iter().map(|(path, _)| path.clone()).collect(),
            removed: removals.iter().cloned().collect(),
            modified,
            untracked: untracked.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::ui::output::Verbosity;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let repo =
            Repository::init_with_config(dir.path(), Config::default(), Verbosity::Quiet).unwrap();
        (dir, repo)
    }

    fn write(dir: &TempDir, path: &str, content: &str) {
        std::fs::write(dir.path().join(path), content).unwrap();
    }

    #[test]
    fn fresh_repository_is_clean() {
        let (_dir, repo) = setup();
        let report = repo.status().unwrap();
        assert_eq!(report.current.as_str(), "main");
        assert_eq!(report.branches.len(), 1);
        assert!(report.staged.is_empty());
        assert!(report.modified.is_empty());
        assert!(report.untracked.is_empty());
    }

    #[test]
    fn reports_each_category() {
        let (dir, repo) = setup();
        write(&dir, "kept.txt", "k");
        write(&dir, "edited.txt", "v1");
        write(&dir, "gone.txt", "g");
        write(&dir, "dropped.txt", "d");
        for path in ["kept.txt", "edited.txt", "gone.txt", "dropped.txt"] {
            repo.add(path).unwrap();
        }
        repo.commit("root").unwrap();

        write(&dir, "edited.txt", "v2");
        std::fs::remove_file(dir.path().join("gone.txt")).unwrap();
        repo.remove("dropped.txt").unwrap();
        write(&dir, "new.txt", "n");
        write(&dir, "staged.txt", "s");
        repo.add("staged.txt").unwrap();

        let report = repo.status().unwrap();
        assert_eq!(report.staged, vec!["staged.txt"]);
        assert_eq!(report.removed, vec!["dropped.txt"]);
        assert_eq!(
            report.modified,
            vec![
                ("edited.txt".to_string(), FileChange::Modified),
                ("gone.txt".to_string(), FileChange::Deleted),
            ]
        );
        assert_eq!(report.untracked, vec!["new.txt"]);
    }

    #[test]
    fn ignored_and_hidden_files_not_untracked() {
        let (dir, repo) = setup();
        write(&dir, ".strataignore", "*.log\nbuild\n");
        write(&dir, "debug.log", "x");
        write(&dir, "build.out", "x");
        write(&dir, "notes.md", "x");

        let report = repo.status().unwrap();
        assert_eq!(report.untracked, vec!["notes.md"]);
    }
}
