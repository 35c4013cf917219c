//! core::paths
//!
//! Centralized path routing for repository storage locations.
//!
//! # Architecture
//!
//! A [`RepoPaths`] value is built once when a repository is opened and is
//! passed by reference to every component (object store, staging area,
//! refs, working tree). No component computes `.strata/...` paths on its
//! own, so several repositories can live side by side in one process.
//!
//! # Storage Layout
//!
//! All repository data is stored under `<work_dir>/.strata/`:
//! - `objects/` - Blobs and trees, one file per hash
//! - `commits/` - Commit objects, one file per hash
//! - `heads/` - One ref file per branch
//! - `HEAD` - Name of the current branch
//! - `index` - Staging index
//! - `removals` - Paths staged for removal
//! - `config.toml` - Repository configuration
//!
//! # Example
//!
//! ```
//! use strata::core::paths::RepoPaths;
//! use std::path::PathBuf;
//!
//! let paths = RepoPaths::new(PathBuf::from("/work"));
//! assert_eq!(paths.objects_dir(), PathBuf::from("/work/.strata/objects"));
//! assert_eq!(paths.head_path(), PathBuf::from("/work/.strata/HEAD"));
//! ```

use std::path::{Path, PathBuf};

use crate::core::types::{BranchName, ObjectId};

/// Name of the control directory inside the working directory.
pub const CONTROL_DIR_NAME: &str = ".strata";

/// Name of the ignore file read by status.
pub const IGNORE_FILE_NAME: &str = ".strataignore";

/// Centralized path routing for repository storage.
///
/// # Invariants
///
/// - `control_dir` is always `work_dir/.strata`
/// - No code outside this module joins control-directory file names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPaths {
    /// Root of the working directory.
    pub work_dir: PathBuf,

    /// The `.strata` control directory.
    pub control_dir: PathBuf,
}

impl RepoPaths {
    /// Create paths for a working directory.
    pub fn new(work_dir: PathBuf) -> Self {
        let control_dir = work_dir.join(CONTROL_DIR_NAME);
        Self {
            work_dir,
            control_dir,
        }
    }

    /// Find the enclosing repository by walking up from `start`.
    ///
    /// Returns `None` if no ancestor of `start` contains a control directory.
    pub fn discover(start: &Path) -> Option<Self> {
        start
            .ancestors()
            .find(|dir| dir.join(CONTROL_DIR_NAME).is_dir())
            .map(|dir| Self::new(dir.to_path_buf()))
    }

    /// Check whether the control directory exists.
    pub fn is_initialized(&self) -> bool {
        self.control_dir.is_dir()
    }

    // =========================================================================
    // Object storage
    // =========================================================================

    /// Directory holding blobs and trees.
    pub fn objects_dir(&self) -> PathBuf {
        self.control_dir.join("objects")
    }

    /// Path of a blob or tree object.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.objects_dir().join(id.as_str())
    }

    /// Directory holding commit objects.
    pub fn commits_dir(&self) -> PathBuf {
        self.control_dir.join("commits")
    }

    /// Path of a commit object.
    pub fn commit_path(&self, id: &ObjectId) -> PathBuf {
        self.commits_dir().join(id.as_str())
    }

    // =========================================================================
    // Refs
    // =========================================================================

    /// Directory holding branch refs.
    pub fn heads_dir(&self) -> PathBuf {
        self.control_dir.join("heads")
    }

    /// Path of a branch ref file.
    pub fn branch_path(&self, branch: &BranchName) -> PathBuf {
        self.heads_dir().join(branch.as_str())
    }

    /// Path of the current-branch pointer.
    pub fn head_path(&self) -> PathBuf {
        self.control_dir.join("HEAD")
    }

    // =========================================================================
    // Staging
    // =========================================================================

    /// Path of the staging index file.
    pub fn index_path(&self) -> PathBuf {
        self.control_dir.join("index")
    }

    /// Path of the removal set file.
    pub fn removals_path(&self) -> PathBuf {
        self.control_dir.join("removals")
    }

    // =========================================================================
    // Configuration and working tree
    // =========================================================================

    /// Path of the repository configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.control_dir.join("config.toml")
    }

    /// Path of the ignore file in the working directory.
    pub fn ignore_path(&self) -> PathBuf {
        self.work_dir.join(IGNORE_FILE_NAME)
    }

    /// Absolute location of a repository-relative file path.
    pub fn work_file(&self, rel: &str) -> PathBuf {
        self.work_dir.join(rel)
    }

    /// Ensure the control directory structure exists.
    ///
    /// # Errors
    ///
    /// Returns an IO error if directory creation fails.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.objects_dir())?;
        std::fs::create_dir_all(self.commits_dir())?;
        std::fs::create_dir_all(self.heads_dir())?;
        Ok(())
    }
}
