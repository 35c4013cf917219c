//! engine
//!
//! Repository operations over the core storage layer.
//!
//! # Architecture
//!
//! [`Repository`] is the context value every operation runs against. It
//! is created by [`Repository::init`] or [`Repository::open`] and carries
//! the repository paths, loaded configuration, and output verbosity.
//! Operations are methods on it, grouped into modules by concern, and each
//! returns a typed outcome from [`outcome`].
//!
//! # Invariants
//!
//! - Objects are written before the ref that makes them reachable
//! - A branch ref only ever names a stored commit
//! - Informational no-ops and merge conflicts are outcomes, never errors
//! - Only `RepoError` values with `is_fatal()` indicate damaged storage
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use strata::engine::Repository;
//! use strata::ui::output::Verbosity;
//!
//! let repo = Repository::open(Path::new("."), Verbosity::Normal)?;
//! repo.add("README.md")?;
//! let outcome = repo.commit("Update readme")?;
//! println!("{}", outcome);
//! # Ok::<(), strata::engine::RepoError>(())
//! ```

pub mod checkout;
pub mod error;
pub mod history;
pub mod merge;
pub mod outcome;
pub mod repository;
pub mod status;

pub use error::RepoError;
pub use outcome::{
    CommitOutcome, MergeOutcome, RemoveOutcome, ResetOutcome, RestoreOutcome, SwitchOutcome,
};
pub use repository::Repository;
pub use status::{FileChange, StatusReport};

use std::path::PathBuf;

use crate::ui::output::Verbosity;

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags that affect command behavior.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

impl Context {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// The absolute directory commands run in: the override, else the
    /// process cwd. A relative override is taken from the process cwd.
    pub fn cwd(&self) -> std::io::Result<PathBuf> {
        match &self.cwd {
            Some(dir) if dir.is_absolute() => Ok(dir.clone()),
            Some(dir) => Ok(std::env::current_dir()?.join(dir)),
            None => std::env::current_dir(),
        }
    }

    /// Open the repository enclosing the working directory.
    pub fn open(&self) -> Result<Repository, RepoError> {
        let cwd = self.cwd().map_err(|e| RepoError::io(".", e))?;
        Repository::open(&cwd, self.verbosity())
    }
}
