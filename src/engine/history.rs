//! engine::history
//!
//! Read-only history queries: log, global log, find.

use crate::core::graph::LogEntry;
use crate::core::types::ObjectId;

use super::error::RepoError;
use super::repository::Repository;

impl Repository {
    /// History of the current branch, newest first, following first
    /// parents only. Empty when the branch has no commits.
    pub fn log(&self) -> Result<Vec<LogEntry>, RepoError> {
        let (_, head) = self.head()?;
        Ok(self.graph().first_parent_log(head.as_ref())?)
    }

    /// Every stored commit, ordered by id rather than by time.
    pub fn global_log(&self) -> Result<Vec<LogEntry>, RepoError> {
        Ok(self.graph().all_commits()?)
    }

    /// Ids of every commit whose message equals `message` exactly, sorted.
    pub fn find(&self, message: &str) -> Result<Vec<ObjectId>, RepoError> {
        let matches: Vec<ObjectId> = self
            .global_log()?
            .into_iter()
            .filter(|entry| entry.commit.message == message)
            .map(|entry| entry.id)
            .collect();
        self.debug(format_args!(
            "find: {} commit(s) match {:?}",
            matches.len(),
            message
        ));
        Ok(matches)
    }
}
