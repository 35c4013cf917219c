//! core
//!
//! Core domain types, storage formats, and algorithms for Strata.
//!
//! # Modules
//!
//! - [`types`] - Strong types: ObjectId, BranchName
//! - [`paths`] - Centralized path routing for repository storage
//! - [`object`] - Content-addressed blobs, trees, and commits
//! - [`index`] - Staging index and removal set
//! - [`refs`] - Branch refs and the current-branch pointer
//! - [`graph`] - History traversal and merge-base computation
//! - [`merge`] - Pure per-file three-way merge decisions
//! - [`worktree`] - Working directory reads, writes, and scans
//! - [`ignore`] - Ignore rules for untracked files
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - On-disk formats are exact and owned by one encode/decode pair each
//! - Every component borrows a [`paths::RepoPaths`]; there is no global state

pub mod config;
pub(crate) mod fsio;
pub mod graph;
pub mod ignore;
pub mod index;
pub mod merge;
pub mod object;
pub mod paths;
pub mod refs;
pub mod types;
pub mod worktree;
