//! Strata - a minimal local version-control system
//!
//! Strata stores file snapshots in a content-addressed object store,
//! stages changes in an index, records commits in a parent-linked graph,
//! and merges branches with file-level three-way resolution.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Repository context and every user-facing operation
//! - [`core`] - Domain types, storage, commit graph, and merge decisions
//! - [`ui`] - Output helpers and text formatting
//!
//! # Correctness Invariants
//!
//! Strata maintains the following invariants:
//!
//! 1. An object's id is the SHA-1 of its stored bytes
//! 2. Objects are written before any ref that names them
//! 3. A branch ref is empty or names a stored commit
//! 4. A merge that conflicts never creates a commit

pub mod cli;
pub mod core;
pub mod engine;
pub mod ui;
