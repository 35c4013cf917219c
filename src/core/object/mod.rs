//! core::object
//!
//! Content-addressed objects: blobs, trees, and commits.
//!
//! # Modules
//!
//! - [`schema`] - In-memory object model and exact text encodings
//! - [`store`] - Persistence and retrieval keyed by hash

pub mod schema;
pub mod store;

pub use schema::{Commit, SchemaError, Signature, Tree};
pub use store::{ObjectError, ObjectKind, ObjectStore};
