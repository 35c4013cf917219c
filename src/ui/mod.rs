//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Verbosity and stdout/stderr helpers
//! - [`format`] - Text rendering of log and status
//!
//! # Design
//!
//! The engine returns structured values; everything that decides how they
//! look on a terminal lives here.

pub mod format;
pub mod output;
