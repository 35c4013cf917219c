//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens the repository from the execution context
//! 2. Converts path arguments to repository-relative paths
//! 3. Calls one engine operation
//! 4. Renders the outcome
//!
//! Handlers do NOT touch repository storage directly. Informational
//! outcomes and merge conflicts print a message and succeed; only
//! `RepoError`s produce a non-zero exit.

mod branch;
mod checkout;
mod config_cmd;
mod history;
mod init;
mod merge;
mod staging;
mod status;

// Re-export command functions for testing and direct invocation
pub use branch::{branch, rm_branch};
pub use checkout::{reset, restore, switch};
pub use config_cmd::{get as config_get, list as config_list, set as config_set};
pub use history::{find, global_log, log};
pub use init::init;
pub use merge::merge;
pub use staging::{add, commit, rm};
pub use status::status;

use crate::cli::args::{Command, ConfigAction};
use crate::engine::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Init => init::init(ctx),

        // Staging and commits
        Command::Add { file } => staging::add(ctx, &file),
        Command::Commit { message } => staging::commit(ctx, &message),
        Command::Rm { file } => staging::rm(ctx, &file),

        // Read-only
        Command::Log { json } => history::log(ctx, json),
        Command::GlobalLog { json } => history::global_log(ctx, json),
        Command::Find { message } => history::find(ctx, &message),
        Command::Status { json } => status::status(ctx, json),

        // Working tree
        Command::Restore { source, file } => checkout::restore(ctx, source.as_deref(), &file),
        Command::Switch { branch } => checkout::switch(ctx, &branch),
        Command::Reset { commit } => checkout::reset(ctx, &commit),

        // Branches
        Command::Branch { name } => branch::branch(ctx, name.as_deref()),
        Command::RmBranch { branch } => branch::rm_branch(ctx, &branch),
        Command::Merge { branch } => merge::merge(ctx, &branch),

        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::Set { key, value, global } => config_cmd::set(ctx, &key, &value, global),
            ConfigAction::List => config_cmd::list(ctx),
        },
    }
}
