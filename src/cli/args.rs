//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strata - a minimal local version-control system
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if strata was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty repository in the current directory
    Init,

    /// Stage a file for the next commit
    Add {
        /// File to stage
        file: String,
    },

    /// Record staged changes as a new commit
    Commit {
        /// Commit message
        message: String,
    },

    /// Unstage a file, or stage a tracked file for removal
    #[command(
        name = "rm",
        long_about = "Unstage a file, or stage a tracked file for removal.\n\n\
            If the file is staged it is unstaged and left on disk. Otherwise, if \
            the current commit tracks it, it is staged for removal and deleted \
            from the working directory."
    )]
    Rm {
        /// File to remove
        file: String,
    },

    /// Show the current branch's history
    Log {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show every commit ever made
    #[command(name = "global-log")]
    GlobalLog {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the ids of commits with the given message
    Find {
        /// Exact commit message
        message: String,
    },

    /// Show branches, staged files, and working-directory changes
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Restore a file from a commit into the working directory
    Restore {
        /// Commit to restore from (defaults to the current head)
        #[arg(long, short = 's', value_name = "COMMIT")]
        source: Option<String>,

        /// File to restore
        file: String,
    },

    /// Create a branch at the current commit, or list branches
    Branch {
        /// Name of the new branch
        name: Option<String>,
    },

    /// Switch to another branch
    Switch {
        /// Branch to switch to
        branch: String,
    },

    /// Delete a branch pointer
    #[command(name = "rm-branch")]
    RmBranch {
        /// Branch to delete
        branch: String,
    },

    /// Move the current branch to a commit and check it out
    #[command(
        long_about = "Move the current branch to a commit and check it out.\n\n\
            Every working file the commit does not track is deleted (hidden files \
            are left alone), the commit's files are written, and the staging area \
            is cleared."
    )]
    Reset {
        /// Commit id (may be abbreviated)
        commit: String,
    },

    /// Merge another branch into the current one
    Merge {
        /// Branch to merge
        branch: String,
    },

    /// Get, set, or list configuration values
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key (user.name, init.default_branch, commit.tree)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
        /// Write to the global config instead of the repository config
        #[arg(long)]
        global: bool,
    },

    /// List effective configuration values
    List,
}
