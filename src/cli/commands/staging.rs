//! add, commit, rm commands - Build the next commit

use crate::engine::{CommitOutcome, Context};
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Stage a file.
pub fn add(ctx: &Context, file: &str) -> Result<()> {
    let repo = ctx.open()?;
    let cwd = ctx.cwd().context("Failed to determine working directory")?;
    let path = repo.repo_path(&cwd, file)?;

    let blob = repo.add(&path)?;
    output::debug(format!("{} -> {}", path, blob), ctx.verbosity());
    Ok(())
}

/// Commit staged changes.
pub fn commit(ctx: &Context, message: &str) -> Result<()> {
    let repo = ctx.open()?;
    let outcome = repo.commit(message)?;

    match outcome {
        CommitOutcome::Created { .. } => output::print(&outcome, ctx.verbosity()),
        // Shown even in quiet mode; nothing happened
        CommitOutcome::NothingToCommit => println!("{}", outcome),
    }
    Ok(())
}

/// Unstage a file or stage it for removal.
pub fn rm(ctx: &Context, file: &str) -> Result<()> {
    let repo = ctx.open()?;
    let cwd = ctx.cwd().context("Failed to determine working directory")?;
    let path = repo.repo_path(&cwd, file)?;

    let outcome = repo.remove(&path)?;
    output::print(&outcome, ctx.verbosity());
    Ok(())
}
