//! restore, switch, reset commands - Write commit contents to the working tree

use crate::engine::{Context, SwitchOutcome};
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Restore one file from a commit (default: the current head).
pub fn restore(ctx: &Context, source: Option<&str>, file: &str) -> Result<()> {
    let repo = ctx.open()?;
    let cwd = ctx.cwd().context("Failed to determine working directory")?;
    let path = repo.repo_path(&cwd, file)?;

    let outcome = repo.restore(source, &path)?;
    output::print(&outcome, ctx.verbosity());
    Ok(())
}

/// Switch to another branch.
pub fn switch(ctx: &Context, branch: &str) -> Result<()> {
    let repo = ctx.open()?;
    let outcome = repo.switch_branch(branch)?;

    match outcome {
        SwitchOutcome::Switched { .. } => output::print(&outcome, ctx.verbosity()),
        SwitchOutcome::AlreadyOn { .. } => println!("{}", outcome),
    }
    Ok(())
}

/// Reset the current branch to a commit.
pub fn reset(ctx: &Context, commit: &str) -> Result<()> {
    let repo = ctx.open()?;
    let outcome = repo.reset(commit)?;

    for path in &outcome.removed {
        output::debug(format!("removed {}", path), ctx.verbosity());
    }
    output::print(&outcome, ctx.verbosity());
    Ok(())
}
