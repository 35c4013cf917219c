//! merge command - Merge another branch into the current one

use crate::engine::{Context, MergeOutcome};
use crate::ui::output;
use anyhow::Result;

/// Merge `branch` into the current branch.
///
/// Conflicts are reported but are not an error: the marker files are in
/// the working directory and the user resolves, adds, and commits.
pub fn merge(ctx: &Context, branch: &str) -> Result<()> {
    let repo = ctx.open()?;
    let outcome = repo.merge(branch)?;

    match &outcome {
        MergeOutcome::Conflicted { .. } | MergeOutcome::AlreadyUpToDate => {
            println!("{}", outcome)
        }
        MergeOutcome::Merged { .. } => {
            output::print(&outcome, ctx.verbosity());
            output::print("Merge completed successfully.", ctx.verbosity());
        }
        MergeOutcome::FastForward { .. } => output::print(&outcome, ctx.verbosity()),
    }
    Ok(())
}
