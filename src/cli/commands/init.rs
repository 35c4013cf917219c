//! init command - Create a repository in the working directory

use crate::engine::{Context, Repository};
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Create an empty repository in the working directory.
pub fn init(ctx: &Context) -> Result<()> {
    let cwd = ctx.cwd().context("Failed to determine working directory")?;
    let repo = Repository::init(&cwd, ctx.verbosity())?;
    let branch = repo.current_branch()?;

    output::print(
        format!(
            "Initialized empty strata repository in {} (branch '{}')",
            repo.paths().control_dir.display(),
            branch
        ),
        ctx.verbosity(),
    );
    Ok(())
}
