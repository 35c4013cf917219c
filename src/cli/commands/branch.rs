//! branch, rm-branch commands - Manage branch pointers

use crate::engine::Context;
use crate::ui::output;
use anyhow::Result;

/// Create a branch at the current head, or list branches when no name is
/// given.
pub fn branch(ctx: &Context, name: Option<&str>) -> Result<()> {
    let repo = ctx.open()?;

    let Some(name) = name else {
        let current = repo.current_branch()?;
        for branch in repo.list_branches()? {
            let marker = if branch == current { "* " } else { "  " };
            println!("{}{}", marker, branch);
        }
        return Ok(());
    };

    let head = repo.branch(name)?;
    output::print(
        format!("Created branch '{}' at {}", name, head.short(7)),
        ctx.verbosity(),
    );
    Ok(())
}

/// Delete a branch pointer.
pub fn rm_branch(ctx: &Context, name: &str) -> Result<()> {
    let repo = ctx.open()?;
    repo.remove_branch(name)?;
    output::print(format!("Deleted branch {}.", name), ctx.verbosity());
    Ok(())
}
