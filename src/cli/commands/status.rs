//! status command - Summarize branches, staging, and working-tree changes

use crate::engine::Context;
use crate::ui::{format, output};
use anyhow::Result;

/// Show repository status.
pub fn status(ctx: &Context, json: bool) -> Result<()> {
    let repo = ctx.open()?;
    let report = repo.status()?;

    if json {
        output::json(&report)?;
    } else {
        print!("{}", format::status(&report));
    }
    Ok(())
}
