//! log, global-log, find commands - Read commit history

use crate::engine::Context;
use crate::ui::{format, output};
use anyhow::{bail, Result};

/// Show the current branch's first-parent history.
pub fn log(ctx: &Context, json: bool) -> Result<()> {
    let repo = ctx.open()?;
    let entries = repo.log()?;

    if json {
        output::json(&entries)?;
    } else if !entries.is_empty() {
        print!("{}", format::log(&entries));
    }
    Ok(())
}

/// Show every stored commit.
pub fn global_log(ctx: &Context, json: bool) -> Result<()> {
    let repo = ctx.open()?;
    let entries = repo.global_log()?;

    if json {
        output::json(&entries)?;
    } else if !entries.is_empty() {
        print!("{}", format::log(&entries));
    }
    Ok(())
}

/// Print ids of commits whose message matches exactly.
pub fn find(ctx: &Context, message: &str) -> Result<()> {
    let repo = ctx.open()?;
    let ids = repo.find(message)?;

    if ids.is_empty() {
        bail!("Found no commit with that message.");
    }
    println!("{}", output::format_list(&ids, ""));
    Ok(())
}
