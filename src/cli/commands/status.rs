//! status command - Branches, remotes, changes and the branch status line

use std::io::IsTerminal;

use crate::engine::Context;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Show the status of the repository in headed sections.
///
/// Colour is forced on git's own output when stdout is a terminal.
pub fn status(ctx: &Context) -> Result<()> {
    let git = ctx.repo()?;
    let color = std::io::stdout().is_terminal();

    output::header("BRANCHES");
    let branches = git.branch_verbose(color).context("error getting branches")?;
    if !branches.is_empty() {
        println!("{}", branches);
    }

    let remotes = git.remote_urls().context("error getting remotes")?;
    if !remotes.is_empty() {
        output::header("REMOTES");
        println!("{}", output::format_list(&remotes, ""));
    }

    let changes = git.status_short(color).context("error getting status")?;
    if !changes.is_empty() {
        output::header("CHANGES");
        println!("{}", changes);
    }

    output::header("STATUS");
    let line = git.status_branch_line(color).context("error getting status")?;
    println!("{}", line);
    Ok(())
}
