//! empty command - Create an empty commit and optionally push it

use crate::engine::Context;
use crate::ui::output;
use crate::ui::prompts::Prompter;
use anyhow::{bail, Context as _, Result};

/// Message of the commit `empty` creates.
pub const EMPTY_COMMIT_MESSAGE: &str = "chore: empty commit";

/// Create an empty commit on the current branch.
///
/// Refuses unless the branch has an upstream and has no commits the
/// upstream lacks, so the new commit is the only thing a push would send.
pub fn empty(ctx: &Context, prompter: &dyn Prompter) -> Result<()> {
    let git = ctx.repo()?;
    let verbosity = ctx.verbosity();

    let current = git.current_branch().context("error getting current branch")?;
    let Some(upstream) = git
        .current_upstream()
        .context("error getting upstream branch")?
    else {
        bail!(
            "current branch '{}' has no upstream remote tracking branch",
            current
        );
    };

    if git
        .ahead_of(&current, &upstream)
        .context("error checking if branch is ahead of remote")?
    {
        bail!(
            "refusing to create empty commit: branch '{}' is ahead of remote '{}'",
            current,
            upstream
        );
    }

    git.commit_empty(EMPTY_COMMIT_MESSAGE)
        .context("failed to create empty commit")?;
    output::success(
        format!("Created empty commit on branch '{}'.", current),
        verbosity,
    );

    if prompter.confirm("Do you want to push this commit to the remote?", true)? {
        git.push().context("failed to push")?;
        output::success("Pushed to remote.", verbosity);
    } else {
        output::print("Not pushing.", verbosity);
    }
    Ok(())
}
