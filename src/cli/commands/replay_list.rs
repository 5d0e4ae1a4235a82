//! replay-list command - Commits on A since it diverged from B

use crate::core::types::CommitId;
use crate::engine::Context;
use crate::git::Git;
use anyhow::{Context as _, Result};

/// Commits reachable from `a` but not from the merge base of `a` and `b`,
/// oldest first.
pub fn replay_commits(git: &Git, a: &str, b: &str) -> Result<Vec<CommitId>> {
    let base = git
        .merge_base(a, b)
        .with_context(|| format!("failed to find merge base between '{}' and '{}'", a, b))?;
    git.rev_list_reverse(&format!("{}..{}", base, a))
        .context("failed to list commits")
}

/// Print the commits to replay, one id per line.
pub fn replay_list(ctx: &Context, a: &str, b: &str) -> Result<()> {
    let git = ctx.repo()?;
    for commit in replay_commits(&git, a, b)? {
        println!("{}", commit);
    }
    Ok(())
}
