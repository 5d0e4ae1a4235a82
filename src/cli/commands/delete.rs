//! delete command - Delete a local branch and optionally its upstream

use crate::core::types::Upstream;
use crate::engine::{CommandError, Context};
use crate::git::GitError;
use crate::ui::output;
use crate::ui::prompts::Prompter;
use anyhow::{Context as _, Result};

/// Delete a local branch picked by the user.
///
/// Protected branches and the current branch need an extra confirmation.
/// When the branch has an upstream, the remote branch can be deleted too;
/// a failure there is reported but leaves the local deletion in place.
pub fn delete(ctx: &Context, prompter: &dyn Prompter) -> Result<()> {
    let git = ctx.repo()?;
    let verbosity = ctx.verbosity();

    let branches = git
        .local_branches()
        .context("failed to get local branches")?;
    if branches.is_empty() {
        return Err(CommandError::NoBranches("branches").into());
    }
    let branch = prompter.select("Select a branch to delete", &branches)?;

    if ctx.config.protected_branches().contains(&branch) {
        let confirmed = prompter.confirm(
            &format!(
                "You are about to delete the '{}' branch. This is usually the main branch of the repository. Are you sure you want to proceed?",
                branch
            ),
            false,
        )?;
        if !confirmed {
            return Err(CommandError::aborted(format!("not deleting '{}'", branch)).into());
        }
    }

    // A detached HEAD has no branch to move away from.
    let current = match git.current_branch() {
        Ok(name) => Some(name),
        Err(GitError::DetachedHead) => None,
        Err(e) => return Err(anyhow::Error::new(e).context("failed to get current branch")),
    };
    if current.as_deref() == Some(branch.as_str()) {
        let move_away = prompter.confirm(
            &format!(
                "You are currently on branch '{}'. Do you want to switch to another branch before deleting it?",
                branch
            ),
            true,
        )?;
        if !move_away {
            return Err(CommandError::aborted(format!(
                "cannot delete the checked-out branch '{}'",
                branch
            ))
            .into());
        }

        let others: Vec<String> = branches.iter().filter(|b| **b != branch).cloned().collect();
        if others.is_empty() {
            return Err(CommandError::NoBranches("other branches").into());
        }
        let target = prompter.select("Select a branch to switch to", &others)?;
        ctx.ensure_clean(&git)?;
        git.checkout(&target)
            .with_context(|| format!("failed to switch to branch '{}'", target))?;
        output::success(format!("Switched to branch '{}'.", target), verbosity);
    }

    let upstream = git.upstream_short(&branch).unwrap_or_else(|e| {
        tracing::warn!(%branch, error = %e, "could not read upstream");
        None
    });
    let delete_remote: Option<Upstream> = match upstream {
        Some(upstream) => {
            let confirmed = prompter.confirm(
                &format!(
                    "Branch '{}' is tracking remote branch '{}'. Do you want to delete the remote branch as well?",
                    branch, upstream
                ),
                false,
            )?;
            confirmed.then_some(upstream)
        }
        None => None,
    };

    match git.branch_delete(&branch, false) {
        Ok(_) => {
            output::success(format!("Deleted local branch '{}'.", branch), verbosity);
        }
        Err(e) => {
            tracing::debug!(%branch, error = %e, "safe delete refused");
            output::warn(
                format!(
                    "Could not delete branch '{}'. It may not be fully merged.",
                    branch
                ),
                verbosity,
            );
            let question = if delete_remote.is_some() {
                format!(
                    "Branch '{}' is not fully merged. Do you want to force delete the local branch and the remote branch?",
                    branch
                )
            } else {
                format!(
                    "Branch '{}' is not fully merged. Do you want to force delete the local branch?",
                    branch
                )
            };
            if !prompter.confirm(&question, false)? {
                return Err(CommandError::aborted(format!("not deleting '{}'", branch)).into());
            }
            git.branch_delete(&branch, true)
                .with_context(|| format!("failed to force delete branch '{}'", branch))?;
            output::success(format!("Force deleted local branch '{}'.", branch), verbosity);
        }
    }

    if let Some(upstream) = delete_remote {
        git.push_delete(&upstream.remote, &upstream.branch)
            .with_context(|| format!("could not delete remote branch '{}'", upstream))?;
        output::success(format!("Deleted remote branch '{}'.", upstream), verbosity);
    }

    Ok(())
}
