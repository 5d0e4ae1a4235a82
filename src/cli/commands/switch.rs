//! switch command - Switch to a branch interactively
//!
//! Candidates stream into the finder while remotes are still being read.
//! The selection decides the path:
//!
//! - `local` / `local/remote`: plain checkout
//! - `remote` with no local branch of that name: create a tracking branch
//! - `remote` with an existing local branch: reconcile upstream and commit

use crate::core::types::{BranchKind, BranchRef, SelectionItem};
use crate::engine::{stream_candidates, CommandError, Context, EnumerateRequest};
use crate::git::Git;
use crate::ui::live::LiveList;
use crate::ui::output;
use crate::ui::prompts::{PromptError, Prompter};
use anyhow::{Context as _, Result};
use tokio_util::sync::CancellationToken;

const SELECT_PROMPT: &str = "Select a branch to switch to";

/// Switch to a branch picked from local and remote candidates.
pub fn switch(ctx: &Context, prompter: &dyn Prompter) -> Result<()> {
    let git = ctx.repo()?;
    let verbosity = ctx.verbosity();

    let current = git.current_branch().context("error getting current branch")?;
    let tracking = git
        .tracking_remote(&current)
        .context("error getting tracking remote")?;

    let shown = match &tracking {
        Some(remote) => format!("({}/){}", remote, current),
        None => current.clone(),
    };
    output::print(format!("Current branch is: {}", shown), verbosity);

    ctx.ensure_clean(&git)?;

    let request = EnumerateRequest {
        current,
        tracking,
        remotes: git.remotes().context("error getting remotes")?,
        worktrees: git.worktree_listing().context("error listing worktrees")?,
        delay: ctx.config.stream_delay(),
    };

    let selected = pick_branch(&git, request, prompter)?;
    let item: SelectionItem = selected.parse()?;
    let branch = item.branch_ref()?;
    tracing::debug!(selection = %item, "branch selected");

    match branch.kind() {
        BranchKind::LocalOnly | BranchKind::LocalTrackingRemote => {
            git.checkout(branch.name())
                .with_context(|| format!("could not switch to branch '{}'", branch.name()))?;
            output::success(format!("Switched to branch '{}'.", branch.name()), verbosity);
            Ok(())
        }
        BranchKind::RemoteOnly => {
            if git.branch_exists(branch.name())? {
                reconcile(ctx, &git, &branch, prompter)
            } else {
                checkout_new_tracking(ctx, &git, &branch, prompter)
            }
        }
    }
}

/// Run the enumerator and the finder together; return the picked line.
///
/// The enumeration task has finished by the time this returns, so nothing
/// reads the repository while the caller mutates it.
fn pick_branch(git: &Git, request: EnumerateRequest, prompter: &dyn Prompter) -> Result<String> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    let list = LiveList::new();
    let cancel = CancellationToken::new();
    let enumeration = runtime.spawn(stream_candidates(
        git.clone(),
        request,
        list.clone(),
        cancel.clone(),
    ));

    let picked = prompter.select_live(SELECT_PROMPT, &list, &cancel);
    cancel.cancel();
    let appended = runtime
        .block_on(enumeration)
        .context("branch enumeration failed")?;
    tracing::debug!(appended, "picker closed");

    match picked {
        Err(PromptError::NoOptions) => Err(CommandError::NoBranches("branches").into()),
        other => Ok(other?),
    }
}

fn checkout_new_tracking(
    ctx: &Context,
    git: &Git,
    branch: &BranchRef,
    prompter: &dyn Prompter,
) -> Result<()> {
    let name = branch.name();
    let remote = branch.remote().unwrap_or_default();
    let remote_ref = branch.remote_ref().unwrap_or_default();

    let create = prompter.confirm(
        &format!(
            "Branch '{}' is not tracked locally. Create a local tracking branch?",
            name
        ),
        true,
    )?;
    if !create {
        return Err(CommandError::aborted(format!("not creating local branch '{}'", name)).into());
    }

    git.checkout_new(name, &remote_ref)
        .context("could not create tracking branch")?;
    output::success(
        format!(
            "Created and switched to local branch '{}' tracking remote branch '{}/{}'.",
            name, remote, name
        ),
        ctx.verbosity(),
    );
    Ok(())
}

/// Bring an existing local branch in line with the chosen remote branch.
fn reconcile(ctx: &Context, git: &Git, branch: &BranchRef, prompter: &dyn Prompter) -> Result<()> {
    let verbosity = ctx.verbosity();
    let name = branch.name();
    let remote = branch.remote().unwrap_or_default();
    let remote_ref = branch.remote_ref().unwrap_or_default();

    output::print(
        format!("Branch '{}' is already tracked locally as '{}'.", name, name),
        verbosity,
    );

    let tracking = git.tracking_remote(name).unwrap_or_else(|e| {
        tracing::warn!(branch = name, error = %e, "could not read upstream");
        None
    });
    if let Some(tracking) = &tracking {
        output::print(
            format!("Tracking reference for local branch '{}': '{}'", name, tracking),
            verbosity,
        );
    }

    if tracking.as_deref() != Some(remote) {
        output::print(
            format!(
                "Local branch '{}' is not tracking remote branch '{}'.",
                name, remote_ref
            ),
            verbosity,
        );
        let set = prompter.confirm(
            &format!(
                "Set '{}' as the tracking reference for local branch '{}'?",
                remote_ref, name
            ),
            false,
        )?;
        if !set {
            return Err(CommandError::aborted(format!(
                "not setting tracking reference for '{}'",
                name
            ))
            .into());
        }
        git.set_upstream(name, &remote_ref)
            .context("could not set tracking reference")?;
        output::success(
            format!(
                "Set tracking reference for local branch '{}' to remote branch '{}'.",
                name, remote_ref
            ),
            verbosity,
        );
    }

    git.checkout(name)
        .with_context(|| format!("could not switch to branch '{}'", name))?;

    let local_commit = git.commit_of(name).context("could not get local commit")?;
    let remote_commit = git
        .commit_of(&remote_ref)
        .with_context(|| format!("could not find remote branch '{}'", remote_ref))?;

    if local_commit == remote_commit {
        output::print(
            format!(
                "Local branch '{}' is up to date with remote branch '{}'.",
                name, remote_ref
            ),
            verbosity,
        );
        output::success(
            format!(
                "Switched to branch '{}' tracking remote branch '{}'.",
                name, remote_ref
            ),
            verbosity,
        );
        return Ok(());
    }

    let reset = prompter.confirm(
        &format!(
            "Local branch '{}' is not up to date with remote branch '{}'. \
             Reset the local branch to the remote branch?",
            name, remote_ref
        ),
        false,
    )?;
    if reset {
        git.reset_hard(Some(&remote_ref))
            .context("could not reset local branch")?;
        output::success(
            format!(
                "Reset local branch '{}' to remote branch '{}'.",
                name, remote_ref
            ),
            verbosity,
        );
    } else {
        output::warn("Not resetting local branch.", verbosity);
        output::success(format!("Switched to branch '{}'.", name), verbosity);
    }
    Ok(())
}
