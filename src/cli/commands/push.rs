//! push command - Push the current branch to a remote

use crate::engine::{CommandError, Context};
use crate::ui::output;
use crate::ui::prompts::Prompter;
use anyhow::{Context as _, Result};

/// Push the current branch.
///
/// With an upstream, confirm and push to it. Otherwise pick a remote: an
/// existing remote branch at the same commit just becomes the upstream, an
/// existing one with other commits is pushed to, and a missing one is
/// created with `push -u`.
pub fn push(ctx: &Context, prompter: &dyn Prompter) -> Result<()> {
    let git = ctx.repo()?;
    let verbosity = ctx.verbosity();

    if let Some(upstream) = git.current_upstream().context("error getting upstream")? {
        output::print(
            format!(
                "Current branch already has a remote tracking branch: {}",
                upstream
            ),
            verbosity,
        );
        if prompter.confirm("Do you want to push to the remote tracking branch?", true)? {
            let out = git.push().context("failed to push")?;
            print_git_output(&out.combined(), verbosity);
            output::success(
                format!("Pushed to remote tracking branch '{}'.", upstream),
                verbosity,
            );
        } else {
            output::print("Not pushing to remote tracking branch", verbosity);
        }
        return Ok(());
    }

    let current = git.current_branch().context("error getting current branch")?;
    let remotes = git.remotes().context("error getting remotes")?;
    if remotes.is_empty() {
        return Err(CommandError::NoRemotes.into());
    }
    let remote = prompter.select(&format!("Push '{}' to", current), &remotes)?;
    let remote_ref = format!("{}/{}", remote, current);

    let exists = git
        .remote_has_branch(&remote, &current)
        .context("error checking remote branch")?;

    if !exists {
        let create = prompter.confirm(
            &format!(
                "No remote branch '{}' found. Do you want to create it?",
                remote_ref
            ),
            false,
        )?;
        if !create {
            output::print("Not pushing.", verbosity);
            return Ok(());
        }
        let out = git
            .push_set_upstream(&remote, &current)
            .context("failed to push")?;
        print_git_output(&out.combined(), verbosity);
        output::success(
            format!(
                "Created and set tracking reference for '{}' to '{}'.",
                current, remote_ref
            ),
            verbosity,
        );
        return Ok(());
    }

    let local_commit = git.commit_of(&current).context("error getting local commit")?;
    // The remote-tracking ref may not be fetched yet; then we cannot tell.
    let up_to_date = match git.commit_of(&remote_ref) {
        Ok(remote_commit) => remote_commit == local_commit,
        Err(e) => {
            tracing::debug!(%remote_ref, error = %e, "remote-tracking ref not available");
            false
        }
    };

    if up_to_date {
        output::print(
            format!(
                "No changes to push. Local branch '{}' is up to date with remote branch '{}'.",
                current, remote_ref
            ),
            verbosity,
        );
        git.set_upstream(&current, &remote_ref)
            .context("failed to set upstream")?;
        output::success(format!("Updated upstream to '{}'.", remote_ref), verbosity);
        return Ok(());
    }

    let confirmed = prompter.confirm(
        &format!(
            "Remote branch '{}' already exists. Do you want to push to it?",
            remote_ref
        ),
        true,
    )?;
    if !confirmed {
        output::print("Not pushing.", verbosity);
        return Ok(());
    }
    let out = git.push_to(&remote, &current).context("failed to push")?;
    print_git_output(&out.combined(), verbosity);
    output::success(format!("Pushed '{}' to '{}'.", current, remote_ref), verbosity);
    Ok(())
}

fn print_git_output(text: &str, verbosity: output::Verbosity) {
    if !text.is_empty() {
        output::print(text, verbosity);
    }
}
