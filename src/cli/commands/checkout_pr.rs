//! checkout-pr command - Check out a pull request as `pr-<n>`

use crate::core::pr_ref::{collect_pr_refs, PrRef};
use crate::engine::{CommandError, Context};
use crate::git::Git;
use crate::ui::output::{self, Verbosity};
use crate::ui::prompts::Prompter;
use anyhow::{bail, Context as _, Result};

/// Fetch a pull request from a remote and check it out.
pub fn checkout_pr(ctx: &Context, prompter: &dyn Prompter) -> Result<()> {
    let git = ctx.repo()?;
    let verbosity = ctx.verbosity();

    let remotes = git.remotes().context("error getting remotes")?;
    if remotes.is_empty() {
        return Err(CommandError::NoRemotes.into());
    }
    let remote = prompter.select("Select a remote to fetch PR from", &remotes)?;

    output::print(
        format!("Fetching pull request references from remote: {}", remote),
        verbosity,
    );
    let listing = git
        .ls_remote(&remote)
        .context("failed to list remote refs")?;
    let prs = collect_pr_refs(&listing);
    if prs.is_empty() {
        bail!("no pull requests found on remote '{}'", remote);
    }

    let labels: Vec<String> = prs.iter().map(PrRef::label).collect();
    let selected = prompter.select("Select a pull request to checkout", &labels)?;
    let pr = PrRef::parse_label(&selected)?;
    let branch = pr.local_branch();

    if git.branch_exists(&branch)? {
        let reset = prompter.confirm(
            &format!(
                "Branch '{}' already exists. Reset it to the latest PR state?",
                branch
            ),
            false,
        )?;
        ctx.ensure_clean(&git)?;

        if !reset {
            git.checkout(&branch)
                .with_context(|| format!("failed to checkout existing branch '{}'", branch))?;
            output::success(format!("Switched to existing branch '{}'.", branch), verbosity);
            return Ok(());
        }

        fetch(&git, &remote, &pr, verbosity)?;
        git.checkout(&branch)
            .with_context(|| format!("failed to checkout branch '{}'", branch))?;
        git.reset_hard(Some("FETCH_HEAD"))
            .context("failed to reset branch")?;
        output::success(
            format!("Reset branch '{}' to PR #{} ({}).", branch, pr.number, pr.kind),
            verbosity,
        );
        return Ok(());
    }

    ctx.ensure_clean(&git)?;
    fetch(&git, &remote, &pr, verbosity)?;
    git.checkout_new(&branch, "FETCH_HEAD")
        .context("failed to create and checkout branch")?;
    output::success(
        format!(
            "Checked out PR #{} ({}) as branch '{}'.",
            pr.number, pr.kind, branch
        ),
        verbosity,
    );
    Ok(())
}

fn fetch(git: &Git, remote: &str, pr: &PrRef, verbosity: Verbosity) -> Result<()> {
    output::print(
        format!("Fetching PR #{} from {}...", pr.number, remote),
        verbosity,
    );
    git.fetch(remote, &pr.refname())
        .context("failed to fetch PR")?;
    Ok(())
}
