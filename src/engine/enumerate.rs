//! engine::enumerate
//!
//! Streams switch candidates into a [`LiveList`].
//!
//! # Design
//!
//! One producer lists local branches and one producer per remote lists that
//! remote's branches. Producers run on the blocking pool (every query is a
//! git subprocess) and send rendered selection items into a bounded
//! channel. A single consumer drains the channel, paces appends so the
//! picker can redraw smoothly, deduplicates through
//! [`LiveList::push_unique`], and closes the list once every producer is
//! done or the token is cancelled.
//!
//! A producer that fails logs a warning and stops; the others carry on.
//!
//! # Rules
//!
//! - The current branch is never offered as a local entry
//! - `<tracking>/<current>` is never offered as a remote entry
//! - Branches attached to a worktree (and remote branches whose name is
//!   attached to one) are skipped
//! - The first occurrence of an item wins

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::types::BranchRef;
use crate::git::{Git, GitError, WorktreeListing};
use crate::ui::live::LiveList;

/// Bound of the producer-to-consumer queue.
pub const CHANNEL_CAPACITY: usize = 1000;

/// Inputs for one enumeration.
#[derive(Debug, Clone, Default)]
pub struct EnumerateRequest {
    /// The checked-out branch
    pub current: String,
    /// Remote the current branch tracks, if any
    pub tracking: Option<String>,
    /// Remotes to enumerate
    pub remotes: Vec<String>,
    /// Worktree listing read once for all producers
    pub worktrees: WorktreeListing,
    /// Pause before each append after the first
    pub delay: Duration,
}

/// Run all producers and the consumer to completion.
///
/// Returns the number of items appended. The list is always closed on
/// return, and no producer is still running.
pub async fn stream_candidates(
    git: Git,
    request: EnumerateRequest,
    list: LiveList,
    cancel: CancellationToken,
) -> usize {
    let request = Arc::new(request);
    let (tx, mut rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);

    let mut producers = Vec::with_capacity(request.remotes.len() + 1);
    {
        let (git, request, tx, cancel) = (git.clone(), request.clone(), tx.clone(), cancel.clone());
        producers.push(tokio::task::spawn_blocking(move || {
            if let Err(e) = produce_local(&git, &request, &tx, &cancel) {
                tracing::warn!(error = %e, "listing local branches failed");
            }
        }));
    }
    for remote in request.remotes.iter().cloned() {
        let (git, request, tx, cancel) = (git.clone(), request.clone(), tx.clone(), cancel.clone());
        producers.push(tokio::task::spawn_blocking(move || {
            if let Err(e) = produce_remote(&git, &request, &remote, &tx, &cancel) {
                tracing::warn!(%remote, error = %e, "listing remote branches failed");
            }
        }));
    }
    drop(tx);

    let mut appended = 0;
    let mut pace = false;
    loop {
        let item = tokio::select! {
            _ = cancel.cancelled() => break,
            item = rx.recv() => match item {
                Some(item) => item,
                None => break,
            },
        };

        if list.contains(&item) {
            continue;
        }
        if pace && !request.delay.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(request.delay) => {}
            }
        }
        if list.push_unique(item) {
            appended += 1;
            pace = true;
        }
    }
    list.close();

    // Unblocks producers waiting on a full queue.
    drop(rx);
    for producer in producers {
        if let Err(e) = producer.await {
            tracing::warn!(error = %e, "enumeration producer panicked");
        }
    }
    tracing::debug!(appended, "enumeration finished");
    appended
}

/// Send `branch` unless the consumer is gone. Returns false to stop.
fn send(tx: &mpsc::Sender<String>, cancel: &CancellationToken, branch: BranchRef) -> bool {
    !cancel.is_cancelled() && tx.blocking_send(branch.selection_item().to_string()).is_ok()
}

fn produce_local(
    git: &Git,
    request: &EnumerateRequest,
    tx: &mpsc::Sender<String>,
    cancel: &CancellationToken,
) -> Result<(), GitError> {
    for branch in git.local_branches()? {
        if branch == request.current {
            continue;
        }
        if let Some(path) = request.worktrees.attached(&branch) {
            tracing::debug!(%branch, path = %path.display(), "skipping branch attached to worktree");
            continue;
        }
        if cancel.is_cancelled() {
            return Ok(());
        }
        let tracking = match git.tracking_remote(&branch) {
            Ok(remote) => remote.is_some(),
            Err(e) => {
                tracing::warn!(%branch, error = %e, "could not read upstream");
                false
            }
        };
        if !send(tx, cancel, BranchRef::local(branch, tracking)) {
            return Ok(());
        }
    }
    Ok(())
}

fn produce_remote(
    git: &Git,
    request: &EnumerateRequest,
    remote: &str,
    tx: &mpsc::Sender<String>,
    cancel: &CancellationToken,
) -> Result<(), GitError> {
    let tracking = request.tracking.as_deref();
    for branch in git.remote_branches(remote)? {
        if tracking == Some(remote) && branch == request.current {
            continue;
        }
        if request.worktrees.attached(&branch).is_some() {
            continue;
        }
        if !send(tx, cancel, BranchRef::remote_only(remote, branch)) {
            return Ok(());
        }
    }
    Ok(())
}
