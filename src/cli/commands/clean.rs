//! clean command - Discard working tree changes and untracked files
//!
//! # .gitignore handling
//!
//! Which untracked files `git clean` removes depends on the ignore rules in
//! effect. When a `.gitignore` itself is among the affected files, its
//! cleanup is applied first, the affected set is recomputed under the rules
//! that will be in effect afterwards, and then the `.gitignore` files are
//! restored byte for byte (index and working tree) so nothing has changed
//! when the user is asked. After confirmation the `.gitignore` cleanup is
//! applied again before the reset and clean run.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use crate::core::types::{is_ignore_file, FileStatus};
use crate::engine::Context;
use crate::git::Git;
use crate::ui::output;
use crate::ui::prompts::Prompter;
use anyhow::{Context as _, Result};

/// Which kinds of changes to discard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanOptions {
    /// Reset staged and unstaged changes to tracked files
    pub changes: bool,
    /// Remove untracked files
    pub untracked: bool,
    /// Also remove ignored files
    pub ignored: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            changes: true,
            untracked: true,
            ignored: false,
        }
    }
}

impl CleanOptions {
    /// Apply explicit flags over the defaults. `all` turns everything on;
    /// `ignored` implies `untracked`.
    pub fn resolve(
        changes: Option<bool>,
        untracked: Option<bool>,
        ignored: Option<bool>,
        all: bool,
    ) -> Self {
        let defaults = Self::default();
        let mut opts = Self {
            changes: changes.unwrap_or(defaults.changes),
            untracked: untracked.unwrap_or(defaults.untracked),
            ignored: ignored.unwrap_or(defaults.ignored),
        };
        if all {
            opts = Self {
                changes: true,
                untracked: true,
                ignored: true,
            };
        }
        if opts.ignored {
            opts.untracked = true;
        }
        opts
    }

    fn is_noop(&self) -> bool {
        !self.changes && !self.untracked
    }
}

/// Saved state of one `.gitignore` before its cleanup was applied.
#[derive(Debug)]
struct IgnoreBackup {
    path: String,
    status: FileStatus,
    /// Index contents; `None` when the path is not in the index
    index: Option<Vec<u8>>,
    /// Working tree contents; `None` when the file does not exist
    worktree: Option<Vec<u8>>,
}

/// Discard changes according to `opts`, after confirmation unless `yes`.
pub fn clean(ctx: &Context, prompter: &dyn Prompter, opts: CleanOptions, yes: bool) -> Result<()> {
    let verbosity = ctx.verbosity();
    let git = ctx.repo()?;

    if opts.is_noop() {
        output::print("Nothing to clean (all options disabled)", verbosity);
        return Ok(());
    }

    // Paths from diff and clean are both relative to the root there.
    let root = git.toplevel().context("failed to find repository root")?;
    let git = Git::new(root);

    let mut affected = affected_files(&git, opts)?;
    if affected.is_empty() {
        output::print("Nothing to clean (working tree is clean)", verbosity);
        return Ok(());
    }

    let ignore_files: Vec<String> = affected
        .iter()
        .filter(|path| is_ignore_file(path))
        .cloned()
        .collect();

    if !ignore_files.is_empty() {
        output::print(
            "Detected changes to .gitignore files. Applying .gitignore changes first to get accurate cleanup preview...",
            verbosity,
        );
        let backups = apply_ignore_cleanup(&git, &ignore_files, opts)?;
        let recomputed = affected_files(&git, opts);

        output::print("Restoring .gitignore files for confirmation...", verbosity);
        restore_ignore_files(&git, &backups).context("failed to restore .gitignore files")?;

        let rest: Vec<String> = recomputed?
            .into_iter()
            .filter(|path| !ignore_files.contains(path))
            .collect();
        affected = ignore_files.iter().cloned().chain(rest).collect();
    }

    output::print(
        format!("Files to be discarded ({}):", affected.len()),
        verbosity,
    );
    output::print(
        output::format_capped(&affected, "  ", ctx.config.clean_max_display()),
        verbosity,
    );
    output::print("", verbosity);

    if !yes
        && !prompter.confirm("Proceed with cleanup? This cannot be undone", false)?
    {
        output::print("Cleanup cancelled", verbosity);
        return Ok(());
    }

    if !ignore_files.is_empty() {
        output::print("Re-applying .gitignore cleanup...", verbosity);
        apply_ignore_cleanup(&git, &ignore_files, opts)?;
    }

    if opts.changes {
        output::print("Discarding changes...", verbosity);
        let out = git.reset_hard(None).context("failed to reset changes")?;
        if !out.stdout.is_empty() {
            output::print(&out.stdout, verbosity);
        }
    }

    if opts.untracked {
        output::print("Removing untracked files...", verbosity);
        let out = git
            .clean(opts.ignored)
            .context("failed to clean untracked files")?;
        if !out.stdout.is_empty() {
            output::print(&out.stdout, verbosity);
        }
    }

    output::success("Clean complete", verbosity);
    Ok(())
}

/// Paths the clean would touch, first occurrence kept.
fn affected_files(git: &Git, opts: CleanOptions) -> Result<Vec<String>> {
    let mut files = Vec::new();
    if opts.changes {
        files.extend(git.diff_names(false).context("failed to list modified files")?);
        files.extend(git.diff_names(true).context("failed to list staged files")?);
    }
    if opts.untracked {
        files.extend(
            git.clean_preview(opts.ignored)
                .context("failed to list untracked files")?,
        );
    }

    let mut seen = HashSet::new();
    files.retain(|path| seen.insert(path.clone()));
    Ok(files)
}

/// Apply the cleanup to `.gitignore` files only, returning what is needed
/// to undo it.
///
/// Untracked files are removed when `untracked` is on; tracked ones are
/// restored from HEAD (or dropped from the index when HEAD lacks them) when
/// `changes` is on. If any file fails, the ones already applied are
/// restored before the error is returned.
fn apply_ignore_cleanup(git: &Git, paths: &[String], opts: CleanOptions) -> Result<Vec<IgnoreBackup>> {
    let mut backups = Vec::new();

    for path in paths {
        if let Err(e) = apply_one(git, path, opts, &mut backups) {
            if let Err(restore) = restore_ignore_files(git, &backups) {
                tracing::warn!(error = %restore, "failed to restore .gitignore files");
            }
            return Err(e);
        }
    }

    Ok(backups)
}

/// Back up and clean one `.gitignore`. The backup is recorded before
/// anything is touched.
fn apply_one(git: &Git, path: &str, opts: CleanOptions, backups: &mut Vec<IgnoreBackup>) -> Result<()> {
    let status = git
        .file_status(path)
        .with_context(|| format!("failed to read status of {}", path))?;
    let full = git.work_dir().join(path);

    match status {
        FileStatus::Unknown => return Ok(()),
        FileStatus::Untracked => {
            if !opts.untracked {
                return Ok(());
            }
            let contents = fs::read(&full).with_context(|| format!("failed to read {}", path))?;
            backups.push(IgnoreBackup {
                path: path.to_string(),
                status,
                index: None,
                worktree: Some(contents),
            });
            fs::remove_file(&full).with_context(|| format!("failed to remove {}", path))?;
        }
        FileStatus::Modified | FileStatus::Staged | FileStatus::Deleted => {
            if !opts.changes {
                return Ok(());
            }
            backups.push(IgnoreBackup {
                path: path.to_string(),
                status,
                index: git.show_blob(&format!(":{}", path))?,
                worktree: read_optional(&full).with_context(|| format!("failed to read {}", path))?,
            });

            if git.show_blob(&format!("HEAD:{}", path))?.is_some() {
                git.checkout_path_from_head(path)
                    .with_context(|| format!("failed to reset {}", path))?;
            } else {
                git.rm_cached(path)
                    .with_context(|| format!("failed to unstage {}", path))?;
                remove_optional(&full).with_context(|| format!("failed to remove {}", path))?;
            }
        }
    }
    tracing::debug!(%path, ?status, "applied .gitignore cleanup");
    Ok(())
}

/// Put every backed-up `.gitignore` back exactly as it was.
fn restore_ignore_files(git: &Git, backups: &[IgnoreBackup]) -> Result<()> {
    for backup in backups {
        let full = git.work_dir().join(&backup.path);

        if backup.status.is_tracked() {
            match &backup.index {
                Some(bytes) => {
                    fs::write(&full, bytes)
                        .with_context(|| format!("failed to write {}", backup.path))?;
                    git.add(&backup.path)?;
                }
                None => {
                    git.rm_cached(&backup.path)?;
                }
            }
        }

        match &backup.worktree {
            Some(bytes) => {
                fs::write(&full, bytes)
                    .with_context(|| format!("failed to write {}", backup.path))?;
            }
            None => remove_optional(&full)
                .with_context(|| format!("failed to remove {}", backup.path))?,
        }
    }
    Ok(())
}

fn read_optional(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn remove_optional(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
