//! git::interface
//!
//! Git interface implementation over the `git` command-line tool.
//!
//! This module provides the **single doorway** to all Git operations in
//! gitgum. Every operation is a subprocess invocation whose stdout and stderr
//! are captured; a non-zero exit becomes [`GitError::CommandFailed`]
//! carrying the stderr text.
//!
//! # Architecture
//!
//! The `Git` struct holds only the directory commands run in. It has no
//! mutable state, is cheap to clone, and is safe to share between the
//! enumerator's producer threads.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a working tree
//! - [`GitError::DetachedHead`]: HEAD does not name a branch
//! - [`GitError::Spawn`]: The git binary could not be started
//! - [`GitError::CommandFailed`]: git exited non-zero
//! - [`GitError::UnexpectedOutput`]: git printed something we cannot parse
//!
//! # Example
//!
//! ```ignore
//! use gitgum::git::Git;
//!
//! let git = Git::new(".");
//! git.ensure_repo()?;
//! let current = git.current_branch()?;
//! for branch in git.local_branches()? {
//!     println!("{} {}", if branch == current { "*" } else { " " }, branch);
//! }
//! ```

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;

use crate::core::types::{CommitId, FileStatus, Remote, Upstream};

/// stderr fragment git prints when a branch has no upstream.
const NO_UPSTREAM: &str = "no upstream configured for branch";

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git working tree.
    #[error("not inside a git repository: {path}")]
    NotARepo {
        /// The directory that was checked
        path: PathBuf,
    },

    /// HEAD is detached.
    #[error("HEAD is detached; check out a branch first")]
    DetachedHead,

    /// The git binary could not be started.
    #[error("failed to run git: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },

    /// git exited with a non-zero status.
    #[error("git {command} failed: {stderr}")]
    CommandFailed {
        /// The arguments, space-joined
        command: String,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Trimmed stderr
        stderr: String,
    },

    /// git printed something we could not interpret.
    #[error("unexpected output from git {command}: {output}")]
    UnexpectedOutput {
        /// The arguments, space-joined
        command: String,
        /// The offending output
        output: String,
    },
}

impl GitError {
    /// The stderr of a failed command, if this is one.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            GitError::CommandFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

/// Captured output of a git command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    /// Trimmed stdout
    pub stdout: String,
    /// Trimmed stderr
    pub stderr: String,
}

impl GitOutput {
    /// Both streams, stdout first, skipping empty ones.
    pub fn combined(&self) -> String {
        [self.stdout.as_str(), self.stderr.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Raw process result before status checking.
struct RawOutput {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: String,
}

/// Snapshot of `git worktree list`, used to find branches that are already
/// checked out somewhere.
#[derive(Debug, Clone, Default)]
pub struct WorktreeListing {
    lines: Vec<String>,
}

impl WorktreeListing {
    /// Wrap raw `git worktree list` output.
    pub fn parse(listing: &str) -> Self {
        Self {
            lines: listing
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// The path of the worktree that has `branch` attached, if any.
    ///
    /// A line matches when it contains `[<branch>]` or ` <branch> `.
    pub fn attached(&self, branch: &str) -> Option<PathBuf> {
        let bracketed = format!("[{}]", branch);
        let spaced = format!(" {} ", branch);
        self.lines
            .iter()
            .find(|line| line.contains(&bracketed) || line.contains(&spaced))
            .and_then(|line| line.split_whitespace().next())
            .map(PathBuf::from)
    }
}

/// The Git interface.
///
/// This is the **single point of interaction** with git. All repository
/// reads and writes flow through it.
#[derive(Debug, Clone)]
pub struct Git {
    /// Directory every command runs in
    work_dir: PathBuf,
}

impl Git {
    // =========================================================================
    // Construction and plumbing
    // =========================================================================

    /// Create an interface that runs git in `work_dir`.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    /// The directory commands run in.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn raw_in(&self, dir: &Path, args: &[&str]) -> Result<RawOutput, GitError> {
        tracing::debug!(?args, dir = %dir.display(), "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("LC_ALL", "C")
            .output()
            .map_err(|source| GitError::Spawn { source })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            tracing::debug!(?args, code = ?output.status.code(), %stderr, "git failed");
        }
        Ok(RawOutput {
            status: output.status,
            stdout: output.stdout,
            stderr,
        })
    }

    fn raw(&self, args: &[&str]) -> Result<RawOutput, GitError> {
        self.raw_in(&self.work_dir, args)
    }

    fn check(args: &[&str], raw: RawOutput) -> Result<RawOutput, GitError> {
        if raw.status.success() {
            Ok(raw)
        } else {
            Err(GitError::CommandFailed {
                command: args.join(" "),
                code: raw.status.code(),
                stderr: raw.stderr,
            })
        }
    }

    /// Run git and return both streams, failing on non-zero exit.
    fn run(&self, args: &[&str]) -> Result<GitOutput, GitError> {
        let raw = Self::check(args, self.raw(args)?)?;
        Ok(GitOutput {
            stdout: String::from_utf8_lossy(&raw.stdout).trim().to_string(),
            stderr: raw.stderr,
        })
    }

    /// Run git and return trimmed stdout.
    fn stdout(&self, args: &[&str]) -> Result<String, GitError> {
        self.run(args).map(|o| o.stdout)
    }

    fn lines(&self, args: &[&str]) -> Result<Vec<String>, GitError> {
        Ok(split_lines(&self.stdout(args)?))
    }

    fn color_args(color: bool) -> &'static [&'static str] {
        if color {
            &["-c", "color.ui=always"]
        } else {
            &[]
        }
    }

    // =========================================================================
    // Repository queries
    // =========================================================================

    /// Whether the working directory is inside a working tree.
    pub fn in_repo(&self) -> Result<bool, GitError> {
        let raw = self.raw(&["rev-parse", "--is-inside-work-tree"])?;
        Ok(raw.status.success() && String::from_utf8_lossy(&raw.stdout).trim() == "true")
    }

    /// Fail with [`GitError::NotARepo`] unless inside a working tree.
    pub fn ensure_repo(&self) -> Result<(), GitError> {
        if self.in_repo()? {
            Ok(())
        } else {
            Err(GitError::NotARepo {
                path: self.work_dir.clone(),
            })
        }
    }

    /// Absolute path of the working tree root.
    pub fn toplevel(&self) -> Result<PathBuf, GitError> {
        self.stdout(&["rev-parse", "--show-toplevel"])
            .map(PathBuf::from)
    }

    /// The short name of the checked-out branch.
    pub fn current_branch(&self) -> Result<String, GitError> {
        let name = self.stdout(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        if name == "HEAD" {
            return Err(GitError::DetachedHead);
        }
        Ok(name)
    }

    /// Local branch names, current and worktree markers stripped.
    pub fn local_branches(&self) -> Result<Vec<String>, GitError> {
        Ok(parse_branch_list(&self.stdout(&["branch"])?))
    }

    /// Remote names.
    pub fn remotes(&self) -> Result<Vec<String>, GitError> {
        self.lines(&["remote"])
    }

    /// Remote names with URLs, one entry per distinct name and URL.
    pub fn remote_urls(&self) -> Result<Vec<Remote>, GitError> {
        Ok(parse_remote_urls(&self.stdout(&["remote", "-v"])?))
    }

    /// Branches of `remote`, without the `<remote>/` prefix.
    pub fn remote_branches(&self, remote: &str) -> Result<Vec<String>, GitError> {
        Ok(parse_remote_branch_list(
            &self.stdout(&["branch", "-r"])?,
            remote,
        ))
    }

    /// The remote `branch` tracks, or `None` without an upstream.
    pub fn tracking_remote(&self, branch: &str) -> Result<Option<String>, GitError> {
        let spec = format!("{}@{{u}}", branch);
        let args = ["rev-parse", "--abbrev-ref", spec.as_str()];
        let raw = self.raw(&args)?;
        if !raw.status.success() && raw.stderr.contains(NO_UPSTREAM) {
            return Ok(None);
        }
        let raw = Self::check(&args, raw)?;
        let short = String::from_utf8_lossy(&raw.stdout).trim().to_string();
        let upstream = Upstream::parse(&short).map_err(|_| GitError::UnexpectedOutput {
            command: args.join(" "),
            output: short.clone(),
        })?;
        Ok(Some(upstream.remote))
    }

    /// The upstream of `branch` as `<remote>/<branch>`, or `None`.
    pub fn upstream_short(&self, branch: &str) -> Result<Option<Upstream>, GitError> {
        let refname = format!("refs/heads/{}", branch);
        let args = ["for-each-ref", "--format=%(upstream:short)", refname.as_str()];
        let short = self.stdout(&args)?;
        if short.is_empty() {
            return Ok(None);
        }
        Upstream::parse(&short)
            .map(Some)
            .map_err(|_| GitError::UnexpectedOutput {
                command: args.join(" "),
                output: short,
            })
    }

    /// The upstream of the current branch as a short name, or `None`.
    pub fn current_upstream(&self) -> Result<Option<String>, GitError> {
        let args = ["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"];
        let raw = self.raw(&args)?;
        if !raw.status.success() && raw.stderr.contains(NO_UPSTREAM) {
            return Ok(None);
        }
        let raw = Self::check(&args, raw)?;
        let short = String::from_utf8_lossy(&raw.stdout).trim().to_string();
        Ok(Some(short).filter(|s| !s.is_empty()))
    }

    /// The commit a ref points to.
    pub fn commit_of(&self, reference: &str) -> Result<CommitId, GitError> {
        let spec = format!("{}^{{commit}}", reference);
        self.stdout(&["rev-parse", "--verify", spec.as_str()])
            .map(CommitId::new)
    }

    /// Whether `remote` has a branch named `branch`, asking the remote itself.
    pub fn remote_has_branch(&self, remote: &str, branch: &str) -> Result<bool, GitError> {
        let args = ["ls-remote", "--exit-code", "--heads", remote, branch];
        let raw = self.raw(&args)?;
        match raw.status.code() {
            Some(0) => Ok(true),
            // --exit-code reports "no matching refs" as 2
            Some(2) => Ok(false),
            _ => Self::check(&args, raw).map(|_| false),
        }
    }

    /// Whether a local branch exists.
    pub fn branch_exists(&self, name: &str) -> Result<bool, GitError> {
        let out = self.stdout(&["branch", "--list", name, "--format=%(refname:short)"])?;
        Ok(!out.is_empty())
    }

    /// Whether `local` has commits that `remote_ref` does not.
    pub fn ahead_of(&self, local: &str, remote_ref: &str) -> Result<bool, GitError> {
        let range = format!("{}..{}", remote_ref, local);
        let count = self.stdout(&["rev-list", "--count", range.as_str()])?;
        let count: u64 = count.parse().map_err(|_| GitError::UnexpectedOutput {
            command: format!("rev-list --count {}", range),
            output: count.clone(),
        })?;
        Ok(count > 0)
    }

    /// Snapshot of the worktree listing.
    pub fn worktree_listing(&self) -> Result<WorktreeListing, GitError> {
        Ok(WorktreeListing::parse(&self.stdout(&["worktree", "list"])?))
    }

    /// The worktree `branch` is checked out in, if any.
    pub fn worktree_for(&self, branch: &str) -> Result<Option<PathBuf>, GitError> {
        Ok(self.worktree_listing()?.attached(branch))
    }

    /// Whether `dir` has changes to tracked files. Untracked files alone do
    /// not count.
    pub fn dirty(&self, dir: &Path) -> Result<bool, GitError> {
        let args = ["status", "--porcelain=v1"];
        let raw = Self::check(&args, self.raw_in(dir, &args)?)?;
        Ok(String::from_utf8_lossy(&raw.stdout)
            .lines()
            .any(|line| !line.trim().is_empty() && !line.starts_with("??")))
    }

    /// Status of a single path.
    pub fn file_status(&self, path: &str) -> Result<FileStatus, GitError> {
        let args = ["status", "--porcelain", "--", path];
        // Leading spaces are significant, so stdout is not trimmed here.
        let raw = Self::check(&args, self.raw(&args)?)?;
        let stdout = String::from_utf8_lossy(&raw.stdout);
        Ok(stdout
            .lines()
            .next()
            .map(FileStatus::from_porcelain)
            .unwrap_or(FileStatus::Unknown))
    }

    /// Paths with unstaged (`cached == false`) or staged changes.
    pub fn diff_names(&self, cached: bool) -> Result<Vec<String>, GitError> {
        if cached {
            self.lines(&["diff", "--cached", "--name-only"])
        } else {
            self.lines(&["diff", "--name-only"])
        }
    }

    /// Paths `git clean -fd` would remove.
    pub fn clean_preview(&self, ignored: bool) -> Result<Vec<String>, GitError> {
        let mut args = vec!["clean", "-fdn"];
        if ignored {
            args.push("-x");
        }
        Ok(self
            .lines(&args)?
            .iter()
            .filter_map(|line| line.strip_prefix("Would remove "))
            .map(str::to_string)
            .collect())
    }

    /// Contents of a blob, e.g. `HEAD:path` or `:path` (index). `None` when
    /// the object does not exist.
    pub fn show_blob(&self, spec: &str) -> Result<Option<Vec<u8>>, GitError> {
        let exists = self.raw(&["cat-file", "-e", spec])?;
        if !exists.status.success() {
            return Ok(None);
        }
        let args = ["show", spec];
        let raw = Self::check(&args, self.raw(&args)?)?;
        Ok(Some(raw.stdout))
    }

    /// Merge base of two refs.
    pub fn merge_base(&self, a: &str, b: &str) -> Result<CommitId, GitError> {
        let base = self.stdout(&["merge-base", a, b])?;
        if base.is_empty() {
            return Err(GitError::UnexpectedOutput {
                command: format!("merge-base {} {}", a, b),
                output: base,
            });
        }
        Ok(CommitId::new(base))
    }

    /// Commits in `range`, oldest first.
    pub fn rev_list_reverse(&self, range: &str) -> Result<Vec<CommitId>, GitError> {
        Ok(self
            .lines(&["rev-list", "--reverse", range])?
            .into_iter()
            .map(CommitId::new)
            .collect())
    }

    /// Raw `ls-remote` listing of a remote.
    pub fn ls_remote(&self, remote: &str) -> Result<String, GitError> {
        self.stdout(&["ls-remote", remote])
    }

    /// `git branch -vv` output.
    pub fn branch_verbose(&self, color: bool) -> Result<String, GitError> {
        let mut args = Self::color_args(color).to_vec();
        args.extend(["branch", "-vv"]);
        self.stdout(&args)
    }

    /// `git status --short` output.
    pub fn status_short(&self, color: bool) -> Result<String, GitError> {
        let mut args = Self::color_args(color).to_vec();
        args.extend(["status", "--short"]);
        self.stdout(&args)
    }

    /// First line of `git status --short --branch`.
    pub fn status_branch_line(&self, color: bool) -> Result<String, GitError> {
        let mut args = Self::color_args(color).to_vec();
        args.extend(["status", "--short", "--branch"]);
        Ok(self
            .stdout(&args)?
            .lines()
            .next()
            .unwrap_or_default()
            .to_string())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Check out an existing local branch.
    pub fn checkout(&self, branch: &str) -> Result<GitOutput, GitError> {
        self.run(&["checkout", "--quiet", branch])
    }

    /// Create `branch` at `start` and check it out.
    pub fn checkout_new(&self, branch: &str, start: &str) -> Result<GitOutput, GitError> {
        self.run(&["checkout", "--quiet", "-b", branch, start])
    }

    /// Restore a path in index and working tree from HEAD.
    pub fn checkout_path_from_head(&self, path: &str) -> Result<GitOutput, GitError> {
        self.run(&["checkout", "HEAD", "--", path])
    }

    /// Point `branch` at `upstream` (`<remote>/<branch>`).
    pub fn set_upstream(&self, branch: &str, upstream: &str) -> Result<GitOutput, GitError> {
        let flag = format!("--set-upstream-to={}", upstream);
        self.run(&["branch", flag.as_str(), branch])
    }

    /// `git reset --hard [target]`.
    pub fn reset_hard(&self, target: Option<&str>) -> Result<GitOutput, GitError> {
        match target {
            Some(target) => self.run(&["reset", "--hard", target]),
            None => self.run(&["reset", "--hard"]),
        }
    }

    /// `git clean -fd [-x]`.
    pub fn clean(&self, ignored: bool) -> Result<GitOutput, GitError> {
        if ignored {
            self.run(&["clean", "-fd", "-x"])
        } else {
            self.run(&["clean", "-fd"])
        }
    }

    /// Stage a path.
    pub fn add(&self, path: &str) -> Result<GitOutput, GitError> {
        self.run(&["add", "--", path])
    }

    /// Remove a path from the index only.
    pub fn rm_cached(&self, path: &str) -> Result<GitOutput, GitError> {
        self.run(&["rm", "--cached", "--quiet", "--ignore-unmatch", "--", path])
    }

    /// Create an empty commit on the current branch.
    pub fn commit_empty(&self, message: &str) -> Result<GitOutput, GitError> {
        self.run(&["commit", "--allow-empty", "-m", message])
    }

    /// Push the current branch to its upstream.
    pub fn push(&self) -> Result<GitOutput, GitError> {
        self.run(&["push"])
    }

    /// Push `branch` to `remote` without touching the upstream.
    pub fn push_to(&self, remote: &str, branch: &str) -> Result<GitOutput, GitError> {
        self.run(&["push", remote, branch])
    }

    /// Push `branch` to `remote` and record it as the upstream.
    pub fn push_set_upstream(&self, remote: &str, branch: &str) -> Result<GitOutput, GitError> {
        self.run(&["push", "-u", remote, branch])
    }

    /// Delete `branch` on `remote`.
    pub fn push_delete(&self, remote: &str, branch: &str) -> Result<GitOutput, GitError> {
        self.run(&["push", "--delete", remote, branch])
    }

    /// Delete a local branch; `force` skips the merged check.
    pub fn branch_delete(&self, name: &str, force: bool) -> Result<GitOutput, GitError> {
        let flag = if force { "-D" } else { "-d" };
        self.run(&["branch", flag, name])
    }

    /// Fetch `refspec` from `remote` into FETCH_HEAD.
    pub fn fetch(&self, remote: &str, refspec: &str) -> Result<GitOutput, GitError> {
        self.run(&["fetch", remote, refspec])
    }
}

/// Split output into trimmed, non-empty lines.
pub fn split_lines(s: &str) -> Vec<String> {
    s.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `git branch` output.
fn parse_branch_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix("* ")
                .or_else(|| line.strip_prefix("+ "))
                .unwrap_or(line)
                .trim()
        })
        // "(HEAD detached at ...)" is not a branch
        .filter(|name| !name.is_empty() && !name.starts_with('('))
        .map(str::to_string)
        .collect()
}

/// Parse `git branch -r` output for one remote.
fn parse_remote_branch_list(stdout: &str, remote: &str) -> Vec<String> {
    let prefix = format!("{}/", remote);
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.contains("HEAD ->"))
        .filter_map(|line| line.strip_prefix(&prefix))
        .filter(|branch| !branch.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `git remote -v` output into unique name/URL pairs.
fn parse_remote_urls(stdout: &str) -> Vec<Remote> {
    let mut remotes: Vec<Remote> = Vec::new();
    for line in stdout.lines() {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(url)) = (fields.next(), fields.next()) else {
            continue;
        };
        let remote = Remote {
            name: name.to_string(),
            url: url.to_string(),
        };
        if !remotes.contains(&remote) {
            remotes.push(remote);
        }
    }
    remotes
}
