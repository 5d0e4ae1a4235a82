//! engine
//!
//! Execution context shared by every command, the typed precondition
//! errors, and the streaming branch enumerator.
//!
//! # Architecture
//!
//! Command handlers in [`crate::cli::commands`] receive a [`Context`] and a
//! [`crate::ui::prompts::Prompter`]. They check preconditions through
//! [`Context::repo`] and friends, gather input, and only then mutate the
//! repository through [`crate::git::Git`].
//!
//! # Invariants
//!
//! - No mutation runs while enumeration producers are live
//! - Mutations are issued one at a time from the handler's thread
//! - A declined safety prompt is [`CommandError::Aborted`], never a silent
//!   success

pub mod enumerate;

pub use enumerate::{stream_candidates, EnumerateRequest, CHANNEL_CAPACITY};

use std::path::PathBuf;

use thiserror::Error;

use crate::core::config::Config;
use crate::git::{Git, GitError};
use crate::ui::output::Verbosity;

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags and the config file.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Invocation name (basename of argv[0]).
    pub program: String,
    /// Loaded configuration.
    pub config: Config,
}

impl Context {
    /// The directory git runs in.
    pub fn work_dir(&self) -> PathBuf {
        self.cwd.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// A git interface rooted at [`Context::work_dir`].
    pub fn git(&self) -> Git {
        Git::new(self.work_dir())
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// A git interface, failing unless the working directory is inside a
    /// working tree.
    pub fn repo(&self) -> Result<Git, CommandError> {
        let git = self.git();
        match git.ensure_repo() {
            Ok(()) => Ok(git),
            Err(GitError::NotARepo { path }) => Err(CommandError::NotInRepo(path)),
            Err(e) => Err(e.into()),
        }
    }

    /// Fail with [`CommandError::DirtyTree`] if tracked files have changes.
    pub fn ensure_clean(&self, git: &Git) -> Result<(), CommandError> {
        if git.dirty(git.work_dir())? {
            return Err(CommandError::DirtyTree);
        }
        Ok(())
    }
}

/// Precondition failures and user aborts.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("not inside a git repository: {}", .0.display())]
    NotInRepo(PathBuf),

    #[error(
        "You have local changes that would be overwritten by switching branches. \
         Please commit or stash them before switching."
    )]
    DirtyTree,

    #[error("no remotes configured")]
    NoRemotes,

    #[error("no {0} to choose from")]
    NoBranches(&'static str),

    /// The user declined a safety prompt.
    #[error("{0}")]
    Aborted(String),

    #[error(transparent)]
    Git(#[from] GitError),
}

impl CommandError {
    pub fn aborted(message: impl Into<String>) -> Self {
        CommandError::Aborted(message.into())
    }
}
