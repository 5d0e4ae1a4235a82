//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version` / `-v`: Show version (also accepted without a subcommand)
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// gitgum - fuzzy-selection menus for everyday git branch workflows
#[derive(Parser, Debug)]
#[command(name = "gitgum")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Print version
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,

    /// Run as if gitgum was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Switch to a branch interactively
    #[command(
        name = "switch",
        long_about = "Switch to a branch interactively.\n\n\
            Lists local branches and the branches of every remote in a fuzzy finder \
            that fills in while remotes are still being read. Picking a remote branch \
            creates a local tracking branch, or reconciles the existing local branch \
            with the chosen remote.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Pick a branch
    gitgum switch

FINDER KEYS:
    type to filter (space-separated words, any order, case-insensitive)
    Up/Down, Ctrl-P/Ctrl-N   move
    Enter                    switch
    Esc, Ctrl-C              abort"
    )]
    Switch,

    /// Checkout a pull request from a remote repository
    #[command(
        name = "checkout-pr",
        long_about = "Checkout a pull request from a remote repository.\n\n\
            Lists refs/pull/<n>/head (or merge) refs advertised by the chosen remote \
            and checks the selected one out as local branch pr-<n>."
    )]
    CheckoutPr,

    /// Show the status of the current git repository
    Status,

    /// Push the current branch to a remote repository
    Push,

    /// Discard working tree changes and untracked files
    #[command(
        name = "clean",
        long_about = "Discard working tree changes and untracked files.\n\n\
            By default tracked changes are reset and untracked files removed; ignored \
            files are kept. The affected files are listed and confirmed before anything \
            is discarded. Changes to .gitignore files are applied first so the preview \
            reflects the rules that will be in effect.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Reset changes and remove untracked files, after confirmation
    gitgum clean

    # Only remove untracked files, no prompt
    gitgum clean --changes=false -y

    # Everything, ignored files included
    gitgum clean --all"
    )]
    Clean {
        /// Discard staged and unstaged changes (default: true)
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        changes: Option<bool>,

        /// Remove untracked files (default: true)
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        untracked: Option<bool>,

        /// Remove ignored files; implies --untracked (default: false)
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        ignored: Option<bool>,

        /// Enable all cleanup options
        #[arg(long)]
        all: bool,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete a local branch and optionally its remote tracking branch
    Delete,

    /// List commits on branch A since divergence from trunk B
    #[command(
        name = "replay-list",
        after_help = "\
WORKFLOW EXAMPLES:
    # Commits to replay from feature onto main, oldest first
    gitgum replay-list feature main"
    )]
    ReplayList {
        /// Branch whose commits are listed
        a: String,
        /// Trunk branch
        b: String,
    },

    /// Create an empty commit and optionally push it
    Empty,

    /// Output shell completion script
    #[command(
        name = "completion",
        after_help = "\
INSTALLATION:
    # Bash
    gitgum completion bash > ~/.local/share/bash-completion/completions/gitgum

    # Zsh
    gitgum completion zsh > \"${fpath[1]}/_gitgum\"

    # Fish
    gitgum completion fish > ~/.config/fish/completions/gitgum.fish

    # PowerShell
    gitgum completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

/// Whether the raw arguments ask for the version anywhere.
///
/// Checked before clap runs so `-v` works without a subcommand and next to
/// any of them.
pub fn version_requested<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .skip(1)
        .any(|arg| matches!(arg.as_ref(), "-v" | "--version"))
}
