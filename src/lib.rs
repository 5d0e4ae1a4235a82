//! gitgum - fuzzy-selection menus for everyday git branch workflows
//!
//! gitgum wraps the `git` binary with interactive pickers for switching
//! branches, checking out pull requests, deleting branches, cleaning the
//! working tree, pushing, and a few small helpers.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, runs handlers)
//! - [`engine`] - Execution context, precondition errors, branch enumeration
//! - [`core`] - Domain types, PR refs, configuration
//! - [`git`] - Single interface for all Git operations
//! - [`ui`] - Pickers, confirmations and output
//!
//! # Safety Invariants
//!
//! 1. Checkouts never overwrite local changes to tracked files
//! 2. A branch attached to another worktree is never offered for checkout
//! 3. Declining or dismissing a safety prompt never mutates the repository
//! 4. Mutations run one at a time, after every picker has returned

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod ui;
