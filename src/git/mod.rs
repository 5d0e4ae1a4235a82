//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. Everything else asks the
//! [`Git`] struct, which shells out to the `git` binary and turns exit
//! codes into typed errors.
//!
//! # Responsibilities
//!
//! - Repository detection and branch/remote/worktree listing
//! - Ref resolution and comparison
//! - Working tree state (dirtiness, per-file status, clean previews)
//! - Checkouts, resets, pushes, deletes and fetches
//!
//! # Invariants
//!
//! - `Git` holds no mutable state
//! - Every non-zero exit surfaces as [`GitError::CommandFailed`] with stderr
//! - Untracked files never make a tree dirty

mod interface;

pub use interface::{split_lines, Git, GitError, GitOutput, WorktreeListing};
