//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Checks its preconditions through the [`Context`]
//! 2. Gathers choices through the [`Prompter`]
//! 3. Mutates the repository through [`crate::git::Git`], one step at a time
//! 4. Reports what happened via [`crate::ui::output`]
//!
//! # Async Commands
//!
//! Only `switch` needs a runtime: it builds one to stream branch candidates
//! while the finder is open, and drops it before touching the repository.

mod checkout_pr;
mod clean;
mod completion;
mod delete;
mod empty;
mod push;
mod replay_list;
mod status;
mod switch;

// Re-export command functions for testing and direct invocation
pub use checkout_pr::checkout_pr;
pub use clean::{clean, CleanOptions};
pub use completion::{completion, completion_script, PLACEHOLDER};
pub use delete::delete;
pub use empty::{empty, EMPTY_COMMIT_MESSAGE};
pub use push::push;
pub use replay_list::{replay_list, replay_commits};
pub use status::status;
pub use switch::switch;

use crate::cli::args::Command;
use crate::engine::Context;
use crate::ui::prompts::Prompter;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context, prompter: &dyn Prompter) -> Result<()> {
    match command {
        Command::Switch => switch(ctx, prompter),
        Command::CheckoutPr => checkout_pr(ctx, prompter),
        Command::Status => status(ctx),
        Command::Push => push(ctx, prompter),
        Command::Clean {
            changes,
            untracked,
            ignored,
            all,
            yes,
        } => clean(
            ctx,
            prompter,
            CleanOptions::resolve(changes, untracked, ignored, all),
            yes,
        ),
        Command::Delete => delete(ctx, prompter),
        Command::ReplayList { a, b } => replay_list(ctx, &a, &b),
        Command::Empty => empty(ctx, prompter),
        Command::Completion { shell } => completion(ctx, shell),
    }
}
