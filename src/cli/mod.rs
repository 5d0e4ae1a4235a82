//! cli
//!
//! Command-line interface layer for gitgum.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Initialise logging and load configuration
//! - Delegate to command handlers
//! - Render errors for the terminal
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to the
//! handlers in [`commands`], which get a [`crate::engine::Context`] and a
//! [`crate::ui::prompts::Prompter`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::Path;

use anyhow::{Context as _, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::engine::{self, CommandError};
use crate::ui::output;
use crate::ui::prompts::{PromptError, TerminalPrompter};

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "GITGUM_LOG";

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let argv: Vec<String> = std::env::args().collect();

    if args::version_requested(&argv) {
        println!("gitgum {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let cli = Cli::parse_from(&argv);
    init_logging(cli.debug);

    let config = Config::load().context("failed to load configuration")?;
    if let Some(path) = config.path() {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    let prompter = TerminalPrompter::new(config.fzf(), config.picker_height());
    let ctx = engine::Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
        program: program_name(argv.first().map(String::as_str)),
        config,
    };

    commands::dispatch(cli.command, &ctx, &prompter)
}

/// Install the global tracing subscriber on stderr.
///
/// `GITGUM_LOG` wins; otherwise `--debug` enables gitgum's debug events and
/// everything else stays at `warn`.
pub fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(if debug { "warn,gitgum=debug" } else { "warn" })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Basename of `argv[0]`, falling back to `gitgum`.
pub fn program_name(argv0: Option<&str>) -> String {
    argv0
        .and_then(|arg| Path::new(arg).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("gitgum")
        .to_string()
}

/// The abort cause in an error chain, if the user backed out.
pub fn abort_cause(err: &anyhow::Error) -> Option<String> {
    err.chain().find_map(|cause| {
        if let Some(PromptError::Cancelled) = cause.downcast_ref::<PromptError>() {
            return Some(cause.to_string());
        }
        match cause.downcast_ref::<CommandError>() {
            Some(CommandError::Aborted(message)) => Some(message.clone()),
            _ => None,
        }
    })
}

/// Print an error for the user: `aborted: ...` for user aborts, otherwise
/// `error: ...` followed by one `caused by:` line per source.
pub fn report(err: &anyhow::Error) {
    if let Some(message) = abort_cause(err) {
        eprintln!("aborted: {}", message);
        return;
    }
    output::error(err);
    for cause in err.chain().skip(1) {
        eprintln!("caused by: {}", cause);
    }
}
