//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! User-facing messages go to stdout and respect the quiet flag; warnings
//! and errors go to stderr. Diagnostics are not printed here, they go
//! through `tracing`.

use std::fmt::Display;

/// ANSI SGR sequence used for section headers (black foreground).
pub const HEADER_COLOR: &str = "\x1b[0;30m";
/// ANSI SGR reset.
pub const RESET: &str = "\x1b[0m";

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print a success message (respects quiet mode).
pub fn success(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a coloured section header (always shown; `status` output is the
/// command's payload).
pub fn header(title: &str) {
    println!("{}", format_header(title));
}

/// `--- TITLE ------...` padded to a fixed width and wrapped in the header
/// colour.
pub fn format_header(title: &str) -> String {
    let text = format!("--- {} ", title);
    let pad = 40usize.saturating_sub(text.len());
    format!("{}{}{}{}", HEADER_COLOR, text, "-".repeat(pad), RESET)
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format at most `max` items with a trailing `... and N more files` line.
pub fn format_capped<T: Display>(items: &[T], prefix: &str, max: usize) -> String {
    let shown = items.len().min(max);
    let mut out = format_list(&items[..shown], prefix);
    if items.len() > shown {
        out.push_str(&format!(
            "\n{}... and {} more files",
            prefix,
            items.len() - shown
        ));
    }
    out
}
