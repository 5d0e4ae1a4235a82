//! ui::prompts
//!
//! Interactive prompts and confirmations.
//!
//! # Design
//!
//! Every command talks to the user through the [`Prompter`] trait, so the
//! orchestrators can be driven by [`crate::ui::scripted::ScriptedPrompter`]
//! in tests. [`TerminalPrompter`] is the real implementation: static lists
//! go through the external `fzf` binary, the growing branch list goes
//! through the in-process [`crate::ui::finder::Finder`].
//!
//! A cancelled prompt (Esc, Ctrl-C, empty selection) is always
//! [`PromptError::Cancelled`], never the default answer.

use std::io::{IsTerminal, Write};
use std::process::{Command, Stdio};

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::finder::Finder;
use super::live::LiveList;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("no options provided")]
    NoOptions,

    #[error("fuzzy selector '{0}' not found in PATH")]
    Unavailable(String),

    #[error("fuzzy selector failed: {0}")]
    Failed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Whether `item` matches `query`.
///
/// The query is split on whitespace; every token must occur in the item as
/// a case-insensitive substring. An empty query matches everything.
///
/// # Example
///
/// ```
/// use gitgum::ui::prompts::matches;
///
/// assert!(matches("orig feat", "remote: origin/feature"));
/// assert!(matches("FEAT", "local: feature"));
/// assert!(!matches("feat xyz", "local: feature"));
/// ```
pub fn matches(query: &str, item: &str) -> bool {
    let item = item.to_lowercase();
    query
        .split_whitespace()
        .all(|token| item.contains(&token.to_lowercase()))
}

/// Yes/no options with the default first.
pub fn confirm_options(default: bool) -> [&'static str; 2] {
    if default {
        ["yes", "no"]
    } else {
        ["no", "yes"]
    }
}

/// User interaction surface.
pub trait Prompter {
    /// Pick one of `options`.
    fn select(&self, prompt: &str, options: &[String]) -> Result<String, PromptError>;

    /// Pick one entry of a list that may still be growing.
    ///
    /// Implementations return [`PromptError::Cancelled`] once `cancel` fires
    /// and [`PromptError::NoOptions`] when the list closes empty.
    fn select_live(
        &self,
        prompt: &str,
        list: &LiveList,
        cancel: &CancellationToken,
    ) -> Result<String, PromptError>;

    /// Ask a yes/no question. The default answer is listed first; dismissing
    /// the prompt is [`PromptError::Cancelled`], not the default.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, PromptError> {
        let options: Vec<String> = confirm_options(default)
            .iter()
            .map(|s| s.to_string())
            .collect();
        Ok(self.select(prompt, &options)? == "yes")
    }
}

/// Prompter for a real terminal.
#[derive(Debug, Clone)]
pub struct TerminalPrompter {
    fzf: String,
    height: String,
}

impl TerminalPrompter {
    /// `fzf` is the selector binary; `height` is passed to `--height`.
    pub fn new(fzf: impl Into<String>, height: impl Into<String>) -> Self {
        Self {
            fzf: fzf.into(),
            height: height.into(),
        }
    }

    fn run_fzf(&self, prompt: &str, options: &[String]) -> Result<String, PromptError> {
        let binary =
            which::which(&self.fzf).map_err(|_| PromptError::Unavailable(self.fzf.clone()))?;

        let mut child = Command::new(binary)
            .arg("--prompt")
            .arg(format!("{}: ", prompt))
            .arg(format!("--height={}", self.height))
            .arg("--layout=reverse")
            .arg("--border=top")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // fzf may exit before reading everything (e.g. immediate Esc)
            match stdin.write_all(options.join("\n").as_bytes()) {
                Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(e.into()),
                _ => {}
            }
        }

        let output = child.wait_with_output()?;
        match output.status.code() {
            Some(0) => {}
            // 1: no match, 130: interrupted
            Some(1) | Some(130) | None => return Err(PromptError::Cancelled),
            Some(code) => {
                return Err(PromptError::Failed(format!("exit status {}", code)));
            }
        }

        let selected = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if selected.is_empty() {
            return Err(PromptError::Cancelled);
        }
        Ok(selected)
    }
}

impl Prompter for TerminalPrompter {
    fn select(&self, prompt: &str, options: &[String]) -> Result<String, PromptError> {
        if options.is_empty() {
            return Err(PromptError::NoOptions);
        }
        tracing::debug!(prompt, count = options.len(), "fzf select");
        self.run_fzf(prompt, options)
    }

    fn select_live(
        &self,
        prompt: &str,
        list: &LiveList,
        cancel: &CancellationToken,
    ) -> Result<String, PromptError> {
        if !std::io::stdin().is_terminal() || !std::io::stderr().is_terminal() {
            return Err(PromptError::NotInteractive);
        }
        Finder::new(prompt, list, cancel).run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_matches_everything() {
        assert!(matches("", "anything"));
        assert!(matches("   ", "anything"));
    }

    #[test]
    fn tokens_are_anded_and_unordered() {
        assert!(matches("topic origin", "remote: origin/topic"));
        assert!(!matches("topic upstream", "remote: origin/topic"));
    }

    #[test]
    fn case_insensitive_both_ways() {
        assert!(matches("readme", "local: README-fix"));
        assert!(matches("README", "local: readme-fix"));
    }

    #[test]
    fn substring_not_prefix() {
        assert!(matches("ture", "local: feature"));
    }

    #[test]
    fn confirm_orders_default_first() {
        assert_eq!(confirm_options(true), ["yes", "no"]);
        assert_eq!(confirm_options(false), ["no", "yes"]);
    }

    #[test]
    fn missing_binary_is_unavailable() {
        let prompter = TerminalPrompter::new("gitgum-no-such-selector", "40%");
        let result = prompter.select("Pick", &["a".to_string()]);
        assert!(matches!(result, Err(PromptError::Unavailable(_))));
    }

    #[test]
    fn empty_options_rejected() {
        let prompter = TerminalPrompter::new("fzf", "40%");
        assert!(matches!(
            prompter.select("Pick", &[]),
            Err(PromptError::NoOptions)
        ));
    }
}
