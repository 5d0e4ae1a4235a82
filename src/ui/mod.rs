//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`prompts`] - The [`prompts::Prompter`] trait, the fzf-backed prompter
//!   and the matching rule
//! - [`finder`] - In-process finder over a growing list
//! - [`live`] - The shared, deduplicating option list
//! - [`scripted`] - Canned-reply prompter for tests
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All output and prompts go through this module. Commands receive a
//! `&dyn Prompter`, so they never know whether a human or a script answers.

pub mod finder;
pub mod live;
pub mod output;
pub mod prompts;
pub mod scripted;
