//! ui::scripted
//!
//! A [`Prompter`] that replays canned replies, for driving the interactive
//! commands from tests.
//!
//! Every prompt is recorded together with the options it offered, in the
//! order they were offered, so tests can assert on both the questions asked
//! and the candidate lists.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use super::live::LiveList;
use super::prompts::{matches, PromptError, Prompter};

const LIVE_POLL: Duration = Duration::from_millis(5);
const LIVE_TIMEOUT: Duration = Duration::from_secs(10);

/// One canned answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Pick exactly this option.
    Choose(String),
    /// Pick the first option matching this query.
    ChooseMatching(String),
    /// Answer "yes".
    Yes,
    /// Answer "no".
    No,
    /// Dismiss the prompt.
    Cancel,
}

/// A prompt that was shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRecord {
    pub prompt: String,
    pub options: Vec<String>,
}

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<Reply>,
    transcript: Vec<PromptRecord>,
}

/// Prompter backed by a reply queue.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    script: Mutex<Script>,
}

impl ScriptedPrompter {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            script: Mutex::new(Script {
                replies: replies.into_iter().collect(),
                transcript: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every prompt shown so far.
    pub fn transcript(&self) -> Vec<PromptRecord> {
        self.lock().transcript.clone()
    }

    /// Replies not consumed yet.
    pub fn remaining(&self) -> usize {
        self.lock().replies.len()
    }

    fn answer(&self, prompt: &str, options: Vec<String>) -> Result<String, PromptError> {
        let mut script = self.lock();
        script.transcript.push(PromptRecord {
            prompt: prompt.to_string(),
            options: options.clone(),
        });

        let reply = script
            .replies
            .pop_front()
            .ok_or_else(|| PromptError::Failed(format!("no scripted reply for '{}'", prompt)))?;

        let wanted = match reply {
            Reply::Cancel => return Err(PromptError::Cancelled),
            Reply::Yes => return pick(&options, |o| o == "yes", prompt),
            Reply::No => return pick(&options, |o| o == "no", prompt),
            Reply::Choose(choice) => choice,
            Reply::ChooseMatching(query) => {
                return pick(&options, |o| matches(&query, o), prompt);
            }
        };
        pick(&options, |o| o == wanted, prompt)
    }
}

fn pick(
    options: &[String],
    accept: impl Fn(&str) -> bool,
    prompt: &str,
) -> Result<String, PromptError> {
    options
        .iter()
        .find(|o| accept(o))
        .cloned()
        .ok_or_else(|| {
            PromptError::Failed(format!(
                "scripted reply for '{}' matches none of {:?}",
                prompt, options
            ))
        })
}

impl Prompter for ScriptedPrompter {
    fn select(&self, prompt: &str, options: &[String]) -> Result<String, PromptError> {
        if options.is_empty() {
            return Err(PromptError::NoOptions);
        }
        self.answer(prompt, options.to_vec())
    }

    /// Waits for the list to close so the recorded options are complete.
    fn select_live(
        &self,
        prompt: &str,
        list: &LiveList,
        cancel: &CancellationToken,
    ) -> Result<String, PromptError> {
        let deadline = Instant::now() + LIVE_TIMEOUT;
        while !list.is_closed() {
            if cancel.is_cancelled() {
                return Err(PromptError::Cancelled);
            }
            if Instant::now() > deadline {
                return Err(PromptError::Failed("live list never closed".into()));
            }
            thread::sleep(LIVE_POLL);
        }

        let items = list.snapshot().items;
        if items.is_empty() {
            return Err(PromptError::NoOptions);
        }
        let result = self.answer(prompt, items);
        if matches!(result, Err(PromptError::Cancelled)) {
            cancel.cancel();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn replies_are_consumed_in_order() {
        let p = ScriptedPrompter::new([Reply::Choose("b".into()), Reply::No]);
        assert_eq!(p.select("Pick", &opts(&["a", "b"])).unwrap(), "b");
        assert!(!p.confirm("Sure?", true).unwrap());
        assert_eq!(p.remaining(), 0);
    }

    #[test]
    fn transcript_records_option_order() {
        let p = ScriptedPrompter::new([Reply::Yes]);
        p.confirm("Delete?", false).unwrap();
        let transcript = p.transcript();
        assert_eq!(transcript[0].prompt, "Delete?");
        assert_eq!(transcript[0].options, vec!["no", "yes"]);
    }

    #[test]
    fn cancel_is_not_default() {
        let p = ScriptedPrompter::new([Reply::Cancel]);
        assert!(matches!(
            p.confirm("Sure?", true),
            Err(PromptError::Cancelled)
        ));
    }

    #[test]
    fn unknown_choice_fails() {
        let p = ScriptedPrompter::new([Reply::Choose("zzz".into())]);
        assert!(matches!(
            p.select("Pick", &opts(&["a"])),
            Err(PromptError::Failed(_))
        ));
    }

    #[test]
    fn exhausted_script_fails() {
        let p = ScriptedPrompter::new([]);
        assert!(p.select("Pick", &opts(&["a"])).is_err());
    }

    #[test]
    fn live_select_waits_for_close() {
        let list = LiveList::new();
        let cancel = CancellationToken::new();
        let writer = list.clone();
        let handle = thread::spawn(move || {
            writer.push_unique("local: a");
            thread::sleep(Duration::from_millis(20));
            writer.push_unique("local: b");
            writer.close();
        });

        let p = ScriptedPrompter::new([Reply::ChooseMatching("b".into())]);
        assert_eq!(p.select_live("Switch", &list, &cancel).unwrap(), "local: b");
        handle.join().unwrap();
        assert_eq!(p.transcript()[0].options, vec!["local: a", "local: b"]);
    }

    #[test]
    fn live_cancel_fires_token() {
        let list = LiveList::from_items(["local: a"]);
        let cancel = CancellationToken::new();
        let p = ScriptedPrompter::new([Reply::Cancel]);
        assert!(p.select_live("Switch", &list, &cancel).is_err());
        assert!(cancel.is_cancelled());
    }
}
