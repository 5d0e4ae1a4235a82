//! ui::finder
//!
//! In-process fuzzy finder over a [`LiveList`] that may still be growing.
//!
//! The finder draws on stderr in the alternate screen, so stdout stays clean
//! for the command's own output. It re-filters whenever the list generation
//! changes and keeps the highlighted entry stable while new entries stream
//! in. A spinner next to the match counter shows that producers are still
//! running.
//!
//! Keys: type to filter, Up/Down (or Ctrl-P/Ctrl-N, Ctrl-K/Ctrl-J) to move,
//! Enter to accept, Esc/Ctrl-C/Ctrl-G (or Ctrl-D on an empty query) to
//! abort, Ctrl-U to clear the query, Ctrl-W to delete a word.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tokio_util::sync::CancellationToken;

use super::live::{LiveList, Snapshot};
use super::prompts::{matches, PromptError};

const POLL_INTERVAL: Duration = Duration::from_millis(16);
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
/// Header rows above the item list: prompt and counter.
const HEADER_ROWS: u16 = 2;

/// What a key press did to the finder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum KeyOutcome {
    Continue,
    Accept(String),
    Abort,
}

/// Pure finder state: query, items, filter result and cursor.
#[derive(Debug, Default)]
pub(crate) struct FinderState {
    query: String,
    items: Vec<String>,
    /// Indices into `items` that match `query`
    filtered: Vec<usize>,
    /// Position within `filtered`
    cursor: usize,
    /// First visible position within `filtered`
    offset: usize,
    generation: Option<u64>,
    closed: bool,
}

impl FinderState {
    pub(crate) fn refresh(&mut self, snapshot: Snapshot) {
        self.items = snapshot.items;
        self.generation = Some(snapshot.generation);
        self.closed = snapshot.closed;
        self.refilter();
    }

    fn refilter(&mut self) {
        let previous = self.selected().map(str::to_string);
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| matches(&self.query, item))
            .map(|(i, _)| i)
            .collect();

        self.cursor = previous
            .and_then(|sel| self.filtered.iter().position(|&i| self.items[i] == sel))
            .unwrap_or(0);
    }

    pub(crate) fn selected(&self) -> Option<&str> {
        self.filtered
            .get(self.cursor)
            .map(|&i| self.items[i].as_str())
    }

    fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn move_down(&mut self) {
        if self.cursor + 1 < self.filtered.len() {
            self.cursor += 1;
        }
    }

    fn edit_query(&mut self, edit: impl FnOnce(&mut String)) {
        edit(&mut self.query);
        // A new query starts from the top.
        self.filtered.clear();
        self.cursor = 0;
        self.refilter();
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => KeyOutcome::Abort,
            KeyCode::Char('c') | KeyCode::Char('g') | KeyCode::Char('q') if ctrl => {
                KeyOutcome::Abort
            }
            KeyCode::Char('d') if ctrl && self.query.is_empty() => KeyOutcome::Abort,
            KeyCode::Enter => match self.selected() {
                Some(item) => KeyOutcome::Accept(item.to_string()),
                None => KeyOutcome::Continue,
            },
            KeyCode::Up => {
                self.move_up();
                KeyOutcome::Continue
            }
            KeyCode::Down => {
                self.move_down();
                KeyOutcome::Continue
            }
            KeyCode::Char('p') | KeyCode::Char('k') if ctrl => {
                self.move_up();
                KeyOutcome::Continue
            }
            KeyCode::Char('n') | KeyCode::Char('j') if ctrl => {
                self.move_down();
                KeyOutcome::Continue
            }
            KeyCode::Char('u') if ctrl => {
                self.edit_query(String::clear);
                KeyOutcome::Continue
            }
            KeyCode::Char('w') if ctrl => {
                self.edit_query(|q| {
                    let trimmed = q.trim_end().len();
                    let cut = q[..trimmed].rfind(char::is_whitespace).map_or(0, |i| i + 1);
                    q.truncate(cut);
                });
                KeyOutcome::Continue
            }
            KeyCode::Backspace => {
                self.edit_query(|q| {
                    q.pop();
                });
                KeyOutcome::Continue
            }
            KeyCode::Char(c) if !ctrl => {
                self.edit_query(|q| q.push(c));
                KeyOutcome::Continue
            }
            _ => KeyOutcome::Continue,
        }
    }

    /// Keep the cursor inside a window of `height` rows.
    fn scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }
        let max_offset = self.filtered.len().saturating_sub(height);
        self.offset = self.offset.min(max_offset);
    }
}

/// Restores the terminal when dropped, including on early returns.
struct TerminalGuard;

impl TerminalGuard {
    fn enter(out: &mut impl Write) -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(out, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stderr(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Interactive finder over a live list.
pub struct Finder<'a> {
    prompt: String,
    list: &'a LiveList,
    cancel: &'a CancellationToken,
}

impl<'a> Finder<'a> {
    pub fn new(prompt: &str, list: &'a LiveList, cancel: &'a CancellationToken) -> Self {
        Self {
            prompt: prompt.to_string(),
            list,
            cancel,
        }
    }

    /// Run until the user accepts an entry or aborts.
    ///
    /// Aborting cancels the token so producers stop as well.
    pub fn run(self) -> Result<String, PromptError> {
        let mut out = io::stderr();
        let _guard = TerminalGuard::enter(&mut out)?;

        let mut state = FinderState::default();
        let mut needs_draw = true;
        let mut tick = 0usize;

        loop {
            if self.cancel.is_cancelled() {
                return Err(PromptError::Cancelled);
            }

            if state.generation != Some(self.list.generation()) {
                state.refresh(self.list.snapshot());
                if state.closed && state.items.is_empty() {
                    return Err(PromptError::NoOptions);
                }
                needs_draw = true;
            }
            if !state.closed {
                tick = tick.wrapping_add(1);
                needs_draw |= tick % 4 == 0;
            }

            if needs_draw {
                self.draw(&mut out, &mut state, tick / 4)?;
                needs_draw = false;
            }

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    match state.handle_key(key) {
                        KeyOutcome::Accept(item) => return Ok(item),
                        KeyOutcome::Abort => {
                            self.cancel.cancel();
                            return Err(PromptError::Cancelled);
                        }
                        KeyOutcome::Continue => needs_draw = true,
                    }
                }
                Event::Resize(..) => needs_draw = true,
                _ => {}
            }
        }
    }

    fn draw(&self, out: &mut impl Write, state: &mut FinderState, frame: usize) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let width = usize::from(cols.max(4));
        let height = usize::from(rows.saturating_sub(HEADER_ROWS));
        state.scroll(height);

        queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;

        let prompt_line = format!("{}: {}", self.prompt, state.query);
        queue!(out, Print(truncate(&prompt_line, width)))?;

        let mut counter = format!("  {}/{}", state.filtered.len(), state.items.len());
        if !state.closed {
            counter.push(' ');
            counter.push_str(SPINNER[frame % SPINNER.len()]);
        }
        queue!(
            out,
            MoveTo(0, 1),
            SetAttribute(Attribute::Dim),
            Print(truncate(&counter, width)),
            SetAttribute(Attribute::Reset)
        )?;

        let visible = state.filtered.iter().skip(state.offset).take(height);
        for (row, &index) in visible.enumerate() {
            let line = truncate(&state.items[index], width - 2);
            let y = HEADER_ROWS + row as u16;
            if state.offset + row == state.cursor {
                queue!(
                    out,
                    MoveTo(0, y),
                    SetAttribute(Attribute::Bold),
                    Print("> "),
                    SetAttribute(Attribute::Reverse),
                    Print(line),
                    SetAttribute(Attribute::Reset)
                )?;
            } else {
                queue!(out, MoveTo(0, y), Print("  "), Print(line))?;
            }
        }

        let cursor_x = prompt_line.chars().count().min(width - 1) as u16;
        queue!(out, MoveTo(cursor_x, 0), Show)?;
        out.flush()
    }
}

fn truncate(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}
