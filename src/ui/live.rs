//! ui::live
//!
//! A growing option list shared between producers and the picker.
//!
//! # Design
//!
//! One mutex guards the items, the dedup set, a generation counter and the
//! closed flag. Writers hold it only for check-and-insert; the picker holds
//! it only to take a snapshot. The generation counter lets the picker skip
//! re-filtering when nothing changed.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct LiveInner {
    items: Vec<String>,
    seen: HashSet<String>,
    generation: u64,
    closed: bool,
}

/// A point-in-time copy of a [`LiveList`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Items in insertion order
    pub items: Vec<String>,
    /// Incremented on every successful insert and on close
    pub generation: u64,
    /// No more items will arrive
    pub closed: bool,
}

/// Shared, deduplicating, append-only list of picker options.
///
/// Clones share the same underlying list.
#[derive(Debug, Clone, Default)]
pub struct LiveList {
    inner: Arc<Mutex<LiveInner>>,
}

impl LiveList {
    /// An empty, open list.
    pub fn new() -> Self {
        Self::default()
    }

    /// A closed list holding `items` (duplicates dropped).
    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = Self::new();
        for item in items {
            list.push_unique(item);
        }
        list.close();
        list
    }

    fn lock(&self) -> MutexGuard<'_, LiveInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `item` unless an identical item was seen before.
    ///
    /// Returns whether the item was added.
    pub fn push_unique(&self, item: impl Into<String>) -> bool {
        let item = item.into();
        let mut inner = self.lock();
        if inner.closed || inner.seen.contains(&item) {
            return false;
        }
        inner.seen.insert(item.clone());
        inner.items.push(item);
        inner.generation += 1;
        true
    }

    /// Whether `item` is already in the list.
    pub fn contains(&self, item: &str) -> bool {
        self.lock().seen.contains(item)
    }

    /// Mark the list complete. Later pushes are ignored.
    pub fn close(&self) {
        let mut inner = self.lock();
        if !inner.closed {
            inner.closed = true;
            inner.generation += 1;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current generation without copying items.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Copy the current state.
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.lock();
        Snapshot {
            items: inner.items.clone(),
            generation: inner.generation,
            closed: inner.closed,
        }
    }
}
