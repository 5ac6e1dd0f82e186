//! Cadence History - bounded undo/redo stack
//!
//! A linear history with a cursor. Entries behind the cursor can be undone,
//! entries ahead of it can be redone.
//!
//! # Features
//!
//! - **No branching timelines**: pushing after undos discards the redo branch
//! - **Bounded memory**: a maximum depth, enforced by FIFO eviction
//! - **Cursor-safe eviction**: only the oldest undoable entry is evicted
//! - **Fallible steps**: the cursor moves only when the step closure succeeds
//!
//! # Example
//!
//! ```rust
//! use cadence_history::History;
//!
//! let mut history = History::new(2);
//! history.push("a");
//! history.push("b");
//! let displaced = history.push("c");
//! assert_eq!(displaced.evicted, vec!["a"]);
//!
//! // Undo "c"
//! let undone = history.try_undo(|entry| Ok::<_, ()>(*entry));
//! assert_eq!(undone, Some(Ok("c")));
//! assert_eq!(history.redo_depth(), 1);
//!
//! // Pushing now discards the redo branch
//! let displaced = history.push("d");
//! assert_eq!(displaced.discarded, vec!["c"]);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Linear undo/redo history
///
/// Invariant: `cursor <= entries.len()`. `entries[..cursor]` are undoable,
/// `entries[cursor..]` are redoable.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: VecDeque<T>,
    cursor: usize,
    /// Maximum number of entries (0 = unbounded)
    max_depth: usize,
}

/// Entries removed from the history by a push or a bound change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Displaced<T> {
    /// Oldest undoable entries dropped by the depth bound, oldest first
    pub evicted: Vec<T>,
    /// Redoable entries dropped, nearest to the cursor first
    pub discarded: Vec<T>,
}

impl<T> Default for Displaced<T> {
    fn default() -> Self {
        Self {
            evicted: Vec::new(),
            discarded: Vec::new(),
        }
    }
}

impl<T> Displaced<T> {
    /// Nothing was dropped
    pub fn is_empty(&self) -> bool {
        self.evicted.is_empty() && self.discarded.is_empty()
    }
}

/// Which side of the cursor an entry sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Undoable,
    Redoable,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Undoable => "undoable",
            Side::Redoable => "redoable",
        }
    }
}

impl<T> History<T> {
    /// Create a history holding at most `max_depth` entries
    ///
    /// A depth of 0 means unbounded.
    pub fn new(max_depth: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            max_depth,
        }
    }

    /// A history that never evicts
    pub fn unbounded() -> Self {
        Self::new(0)
    }

    /// Record a new entry at the cursor
    ///
    /// Everything ahead of the cursor is discarded first; then the oldest
    /// entries are evicted until the bound holds again.
    pub fn push(&mut self, entry: T) -> Displaced<T> {
        let discarded = self.entries.drain(self.cursor..).collect();
        self.entries.push_back(entry);
        self.cursor = self.entries.len();
        let evicted = self.evict_overflow();
        Displaced { evicted, discarded }
    }

    /// Undo one step
    ///
    /// Calls `f` on the entry just behind the cursor and moves the cursor
    /// back only if `f` succeeds. Returns `None` when nothing is undoable.
    pub fn try_undo<R, E>(
        &mut self,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        let index = self.cursor.checked_sub(1)?;
        let entry = self.entries.get_mut(index)?;
        let result = f(entry);
        if result.is_ok() {
            self.cursor = index;
        }
        Some(result)
    }

    /// Redo one step
    ///
    /// Calls `f` on the entry at the cursor and advances only if `f`
    /// succeeds. Returns `None` when nothing is redoable.
    pub fn try_redo<R, E>(
        &mut self,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        let index = self.cursor;
        let entry = self.entries.get_mut(index)?;
        let result = f(entry);
        if result.is_ok() {
            self.cursor = index + 1;
        }
        Some(result)
    }

    /// The entry the next undo would act on
    pub fn peek_undo(&self) -> Option<&T> {
        self.cursor.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// The entry the next redo would act on
    pub fn peek_redo(&self) -> Option<&T> {
        self.entries.get(self.cursor)
    }

    /// Entries behind the cursor
    pub fn undo_depth(&self) -> usize {
        self.cursor
    }

    /// Entries ahead of the cursor
    pub fn redo_depth(&self) -> usize {
        self.entries.len() - self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum depth, `None` when unbounded
    pub fn capacity(&self) -> Option<usize> {
        (self.max_depth > 0).then_some(self.max_depth)
    }

    /// Change the depth bound, trimming immediately if needed
    ///
    /// Oldest undoable entries go first, but the entry just behind the
    /// cursor is spared while a redo entry exists. The redo branch is then
    /// cut from its far end, sparing the entry at the cursor. Only a bound
    /// of one can force out a cursor-adjacent entry, and then the undoable
    /// one goes.
    pub fn set_max_depth(&mut self, max_depth: usize) -> Displaced<T> {
        self.max_depth = max_depth;
        let mut displaced = Displaced::default();
        if max_depth == 0 {
            return displaced;
        }

        let spare = usize::from(self.redo_depth() > 0);
        while self.entries.len() > max_depth && self.cursor > spare {
            if let Some(oldest) = self.entries.pop_front() {
                displaced.evicted.push(oldest);
                self.cursor -= 1;
            }
        }

        let keep = max_depth.max(self.cursor + 1);
        if self.entries.len() > keep {
            displaced.discarded = self.entries.drain(keep..).collect();
        }

        displaced.evicted.extend(self.evict_overflow());
        displaced
    }

    /// Remove every entry, oldest first
    pub fn clear(&mut self) -> Vec<T> {
        self.cursor = 0;
        self.entries.drain(..).collect()
    }

    /// All entries, oldest to newest, with their side of the cursor
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        let cursor = self.cursor;
        self.entries.iter().enumerate().map(move |(i, entry)| {
            let side = if i < cursor { Side::Undoable } else { Side::Redoable };
            (side, entry)
        })
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            capacity: self.capacity(),
            len: self.entries.len(),
            undo_depth: self.undo_depth(),
            redo_depth: self.redo_depth(),
        }
    }

    fn evict_overflow(&mut self) -> Vec<T> {
        let mut evicted = Vec::new();
        while self.max_depth > 0 && self.entries.len() > self.max_depth && self.cursor > 0 {
            if let Some(oldest) = self.entries.pop_front() {
                evicted.push(oldest);
                self.cursor -= 1;
            }
        }
        evicted
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(History::<T>::DEFAULT_DEPTH)
    }
}

impl<T> History<T> {
    /// Depth used by `History::default()`
    pub const DEFAULT_DEPTH: usize = 100;
}

/// Statistics about a history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub capacity: Option<usize>,
    pub len: usize,
    pub undo_depth: usize,
    pub redo_depth: usize,
}

impl HistoryStats {
    /// Fill ratio (0.0 to 1.0); always 0.0 for unbounded histories
    pub fn fill_ratio(&self) -> f32 {
        match self.capacity {
            Some(cap) => self.len as f32 / cap as f32,
            None => 0.0,
        }
    }
}
