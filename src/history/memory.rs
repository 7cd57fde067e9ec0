//! In-memory history stack
//!
//! Behaves like `window.history`: pushes truncate forward entries and
//! traversal emits popstate events to every live subscriber.

use std::sync::{Mutex, MutexGuard};

use tokio::sync::mpsc;

use super::{History, Location, NavigationState, PopStateEvent};

#[derive(Debug, Clone)]
struct Entry {
    url: String,
    state: Option<NavigationState>,
}

#[derive(Debug)]
struct Stack {
    entries: Vec<Entry>,
    cursor: usize,
}

/// History implementation backed by a vector of entries
pub struct MemoryHistory {
    stack: Mutex<Stack>,
    listeners: Mutex<Vec<mpsc::UnboundedSender<PopStateEvent>>>,
}

impl MemoryHistory {
    /// Create a history whose first entry is `/`
    pub fn new() -> Self {
        Self::with_initial_url("/")
    }

    /// Create a history starting at `url` with no state
    pub fn with_initial_url(url: &str) -> Self {
        Self {
            stack: Mutex::new(Stack {
                entries: vec![Entry {
                    url: Location::parse(url).href(),
                    state: None,
                }],
                cursor: 0,
            }),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Number of entries in the stack
    pub fn len(&self) -> usize {
        self.lock_stack().entries.len()
    }

    /// Always false; a history holds at least its initial entry
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Move one entry back. Returns false when already at the first entry.
    pub fn back(&self) -> bool {
        self.go(-1)
    }

    /// Move one entry forward. Returns false when already at the last entry.
    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Move `delta` entries and fire popstate. Out-of-range moves are ignored.
    pub fn go(&self, delta: isize) -> bool {
        let event = {
            let mut stack = self.lock_stack();
            let target = stack.cursor as isize + delta;
            if delta == 0 || target < 0 || target >= stack.entries.len() as isize {
                return false;
            }
            stack.cursor = target as usize;
            PopStateEvent {
                state: stack.entries[stack.cursor].state.clone(),
            }
        };

        tracing::debug!(delta, "History traversal");
        self.emit(event);
        true
    }

    fn emit(&self, event: PopStateEvent) {
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        listeners.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn lock_stack(&self) -> MutexGuard<'_, Stack> {
        self.stack
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl History for MemoryHistory {
    fn push_state(&self, state: NavigationState, url: &str) {
        let mut stack = self.lock_stack();
        let keep = stack.cursor + 1;
        stack.entries.truncate(keep);
        stack.entries.push(Entry {
            url: Location::parse(url).href(),
            state: Some(state),
        });
        stack.cursor = stack.entries.len() - 1;
    }

    fn replace_state(&self, state: NavigationState, url: &str) {
        let mut stack = self.lock_stack();
        let cursor = stack.cursor;
        stack.entries[cursor] = Entry {
            url: Location::parse(url).href(),
            state: Some(state),
        };
    }

    fn location(&self) -> Location {
        let stack = self.lock_stack();
        Location::parse(&stack.entries[stack.cursor].url)
    }

    fn state(&self) -> Option<NavigationState> {
        let stack = self.lock_stack();
        stack.entries[stack.cursor].state.clone()
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<PopStateEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(tx);
        rx
    }
}
