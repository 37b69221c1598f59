//! Debounced whole-document saver for rapid local edits.
//!
//! Form-style writers submit the full in-memory document on every change;
//! the saver coalesces them and persists only the newest. Dropping the
//! saver flushes, so the latest edit still lands if the caller is torn
//! down mid-window.

use std::time::{Duration, Instant};

use crate::models::AppData;
use crate::store::AppStore;

pub struct DebouncedSaver {
    store: AppStore,
    window: Duration,
    pending: Option<AppData>,
    deadline: Option<Instant>,
}

impl DebouncedSaver {
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);

    #[must_use]
    pub fn new(store: AppStore) -> Self {
        Self::with_window(store, Self::DEFAULT_WINDOW)
    }

    #[must_use]
    pub fn with_window(store: AppStore, window: Duration) -> Self {
        Self {
            store,
            window,
            pending: None,
            deadline: None,
        }
    }

    /// Replaces the pending document and restarts the quiet window. A
    /// superseded submission is never written.
    pub fn submit(&mut self, doc: AppData) {
        self.pending = Some(doc);
        self.deadline = Some(Instant::now() + self.window);
    }

    /// Persists the pending document if the quiet window has elapsed.
    /// Returns whether a save happened.
    pub fn flush_if_idle(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.flush();
                true
            }
            _ => false,
        }
    }

    /// Persists the pending document immediately ("save now").
    pub fn flush(&mut self) {
        if let Some(doc) = self.pending.take() {
            self.store.save(&doc);
        }
        self.deadline = None;
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for DebouncedSaver {
    fn drop(&mut self) {
        self.flush();
    }
}
