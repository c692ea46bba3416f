// SPDX-License-Identifier: LGPL-3.0-only
//! Pending icon requests.
//!
//! The queue is LIFO: whatever was asked for last is most likely on screen
//! right now, so it is served first. Older requests sink and are silently
//! dropped when the workload is replaced.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use iconbuf_services::filesystem::FileEntry;
use iconbuf_services::{FileIconLoader, IconLoaderHandle, IconRegistry, Thumbnailer};
use parking_lot::{Condvar, Mutex};

use crate::config::DEFAULT_POLL_INTERVAL;
use crate::key::IconKey;

/// A request to extract one icon.
#[derive(Clone)]
pub struct WorkItem {
    /// Cache key the result is stored under.
    pub key: IconKey,
    /// Callbacks producing the icon; invoked on the worker thread.
    pub loader: IconLoaderHandle,
    /// Template name such as `template.pdf`, used when the loader fails.
    pub fallback_name: String,
}

impl WorkItem {
    /// Create a work item.
    pub fn new(key: IconKey, loader: IconLoaderHandle, fallback_name: impl Into<String>) -> Self {
        Self {
            key,
            loader,
            fallback_name: fallback_name.into(),
        }
    }

    /// Create a work item for a filesystem entry, keyed by its path.
    pub fn from_entry(entry: FileEntry, registry: Arc<IconRegistry>, thumbnailer: Arc<Thumbnailer>) -> Self {
        let key = IconKey::Path(entry.path.clone());
        let fallback_name = entry.template_name();
        Self::new(key, FileIconLoader::handle(entry, registry, thumbnailer), fallback_name)
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem")
            .field("key", &self.key)
            .field("fallback_name", &self.fallback_name)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct QueueState {
    /// The next item to serve is at the back.
    pending: Vec<WorkItem>,
    shutdown: bool,
}

/// Thread-safe LIFO list of pending [`WorkItem`]s with an interruptible,
/// blocking pop.
pub struct WorkQueue {
    state: Mutex<QueueState>,
    available: Condvar,
    poll_interval: Duration,
}

impl WorkQueue {
    /// Create an empty queue polling at the default interval.
    pub fn new() -> Self {
        Self::with_poll_interval(DEFAULT_POLL_INTERVAL)
    }

    /// Create an empty queue whose blocked consumers re-check their state
    /// every `poll_interval`.
    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            available: Condvar::new(),
            poll_interval,
        }
    }

    /// Replace all pending items. `items[0]` is served first.
    pub fn push_replace(&self, items: Vec<WorkItem>) {
        {
            let mut state = self.state.lock();
            state.pending.clear();
            state.pending.extend(items.into_iter().rev());
        }
        self.available.notify_one();
    }

    /// Schedule `item` ahead of everything else.
    ///
    /// A pending item with the same key is moved to the front instead of
    /// being queued twice.
    pub fn push_front(&self, item: WorkItem) {
        {
            let mut state = self.state.lock();
            if let Some(pos) = state.pending.iter().position(|pending| pending.key == item.key) {
                state.pending.remove(pos);
            }
            state.pending.push(item);
        }
        self.available.notify_one();
    }

    /// Take the most recently pushed item, waiting for one if necessary.
    ///
    /// Returns `None` once [`shutdown`](Self::shutdown) was requested, even
    /// if items are still pending.
    pub fn pop_blocking(&self) -> Option<WorkItem> {
        let mut state = self.state.lock();
        loop {
            if state.shutdown {
                return None;
            }
            if let Some(item) = state.pending.pop() {
                return Some(item);
            }
            // Bounded so a lost wakeup costs at most one interval
            self.available.wait_for(&mut state, self.poll_interval);
        }
    }

    /// Ask every consumer to stop and wake them up.
    pub fn shutdown(&self) {
        self.state.lock().shutdown = true;
        self.available.notify_all();
    }

    /// Whether shutdown was requested.
    pub fn is_shutdown(&self) -> bool {
        self.state.lock().shutdown
    }

    /// Number of pending items.
    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Keys of pending items in the order they will be served.
    pub fn pending_keys(&self) -> Vec<IconKey> {
        self.state
            .lock()
            .pending
            .iter()
            .rev()
            .map(|item| item.key.clone())
            .collect()
    }

    /// The configured poll interval.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}
