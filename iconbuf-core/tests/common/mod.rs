// SPDX-License-Identifier: LGPL-3.0-only
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use iconbuf_core::{BufferConfig, IconKey, WorkItem};
use iconbuf_services::{IconLoader, RawIcon};
use parking_lot::{Condvar, Mutex};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Small capacity and a short poll interval keep tests fast.
pub fn test_config(max_entries: usize) -> BufferConfig {
    BufferConfig::default()
        .with_max_entries(max_entries)
        .with_poll_interval(Duration::from_millis(10))
}

/// Poll `condition` until it holds or `timeout` expires.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}

/// A latch that blocks loaders until opened.
#[derive(Default)]
pub struct Gate {
    state: Mutex<GateState>,
    changed: Condvar,
}

#[derive(Default)]
struct GateState {
    open: bool,
    entered: bool,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn open(&self) {
        self.state.lock().open = true;
        self.changed.notify_all();
    }

    /// Whether a loader is waiting at (or went through) the gate.
    pub fn entered(&self) -> bool {
        self.state.lock().entered
    }

    fn pass(&self) {
        let mut state = self.state.lock();
        state.entered = true;
        while !state.open {
            self.changed.wait_for(&mut state, Duration::from_millis(50));
        }
    }
}

/// Records the order in which the worker asked for file icons.
#[derive(Default, Clone)]
pub struct Journal(Arc<Mutex<Vec<IconKey>>>);

impl Journal {
    pub fn entries(&self) -> Vec<IconKey> {
        self.0.lock().clone()
    }
}

pub struct StubLoader {
    pub key: IconKey,
    pub icon: RawIcon,
    pub thumbnail: Option<RawIcon>,
    pub gate: Option<Arc<Gate>>,
    pub journal: Journal,
    pub calls: AtomicUsize,
}

impl StubLoader {
    pub fn new(key: IconKey, journal: &Journal) -> Self {
        Self {
            key,
            icon: RawIcon::document(16),
            thumbnail: None,
            gate: None,
            journal: journal.clone(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn gated(mut self, gate: &Arc<Gate>) -> Self {
        self.gate = Some(gate.clone());
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: RawIcon) -> Self {
        self.thumbnail = Some(thumbnail);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IconLoader for StubLoader {
    fn has_thumbnail(&self) -> bool {
        self.thumbnail.is_some()
    }

    fn thumbnail(&self, _pixel_size: u32) -> Option<RawIcon> {
        self.thumbnail.clone()
    }

    fn file_icon(&self, _pixel_size: u32) -> Option<RawIcon> {
        if let Some(gate) = &self.gate {
            gate.pass();
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.journal.0.lock().push(self.key.clone());
        Some(self.icon.clone())
    }
}

/// A work item together with its loader, for call counting.
pub fn stub_item(name: &str, journal: &Journal) -> (WorkItem, Arc<StubLoader>) {
    let key = IconKey::path(name);
    let loader = Arc::new(StubLoader::new(key.clone(), journal));
    (WorkItem::new(key, loader.clone(), "template"), loader)
}

pub fn gated_item(name: &str, journal: &Journal, gate: &Arc<Gate>) -> (WorkItem, Arc<StubLoader>) {
    let key = IconKey::path(name);
    let loader = Arc::new(StubLoader::new(key.clone(), journal).gated(gate));
    (WorkItem::new(key, loader.clone(), "template"), loader)
}
