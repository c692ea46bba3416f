// SPDX-License-Identifier: LGPL-3.0-only
//! Bounded, recency-ordered icon cache.
//!
//! The cache is split by thread role:
//!
//! - [`CacheWriter`] is `Send + Sync` and can only check for and insert raw
//!   icons. The worker thread holds one.
//! - [`IconCache`] is the interactive half. It owns the materialized
//!   [`RenderableIcon`]s and is the only place entries are promoted,
//!   materialized or evicted. It is `!Send`, so those operations cannot run
//!   anywhere but on the thread that created it:
//!
//! ```compile_fail
//! use iconbuf_core::IconCache;
//!
//! let mut cache = IconCache::new(8);
//! std::thread::spawn(move || cache.enforce_limit());
//! ```
//!
//! Both halves share one recency store behind a single lock. The store
//! orders entries oldest first and keeps the raw form of icons that have
//! not been looked at yet.
//!
//! ```text
//!   nodes (Vec<Option<Node>>)             materialized (interactive only)
//!   ┌──────┬──────────────────────────┐   ┌─────┬────────────────┐
//!   │ slot │ key  raw    prev  next   │   │ key │ RenderableIcon │
//!   ├──────┼──────────────────────────┤   ├─────┼────────────────┤
//!   │ 0    │ a    None   -     2      │   │ a   │ brush          │
//!   │ 1    │ (free)                   │   └─────┴────────────────┘
//!   │ 2    │ b    Some   0     -      │
//!   └──────┴──────────────────────────┘
//!
//!   head ─► [0] ◄──► [2] ◄── tail
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use iconbuf_services::RawIcon;
use parking_lot::Mutex;

use crate::key::IconKey;
use crate::renderable::RenderableIcon;

#[derive(Debug)]
struct Node {
    key: IconKey,
    /// Present until the icon is first read on the interactive thread.
    raw: Option<RawIcon>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Map plus recency list over cache entries, stored in a slot arena.
///
/// The head is the least recently inserted or promoted entry, the tail the
/// most recent one.
#[derive(Debug, Default)]
struct RecencyStore {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    index: HashMap<IconKey, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl RecencyStore {
    fn new() -> Self {
        Self::default()
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn contains(&self, key: &IconKey) -> bool {
        self.index.contains_key(key)
    }

    /// Append a new entry at the tail. Returns `false` if `key` is present.
    fn insert(&mut self, key: IconKey, raw: Option<RawIcon>) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }

        let node = Node {
            key: key.clone(),
            raw,
            prev: None,
            next: None,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                slot
            },
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            },
        };
        self.index.insert(key, slot);
        self.attach_back(slot);
        true
    }

    /// Move `key` to the tail and take its raw icon, if still present.
    ///
    /// Returns `None` when `key` is not cached.
    fn promote(&mut self, key: &IconKey) -> Option<Option<RawIcon>> {
        let slot = *self.index.get(key)?;
        if Some(slot) != self.tail {
            self.detach(slot);
            self.attach_back(slot);
        }
        self.nodes[slot].as_mut().map(|node| node.raw.take())
    }

    /// Unlink and free the head entry, returning its key.
    fn pop_head(&mut self) -> Option<IconKey> {
        let slot = self.head?;
        self.detach(slot);
        let node = self.nodes[slot].take()?;
        self.free.push(slot);
        self.index.remove(&node.key);
        Some(node.key)
    }

    fn keys(&self) -> Vec<IconKey> {
        let mut keys = Vec::with_capacity(self.len());
        let mut current = self.head;
        while let Some(slot) = current {
            let Some(node) = self.nodes[slot].as_ref() else {
                break;
            };
            keys.push(node.key.clone());
            current = node.next;
        }
        keys
    }

    #[cfg(any(test, debug_assertions))]
    fn has_raw(&self, key: &IconKey) -> bool {
        self.index
            .get(key)
            .and_then(|&slot| self.nodes[slot].as_ref())
            .is_some_and(|node| node.raw.is_some())
    }

    fn detach(&mut self, slot: usize) {
        let Some((prev, next)) = self.nodes[slot].as_ref().map(|node| (node.prev, node.next)) else {
            return;
        };

        match prev.and_then(|prev| self.nodes[prev].as_mut()) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|next| self.nodes[next].as_mut()) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }

        if let Some(node) = self.nodes[slot].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }

    fn attach_back(&mut self, slot: usize) {
        let old_tail = self.tail;
        if let Some(node) = self.nodes[slot].as_mut() {
            node.prev = old_tail;
            node.next = None;
        } else {
            return;
        }
        match old_tail.and_then(|tail| self.nodes[tail].as_mut()) {
            Some(tail_node) => tail_node.next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
    }

    #[cfg(any(test, debug_assertions))]
    fn debug_validate_invariants(&self) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len(), 0);
            return;
        }
        if self.len() == 1 {
            assert_eq!(self.head, self.tail);
        }

        let mut seen = std::collections::HashSet::new();
        let mut current = self.head;
        let mut prev = None;
        while let Some(slot) = current {
            assert!(seen.insert(slot), "cycle in recency list");
            let node = self.nodes[slot].as_ref().expect("linked slot is free");
            assert_eq!(node.prev, prev);
            assert_eq!(self.index.get(&node.key), Some(&slot));
            prev = Some(slot);
            current = node.next;
        }
        assert_eq!(prev, self.tail);
        assert_eq!(seen.len(), self.len());
        assert_eq!(self.nodes.iter().filter(|node| node.is_some()).count(), self.len());
        assert_eq!(self.free.len() + self.len(), self.nodes.len());
    }
}

/// Thread-safe writer half of an [`IconCache`].
///
/// Cheap to clone. Never evicts and never touches materialized icons.
#[derive(Clone)]
pub struct CacheWriter {
    store: Arc<Mutex<RecencyStore>>,
}

impl CacheWriter {
    /// Whether an entry exists for `key`, raw or materialized.
    pub fn contains(&self, key: &IconKey) -> bool {
        self.store.lock().contains(key)
    }

    /// Add a raw icon as the most recent entry.
    ///
    /// Inserting a key that is already cached is a caller bug: it is ignored,
    /// logged and trips a debug assertion.
    pub fn insert(&self, key: IconKey, raw: RawIcon) {
        let inserted = self.store.lock().insert(key.clone(), Some(raw));
        if !inserted {
            log::warn!("IconCache: Ignoring duplicate insert for {}", key);
            debug_assert!(inserted, "duplicate cache insert for {}", key);
        }
    }

    /// Add a raw icon unless `key` is cached already.
    ///
    /// Returns `false` and drops `raw` when another thread got there first,
    /// for example [`IconCache::insert_materialized`] between a caller's
    /// [`contains`](Self::contains) check and this call.
    pub fn insert_if_absent(&self, key: IconKey, raw: RawIcon) -> bool {
        self.store.lock().insert(key, Some(raw))
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interactive half of the icon cache.
///
/// Created and used on the interactive thread only. Hands out a
/// [`CacheWriter`] for the worker.
pub struct IconCache {
    store: Arc<Mutex<RecencyStore>>,
    materialized: HashMap<IconKey, RenderableIcon>,
    materializer: Box<dyn Fn(RawIcon) -> RenderableIcon>,
    capacity: usize,
}

impl IconCache {
    /// Create a cache trimmed to `capacity` entries by [`enforce_limit`](Self::enforce_limit).
    pub fn new(capacity: usize) -> Self {
        Self::with_materializer(capacity, RenderableIcon::materialize)
    }

    /// Create a cache using a custom raw-to-renderable conversion.
    pub fn with_materializer(capacity: usize, materializer: impl Fn(RawIcon) -> RenderableIcon + 'static) -> Self {
        Self {
            store: Arc::new(Mutex::new(RecencyStore::new())),
            materialized: HashMap::new(),
            materializer: Box::new(materializer),
            capacity,
        }
    }

    /// A writer sharing this cache's store.
    pub fn writer(&self) -> CacheWriter {
        CacheWriter {
            store: self.store.clone(),
        }
    }

    /// Whether an entry exists for `key`.
    pub fn contains(&self, key: &IconKey) -> bool {
        self.store.lock().contains(key)
    }

    /// Add a raw icon as the most recent entry. See [`CacheWriter::insert`].
    pub fn insert(&self, key: IconKey, raw: RawIcon) {
        self.writer().insert(key, raw);
    }

    /// Add an already materialized icon as the most recent entry.
    ///
    /// If `key` is cached already the existing entry is promoted and kept.
    pub fn insert_materialized(&mut self, key: IconKey, icon: RenderableIcon) {
        let inserted = self.store.lock().insert(key.clone(), None);
        if inserted {
            self.materialized.insert(key, icon);
        } else {
            log::debug!("IconCache: {} already cached, promoting", key);
            self.get_and_promote(&key);
        }
    }

    /// Look up `key` and mark it as most recently used.
    ///
    /// The first lookup of a raw entry turns it into a [`RenderableIcon`];
    /// later lookups return clones of that same icon.
    pub fn get_and_promote(&mut self, key: &IconKey) -> Option<RenderableIcon> {
        let raw = self.store.lock().promote(key)?;
        if let Some(raw) = raw {
            let icon = (self.materializer)(raw);
            self.materialized.insert(key.clone(), icon.clone());
            return Some(icon);
        }

        match self.materialized.get(key) {
            Some(icon) => Some(icon.clone()),
            None => {
                log::warn!("IconCache: Entry {} has no icon", key);
                Some(RenderableIcon::empty())
            },
        }
    }

    /// Evict least recently used entries until at most `capacity` remain.
    pub fn enforce_limit(&mut self) {
        loop {
            let victim = {
                let mut store = self.store.lock();
                if store.len() <= self.capacity {
                    break;
                }
                store.pop_head()
            };
            let Some(victim) = victim else {
                break;
            };
            log::trace!("IconCache: Evicting {}", victim);
            // Renderable icons are dropped here, outside the lock
            self.materialized.remove(&victim);
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries kept by [`enforce_limit`](Self::enforce_limit).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether `key` is cached and already materialized.
    pub fn is_materialized(&self, key: &IconKey) -> bool {
        self.materialized.contains_key(key)
    }

    /// Keys from least to most recently used.
    pub fn recency_order(&self) -> Vec<IconKey> {
        self.store.lock().keys()
    }

    /// Check the linked list and both maps for consistency; panics on violation.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        let store = self.store.lock();
        store.debug_validate_invariants();
        for key in store.keys() {
            assert_ne!(
                store.has_raw(&key),
                self.materialized.contains_key(&key),
                "entry {} must be either raw or materialized",
                key
            );
        }
        assert!(self.materialized.len() <= store.len());
    }
}
