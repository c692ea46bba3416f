// SPDX-License-Identifier: LGPL-3.0-only
//! Property tests for the icon cache, driving it from an interactive role
//! (the test thread, holding the `IconCache`) and a worker role (scoped
//! threads, holding only a `CacheWriter`).

use std::cell::Cell;
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;
use std::thread;

use iconbuf_core::{CacheWriter, IconCache, IconKey, RenderableIcon};
use iconbuf_services::RawIcon;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    /// Insert from the interactive thread.
    Insert(u8),
    /// Insert from a worker thread.
    WorkerInsert(u8),
    /// Existence check from a worker thread.
    WorkerContains(u8),
    Get(u8),
    Enforce,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..12).prop_map(Op::Insert),
        (0u8..12).prop_map(Op::WorkerInsert),
        (0u8..12).prop_map(Op::WorkerContains),
        (0u8..12).prop_map(Op::Get),
        Just(Op::Enforce),
    ]
}

fn key(id: u8) -> IconKey {
    IconKey::path(format!("/entry/{id}"))
}

fn raw(id: u8) -> RawIcon {
    if id % 5 == 0 {
        RawIcon::empty()
    } else {
        RawIcon::document(u32::from(id % 3) + 1)
    }
}

/// Inserts like the worker does: check first, insert only when absent.
fn worker_insert(writer: &CacheWriter, id: u8) {
    thread::scope(|scope| {
        scope.spawn(|| {
            if !writer.contains(&key(id)) {
                writer.insert_if_absent(key(id), raw(id));
            }
        });
    });
}

fn worker_contains(writer: &CacheWriter, id: u8) -> bool {
    thread::scope(|scope| scope.spawn(|| writer.contains(&key(id))).join().unwrap_or(false))
}

struct Harness {
    cache: IconCache,
    writer: CacheWriter,
    materialized: Rc<Cell<usize>>,
    /// Expected recency order, oldest first.
    model: VecDeque<u8>,
    /// Entries expected to be materialized already.
    seen: HashSet<u8>,
    expected_materializations: usize,
}

impl Harness {
    fn new(capacity: usize) -> Self {
        let materialized = Rc::new(Cell::new(0));
        let counter = materialized.clone();
        let cache = IconCache::with_materializer(capacity, move |raw| {
            counter.set(counter.get() + 1);
            RenderableIcon::materialize(raw)
        });
        let writer = cache.writer();
        Self {
            cache,
            writer,
            materialized,
            model: VecDeque::new(),
            seen: HashSet::new(),
            expected_materializations: 0,
        }
    }

    fn insert_model(&mut self, id: u8) {
        if !self.model.contains(&id) {
            self.model.push_back(id);
        }
    }

    fn apply(&mut self, op: &Op) -> Result<(), TestCaseError> {
        match *op {
            Op::Insert(id) => {
                if !self.cache.contains(&key(id)) {
                    self.cache.insert(key(id), raw(id));
                }
                self.insert_model(id);
            },
            Op::WorkerInsert(id) => {
                worker_insert(&self.writer, id);
                self.insert_model(id);
            },
            Op::WorkerContains(id) => {
                prop_assert_eq!(worker_contains(&self.writer, id), self.model.contains(&id));
            },
            Op::Get(id) => {
                let icon = self.cache.get_and_promote(&key(id));
                match self.model.iter().position(|&m| m == id) {
                    Some(pos) => {
                        let icon = icon.ok_or_else(|| TestCaseError::fail("cached entry not returned"))?;
                        prop_assert_eq!(icon.is_empty(), raw(id).is_empty());
                        self.model.remove(pos);
                        self.model.push_back(id);
                        if self.seen.insert(id) {
                            self.expected_materializations += 1;
                        }
                    },
                    None => prop_assert!(icon.is_none()),
                }
            },
            Op::Enforce => {
                self.cache.enforce_limit();
                while self.model.len() > self.cache.capacity() {
                    if let Some(evicted) = self.model.pop_front() {
                        self.seen.remove(&evicted);
                    }
                }
                prop_assert!(self.cache.len() <= self.cache.capacity());
            },
        }
        Ok(())
    }

    fn check(&self) -> Result<(), TestCaseError> {
        self.cache.debug_validate_invariants();
        let expected: Vec<IconKey> = self.model.iter().map(|&id| key(id)).collect();
        prop_assert_eq!(self.cache.recency_order(), expected);
        prop_assert_eq!(self.materialized.get(), self.expected_materializations);
        for id in &self.seen {
            prop_assert!(self.cache.is_materialized(&key(*id)));
        }
        Ok(())
    }
}

proptest! {
    /// Property: the cache matches an LRU model for any mix of roles
    #[test]
    fn prop_matches_lru_model(
        capacity in 0usize..6,
        ops in prop::collection::vec(op(), 0..60)
    ) {
        let mut harness = Harness::new(capacity);
        for op in &ops {
            harness.apply(op)?;
            harness.check()?;
        }
    }

    /// Property: size never exceeds capacity right after enforce_limit
    #[test]
    fn prop_capacity_after_enforce(
        capacity in 0usize..8,
        ids in prop::collection::vec(0u8..32, 0..64)
    ) {
        let mut cache = IconCache::new(capacity);
        let writer = cache.writer();
        for id in ids {
            worker_insert(&writer, id);
            if id % 4 == 0 {
                cache.enforce_limit();
                prop_assert!(cache.len() <= capacity);
            }
        }
        cache.enforce_limit();
        prop_assert!(cache.len() <= capacity);
        cache.debug_validate_invariants();
    }

    /// Property: a promoted entry outlives everything touched before it
    #[test]
    fn prop_promoted_entry_survives_eviction(
        ids in prop::collection::hash_set(0u8..32, 2..16),
        pick in any::<prop::sample::Index>()
    ) {
        let ids: Vec<u8> = ids.into_iter().collect();
        let hot = ids[pick.index(ids.len())];

        let mut cache = IconCache::new(1);
        for &id in &ids {
            cache.insert(key(id), raw(id));
        }
        prop_assert!(cache.get_and_promote(&key(hot)).is_some());
        let order = cache.recency_order();
        let hot_key = key(hot);
        prop_assert_eq!(order.last(), Some(&hot_key));

        cache.enforce_limit();
        prop_assert_eq!(cache.recency_order(), vec![key(hot)]);
    }

    /// Property: repeated reads return the same icon and materialize once
    #[test]
    fn prop_materialize_once(id in 0u8..32, reads in 2usize..6) {
        let mut harness = Harness::new(4);
        harness.apply(&Op::WorkerInsert(id))?;
        let first = harness.cache.get_and_promote(&key(id));
        for _ in 1..reads {
            prop_assert_eq!(harness.cache.get_and_promote(&key(id)), first.clone());
        }
        prop_assert_eq!(harness.materialized.get(), 1);
    }
}
