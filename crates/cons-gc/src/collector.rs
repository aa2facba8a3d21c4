//! Mark-sweep garbage collector
//!
//! Marking drains an explicit worklist rather than recursing, so arbitrarily
//! deep pair chains mark in constant call-stack depth. The already-marked
//! check in [`ObjectStore::try_mark`] is what stops cycles.

use crate::object::{MarkColor, ObjectRef};
use crate::store::ObjectStore;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// GC statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GcStats {
    /// Number of collections
    pub collections: u64,
    /// Objects freed across all collections
    pub objects_freed: u64,
    /// Objects freed by the last collection
    pub last_freed: usize,
    /// Objects marked by the last collection
    pub last_marked: usize,
    /// Total time spent collecting
    pub total_pause_time: Duration,
    /// Duration of the last collection
    pub last_pause_time: Duration,
}

/// Garbage collector
pub struct Collector {
    /// Pending objects whose children have not been visited yet.
    /// Kept between cycles to reuse its allocation.
    worklist: VecDeque<ObjectRef>,
    stats: GcStats,
}

impl Collector {
    /// Create new collector
    pub fn new() -> Self {
        Self {
            worklist: VecDeque::new(),
            stats: GcStats::default(),
        }
    }

    /// Run a full cycle: mark from `roots`, then sweep.
    ///
    /// Returns the number of objects freed.
    pub(crate) fn collect<I>(&mut self, store: &mut ObjectStore, roots: I) -> usize
    where
        I: IntoIterator<Item = ObjectRef>,
    {
        let start = Instant::now();

        #[cfg(feature = "gc_logging")]
        tracing::debug!(
            target: "cons_gc::gc",
            objects = store.len(),
            "GC cycle starting"
        );

        let marked = self.mark(store, roots);
        let freed = self.sweep(store);

        let elapsed = start.elapsed();
        self.stats.collections += 1;
        self.stats.objects_freed += freed as u64;
        self.stats.last_freed = freed;
        self.stats.last_marked = marked;
        self.stats.last_pause_time = elapsed;
        self.stats.total_pause_time += elapsed;

        #[cfg(feature = "gc_logging")]
        tracing::info!(
            target: "cons_gc::gc",
            collection = self.stats.collections,
            marked,
            freed,
            live_objects = store.len(),
            pause_us = elapsed.as_micros() as u64,
            "GC cycle complete"
        );

        freed
    }

    /// Mark phase: mark everything reachable from `roots`.
    ///
    /// Returns the number of objects newly marked.
    pub(crate) fn mark<I>(&mut self, store: &mut ObjectStore, roots: I) -> usize
    where
        I: IntoIterator<Item = ObjectRef>,
    {
        self.worklist.clear();
        self.worklist.extend(roots);

        let mut marked = 0;
        while let Some(object_ref) = self.worklist.pop_back() {
            let Some(object) = store.try_mark(object_ref) else {
                continue;
            };
            marked += 1;
            object.trace(&mut |child| {
                if !store.is_marked(child) {
                    self.worklist.push_back(child);
                }
            });
        }
        marked
    }

    /// Sweep phase: free every white object and whiten the survivors.
    ///
    /// Returns the number of objects freed.
    pub(crate) fn sweep(&mut self, store: &mut ObjectStore) -> usize {
        let mut freed = 0;
        for index in 0..store.slot_count() {
            match store.mark_at(index) {
                Some(MarkColor::Black) => store.set_mark_at(index, MarkColor::White),
                Some(MarkColor::White) => {
                    store.release(index);
                    freed += 1;
                }
                None => {}
            }
        }
        freed
    }

    /// Get statistics
    pub fn stats(&self) -> &GcStats {
        &self.stats
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}
