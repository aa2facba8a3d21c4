//! GC heap: the runtime context a host drives.
//!
//! A [`Heap`] owns its object store, root stack, collector and trigger state.
//! Nothing is global, so independent heaps can coexist.

use crate::allocator::GcTrigger;
use crate::collector::{Collector, GcStats};
use crate::config::GcConfig;
use crate::error::{GcError, Result};
use crate::object::{Object, ObjectRef};
use crate::roots::RootStack;
use crate::store::ObjectStore;

/// Garbage-collected heap of integers and pairs
pub struct Heap {
    pub(crate) config: GcConfig,
    pub(crate) store: ObjectStore,
    pub(crate) roots: RootStack,
    pub(crate) collector: Collector,
    pub(crate) trigger: GcTrigger,
}

impl Heap {
    /// Create a heap with the given root stack capacity and first collection
    /// threshold
    pub fn new(max_stack_depth: usize, initial_threshold: usize) -> Self {
        Self::with_config(GcConfig::new(max_stack_depth, initial_threshold))
    }

    /// Create a heap with custom config
    pub fn with_config(config: GcConfig) -> Self {
        Self {
            store: ObjectStore::new(),
            roots: RootStack::new(config.max_stack_depth),
            collector: Collector::new(),
            trigger: GcTrigger::new(config.initial_threshold, config.min_threshold),
            config,
        }
    }

    /// Get config
    pub fn config(&self) -> &GcConfig {
        &self.config
    }

    // ---------------------------------------------------------------
    // Roots
    // ---------------------------------------------------------------

    /// Push a live object onto the root stack
    pub fn push_root(&mut self, object_ref: ObjectRef) -> Result<()> {
        self.get(object_ref)?;
        self.roots.push(object_ref)
    }

    /// Pop the top root
    pub fn pop_root(&mut self) -> Result<ObjectRef> {
        self.roots.pop()
    }

    /// Current roots, bottom first
    pub fn roots(&self) -> &[ObjectRef] {
        self.roots.as_slice()
    }

    // ---------------------------------------------------------------
    // Collection
    // ---------------------------------------------------------------

    /// Run a collection now, regardless of the threshold.
    ///
    /// Returns the number of objects freed. The threshold is re-armed exactly
    /// as after an automatic collection.
    pub fn force_collect(&mut self) -> usize {
        self.collect_with(std::iter::empty())
    }

    /// Live-object count that triggers the next collection
    pub fn threshold(&self) -> usize {
        self.trigger.threshold()
    }

    /// Get statistics
    pub fn stats(&self) -> GcStats {
        *self.collector.stats()
    }

    /// Free every object and drop all roots.
    ///
    /// Returns the number of objects released. Handles issued before the
    /// call are invalid afterwards.
    pub fn clear(&mut self) -> usize {
        self.roots.clear();
        let released = self.store.clear();

        #[cfg(feature = "gc_logging")]
        tracing::debug!(target: "cons_gc::gc", released, "Heap cleared");

        released
    }

    // ---------------------------------------------------------------
    // Objects
    // ---------------------------------------------------------------

    /// Number of live objects
    pub fn live_count(&self) -> usize {
        self.store.len()
    }

    /// True if the handle still names a live object
    pub fn is_live(&self, object_ref: ObjectRef) -> bool {
        self.store.contains(object_ref)
    }

    /// All live objects
    pub fn objects(&self) -> impl Iterator<Item = (ObjectRef, &Object)> + '_ {
        self.store.iter()
    }

    /// Look up an object
    pub fn get(&self, object_ref: ObjectRef) -> Result<&Object> {
        self.store
            .get(object_ref)
            .ok_or(GcError::InvalidReference(object_ref))
    }

    /// Value of an integer object
    pub fn integer(&self, object_ref: ObjectRef) -> Result<i64> {
        match self.get(object_ref)? {
            Object::Integer(value) => Ok(*value),
            Object::Pair { .. } => Err(GcError::NotAnInteger(object_ref)),
        }
    }

    /// Head of a pair
    pub fn first(&self, object_ref: ObjectRef) -> Result<ObjectRef> {
        self.pair(object_ref).map(|(first, _)| first)
    }

    /// Tail of a pair
    pub fn second(&self, object_ref: ObjectRef) -> Result<ObjectRef> {
        self.pair(object_ref).map(|(_, second)| second)
    }

    fn pair(&self, object_ref: ObjectRef) -> Result<(ObjectRef, ObjectRef)> {
        match self.get(object_ref)? {
            Object::Pair { first, second } => Ok((*first, *second)),
            Object::Integer(_) => Err(GcError::NotAPair(object_ref)),
        }
    }

    /// Replace the head of a pair
    pub fn set_first(&mut self, pair: ObjectRef, value: ObjectRef) -> Result<()> {
        self.get(value)?;
        match self.store.get_mut(pair) {
            Some(Object::Pair { first, .. }) => {
                *first = value;
                Ok(())
            }
            Some(Object::Integer(_)) => Err(GcError::NotAPair(pair)),
            None => Err(GcError::InvalidReference(pair)),
        }
    }

    /// Replace the tail of a pair
    pub fn set_second(&mut self, pair: ObjectRef, value: ObjectRef) -> Result<()> {
        self.get(value)?;
        match self.store.get_mut(pair) {
            Some(Object::Pair { second, .. }) => {
                *second = value;
                Ok(())
            }
            Some(Object::Integer(_)) => Err(GcError::NotAPair(pair)),
            None => Err(GcError::InvalidReference(pair)),
        }
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::with_config(GcConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_creation() {
        let heap = Heap::new(16, 7);
        assert_eq!(heap.live_count(), 0);
        assert_eq!(heap.threshold(), 7);
        assert_eq!(heap.config().max_stack_depth, 16);
        assert!(heap.roots().is_empty());
        assert_eq!(heap.stats().collections, 0);
    }

    #[test]
    fn test_push_root_rejects_stale_reference() {
        let mut heap = Heap::default();
        let r = heap.allocate(Object::Integer(1)).unwrap();
        heap.force_collect();

        assert_eq!(heap.push_root(r), Err(GcError::InvalidReference(r)));
        assert!(heap.roots().is_empty());
    }

    #[test]
    fn test_push_root_keeps_object_alive() {
        let mut heap = Heap::default();
        let r = heap.allocate(Object::Integer(1)).unwrap();
        heap.push_root(r).unwrap();

        assert_eq!(heap.force_collect(), 0);
        assert!(heap.is_live(r));

        assert_eq!(heap.pop_root().unwrap(), r);
        assert_eq!(heap.force_collect(), 1);
        assert!(!heap.is_live(r));
    }

    #[test]
    fn test_accessors() {
        let mut heap = Heap::default();
        let a = heap.new_integer(1).unwrap();
        let b = heap.new_integer(2).unwrap();
        let p = heap.new_pair().unwrap();

        assert_eq!(heap.integer(a).unwrap(), 1);
        assert_eq!(heap.first(p).unwrap(), a);
        assert_eq!(heap.second(p).unwrap(), b);
        assert_eq!(heap.integer(p), Err(GcError::NotAnInteger(p)));
        assert_eq!(heap.first(a), Err(GcError::NotAPair(a)));
    }

    #[test]
    fn test_set_first_and_second() {
        let mut heap = Heap::default();
        let a = heap.new_integer(1).unwrap();
        let _ = heap.new_integer(2).unwrap();
        let p = heap.new_pair().unwrap();

        heap.set_first(p, p).unwrap();
        heap.set_second(p, a).unwrap();

        assert_eq!(heap.first(p).unwrap(), p);
        assert_eq!(heap.second(p).unwrap(), a);
        assert_eq!(heap.set_first(a, p), Err(GcError::NotAPair(a)));
    }

    #[test]
    fn test_objects_iter() {
        let mut heap = Heap::default();
        heap.new_integer(1).unwrap();
        heap.new_integer(2).unwrap();
        heap.new_pair().unwrap();

        let pairs = heap
            .objects()
            .filter(|(_, object)| matches!(object, Object::Pair { .. }))
            .count();
        assert_eq!(heap.objects().count(), 3);
        assert_eq!(pairs, 1);
    }

    #[test]
    fn test_clear() {
        let mut heap = Heap::default();
        let a = heap.new_integer(1).unwrap();
        heap.new_integer(2).unwrap();

        assert_eq!(heap.clear(), 2);
        assert_eq!(heap.live_count(), 0);
        assert!(heap.roots().is_empty());
        assert!(!heap.is_live(a));
    }

    #[test]
    fn test_independent_heaps() {
        let mut a = Heap::default();
        let mut b = Heap::default();

        a.new_integer(1).unwrap();
        b.allocate(Object::Integer(2)).unwrap();
        b.force_collect();

        assert_eq!(a.live_count(), 1);
        assert_eq!(b.live_count(), 0);
    }
}
