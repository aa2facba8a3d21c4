//! Allocation entry points and the collection trigger

use crate::error::{GcError, Result};
use crate::heap::Heap;
use crate::object::{Object, ObjectRef};

/// Decides when an allocation must run a collection first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GcTrigger {
    threshold: usize,
    floor: usize,
}

impl GcTrigger {
    pub(crate) fn new(initial_threshold: usize, floor: usize) -> Self {
        Self {
            threshold: initial_threshold,
            floor,
        }
    }

    pub(crate) fn threshold(&self) -> usize {
        self.threshold
    }

    /// Live count has reached the threshold
    #[inline]
    pub(crate) fn should_collect(&self, live: usize) -> bool {
        live >= self.threshold
    }

    /// Next threshold is twice what survived the last collection
    pub(crate) fn rearm(&mut self, live: usize) {
        self.threshold = live.saturating_mul(2).max(self.floor);
    }
}

impl Heap {
    /// Allocate an object, collecting first if the threshold is reached.
    ///
    /// The new object is not rooted. For a pair payload both references must
    /// be live; they are kept alive through any collection this call runs.
    pub fn allocate(&mut self, object: Object) -> Result<ObjectRef> {
        let mut operands = [None; 2];
        if let Object::Pair { first, second } = object {
            self.get(first)?;
            self.get(second)?;
            operands = [Some(first), Some(second)];
        }

        self.make_room(operands.into_iter().flatten())?;
        self.store.insert(object)
    }

    /// Allocate an integer and push it onto the root stack
    pub fn new_integer(&mut self, value: i64) -> Result<ObjectRef> {
        self.roots.ensure_room(1)?;

        let object_ref = self.allocate(Object::Integer(value))?;
        self.roots.push(object_ref)?;
        Ok(object_ref)
    }

    /// Build a pair from the top two roots and push it in their place.
    ///
    /// The top of the stack becomes `second` and the entry below it becomes
    /// `first`, so pushing `a` then `b` yields `(a . b)`.
    pub fn new_pair(&mut self) -> Result<ObjectRef> {
        self.roots.ensure_depth(2)?;

        // Operands stay on the stack until the pair exists, so a collection
        // triggered here cannot reclaim them.
        self.make_room(std::iter::empty())?;

        let depth = self.roots.len();
        let first = self.roots.as_slice()[depth - 2];
        let second = self.roots.as_slice()[depth - 1];
        let pair = self.store.insert(Object::Pair { first, second })?;

        self.roots.pop()?;
        self.roots.pop()?;
        self.roots.push(pair)?;
        Ok(pair)
    }

    /// Run the trigger policy ahead of an insert.
    ///
    /// `temporaries` are extra roots for the duration of the collection.
    fn make_room<I>(&mut self, temporaries: I) -> Result<()>
    where
        I: Iterator<Item = ObjectRef> + Clone,
    {
        let mut collected = false;
        if self.trigger.should_collect(self.store.len()) {
            self.collect_with(temporaries.clone());
            collected = true;
        }

        if let Some(limit) = self.config.max_objects {
            if !collected && self.store.len() >= limit {
                self.collect_with(temporaries);
            }
            if self.store.len() >= limit {
                #[cfg(feature = "gc_logging")]
                tracing::warn!(
                    target: "cons_gc::gc",
                    live_objects = self.store.len(),
                    limit,
                    "Heap exhausted"
                );
                return Err(GcError::ResourceExhaustion {
                    live: self.store.len(),
                    limit,
                });
            }
        }

        Ok(())
    }

    /// Collect with the root stack plus `temporaries` as roots, then re-arm
    /// the trigger
    pub(crate) fn collect_with<I>(&mut self, temporaries: I) -> usize
    where
        I: IntoIterator<Item = ObjectRef>,
    {
        let roots = self.roots.iter().chain(temporaries);
        let freed = self.collector.collect(&mut self.store, roots);
        self.trigger.rearm(self.store.len());

        #[cfg(feature = "gc_logging")]
        tracing::debug!(
            target: "cons_gc::gc",
            threshold = self.trigger.threshold(),
            "GC threshold re-armed"
        );

        freed
    }
}
