//! Object store: an arena of slots with a free list.
//!
//! Every allocated object lives in exactly one slot. Released slots go on the
//! free list and are reused by later allocations with a bumped generation,
//! which is what lets [`ObjectRef`] detect stale handles.
//!
//! ## Layout
//!
//! ```text
//! slots:     [ #0 Int | #1 free | #2 Pair(#0,#3) | #3 Int | #4 free ]
//! free_list: [ 1, 4 ]      (LIFO: #4 is reused first)
//! ```

use crate::error::{GcError, Result};
use crate::object::{GcHeader, MarkColor, Object, ObjectRef};

struct Slot {
    generation: u32,
    header: GcHeader,
    /// `None` while the slot is on the free list
    object: Option<Object>,
}

/// Arena owning every heap object
pub struct ObjectStore {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    live: usize,
}

impl ObjectStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.live
    }

    /// True when no objects are allocated
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots ever created (live + free)
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Store a new, unmarked object
    pub(crate) fn insert(&mut self, object: Object) -> Result<ObjectRef> {
        let live = self.live;

        let object_ref = if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.header = GcHeader::new();
            slot.object = Some(object);
            ObjectRef::new(index, slot.generation)
        } else {
            let slots = self.slots.len();
            let index = u32::try_from(slots).map_err(|_| GcError::ResourceExhaustion {
                live,
                limit: u32::MAX as usize,
            })?;
            self.slots
                .try_reserve(1)
                .map_err(|_| GcError::ResourceExhaustion { live, limit: slots })?;
            self.slots.push(Slot {
                generation: 0,
                header: GcHeader::new(),
                object: Some(object),
            });
            ObjectRef::new(index, 0)
        };

        self.live += 1;
        Ok(object_ref)
    }

    fn slot(&self, object_ref: ObjectRef) -> Option<&Slot> {
        self.slots
            .get(object_ref.index() as usize)
            .filter(|slot| slot.generation == object_ref.generation() && slot.object.is_some())
    }

    fn slot_mut(&mut self, object_ref: ObjectRef) -> Option<&mut Slot> {
        self.slots
            .get_mut(object_ref.index() as usize)
            .filter(|slot| slot.generation == object_ref.generation() && slot.object.is_some())
    }

    /// True if the handle names a live object
    pub fn contains(&self, object_ref: ObjectRef) -> bool {
        self.slot(object_ref).is_some()
    }

    /// Look up a live object
    pub fn get(&self, object_ref: ObjectRef) -> Option<&Object> {
        self.slot(object_ref).and_then(|slot| slot.object.as_ref())
    }

    /// Look up a live object for mutation
    pub(crate) fn get_mut(&mut self, object_ref: ObjectRef) -> Option<&mut Object> {
        self.slot_mut(object_ref)
            .and_then(|slot| slot.object.as_mut())
    }

    /// Whether a live object is currently marked
    pub fn is_marked(&self, object_ref: ObjectRef) -> bool {
        self.slot(object_ref)
            .is_some_and(|slot| slot.header.is_marked())
    }

    /// Mark a white object black and hand back its payload for tracing.
    ///
    /// Returns `None` for objects that are already marked and for stale
    /// handles, so each object is traced at most once per cycle.
    pub(crate) fn try_mark(&mut self, object_ref: ObjectRef) -> Option<Object> {
        let slot = self.slot_mut(object_ref)?;
        if slot.header.is_marked() {
            return None;
        }
        slot.header.set_mark(MarkColor::Black);
        slot.object
    }

    /// Mark color of the object in slot `index`, `None` if the slot is free
    pub(crate) fn mark_at(&self, index: usize) -> Option<MarkColor> {
        let slot = self.slots.get(index)?;
        slot.object.as_ref().map(|_| slot.header.mark())
    }

    pub(crate) fn set_mark_at(&mut self, index: usize, color: MarkColor) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.header.set_mark(color);
        }
    }

    /// Free the object in slot `index`. No-op for free slots.
    pub(crate) fn release(&mut self, index: usize) {
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        if slot.object.take().is_none() {
            return;
        }
        slot.generation = slot.generation.wrapping_add(1);
        slot.header = GcHeader::new();
        self.free_list.push(index as u32);
        self.live -= 1;
    }

    /// Free every object. Returns how many were released.
    pub(crate) fn clear(&mut self) -> usize {
        let released = self.live;
        for index in 0..self.slots.len() {
            self.release(index);
        }
        released
    }

    /// Iterate over all live objects, each exactly once
    pub fn iter(&self) -> impl Iterator<Item = (ObjectRef, &Object)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.object
                .as_ref()
                .map(|object| (ObjectRef::new(index as u32, slot.generation), object))
        })
    }
}

impl Default for ObjectStore {
    fn default() -> Self {
        Self::new()
    }
}
