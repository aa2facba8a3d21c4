//! GC object layout

use std::fmt;

/// Handle to a heap object.
///
/// The index names an arena slot; the generation must match the slot's
/// current generation, so a handle kept past its object's collection is
/// rejected rather than aliasing whatever reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    index: u32,
    generation: u32,
}

impl ObjectRef {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot index
    pub fn index(self) -> u32 {
        self.index
    }

    /// Slot generation this handle was issued for
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.index, self.generation)
    }
}

/// A heap value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Object {
    /// Signed integer
    Integer(i64),
    /// Cons cell. Either side may point anywhere in the heap, including
    /// back at the pair itself.
    Pair {
        /// Head (car)
        first: ObjectRef,
        /// Tail (cdr)
        second: ObjectRef,
    },
}

impl Object {
    /// References held by this object
    pub fn trace(&self, tracer: &mut impl FnMut(ObjectRef)) {
        if let Object::Pair { first, second } = *self {
            tracer(first);
            tracer(second);
        }
    }
}

/// Mark state
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkColor {
    /// Not reached in the current cycle
    #[default]
    White = 0,
    /// Reached from a root
    Black = 1,
}

/// Per-object GC metadata
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GcHeader {
    mark: MarkColor,
}

impl GcHeader {
    /// Create an unmarked header
    pub const fn new() -> Self {
        Self {
            mark: MarkColor::White,
        }
    }

    /// Get mark color
    pub fn mark(&self) -> MarkColor {
        self.mark
    }

    /// Set mark color
    pub fn set_mark(&mut self, color: MarkColor) {
        self.mark = color;
    }

    /// Whether the object was reached in the current cycle
    #[inline]
    pub fn is_marked(&self) -> bool {
        self.mark == MarkColor::Black
    }
}
