//! Root stack
//!
//! Everything on this stack is reachable by definition. The stack holds
//! handles only; the object store owns the objects.

use crate::error::{GcError, Result};
use crate::object::ObjectRef;

/// Bounded stack of GC roots
#[derive(Debug, Clone)]
pub struct RootStack {
    entries: Vec<ObjectRef>,
    capacity: usize,
}

impl RootStack {
    /// Create an empty stack holding at most `capacity` roots
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Push a root. Fails without modifying the stack when it is full.
    pub fn push(&mut self, object_ref: ObjectRef) -> Result<()> {
        self.ensure_room(1)?;
        self.entries.push(object_ref);
        Ok(())
    }

    /// Pop the top root
    pub fn pop(&mut self) -> Result<ObjectRef> {
        self.entries.pop().ok_or(GcError::StackUnderflow {
            needed: 1,
            available: 0,
        })
    }

    /// Top root without removing it
    pub fn peek(&self) -> Option<ObjectRef> {
        self.entries.last().copied()
    }

    /// Fail with `StackOverflow` unless `n` more roots fit
    pub(crate) fn ensure_room(&self, n: usize) -> Result<()> {
        if self.entries.len().saturating_add(n) > self.capacity {
            return Err(GcError::StackOverflow {
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Fail with `StackUnderflow` unless at least `n` roots are present
    pub(crate) fn ensure_depth(&self, n: usize) -> Result<()> {
        if self.entries.len() < n {
            return Err(GcError::StackUnderflow {
                needed: n,
                available: self.entries.len(),
            });
        }
        Ok(())
    }

    /// Number of roots
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no roots
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of roots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Roots from bottom to top
    pub fn iter(&self) -> impl Iterator<Item = ObjectRef> + '_ {
        self.entries.iter().copied()
    }

    /// Roots from bottom to top
    pub fn as_slice(&self) -> &[ObjectRef] {
        &self.entries
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
