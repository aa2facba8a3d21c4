//! # cons-gc
//!
//! Mark-and-sweep garbage collector for a heap of integers and cons pairs.
//!
//! ## Design
//!
//! - **Object store**: arena of slots with a free list; handles carry a
//!   generation so stale ones are rejected
//! - **Root stack**: bounded, explicit; the only source of reachability
//! - **Mark**: worklist-driven, cycle-safe, no recursion
//! - **Sweep**: one linear pass over the arena
//! - **Trigger**: collect when the live count reaches the threshold, then
//!   set the threshold to twice the survivors
//!
//! ```
//! use cons_gc::Heap;
//!
//! let mut heap = Heap::new(256, 5);
//! heap.new_integer(1)?;
//! heap.new_integer(2)?;
//! let pair = heap.new_pair()?;
//! assert_eq!(heap.integer(heap.second(pair)?)?, 2);
//!
//! heap.pop_root()?;
//! heap.force_collect();
//! assert_eq!(heap.live_count(), 0);
//! # Ok::<(), cons_gc::GcError>(())
//! ```

#![warn(clippy::all)]
#![warn(missing_docs)]

mod allocator;
mod collector;
pub mod config;
pub mod error;
pub mod heap;
pub mod object;
pub mod roots;
mod store;

pub use collector::GcStats;
pub use config::GcConfig;
pub use error::{GcError, Result};
pub use heap::Heap;
pub use object::{GcHeader, MarkColor, Object, ObjectRef};
pub use roots::RootStack;
