//! Heap configuration

/// Default root stack capacity
pub const DEFAULT_MAX_STACK_DEPTH: usize = 256;

/// Default live-object count that triggers the first collection
pub const DEFAULT_INITIAL_THRESHOLD: usize = 5;

/// GC configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcConfig {
    /// Maximum number of entries on the root stack (default: 256)
    pub max_stack_depth: usize,
    /// Live-object count that triggers the first collection (default: 5)
    pub initial_threshold: usize,
    /// Lower bound for the threshold after a collection (default: 0).
    ///
    /// With the default the next threshold is exactly twice the surviving
    /// object count, even when that is zero.
    pub min_threshold: usize,
    /// Hard limit on live objects (default: unlimited)
    pub max_objects: Option<usize>,
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            max_stack_depth: DEFAULT_MAX_STACK_DEPTH,
            initial_threshold: DEFAULT_INITIAL_THRESHOLD,
            min_threshold: 0,
            max_objects: None,
        }
    }
}

impl GcConfig {
    /// Config with the given stack depth and first threshold, other fields
    /// defaulted
    pub fn new(max_stack_depth: usize, initial_threshold: usize) -> Self {
        Self {
            max_stack_depth,
            initial_threshold,
            ..Self::default()
        }
    }

    /// Set the root stack capacity
    pub fn with_max_stack_depth(mut self, depth: usize) -> Self {
        self.max_stack_depth = depth;
        self
    }

    /// Set the first collection threshold
    pub fn with_initial_threshold(mut self, threshold: usize) -> Self {
        self.initial_threshold = threshold;
        self
    }

    /// Set the threshold floor applied after each collection
    pub fn with_min_threshold(mut self, floor: usize) -> Self {
        self.min_threshold = floor;
        self
    }

    /// Cap the number of live objects
    pub fn with_max_objects(mut self, limit: usize) -> Self {
        self.max_objects = Some(limit);
        self
    }
}
