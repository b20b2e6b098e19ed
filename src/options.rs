/// When a child that runs out of entries mid-merge gets closed.
///
/// Trade-off: resource lifetime vs. error locality.
///   - Deferred: the child is held until `MergeScanner::close()` and closed
///     together with the rest. Close failures are reported in one place.
///   - Eager: the child is closed the moment it is exhausted. File handles are
///     released sooner, but a close failure fails the `iterate()` call.
///
/// Children already exhausted at construction are always closed right away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClosePolicy {
    #[default]
    Deferred,
    Eager,
}

/// Tuning knobs for a merge scanner.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// See [`ClosePolicy`].
    pub close_policy: ClosePolicy,
    /// Initial capacity of the per-key merged row map.
    pub row_capacity: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            close_policy: ClosePolicy::Deferred,
            row_capacity: 16,
        }
    }
}

impl MergeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close_policy(mut self, policy: ClosePolicy) -> Self {
        self.close_policy = policy;
        self
    }

    pub fn row_capacity(mut self, capacity: usize) -> Self {
        self.row_capacity = capacity;
        self
    }
}
