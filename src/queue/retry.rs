//! Delivery retry policy.

/// How many times a queued item may be attempted before it is dropped.
///
/// The policy is a value rather than inline control flow so tests can
/// pin its behavior and callers can tune it. The shipped default is
/// three attempts; exhaustion drops the item with a logged warning so
/// one dead letter never blocks the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum delivery attempts per item.
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// Whether an item that has failed `attempts` times may be retried.
    #[must_use]
    pub const fn should_retry(self, attempts: u32) -> bool {
        attempts < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}
