//! Deadline budgeting for multi-step blocking operations
//!
//! One incoming request gets a single absolute deadline. Every blocking
//! sub-call (navigate, load-state waits, challenge solve) is parameterized
//! with the time still remaining at the instant it is issued, so slow early
//! steps shrink the budget available to later ones.

use std::time::{Duration, Instant};

/// Tracks an absolute deadline derived from a caller-supplied total duration.
///
/// Purely accounting: the budget never skips or retries anything itself. An
/// exhausted budget still hands out a zero timeout so the next call fails
/// fast inside its own timeout machinery.
#[derive(Debug, Clone, Copy)]
pub struct DeadlineBudget {
    deadline: Instant,
}

impl DeadlineBudget {
    /// Create a budget that expires `total` from now
    pub fn new(total: Duration) -> Self {
        Self { deadline: Instant::now() + total }
    }

    /// Create a budget from whole seconds, as supplied on the API surface
    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    /// Time left before the deadline, clamped to zero
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Remaining time in milliseconds, for call sites that take millis
    pub fn remaining_ms(&self) -> u64 {
        self.remaining().as_millis() as u64
    }

    /// Whether the deadline has passed
    pub fn is_exhausted(&self) -> bool {
        self.remaining().is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_remaining_bounded_by_total() {
        let budget = DeadlineBudget::new(Duration::from_secs(10));
        assert!(budget.remaining() <= Duration::from_secs(10));
        assert!(!budget.is_exhausted());
    }

    #[test]
    fn test_remaining_shrinks() {
        let budget = DeadlineBudget::new(Duration::from_millis(500));
        let first = budget.remaining();
        sleep(Duration::from_millis(50));
        let second = budget.remaining();
        assert!(second <= first);
    }

    #[test]
    fn test_expired_budget_clamps_to_zero() {
        let budget = DeadlineBudget::new(Duration::from_millis(20));
        sleep(Duration::from_millis(40));
        assert_eq!(budget.remaining(), Duration::ZERO);
        assert_eq!(budget.remaining_ms(), 0);
        assert!(budget.is_exhausted());
    }

    #[test]
    fn test_zero_duration_budget() {
        let budget = DeadlineBudget::new(Duration::ZERO);
        assert_eq!(budget.remaining(), Duration::ZERO);
        assert!(budget.is_exhausted());
    }

    #[test]
    fn test_from_secs() {
        let budget = DeadlineBudget::from_secs(60);
        assert!(budget.remaining() > Duration::from_secs(59));
        assert!(budget.remaining() <= Duration::from_secs(60));
    }
}
