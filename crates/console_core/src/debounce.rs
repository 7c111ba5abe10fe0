use std::time::{Duration, Instant};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Holds back a value until no newer one arrived for a quiet period.
///
/// Time is passed in by the caller, so the debouncer works the same under a
/// real clock, a UI tick, or a test. A value equal to the last one released is
/// swallowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
    last_dispatched: Option<T>,
}

impl<T: Clone + PartialEq> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_dispatched: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Records a new value; restarts the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.quiet)
    }

    /// Releases the pending value once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self
            .deadline()
            .is_some_and(|deadline| now >= deadline);
        if !due {
            return None;
        }
        let (value, _) = self.pending.take()?;
        if self.last_dispatched.as_ref() == Some(&value) {
            return None;
        }
        self.last_dispatched = Some(value.clone());
        Some(value)
    }

    pub fn last_dispatched(&self) -> Option<&T> {
        self.last_dispatched.as_ref()
    }

    /// Drops any pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
