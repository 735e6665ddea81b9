//! Elapsed-time and deadline bookkeeping for a single call.
//!
//! A [`DeadlineTracker`] starts counting when it is created (or reset) and
//! optionally carries a deadline relative to that start. Time is read from a
//! [`Clock`], which lets tests drive the tracker deterministically.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source. Readings never go backwards.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

/// Wall-clock independent time read from [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

#[derive(Clone)]
pub struct DeadlineTracker {
    clock: Arc<dyn Clock>,
    start: Duration,
    deadline: Option<Duration>,
}

impl DeadlineTracker {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(MonotonicClock::new()))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let start = clock.now();
        Self {
            clock,
            start,
            deadline: None,
        }
    }

    /// Restarts the elapsed counter. The deadline stays relative to the new start.
    pub fn reset(&mut self) {
        self.start = self.clock.now();
    }

    pub fn set_deadline(&mut self, timeout: Duration) {
        self.deadline = Some(timeout);
    }

    pub fn has_deadline(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_sub(self.start)
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Time left before the deadline, `None` when no deadline is set.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_sub(self.elapsed()))
    }

    /// Milliseconds left before the deadline, zero once it passed or when none is set.
    pub fn millis_before_deadline(&self) -> u64 {
        self.remaining().map(|left| left.as_millis() as u64).unwrap_or(0)
    }

    pub fn timed_out(&self) -> bool {
        matches!(self.remaining(), Some(left) if left.is_zero())
    }
}

impl Default for DeadlineTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DeadlineTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeadlineTracker")
            .field("elapsed", &self.elapsed())
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl fmt::Display for DeadlineTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.deadline {
            Some(deadline) => write!(
                f,
                "DeadlineTracker(timeout={}, elapsed={})",
                deadline.as_millis(),
                self.elapsed_millis()
            ),
            None => write!(f, "DeadlineTracker(timeout=0, elapsed={})", self.elapsed_millis()),
        }
    }
}
