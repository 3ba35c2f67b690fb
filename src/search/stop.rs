//! Ready-made stop conditions.
//!
//! Each implements both [`StopCondition`] and [`MultiStopCondition`] for
//! any solution, element and move type. They can also be polled directly
//! from round-level predicates (see [`local_search`](super::local_search)).

use std::time::{Duration, Instant};

use super::types::{MultiStopCondition, StopCondition};

/// Never stops. The default stop condition of every component bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeverStop;

impl<S, M> StopCondition<S, M> for NeverStop {
    fn stop(&mut self, _: &S, _: &M) -> bool {
        false
    }
}

impl<S, E, M> MultiStopCondition<S, E, M> for NeverStop {
    fn stop(&mut self, _: &S, _: &E, _: &M) -> bool {
        false
    }
}

/// Stops once it has been consulted more than `limit` times.
///
/// The first `limit` calls return `false`, every later call `true`.
///
/// # Examples
///
/// ```
/// use u_localsearch::search::CountLimit;
///
/// let mut limit = CountLimit::new(2);
/// assert!(!limit.tick());
/// assert!(!limit.tick());
/// assert!(limit.tick());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountLimit {
    limit: usize,
    count: usize,
}

impl CountLimit {
    pub fn new(limit: usize) -> Self {
        Self { limit, count: 0 }
    }

    /// Counts one call and reports whether the limit is exceeded.
    pub fn tick(&mut self) -> bool {
        let exceeded = self.count >= self.limit;
        self.count = self.count.saturating_add(1);
        exceeded
    }

    /// Number of calls counted so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Resets the counter to zero.
    pub fn reset(&mut self) {
        self.count = 0;
    }
}

impl<S, M> StopCondition<S, M> for CountLimit {
    fn stop(&mut self, _: &S, _: &M) -> bool {
        self.tick()
    }
}

impl<S, E, M> MultiStopCondition<S, E, M> for CountLimit {
    fn stop(&mut self, _: &S, _: &E, _: &M) -> bool {
        self.tick()
    }
}

/// Stops once a wall-clock budget, measured from construction or the
/// last [`restart`](TimeLimit::restart), has elapsed.
#[derive(Debug, Clone)]
pub struct TimeLimit {
    limit: Duration,
    start: Instant,
}

impl TimeLimit {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            start: Instant::now(),
        }
    }

    /// Whether the budget is used up.
    pub fn exceeded(&self) -> bool {
        self.start.elapsed() >= self.limit
    }

    /// Time since construction or the last restart.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Starts measuring the budget again from now.
    pub fn restart(&mut self) {
        self.start = Instant::now();
    }
}

impl<S, M> StopCondition<S, M> for TimeLimit {
    fn stop(&mut self, _: &S, _: &M) -> bool {
        self.exceeded()
    }
}

impl<S, E, M> MultiStopCondition<S, E, M> for TimeLimit {
    fn stop(&mut self, _: &S, _: &E, _: &M) -> bool {
        self.exceeded()
    }
}
