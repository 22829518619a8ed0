use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct SchedulerState {
    period_ms: AtomicU64,
    running: AtomicBool,
}

/// Shared handle to the tick period.
///
/// The engine writes the period during a tick; the loop that drives ticks
/// reads it between ticks. Clones refer to the same scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    state: Arc<SchedulerState>,
}

impl SchedulerHandle {
    #[must_use]
    pub fn new(period_ms: u64) -> Self {
        Self {
            state: Arc::new(SchedulerState {
                period_ms: AtomicU64::new(period_ms.max(1)),
                running: AtomicBool::new(true),
            }),
        }
    }

    /// Replaces the tick period; applies from the next scheduled tick.
    pub fn set_period(&self, period_ms: u64) {
        self.state
            .period_ms
            .store(period_ms.max(1), Ordering::Release);
    }

    #[must_use]
    pub fn period_ms(&self) -> u64 {
        self.state.period_ms.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms())
    }

    pub fn stop(&self) {
        self.state.running.store(false, Ordering::Release);
    }

    pub fn resume(&self) {
        self.state.running.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Acquire)
    }
}

/// Turns a [`SchedulerHandle`] into tick deadlines for a polling loop.
#[derive(Debug)]
pub struct Ticker {
    handle: SchedulerHandle,
    next_deadline: Instant,
}

impl Ticker {
    #[must_use]
    pub fn new(handle: SchedulerHandle, now: Instant) -> Self {
        let next_deadline = now + handle.period();
        Self {
            handle,
            next_deadline,
        }
    }

    /// Time left until the next tick is due, `None` while stopped.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        if !self.handle.is_running() {
            return None;
        }
        Some(self.next_deadline.saturating_duration_since(now))
    }

    /// Returns true when a tick is due and schedules the following one
    /// using the period current at this moment.
    pub fn poll_due(&mut self, now: Instant) -> bool {
        if !self.handle.is_running() || now < self.next_deadline {
            return false;
        }
        let period = self.handle.period();
        self.next_deadline += period;
        // A stalled loop skips missed ticks instead of replaying them in a burst.
        if self.next_deadline < now {
            self.next_deadline = now + period;
        }
        true
    }

    /// Restarts the schedule from `now`, e.g. after a resume or restart.
    pub fn reset(&mut self, now: Instant) {
        self.next_deadline = now + self.handle.period();
    }

    #[must_use]
    pub fn handle(&self) -> &SchedulerHandle {
        &self.handle
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{SchedulerHandle, Ticker};

    #[test]
    fn handle_clones_share_period() {
        let handle = SchedulerHandle::new(100);
        let engine_side = handle.clone();

        engine_side.set_period(45);

        assert_eq!(handle.period_ms(), 45);
    }

    #[test]
    fn zero_period_is_raised_to_one_millisecond() {
        let handle = SchedulerHandle::new(0);
        assert_eq!(handle.period_ms(), 1);
    }

    #[test]
    fn period_change_applies_from_next_tick() {
        let start = Instant::now();
        let handle = SchedulerHandle::new(100);
        let mut ticker = Ticker::new(handle.clone(), start);

        assert!(!ticker.poll_due(start + Duration::from_millis(99)));

        handle.set_period(50);
        assert!(ticker.poll_due(start + Duration::from_millis(100)));
        assert_eq!(
            ticker.time_until_due(start + Duration::from_millis(100)),
            Some(Duration::from_millis(50))
        );
    }

    #[test]
    fn stopped_scheduler_never_fires() {
        let start = Instant::now();
        let handle = SchedulerHandle::new(10);
        let mut ticker = Ticker::new(handle.clone(), start);

        handle.stop();

        assert!(!ticker.poll_due(start + Duration::from_secs(1)));
        assert_eq!(ticker.time_until_due(start), None);
    }
}
