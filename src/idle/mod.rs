//! Idle detection for typewriter auto-centering.
//!
//! The event loop owns one [`IdleScheduler`] and feeds it a monotonic
//! millisecond clock, in the same polled style as the loop's other
//! debouncers: activity calls [`IdleScheduler::reset`], and once a full
//! quiet period elapses [`IdleScheduler::take_ready`] yields exactly one
//! firing. High-frequency pointer motion goes through a
//! [`MotionCoalescer`] first so a mouse sweep costs one reset, not
//! hundreds.

/// One-shot idle timer with an enable flag.
///
/// At most one deadline is pending at a time: every operation cancels the
/// previous deadline before optionally arming a new one. A zero timeout or
/// a disabled scheduler never arms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdleScheduler {
    enabled: bool,
    timeout_ms: u64,
    deadline: Option<u64>,
}

impl IdleScheduler {
    pub const fn new(timeout_ms: u64, enabled: bool) -> Self {
        Self {
            enabled,
            timeout_ms,
            deadline: None,
        }
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Restart the quiet-period countdown.
    ///
    /// Cancels any pending deadline; arms a new one `timeout_ms` from `now_ms`
    /// when the scheduler is enabled and the timeout is nonzero.
    pub const fn reset(&mut self, now_ms: u64) {
        self.deadline = if self.enabled && self.timeout_ms > 0 {
            Some(now_ms.saturating_add(self.timeout_ms))
        } else {
            None
        };
    }

    /// Flip the enabled flag and apply it immediately.
    ///
    /// Disabling cancels any in-flight deadline; enabling starts a fresh
    /// quiet period. Returns the new state.
    pub const fn toggle(&mut self, now_ms: u64) -> bool {
        self.enabled = !self.enabled;
        self.reset(now_ms);
        self.enabled
    }

    pub const fn set_enabled(&mut self, enabled: bool, now_ms: u64) {
        self.enabled = enabled;
        self.reset(now_ms);
    }

    /// Reconfigure the quiet period. The countdown restarts with the new
    /// value; zero cancels outright.
    pub const fn set_timeout(&mut self, timeout_ms: u64, now_ms: u64) {
        self.timeout_ms = timeout_ms;
        self.reset(now_ms);
    }

    /// Drop the pending deadline without rescheduling (teardown path).
    pub const fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns true exactly once per armed deadline, when it has elapsed.
    pub fn take_ready(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Milliseconds until the pending deadline elapses, as a poll-timeout
    /// hint. `None` when nothing is pending.
    pub fn ms_until_ready(&self, now_ms: u64) -> Option<u64> {
        self.deadline.map(|deadline| deadline.saturating_sub(now_ms))
    }
}

/// Trailing-edge coalescing filter for pointer motion.
///
/// The first motion opens a fixed window; [`MotionCoalescer::take_ready`]
/// forwards a single reset when the window closes. Motion during an open
/// window is absorbed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionCoalescer {
    window_ms: u64,
    window_start: Option<u64>,
}

impl MotionCoalescer {
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            window_start: None,
        }
    }

    /// Record a motion event at `now_ms`.
    pub const fn observe(&mut self, now_ms: u64) {
        if self.window_start.is_none() {
            self.window_start = Some(now_ms);
        }
    }

    /// Returns true once per window, after it has run its course.
    pub fn take_ready(&mut self, now_ms: u64) -> bool {
        let Some(start) = self.window_start else {
            return false;
        };
        if now_ms.saturating_sub(start) >= self.window_ms {
            self.window_start = None;
            true
        } else {
            false
        }
    }

    pub const fn is_pending(&self) -> bool {
        self.window_start.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_quiet_period() {
        let mut idle = IdleScheduler::new(1000, true);
        idle.reset(0);
        assert!(!idle.take_ready(999));
        assert!(idle.take_ready(1000));
        // One-shot: no second firing without another reset.
        assert!(!idle.take_ready(2000));
        assert!(!idle.is_pending());
    }

    #[test]
    fn test_reset_restarts_the_countdown() {
        let mut idle = IdleScheduler::new(1000, true);
        idle.reset(0);
        idle.reset(500);
        assert!(!idle.take_ready(1000));
        assert!(!idle.take_ready(1499));
        assert!(idle.take_ready(1500));
    }

    #[test]
    fn test_toggle_off_cancels_pending_deadline() {
        let mut idle = IdleScheduler::new(1000, true);
        idle.reset(0);
        assert!(!idle.toggle(500));
        assert!(!idle.is_pending());
        assert!(!idle.take_ready(5000));
    }

    #[test]
    fn test_toggle_on_arms_a_fresh_deadline() {
        let mut idle = IdleScheduler::new(1000, false);
        idle.reset(0);
        assert!(!idle.is_pending());
        assert!(idle.toggle(200));
        assert!(!idle.take_ready(1199));
        assert!(idle.take_ready(1200));
    }

    #[test]
    fn test_zero_timeout_never_schedules() {
        let mut idle = IdleScheduler::new(0, true);
        idle.reset(0);
        assert!(!idle.is_pending());
        assert!(!idle.take_ready(u64::MAX));
    }

    #[test]
    fn test_disabled_never_schedules() {
        let mut idle = IdleScheduler::new(1000, false);
        idle.reset(0);
        assert!(!idle.is_pending());
        assert!(!idle.take_ready(u64::MAX));
    }

    #[test]
    fn test_set_timeout_restarts_with_new_value() {
        let mut idle = IdleScheduler::new(1000, true);
        idle.reset(0);
        idle.set_timeout(3000, 500);
        assert!(!idle.take_ready(1000));
        assert!(!idle.take_ready(3499));
        assert!(idle.take_ready(3500));
    }

    #[test]
    fn test_set_timeout_zero_cancels() {
        let mut idle = IdleScheduler::new(1000, true);
        idle.reset(0);
        idle.set_timeout(0, 500);
        assert!(!idle.is_pending());
    }

    #[test]
    fn test_cancel_drops_deadline() {
        let mut idle = IdleScheduler::new(1000, true);
        idle.reset(0);
        idle.cancel();
        assert!(!idle.is_pending());
        assert!(!idle.take_ready(1000));
    }

    #[test]
    fn test_ms_until_ready_counts_down() {
        let mut idle = IdleScheduler::new(1000, true);
        idle.reset(0);
        assert_eq!(idle.ms_until_ready(0), Some(1000));
        assert_eq!(idle.ms_until_ready(800), Some(200));
        assert_eq!(idle.ms_until_ready(1500), Some(0));
        idle.cancel();
        assert_eq!(idle.ms_until_ready(0), None);
    }

    #[test]
    fn test_coalescer_forwards_one_reset_per_window() {
        let mut motion = MotionCoalescer::new(100);
        motion.observe(0);
        motion.observe(20);
        motion.observe(90);
        assert!(!motion.take_ready(99));
        assert!(motion.take_ready(100));
        assert!(!motion.take_ready(200));
    }

    #[test]
    fn test_coalescer_opens_a_new_window_after_firing() {
        let mut motion = MotionCoalescer::new(100);
        motion.observe(0);
        assert!(motion.take_ready(150));
        motion.observe(200);
        assert!(!motion.take_ready(250));
        assert!(motion.take_ready(300));
    }

    #[test]
    fn test_coalescer_idle_without_motion() {
        let mut motion = MotionCoalescer::new(100);
        assert!(!motion.is_pending());
        assert!(!motion.take_ready(1000));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn never_fires_before_a_full_quiet_period(
                timeout in 1..10_000u64,
                resets in proptest::collection::vec(0..100_000u64, 1..20),
            ) {
                let mut resets = resets;
                resets.sort_unstable();
                let mut idle = IdleScheduler::new(timeout, true);
                for &t in &resets {
                    idle.reset(t);
                }
                let last = *resets.last().unwrap();
                prop_assert!(!idle.take_ready(last + timeout - 1));
                prop_assert!(idle.take_ready(last + timeout));
            }

            #[test]
            fn fires_at_most_once_per_reset(
                timeout in 1..10_000u64,
                probes in proptest::collection::vec(0..100_000u64, 1..50),
            ) {
                let mut probes = probes;
                probes.sort_unstable();
                let mut idle = IdleScheduler::new(timeout, true);
                idle.reset(0);
                let fired = probes
                    .iter()
                    .filter(|&&t| idle.take_ready(t))
                    .count();
                prop_assert!(fired <= 1);
            }

            #[test]
            fn disabled_scheduler_is_inert(
                timeout in 0..10_000u64,
                probes in proptest::collection::vec(0..100_000u64, 0..20),
            ) {
                let mut idle = IdleScheduler::new(timeout, false);
                idle.reset(0);
                for &t in &probes {
                    prop_assert!(!idle.take_ready(t));
                }
            }
        }
    }
}
