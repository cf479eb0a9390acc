pub const TICK_INTERVAL_MS: i64 = 1_000;
pub const FEEDBACK_DELAY_MS: i64 = 1_500;
/// Longest feedback delay accepted from the command line or config file
pub const MAX_FEEDBACK_DELAY_MS: u64 = 60_000;

/// Recurring timer driving the elapsed-time display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period_ms: i64,
    next_due_ms: i64,
}

impl Interval {
    pub fn starting_at(now_ms: i64, period_ms: i64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            next_due_ms: now_ms.saturating_add(period_ms.max(1)),
        }
    }

    /// Returns true at most once per call when a period has elapsed.
    /// Periods missed entirely are skipped rather than replayed.
    pub fn fire(&mut self, now_ms: i64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        let missed = (now_ms - self.next_due_ms) / self.period_ms;
        self.next_due_ms = self
            .next_due_ms
            .saturating_add((missed + 1).saturating_mul(self.period_ms));
        true
    }

    pub fn next_due_ms(&self) -> i64 {
        self.next_due_ms
    }
}

/// One-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    due_ms: i64,
}

impl Deadline {
    pub fn after(now_ms: i64, delay_ms: i64) -> Self {
        Self {
            due_ms: now_ms.saturating_add(delay_ms.max(0)),
        }
    }

    pub fn is_due(&self, now_ms: i64) -> bool {
        now_ms >= self.due_ms
    }
}

/// The controller's two timing resources. Replacing or clearing a slot
/// cancels whatever was armed there.
#[derive(Debug, Default)]
pub struct Timers {
    tick: Option<Interval>,
    advance: Option<Deadline>,
}

impl Timers {
    pub fn start_ticking(&mut self, now_ms: i64, period_ms: i64) {
        self.tick = Some(Interval::starting_at(now_ms, period_ms));
    }

    pub fn stop_ticking(&mut self) {
        self.tick = None;
    }

    pub fn is_ticking(&self) -> bool {
        self.tick.is_some()
    }

    pub fn tick_due(&mut self, now_ms: i64) -> bool {
        self.tick.as_mut().is_some_and(|t| t.fire(now_ms))
    }

    pub fn arm_advance(&mut self, now_ms: i64, delay_ms: i64) {
        self.advance = Some(Deadline::after(now_ms, delay_ms));
    }

    pub fn cancel_advance(&mut self) {
        self.advance = None;
    }

    pub fn advance_pending(&self) -> bool {
        self.advance.is_some()
    }

    /// Disarms and reports the deferred advance if its deadline passed
    pub fn take_due_advance(&mut self, now_ms: i64) -> bool {
        match self.advance {
            Some(deadline) if deadline.is_due(now_ms) => {
                self.advance = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel_all(&mut self) {
        self.stop_ticking();
        self.cancel_advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_fires_once_per_period() {
        let mut interval = Interval::starting_at(0, 1_000);
        assert!(!interval.fire(999));
        assert!(interval.fire(1_000));
        assert!(!interval.fire(1_500));
        assert!(interval.fire(2_050));
        assert_eq!(interval.next_due_ms(), 3_000);
    }

    #[test]
    fn interval_skips_missed_periods() {
        let mut interval = Interval::starting_at(0, 1_000);
        assert!(interval.fire(5_300));
        assert_eq!(interval.next_due_ms(), 6_000);
        assert!(!interval.fire(5_900));
    }

    #[test]
    fn deadline_is_one_shot() {
        let mut timers = Timers::default();
        timers.arm_advance(100, 1_500);
        assert!(timers.advance_pending());
        assert!(!timers.take_due_advance(1_599));
        assert!(timers.take_due_advance(1_600));
        assert!(!timers.take_due_advance(5_000));
        assert!(!timers.advance_pending());
    }

    #[test]
    fn cancel_all_disarms_both() {
        let mut timers = Timers::default();
        timers.start_ticking(0, 1_000);
        timers.arm_advance(0, 10);
        timers.cancel_all();
        assert!(!timers.is_ticking());
        assert!(!timers.advance_pending());
        assert!(!timers.tick_due(10_000));
        assert!(!timers.take_due_advance(10_000));
    }

    #[test]
    fn restarting_the_tick_replaces_the_old_one() {
        let mut timers = Timers::default();
        timers.start_ticking(0, 1_000);
        timers.start_ticking(10_000, 1_000);
        assert!(!timers.tick_due(10_500));
        assert!(timers.tick_due(11_000));
    }

    #[test]
    fn zero_delay_is_due_immediately() {
        let mut timers = Timers::default();
        timers.arm_advance(42, 0);
        assert!(timers.take_due_advance(42));
    }

    #[test]
    fn huge_delay_never_comes_due() {
        let mut timers = Timers::default();
        timers.arm_advance(1_000, i64::MAX);
        assert!(!timers.take_due_advance(1_001));
        assert!(!timers.take_due_advance(i64::MAX - 1));
        assert!(timers.advance_pending());
    }

    #[test]
    fn huge_period_does_not_wrap() {
        let mut interval = Interval::starting_at(5, i64::MAX);
        assert_eq!(interval.next_due_ms(), i64::MAX);
        assert!(!interval.fire(1_000_000));
    }
}
