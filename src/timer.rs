use std::time::Duration;
use web_time::Instant;

/// Upper bound on ticks reported by a single poll after a long stall.
pub const MAX_CATCH_UP: u32 = 4;

/// Host-driven repeating timer, the loop-side counterpart of `setInterval`.
///
/// The first tick is due one period after the timer is first polled (or explicitly started).
/// Due times advance on a fixed grid, so a slow frame does not shift later ticks.
#[derive(Clone, Debug)]
pub struct Interval {
    period: Duration,
    next_due: Option<Instant>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Number of ticks that fell due by `now`, capped at [`MAX_CATCH_UP`].
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(due) = self.next_due else {
            self.start(now);
            return 0;
        };
        if now < due {
            return 0;
        }

        let behind = now.duration_since(due).as_nanos() / self.period.as_nanos();
        let elapsed = u32::try_from(behind.saturating_add(1)).unwrap_or(u32::MAX);
        self.next_due = Some(due + self.period.saturating_mul(elapsed));
        elapsed.min(MAX_CATCH_UP)
    }
}
