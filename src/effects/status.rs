use crate::timer::Interval;
use std::time::Duration;
use web_time::Instant;

pub const CLOCK_PERIOD: Duration = Duration::from_secs(1);
pub const CLOCK_PLACEHOLDER: &str = "--:--:-- UTC";

/// `HH:MM:SS UTC` for a Unix timestamp.
pub fn format_utc_clock(unix_secs: u64) -> String {
    let day_secs = unix_secs % 86_400;
    format!(
        "{:02}:{:02}:{:02} UTC",
        day_secs / 3600,
        (day_secs / 60) % 60,
        day_secs % 60
    )
}

/// `YYYY-MM-DD HH:MM:SS UTC` for a Unix timestamp.
pub fn format_utc_datetime(unix_secs: u64) -> String {
    let (year, month, day) = civil_from_days((unix_secs / 86_400) as i64);
    let day_secs = unix_secs % 86_400;
    format!(
        "{year:04}-{month:02}-{day:02} {:02}:{:02}:{:02} UTC",
        day_secs / 3600,
        (day_secs / 60) % 60,
        day_secs % 60
    )
}

// Proleptic Gregorian date from days since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// A randomized numeric readout refreshed on its own period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gauge {
    pub label: &'static str,
    pub min: u32,
    pub max: u32,
    pub suffix: &'static str,
    pub period: Duration,
}

impl Gauge {
    /// Simulated memory usage, 30..=49%.
    pub const MEMORY: Gauge = Gauge {
        label: "MEM",
        min: 30,
        max: 49,
        suffix: "%",
        period: Duration::from_millis(2000),
    };

    /// Simulated CPU load; the faster of the two variants.
    pub const LOAD: Gauge = Gauge {
        label: "CPU",
        min: 12,
        max: 68,
        suffix: "%",
        period: Duration::from_millis(1500),
    };

    /// Uniform over the inclusive range; a reversed range collapses to `min`.
    pub fn sample(&self, rng: &mut fastrand::Rng) -> u32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.u32(self.min..=self.max)
    }

    pub fn render(&self, value: u32) -> String {
        format!("{value}{}", self.suffix)
    }

    pub fn placeholder(&self) -> String {
        format!("--{}", self.suffix)
    }
}

/// Clock and gauge on independent intervals, with their last rendered text.
#[derive(Clone, Debug)]
pub struct StatusReadout {
    gauge: Gauge,
    clock_timer: Interval,
    gauge_timer: Interval,
    clock_text: String,
    gauge_text: String,
}

impl StatusReadout {
    pub fn new(gauge: Gauge) -> Self {
        Self {
            gauge,
            clock_timer: Interval::new(CLOCK_PERIOD),
            gauge_timer: Interval::new(gauge.period),
            clock_text: CLOCK_PLACEHOLDER.to_string(),
            gauge_text: gauge.placeholder(),
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.clock_timer.start(now);
        self.gauge_timer.start(now);
    }

    /// Refresh whichever readouts fell due. Returns true if any text changed.
    pub fn poll(&mut self, now: Instant, unix_secs: u64, rng: &mut fastrand::Rng) -> bool {
        let mut changed = false;
        if self.clock_timer.poll(now) > 0 {
            let text = format_utc_clock(unix_secs);
            changed |= text != self.clock_text;
            self.clock_text = text;
        }
        if self.gauge_timer.poll(now) > 0 {
            let text = self.gauge.render(self.gauge.sample(rng));
            changed |= text != self.gauge_text;
            self.gauge_text = text;
        }
        changed
    }

    pub fn gauge(&self) -> Gauge {
        self.gauge
    }

    pub fn clock_text(&self) -> &str {
        &self.clock_text
    }

    pub fn gauge_text(&self) -> &str {
        &self.gauge_text
    }
}
