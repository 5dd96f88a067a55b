use crate::effects::Point;
use std::collections::VecDeque;
use std::time::Duration;
use web_time::Instant;

pub const PULSE_LIFETIME: Duration = Duration::from_millis(600);
pub const MAX_LIVE_PULSES: usize = 48;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PulseId(pub u64);

#[derive(Clone, Copy, Debug)]
pub struct Pulse {
    pub id: PulseId,
    pub at: Point,
    pub born: Instant,
}

/// Result of a click: the new pulse and, when the field was full, the one evicted for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawned {
    pub id: PulseId,
    pub evicted: Option<PulseId>,
}

/// Short-lived markers left by clicks, oldest first.
#[derive(Clone, Debug)]
pub struct PulseField {
    lifetime: Duration,
    cap: usize,
    next_id: u64,
    live: VecDeque<Pulse>,
}

impl PulseField {
    pub fn new(lifetime: Duration, cap: usize) -> Self {
        Self {
            lifetime,
            cap: cap.max(1),
            next_id: 0,
            live: VecDeque::new(),
        }
    }

    pub fn click(&mut self, at: Point, now: Instant) -> Spawned {
        let evicted = if self.live.len() >= self.cap {
            self.live.pop_front().map(|p| p.id)
        } else {
            None
        };
        let id = PulseId(self.next_id);
        self.next_id += 1;
        self.live.push_back(Pulse { id, at, born: now });
        Spawned { id, evicted }
    }

    /// Drop every pulse that has reached its lifetime and report which ones went.
    pub fn expire(&mut self, now: Instant) -> Vec<PulseId> {
        let mut gone = Vec::new();
        while let Some(front) = self.live.front() {
            if now.saturating_duration_since(front.born) < self.lifetime {
                break;
            }
            gone.push(front.id);
            self.live.pop_front();
        }
        gone
    }

    /// How far through its lifetime a pulse is, in `0.0..=1.0`.
    pub fn progress(&self, pulse: &Pulse, now: Instant) -> f32 {
        let age = now.saturating_duration_since(pulse.born).as_secs_f32();
        (age / self.lifetime.as_secs_f32().max(1e-6)).clamp(0.0, 1.0)
    }

    pub fn live(&self) -> impl Iterator<Item = &Pulse> {
        self.live.iter()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}

impl Default for PulseField {
    fn default() -> Self {
        Self::new(PULSE_LIFETIME, MAX_LIVE_PULSES)
    }
}
