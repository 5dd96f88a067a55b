use std::collections::HashSet;
use std::hash::Hash;
use std::time::Duration;

pub const SCRAMBLE_TICK: Duration = Duration::from_millis(30);
pub const SCRAMBLE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789$#@%&";
/// Fraction of an element that must be on screen before its reveal starts.
pub const VISIBILITY_THRESHOLD: f32 = 0.5;

/// Text produced by one scramble tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrambleFrame {
    pub text: String,
    pub done: bool,
}

/// Progressive reveal of a target string out of random noise.
///
/// Progress advances half a character per tick: after `k` ticks the first `k / 2` characters
/// are final and the rest are noise, so a target of `L` characters settles after `2L` ticks.
#[derive(Clone, Debug)]
pub struct Scramble {
    target: Vec<char>,
    ticks: usize,
}

impl Scramble {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.chars().collect(),
            ticks: 0,
        }
    }

    pub fn target(&self) -> String {
        self.target.iter().collect()
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Number of leading characters already showing their final value.
    pub fn revealed(&self) -> usize {
        (self.ticks / 2).min(self.target.len())
    }

    pub fn is_done(&self) -> bool {
        self.ticks > 0 && self.ticks >= self.target.len() * 2
    }

    pub fn tick(&mut self, rng: &mut fastrand::Rng) -> ScrambleFrame {
        if !self.is_done() {
            self.ticks += 1;
        }
        let revealed = self.revealed();
        let text = self
            .target
            .iter()
            .enumerate()
            .map(|(i, &ch)| if i < revealed { ch } else { noise_char(rng) })
            .collect();
        ScrambleFrame {
            text,
            done: self.is_done(),
        }
    }
}

fn noise_char(rng: &mut fastrand::Rng) -> char {
    SCRAMBLE_ALPHABET[rng.usize(..SCRAMBLE_ALPHABET.len())] as char
}

/// In-flight scrambles keyed by element.
///
/// Starting a scramble for a key that is already running replaces it, so two timers never
/// race on the same element's text.
#[derive(Clone, Debug)]
pub struct ScrambleBoard<K> {
    running: Vec<(K, Scramble)>,
}

impl<K> Default for ScrambleBoard<K> {
    fn default() -> Self {
        Self {
            running: Vec::new(),
        }
    }
}

impl<K: Clone + PartialEq> ScrambleBoard<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if an in-flight scramble for `key` was cancelled to make room.
    pub fn start(&mut self, key: K, target: &str) -> bool {
        let cancelled = self.cancel(&key);
        self.running.push((key, Scramble::new(target)));
        cancelled
    }

    pub fn cancel(&mut self, key: &K) -> bool {
        let before = self.running.len();
        self.running.retain(|(k, _)| k != key);
        self.running.len() != before
    }

    pub fn is_running(&self, key: &K) -> bool {
        self.running.iter().any(|(k, _)| k == key)
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Advance every running scramble once. Finished ones report `done` and are dropped.
    pub fn tick_all(&mut self, rng: &mut fastrand::Rng) -> Vec<(K, ScrambleFrame)> {
        let frames: Vec<(K, ScrambleFrame)> = self
            .running
            .iter_mut()
            .map(|(key, scramble)| (key.clone(), scramble.tick(rng)))
            .collect();
        self.running.retain(|(_, s)| !s.is_done());
        frames
    }
}

/// Decides when an element's reveal should (re)start.
///
/// Visibility fires once per element; hover fires every time, but only for elements
/// registered as navigation links. The two are independent of each other.
#[derive(Clone, Debug)]
pub struct RevealTriggers<K: Eq + Hash> {
    seen: HashSet<K>,
    nav_links: HashSet<K>,
}

impl<K: Eq + Hash> Default for RevealTriggers<K> {
    fn default() -> Self {
        Self {
            seen: HashSet::new(),
            nav_links: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> RevealTriggers<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_nav_link(&mut self, key: K) {
        self.nav_links.insert(key);
    }

    pub fn on_visible(&mut self, key: &K, ratio: f32) -> bool {
        if ratio < VISIBILITY_THRESHOLD || self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.clone());
        true
    }

    pub fn on_hover(&self, key: &K) -> bool {
        self.nav_links.contains(key)
    }

    pub fn has_fired(&self, key: &K) -> bool {
        self.seen.contains(key)
    }
}
