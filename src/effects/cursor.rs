use crate::effects::Point;
use std::collections::HashSet;
use std::hash::Hash;

/// Fraction of the remaining distance covered per frame.
pub const CURSOR_EASE: f32 = 0.15;

/// Marker that trails the raw pointer with exponential easing.
#[derive(Clone, Copy, Debug)]
pub struct TrailingCursor {
    target: Point,
    pos: Point,
}

impl TrailingCursor {
    pub fn new(start: Point) -> Self {
        Self {
            target: start,
            pos: start,
        }
    }

    pub fn pointer_moved(&mut self, at: Point) {
        self.target = at;
    }

    /// One display refresh. Leaves 85% of the error behind, so a fixed target is approached
    /// geometrically and never overshot.
    pub fn step(&mut self) -> Point {
        self.pos.x += (self.target.x - self.pos.x) * CURSOR_EASE;
        self.pos.y += (self.target.y - self.pos.y) * CURSOR_EASE;
        self.pos
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    pub fn target(&self) -> Point {
        self.target
    }
}

impl Default for TrailingCursor {
    fn default() -> Self {
        Self::new(Point::default())
    }
}

/// Tracks which interactive elements are under the pointer; drives the hover-active marker.
#[derive(Clone, Debug)]
pub struct HoverTracker<K: Eq + Hash> {
    hovered: HashSet<K>,
}

impl<K: Eq + Hash> Default for HoverTracker<K> {
    fn default() -> Self {
        Self {
            hovered: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash> HoverTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the element was not already hovered.
    pub fn enter(&mut self, key: K) -> bool {
        self.hovered.insert(key)
    }

    pub fn leave(&mut self, key: &K) -> bool {
        self.hovered.remove(key)
    }

    pub fn is_hovered(&self, key: &K) -> bool {
        self.hovered.contains(key)
    }

    pub fn is_active(&self) -> bool {
        !self.hovered.is_empty()
    }
}
