//! Self-contained interactive effects.
//!
//! Each effect owns only its own state and is driven by its host (terminal loop or browser
//! callbacks). None of them know about each other.

pub mod console;
pub mod cursor;
pub mod pulse;
pub mod rain;
pub mod scramble;
pub mod status;
pub mod tilt;

pub use console::{
    ActionContext, CommandTable, Console, ConsoleHost, ConsoleLog, LineEditor, LineKind, LogLine,
    Reply,
};
pub use cursor::{HoverTracker, TrailingCursor};
pub use pulse::{Pulse, PulseField, PulseId, Spawned};
pub use rain::GlyphRain;
pub use scramble::{RevealTriggers, Scramble, ScrambleBoard, ScrambleFrame};
pub use status::{Gauge, StatusReadout};
pub use tilt::{CardRect, Tilt};

use std::fmt;

/// A position in surface pixels (client coordinates in the browser).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 8-bit RGB with a fractional alpha, the way canvas fill styles are written.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

pub const TRAIL_FADE: Rgba = Rgba::new(5, 5, 5, 0.05);
pub const ACCENT: Rgba = Rgba::opaque(0x00, 0xff, 0xcc);
pub const GLITCH: Rgba = Rgba::opaque(0xff, 0x00, 0xc1);
