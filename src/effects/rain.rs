use crate::effects::{ACCENT, GLITCH, Point, Rgba, TRAIL_FADE};
use crate::surface::GlyphSurface;

/// Width of one rain column, which is also the font size.
pub const CELL_PX: f32 = 16.0;
pub const RAIN_ALPHABET: &[u8] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz$+-*/%=<>!&|^~";
/// Half-size of the box around the pointer inside which glyphs switch to the glitch colour.
pub const GLITCH_RADIUS_PX: f32 = 50.0;
/// A column below the bottom edge respawns when `rng.f32()` exceeds this (2.5% per frame).
pub const RESPAWN_THRESHOLD: f32 = 0.975;
/// Where the pointer is assumed to be before the first move event.
pub const OFFSCREEN_POINTER: Point = Point::new(-1000.0, -1000.0);

/// Full-surface falling-glyph animation.
///
/// One glyph per column per frame; previous glyphs are never erased, only dimmed by a
/// translucent overlay, which is what produces the trails.
pub struct GlyphRain {
    rng: fastrand::Rng,
    width: f32,
    height: f32,
    offsets: Vec<f32>,
    pointer: Point,
}

impl GlyphRain {
    pub fn new(rng: fastrand::Rng) -> Self {
        Self {
            rng,
            width: 0.0,
            height: 0.0,
            offsets: Vec::new(),
            pointer: OFFSCREEN_POINTER,
        }
    }

    /// Recompute the column count and restart every column above the top edge.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        let columns = (self.width / CELL_PX).floor() as usize;
        let rng = &mut self.rng;
        self.offsets = (0..columns).map(|_| rng.f32() * -100.0).collect();
    }

    pub fn pointer_moved(&mut self, at: Point) {
        self.pointer = at;
    }

    pub fn draw(&mut self, surface: &mut dyn GlyphSurface) {
        surface.set_fill(TRAIL_FADE);
        surface.fill_rect(0.0, 0.0, self.width, self.height);
        surface.set_font_px(CELL_PX);

        for (i, offset) in self.offsets.iter_mut().enumerate() {
            let glyph = RAIN_ALPHABET[self.rng.usize(..RAIN_ALPHABET.len())] as char;
            let x = i as f32 * CELL_PX;
            let y = *offset * CELL_PX;

            surface.set_fill(glyph_color(x, y, self.pointer));
            surface.fill_glyph(glyph, x, y);

            if y > self.height && self.rng.f32() > RESPAWN_THRESHOLD {
                *offset = 0.0;
            }
            *offset += 1.0;
        }
    }

    pub fn columns(&self) -> usize {
        self.offsets.len()
    }

    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

pub fn glyph_color(x: f32, y: f32, pointer: Point) -> Rgba {
    if (x - pointer.x).abs() < GLITCH_RADIUS_PX && (y - pointer.y).abs() < GLITCH_RADIUS_PX {
        GLITCH
    } else {
        ACCENT
    }
}
