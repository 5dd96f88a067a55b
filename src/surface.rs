use crate::effects::Rgba;

/// A 2D drawing target addressed in pixels.
///
/// Mirrors the handful of canvas primitives the glyph rain needs: a current fill colour and
/// font size, a rectangle fill and a single-glyph text draw. `fill_glyph` takes the text
/// baseline as `y`, like `fillText`.
pub trait GlyphSurface {
    fn size(&self) -> (f32, f32);
    fn set_fill(&mut self, color: Rgba);
    fn set_font_px(&mut self, px: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_glyph(&mut self, ch: char, x: f32, y: f32);
}
