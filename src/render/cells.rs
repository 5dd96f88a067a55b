use crate::effects::Rgba;
use crate::render::grid::{Cell, CellGrid};
use crate::surface::GlyphSurface;

/// Channel level below which a faded glyph is treated as gone.
const BLANK_LEVEL: f32 = 18.0;

#[derive(Clone, Copy, Debug, PartialEq)]
struct SurfaceCell {
    ch: char,
    rgb: [f32; 3],
}

const EMPTY: SurfaceCell = SurfaceCell {
    ch: ' ',
    rgb: [0.0; 3],
};

/// A pixel-addressed drawing surface backed by terminal cells.
///
/// Each cell covers `cell_w` x `cell_h` pixels. Colours are kept in floating point so a
/// 5% overlay repeated every frame fades glyphs smoothly instead of stalling on rounding.
#[derive(Clone, Debug)]
pub struct CellSurface {
    cols: usize,
    rows: usize,
    cell_w: f32,
    cell_h: f32,
    fill: Rgba,
    font_px: f32,
    cells: Vec<SurfaceCell>,
}

impl CellSurface {
    pub fn new(cols: usize, rows: usize, cell_w: f32, cell_h: f32) -> Self {
        Self {
            cols,
            rows,
            cell_w: cell_w.max(1.0),
            cell_h: cell_h.max(1.0),
            fill: Rgba::opaque(0, 0, 0),
            font_px: cell_h,
            cells: vec![EMPTY; cols * rows],
        }
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.cells.clear();
        self.cells.resize(cols * rows, EMPTY);
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> (f32, f32) {
        (self.cell_w, self.cell_h)
    }

    pub fn font_px(&self) -> f32 {
        self.font_px
    }

    /// Glyph and colour at a cell, or `None` for a blank cell.
    pub fn glyph_at(&self, col: usize, row: usize) -> Option<(char, (u8, u8, u8))> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        let cell = self.cells[row * self.cols + col];
        if cell.ch == ' ' {
            return None;
        }
        Some((cell.ch, to_rgb(cell.rgb)))
    }

    /// Copy every visible glyph into `grid` as the bottom layer.
    pub fn paint_into(&self, grid: &mut CellGrid) {
        for row in 0..self.rows.min(grid.rows()) {
            for col in 0..self.cols.min(grid.cols()) {
                if let Some((ch, fg)) = self.glyph_at(col, row) {
                    grid.set(col, row, Cell::glyph(ch, fg));
                }
            }
        }
    }
}

impl GlyphSurface for CellSurface {
    fn size(&self) -> (f32, f32) {
        (self.cols as f32 * self.cell_w, self.rows as f32 * self.cell_h)
    }

    fn set_fill(&mut self, color: Rgba) {
        self.fill = color;
    }

    fn set_font_px(&mut self, px: f32) {
        self.font_px = px;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let col0 = (x / self.cell_w).floor().max(0.0) as usize;
        let row0 = (y / self.cell_h).floor().max(0.0) as usize;
        let col1 = (((x + w) / self.cell_w).ceil().max(0.0) as usize).min(self.cols);
        let row1 = (((y + h) / self.cell_h).ceil().max(0.0) as usize).min(self.rows);

        let a = self.fill.a.clamp(0.0, 1.0);
        let target = [
            f32::from(self.fill.r),
            f32::from(self.fill.g),
            f32::from(self.fill.b),
        ];
        for row in row0..row1 {
            for col in col0..col1 {
                let cell = &mut self.cells[row * self.cols + col];
                for (c, t) in cell.rgb.iter_mut().zip(target) {
                    *c += (t - *c) * a;
                }
                if cell.rgb.iter().all(|&c| c < BLANK_LEVEL) {
                    cell.ch = ' ';
                }
            }
        }
    }

    fn fill_glyph(&mut self, ch: char, x: f32, y: f32) {
        // `y` is the baseline; the glyph occupies the cell holding its vertical middle.
        let col = (x / self.cell_w).floor();
        let row = ((y - self.cell_h * 0.5) / self.cell_h).floor();
        if col < 0.0 || row < 0.0 {
            return;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return;
        }
        self.cells[row * self.cols + col] = SurfaceCell {
            ch,
            rgb: [
                f32::from(self.fill.r),
                f32::from(self.fill.g),
                f32::from(self.fill.b),
            ],
        };
    }
}

fn to_rgb(rgb: [f32; 3]) -> (u8, u8, u8) {
    let q = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    (q(rgb[0]), q(rgb[1]), q(rgb[2]))
}
