pub type Rgb = (u8, u8, u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    /// `None` keeps the terminal's default background.
    pub bg: Option<Rgb>,
    pub bold: bool,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: (0, 0, 0),
        bg: None,
        bold: false,
    };

    pub fn glyph(ch: char, fg: Rgb) -> Self {
        Self {
            ch,
            fg,
            bg: None,
            bold: false,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::BLANK
    }
}

/// One composed terminal frame: row-major cells, layered by whoever draws last.
#[derive(Clone, Debug)]
pub struct CellGrid {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl CellGrid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::BLANK; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.cells.clear();
        self.cells.resize(cols * rows, Cell::BLANK);
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    pub fn get(&self, col: usize, row: usize) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    pub fn set(&mut self, col: usize, row: usize, cell: Cell) {
        if col >= self.cols || row >= self.rows {
            return;
        }
        self.cells[row * self.cols + col] = cell;
    }

    /// Like [`CellGrid::set`] but with signed coordinates; off-grid writes are dropped.
    pub fn set_signed(&mut self, col: i32, row: i32, cell: Cell) {
        if col < 0 || row < 0 {
            return;
        }
        self.set(col as usize, row as usize, cell);
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        if row >= self.rows {
            return &[];
        }
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Write `text` left to right, clipped at the right edge. Returns columns written.
    pub fn put_str(&mut self, col: usize, row: usize, text: &str, fg: Rgb, bg: Option<Rgb>) -> usize {
        let mut written = 0;
        for (i, ch) in text.chars().enumerate() {
            let c = col + i;
            if c >= self.cols || row >= self.rows {
                break;
            }
            self.set(c, row, Cell { ch, fg, bg, bold: false });
            written += 1;
        }
        written
    }

    pub fn fill_row(&mut self, row: usize, bg: Rgb) {
        for col in 0..self.cols {
            self.set(col, row, Cell { bg: Some(bg), ..Cell::BLANK });
        }
    }

    pub fn fill_rect(&mut self, left: usize, top: usize, width: usize, height: usize, bg: Rgb) {
        for row in top..top.saturating_add(height) {
            for col in left..left.saturating_add(width) {
                self.set(col, row, Cell { bg: Some(bg), ..Cell::BLANK });
            }
        }
    }

    /// Single-line frame around the given rectangle; the interior is left untouched.
    pub fn draw_box(&mut self, left: usize, top: usize, width: usize, height: usize, fg: Rgb, bg: Option<Rgb>) {
        if width < 2 || height < 2 {
            return;
        }
        let right = left + width - 1;
        let bottom = top + height - 1;
        let edge = |ch| Cell { ch, fg, bg, bold: false };
        for col in left + 1..right {
            self.set(col, top, edge('─'));
            self.set(col, bottom, edge('─'));
        }
        for row in top + 1..bottom {
            self.set(left, row, edge('│'));
            self.set(right, row, edge('│'));
        }
        self.set(left, top, edge('┌'));
        self.set(right, top, edge('┐'));
        self.set(left, bottom, edge('└'));
        self.set(right, bottom, edge('┘'));
    }

    /// Row text without styling, mostly for tests and logs.
    pub fn row_text(&self, row: usize) -> String {
        self.row(row).iter().map(|c| c.ch).collect()
    }
}
