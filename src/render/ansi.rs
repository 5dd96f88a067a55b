use crate::render::grid::{CellGrid, Rgb};
use std::io::Write;

/// Writes a composed [`CellGrid`] as truecolor ANSI, only emitting SGR changes.
pub struct Compositor {
    last_fg: Option<Rgb>,
    last_bg: Option<Option<Rgb>>,
    last_bold: bool,
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            last_fg: None,
            last_bg: None,
            last_bold: false,
        }
    }

    pub fn name(&self) -> &'static str {
        "truecolor"
    }

    pub fn render(&mut self, grid: &CellGrid, sync_updates: bool, out: &mut dyn Write) -> anyhow::Result<()> {
        let cols = grid.cols();
        let rows = grid.rows();
        if cols == 0 || rows == 0 {
            return Ok(());
        }

        if sync_updates {
            out.write_all(b"\x1b[?2026h")?;
        }
        out.write_all(b"\x1b[H\x1b[0m")?;
        // Autowrap off while painting full-width rows: writing the last column must not wrap.
        out.write_all(b"\x1b[?7l")?;
        self.last_fg = None;
        self.last_bg = None;
        self.last_bold = false;

        for row in 0..rows {
            // Absolute row positioning; a trailing newline on the last row would scroll.
            write!(out, "\x1b[{};1H", row + 1)?;
            for cell in grid.row(row) {
                if cell.bold != self.last_bold {
                    out.write_all(if cell.bold { b"\x1b[1m" } else { b"\x1b[22m" })?;
                    self.last_bold = cell.bold;
                }
                if self.last_fg != Some(cell.fg) {
                    let (r, g, b) = cell.fg;
                    write!(out, "\x1b[38;2;{r};{g};{b}m")?;
                    self.last_fg = Some(cell.fg);
                }
                if self.last_bg != Some(cell.bg) {
                    match cell.bg {
                        Some((r, g, b)) => write!(out, "\x1b[48;2;{r};{g};{b}m")?,
                        None => out.write_all(b"\x1b[49m")?,
                    }
                    self.last_bg = Some(cell.bg);
                }
                write!(out, "{}", cell.ch)?;
            }
        }

        out.write_all(b"\x1b[0m")?;
        out.write_all(b"\x1b[?7h")?;
        if sync_updates {
            out.write_all(b"\x1b[?2026l")?;
        }
        out.flush()?;
        Ok(())
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}
