use anyhow::Context;
use crossterm::{
    ExecutableCommand, cursor, event,
    terminal::{self, ClearType},
};
use std::io::{Stdout, Write, stdout};

/// Raw mode + alternate screen for the lifetime of the guard.
pub struct TerminalGuard {
    mouse: bool,
}

impl TerminalGuard {
    pub fn new(mouse: bool) -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        // Build the guard first so Drop restores the terminal if a later step fails.
        let mut guard = Self { mouse: false };

        let mut out = stdout();
        out.execute(terminal::EnterAlternateScreen)
            .context("enter alternate screen")?;
        out.execute(terminal::Clear(ClearType::All))
            .context("clear screen")?;
        out.execute(cursor::Hide).context("hide cursor")?;
        if mouse {
            out.execute(event::EnableMouseCapture)
                .context("enable mouse capture")?;
            guard.mouse = true;
        }

        Ok(guard)
    }

    pub fn stdout() -> Stdout {
        stdout()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        if self.mouse {
            let _ = out.execute(event::DisableMouseCapture);
        }
        let _ = terminal::disable_raw_mode();
        // Undo modes the compositor toggles per frame (sync output, autowrap, colours).
        let _ = out.write_all(b"\x1b[?2026l\x1b[?7h\x1b[0m");
        let _ = out.flush();
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
    }
}
