use crate::config::Config;
use crate::effects::console::{ConsoleHost, LineKind, PROMPT, SECTIONS};
use crate::effects::pulse::{MAX_LIVE_PULSES, PULSE_LIFETIME};
use crate::effects::scramble::SCRAMBLE_TICK;
use crate::effects::tilt::MAX_TILT_DEG;
use crate::effects::{
    ACCENT, CardRect, CommandTable, Console, GLITCH, GlyphRain, HoverTracker, LineEditor, Point,
    PulseField, RevealTriggers, ScrambleBoard, StatusReadout, Tilt, TrailingCursor,
};
use crate::render::{Cell, CellGrid, CellSurface, Compositor, Rgb, truncate_for_width};
use crate::surface::GlyphSurface;
use crate::terminal::TerminalGuard;
use crate::timer::Interval;
use anyhow::Context;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::collections::HashMap;
use std::io::BufWriter;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

const MIN_COLS: u16 = 24;
const MIN_ROWS: u16 = 10;

const BAR_BG: Rgb = (2, 4, 10);
const CARD_BG: Rgb = (10, 14, 24);
const TEXT: Rgb = (220, 228, 242);
const DIM: Rgb = (110, 124, 140);
const ERROR: Rgb = (255, 96, 96);

/// Elements that can scramble or be hovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Target {
    Headline,
    Tagline,
    Nav(usize),
    Card,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Rect {
    left: usize,
    top: usize,
    width: usize,
    height: usize,
}

impl Rect {
    fn contains(&self, col: usize, row: usize) -> bool {
        col >= self.left && col < self.left + self.width && row >= self.top && row < self.top + self.height
    }
}

#[derive(Clone, Debug, Default)]
struct Layout {
    cols: usize,
    rows: usize,
    nav: Vec<Rect>,
    card: Rect,
    /// Fraction of the card's rows that fit above the console.
    card_visible: f32,
    console_top: usize,
}

impl Layout {
    fn compute(cols: usize, rows: usize, card_text_width: usize) -> Self {
        let mut nav = Vec::with_capacity(SECTIONS.len());
        let mut col = 6;
        for section in SECTIONS {
            let width = section.chars().count() + 2;
            nav.push(Rect {
                left: col,
                top: 0,
                width,
                height: 1,
            });
            col += width + 1;
        }

        let console_rows = (rows / 3).clamp(4, 12);
        let console_top = rows.saturating_sub(console_rows);

        let card_width = (card_text_width + 8).max(28).min(cols.saturating_sub(4)).max(2);
        let card_height = 7;
        let free_top = 2;
        let free_rows = console_top.saturating_sub(free_top);
        let top = free_top + free_rows.saturating_sub(card_height) / 2;
        let card = Rect {
            left: cols.saturating_sub(card_width) / 2,
            top,
            width: card_width,
            height: card_height,
        };
        let visible_rows = console_top.saturating_sub(top).min(card_height);

        Self {
            cols,
            rows,
            nav,
            card,
            card_visible: visible_rows as f32 / card_height as f32,
            console_top,
        }
    }

    fn target_at(&self, col: usize, row: usize) -> Option<Target> {
        if let Some(i) = self.nav.iter().position(|r| r.contains(col, row)) {
            return Some(Target::Nav(i));
        }
        (self.card.contains(col, row) && row < self.console_top).then_some(Target::Card)
    }
}

/// The terminal stand-in for the page: `goto` lands on a nav section.
#[derive(Debug, Default)]
struct TerminalPage {
    focused: Option<usize>,
    pending_focus: Option<usize>,
}

impl ConsoleHost for TerminalPage {
    fn scroll_to(&mut self, section: &str) -> bool {
        let Some(i) = SECTIONS.iter().position(|s| *s == section) else {
            return false;
        };
        self.focused = Some(i);
        self.pending_focus = Some(i);
        true
    }

    fn now_unix_secs(&self) -> u64 {
        unix_secs()
    }
}

struct Showcase {
    cell_w: f32,
    cell_h: f32,
    headline: String,
    tagline: String,
    rng: fastrand::Rng,
    rain: GlyphRain,
    surface: CellSurface,
    scrambles: ScrambleBoard<Target>,
    triggers: RevealTriggers<Target>,
    shown: HashMap<Target, String>,
    scramble_timer: Interval,
    tilt: Tilt,
    cursor: TrailingCursor,
    pointer_seen: bool,
    hover: HoverTracker<Target>,
    status: StatusReadout,
    console: Console,
    editor: LineEditor,
    page: TerminalPage,
    pulses: PulseField,
    layout: Layout,
}

impl Showcase {
    fn new(cfg: &Config, size: (u16, u16), now: Instant) -> Self {
        let mut rng = cfg.rng();
        let rain = GlyphRain::new(rng.fork());
        let cell_w = f32::from(cfg.cell_width);
        let cell_h = f32::from(cfg.cell_height);

        let mut triggers = RevealTriggers::new();
        let mut shown = HashMap::new();
        for (i, section) in SECTIONS.iter().enumerate() {
            triggers.register_nav_link(Target::Nav(i));
            shown.insert(Target::Nav(i), nav_label(section));
        }
        shown.insert(Target::Headline, String::new());
        shown.insert(Target::Tagline, String::new());

        let mut status = StatusReadout::new(cfg.gauge.gauge());
        status.start(now);

        let mut app = Self {
            cell_w,
            cell_h,
            headline: cfg.headline.trim().to_string(),
            tagline: cfg.tagline.trim().to_string(),
            rng,
            rain,
            surface: CellSurface::new(0, 0, cell_w, cell_h),
            scrambles: ScrambleBoard::new(),
            triggers,
            shown,
            scramble_timer: Interval::new(SCRAMBLE_TICK),
            tilt: Tilt::NEUTRAL,
            cursor: TrailingCursor::default(),
            pointer_seen: false,
            hover: HoverTracker::new(),
            status,
            console: Console::new(CommandTable::standard()).with_banner(),
            editor: LineEditor::new(),
            page: TerminalPage::default(),
            pulses: PulseField::new(PULSE_LIFETIME, MAX_LIVE_PULSES),
            layout: Layout::default(),
        };
        app.scramble_timer.start(now);
        app.resize(size);
        app
    }

    fn card_text_width(&self) -> usize {
        self.headline
            .chars()
            .count()
            .max(self.tagline.chars().count())
    }

    fn resize(&mut self, (cols, rows): (u16, u16)) {
        let (cols, rows) = (cols as usize, rows as usize);
        self.layout = Layout::compute(cols, rows, self.card_text_width());
        self.surface.resize(cols, rows);
        let (w, h) = self.surface.size();
        self.rain.resize(w, h);
        tracing::debug!(cols, rows, rain_columns = self.rain.columns(), "resize");

        // A card squeezed below the threshold stays hidden until a later resize reveals it.
        let ratio = self.layout.card_visible;
        for (target, text) in [
            (Target::Headline, self.headline.clone()),
            (Target::Tagline, self.tagline.clone()),
        ] {
            if self.triggers.on_visible(&target, ratio) {
                self.scrambles.start(target, &text);
            }
        }
    }

    fn pointer_px(&self, col: u16, row: u16) -> Point {
        Point::new(
            (f32::from(col) + 0.5) * self.cell_w,
            (f32::from(row) + 0.5) * self.cell_h,
        )
    }

    fn card_rect_px(&self) -> CardRect {
        let card = self.layout.card;
        CardRect {
            left: card.left as f32 * self.cell_w,
            top: card.top as f32 * self.cell_h,
            width: card.width as f32 * self.cell_w,
            height: card.height as f32 * self.cell_h,
        }
    }

    fn start_nav_scramble(&mut self, i: usize) {
        if let Some(section) = SECTIONS.get(i) {
            self.scrambles.start(Target::Nav(i), &nav_label(section));
        }
    }

    fn handle_mouse(&mut self, ev: MouseEvent, now: Instant) {
        let at = self.pointer_px(ev.column, ev.row);
        match ev.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => self.pointer_moved(ev.column, ev.row, at),
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer_moved(ev.column, ev.row, at);
                self.pulses.click(at, now);
            }
            _ => {}
        }
    }

    fn pointer_moved(&mut self, col: u16, row: u16, at: Point) {
        self.rain.pointer_moved(at);
        self.cursor.pointer_moved(at);
        if !self.pointer_seen {
            // First sighting: start the marker on the pointer instead of easing in from 0,0.
            self.cursor = TrailingCursor::new(at);
            self.pointer_seen = true;
        }

        let under = self.layout.target_at(col as usize, row as usize);
        let interactive = (0..SECTIONS.len())
            .map(Target::Nav)
            .chain(std::iter::once(Target::Card))
            .collect::<Vec<_>>();
        for target in interactive {
            if under == Some(target) {
                if self.hover.enter(target) && self.triggers.on_hover(&target) {
                    if let Target::Nav(i) = target {
                        self.start_nav_scramble(i);
                    }
                }
            } else if self.hover.leave(&target) && target == Target::Card {
                self.tilt = Tilt::NEUTRAL;
            }
        }

        if under == Some(Target::Card) {
            self.tilt = Tilt::for_pointer(self.card_rect_px(), at);
        }
    }

    /// Returns true when the key asks to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')) {
            return true;
        }
        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Enter => {
                let line = self.editor.take();
                if self.console.submit(&line, &mut self.page) {
                    tracing::debug!(command = line.trim(), "console submit");
                }
                if let Some(i) = self.page.pending_focus.take() {
                    self.start_nav_scramble(i);
                }
            }
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Up => self.editor.history_prev(),
            KeyCode::Down => self.editor.history_next(),
            KeyCode::Char(ch) => self.editor.insert(ch),
            _ => {}
        }
        false
    }

    fn update(&mut self, now: Instant) {
        for _ in 0..self.scramble_timer.poll(now) {
            for (target, frame) in self.scrambles.tick_all(&mut self.rng) {
                self.shown.insert(target, frame.text);
            }
        }
        self.status.poll(now, unix_secs(), &mut self.rng);
        self.pulses.expire(now);
        self.rain.draw(&mut self.surface);
        self.cursor.step();
    }

    fn compose(&self, grid: &mut CellGrid, now: Instant) {
        grid.resize(self.layout.cols, self.layout.rows);
        self.surface.paint_into(grid);
        self.compose_card(grid);
        self.compose_top_bar(grid);
        self.compose_console(grid);
        self.compose_pulses(grid, now);
        self.compose_cursor(grid);
    }

    fn compose_top_bar(&self, grid: &mut CellGrid) {
        let cols = self.layout.cols;
        grid.fill_row(0, BAR_BG);
        grid.put_str(1, 0, "PFX", GLITCH.rgb(), Some(BAR_BG));

        for (i, rect) in self.layout.nav.iter().enumerate() {
            let target = Target::Nav(i);
            let text = self.shown.get(&target).map(String::as_str).unwrap_or("");
            let hot = self.hover.is_hovered(&target) || self.page.focused == Some(i);
            let (fg, bg) = if hot { (BAR_BG, ACCENT.rgb()) } else { (ACCENT.rgb(), BAR_BG) };
            grid.put_str(rect.left, 0, &format!(" {text} "), fg, Some(bg));
        }

        let gauge = self.status.gauge();
        let readout = format!(
            "{}  {} {}",
            self.status.clock_text(),
            gauge.label,
            self.status.gauge_text()
        );
        let nav_end = self.layout.nav.last().map_or(0, |r| r.left + r.width);
        let len = readout.chars().count();
        if cols >= nav_end + len + 2 {
            grid.put_str(cols - len - 1, 0, &readout, TEXT, Some(BAR_BG));
        }
    }

    fn compose_card(&self, grid: &mut CellGrid) {
        let card = self.layout.card;
        if card.width < 4 {
            return;
        }
        let hovered = self.hover.is_hovered(&Target::Card);
        // Tilt reads as a lean: content slides toward the raised edge.
        let shift_x = (self.tilt.rotate_y / MAX_TILT_DEG * 2.0).round() as i32;
        let shift_y = (-self.tilt.rotate_x / MAX_TILT_DEG).round() as i32;
        let lean = (self.tilt.rotate_x.abs() + self.tilt.rotate_y.abs()) / (2.0 * MAX_TILT_DEG);
        let border = mix(DIM, ACCENT.rgb(), if hovered { 0.5 + 0.5 * lean } else { 0.0 });

        grid.fill_rect(card.left, card.top, card.width, card.height, CARD_BG);
        grid.draw_box(card.left, card.top, card.width, card.height, border, Some(CARD_BG));
        grid.put_str(card.left + 2, card.top, " whoami ", border, Some(CARD_BG));

        let inner = card.width.saturating_sub(4);
        let lines = [
            (Target::Headline, 2usize, ACCENT.rgb(), true),
            (Target::Tagline, 3usize, DIM, false),
        ];
        for (target, offset, fg, bold) in lines {
            let text = self.shown.get(&target).map(String::as_str).unwrap_or("");
            let text = truncate_for_width(text, inner);
            let len = text.chars().count();
            let col = (card.left + 2 + inner.saturating_sub(len) / 2) as i32 + shift_x;
            let row = (card.top + offset) as i32 + shift_y;
            for (i, ch) in text.chars().enumerate() {
                grid.set_signed(
                    col + i as i32,
                    row,
                    Cell {
                        ch,
                        fg,
                        bg: Some(CARD_BG),
                        bold,
                    },
                );
            }
        }

        let readout = if self.tilt.is_neutral() {
            "tilt: level".to_string()
        } else {
            format!(
                "tilt x{:+.1} y{:+.1} s{:.2}",
                self.tilt.rotate_x, self.tilt.rotate_y, self.tilt.scale
            )
        };
        let readout = truncate_for_width(&readout, inner);
        grid.put_str(card.left + 2, card.top + card.height - 2, &readout, DIM, Some(CARD_BG));
    }

    fn compose_console(&self, grid: &mut CellGrid) {
        let top = self.layout.console_top;
        let rows = self.layout.rows;
        let cols = self.layout.cols;
        if top + 2 > rows {
            return;
        }
        for row in top..rows {
            grid.fill_row(row, BAR_BG);
        }
        let rule = format!("── console {}", "─".repeat(cols.saturating_sub(11)));
        grid.put_str(0, top, &rule, DIM, Some(BAR_BG));

        let log_rows = rows - top - 2;
        let mut wrapped = Vec::new();
        for line in self.console.log().visible_tail(log_rows) {
            for part in crate::render::hard_wrap_line(&line.text, cols.saturating_sub(2)) {
                wrapped.push((line.kind, part));
            }
        }
        let skip = wrapped.len().saturating_sub(log_rows);
        for (i, (kind, text)) in wrapped.into_iter().skip(skip).enumerate() {
            let fg = match kind {
                LineKind::System => GLITCH.rgb(),
                LineKind::Echo => TEXT,
                LineKind::Output => ACCENT.rgb(),
                LineKind::Error => ERROR,
            };
            grid.put_str(1, top + 1 + i, &text, fg, Some(BAR_BG));
        }

        let input = format!("{PROMPT} {}_", self.editor.as_str());
        let width = cols.saturating_sub(2);
        let count = input.chars().count();
        // Keep the caret end of a long line visible.
        let visible: String = input.chars().skip(count.saturating_sub(width)).collect();
        grid.put_str(1, rows - 1, &visible, TEXT, Some(BAR_BG));
    }

    fn compose_pulses(&self, grid: &mut CellGrid, now: Instant) {
        for pulse in self.pulses.live() {
            let p = self.pulses.progress(pulse, now);
            let cx = pulse.at.x / self.cell_w;
            let cy = pulse.at.y / self.cell_h;
            let radius = 0.5 + p * 4.0;
            let fg = mix(ACCENT.rgb(), BAR_BG, p);
            let ch = if p < 0.5 { 'o' } else { '·' };
            for step in 0..24 {
                let angle = step as f32 / 24.0 * std::f32::consts::TAU;
                // Cells are about twice as tall as wide.
                let col = (cx + angle.cos() * radius * 2.0).floor() as i32;
                let row = (cy + angle.sin() * radius).floor() as i32;
                let bg = grid
                    .get(col.max(0) as usize, row.max(0) as usize)
                    .and_then(|c| c.bg);
                grid.set_signed(col, row, Cell { ch, fg, bg, bold: false });
            }
        }
    }

    fn compose_cursor(&self, grid: &mut CellGrid) {
        if !self.pointer_seen {
            return;
        }
        let pos = self.cursor.position();
        let col = (pos.x / self.cell_w).floor() as i32;
        let row = (pos.y / self.cell_h).floor() as i32;
        let (ch, fg) = if self.hover.is_active() {
            ('◈', ACCENT.rgb())
        } else {
            ('◆', GLITCH.rgb())
        };
        let bg = grid
            .get(col.max(0) as usize, row.max(0) as usize)
            .and_then(|c| c.bg);
        grid.set_signed(col, row, Cell { ch, fg, bg, bold: true });
    }
}

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let size = crossterm::terminal::size().context("get terminal size")?;
    if size.0 < MIN_COLS || size.1 < MIN_ROWS {
        return Err(anyhow::anyhow!(
            "terminal too small (need at least {MIN_COLS}x{MIN_ROWS}, got {}x{})",
            size.0,
            size.1
        ));
    }

    let _term = TerminalGuard::new(!cfg.no_mouse)?;
    let mut out = BufWriter::new(TerminalGuard::stdout());
    let mut compositor = Compositor::new();
    let mut grid = CellGrid::new(size.0 as usize, size.1 as usize);

    let start = Instant::now();
    let mut app = Showcase::new(&cfg, size, start);
    let mut last_size = size;
    tracing::info!(
        fps = cfg.fps,
        gauge = ?cfg.gauge,
        renderer = compositor.name(),
        "{}",
        crate::effects::console::BANNER
    );

    loop {
        let now = Instant::now();

        // Drain input events (non-blocking).
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    if app.handle_key(k) {
                        tracing::info!(uptime_s = start.elapsed().as_secs_f32(), "quit");
                        return Ok(());
                    }
                }
                Event::Mouse(m) => app.handle_mouse(m, now),
                Event::Resize(c, r) => {
                    last_size = (c, r);
                    app.resize(last_size);
                }
                _ => {}
            }
        }

        // Size check once per frame (resize events can be missed in some terminals).
        let sz = crossterm::terminal::size()?;
        if sz != last_size {
            last_size = sz;
            app.resize(last_size);
        }

        app.update(now);
        if last_size.0 < MIN_COLS || last_size.1 < MIN_ROWS {
            grid.resize(last_size.0 as usize, last_size.1 as usize);
            grid.clear();
            grid.put_str(0, 0, "terminal too small", ERROR, None);
        } else {
            app.compose(&mut grid, now);
        }
        compositor.render(&grid, cfg.sync_updates, &mut out)?;

        // Frame pacing.
        let target = Duration::from_secs_f32(1.0 / cfg.fps.max(1) as f32);
        let elapsed = now.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }
}

fn nav_label(section: &str) -> String {
    section.to_ascii_uppercase()
}

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn mix(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let l = |x: u8, y: u8| (f32::from(x) + (f32::from(y) - f32::from(x)) * t).round() as u8;
    (l(a.0, b.0), l(a.1, b.1), l(a.2, b.2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn showcase(size: (u16, u16)) -> (Showcase, Instant) {
        let cfg = Config::parse_from(["portfolio-fx", "--seed", "7"]);
        let now = Instant::now();
        (Showcase::new(&cfg, size, now), now)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn type_line(app: &mut Showcase, line: &str) {
        for ch in line.chars() {
            app.handle_key(key(KeyCode::Char(ch)));
        }
        app.handle_key(key(KeyCode::Enter));
    }

    #[test]
    fn layout_places_nav_card_and_console() {
        let layout = Layout::compute(80, 24, 31);
        assert_eq!(layout.nav[0], Rect { left: 6, top: 0, width: 7, height: 1 });
        assert_eq!(layout.console_top, 16);
        assert_eq!(layout.card, Rect { left: 20, top: 5, width: 39, height: 7 });
        assert_eq!(layout.card_visible, 1.0);

        assert_eq!(layout.target_at(6, 0), Some(Target::Nav(0)));
        assert_eq!(layout.target_at(21, 6), Some(Target::Card));
        assert_eq!(layout.target_at(0, 20), None);
    }

    #[test]
    fn squeezed_card_waits_for_a_resize_to_reveal() {
        let (mut app, _) = showcase((80, 9));
        assert!(app.layout.card_visible < 0.5);
        assert!(!app.scrambles.is_running(&Target::Headline));

        app.resize((80, 24));
        assert!(app.scrambles.is_running(&Target::Headline));
        assert!(app.scrambles.is_running(&Target::Tagline));

        // Reveal fires once; later resizes leave finished text alone.
        app.scrambles.cancel(&Target::Headline);
        app.resize((100, 30));
        assert!(!app.scrambles.is_running(&Target::Headline));
    }

    #[test]
    fn headline_settles_after_enough_ticks() {
        let (mut app, start) = showcase((80, 24));
        let len = app.headline.chars().count() as u32;
        for k in 1..=(2 * len + 2) {
            app.update(start + SCRAMBLE_TICK * k);
        }
        assert_eq!(app.shown[&Target::Headline], app.headline);
        assert!(!app.scrambles.is_running(&Target::Headline));
        // The longer tagline is still mid-reveal.
        assert!(app.scrambles.is_running(&Target::Tagline));
    }

    #[test]
    fn goto_focuses_and_rescrambles_the_nav_link() {
        let (mut app, _) = showcase((80, 24));
        type_line(&mut app, "goto projects");
        assert_eq!(app.page.focused, Some(1));
        assert!(app.scrambles.is_running(&Target::Nav(1)));
        assert_eq!(
            app.console.log().last().map(|l| l.text.as_str()),
            Some("Navigating to projects...")
        );
        assert_eq!(app.editor.as_str(), "");
    }

    #[test]
    fn hovering_a_nav_link_scrambles_it() {
        let (mut app, now) = showcase((80, 24));
        app.handle_mouse(mouse(MouseEventKind::Moved, 7, 0), now);
        assert!(app.hover.is_hovered(&Target::Nav(0)));
        assert!(app.scrambles.is_running(&Target::Nav(0)));
    }

    #[test]
    fn card_tilts_under_the_pointer_and_levels_on_leave() {
        let (mut app, now) = showcase((80, 24));
        app.handle_mouse(mouse(MouseEventKind::Moved, 21, 6), now);
        assert!(app.hover.is_hovered(&Target::Card));
        assert!(app.tilt.rotate_x > 0.0 && app.tilt.rotate_y < 0.0);

        app.handle_mouse(mouse(MouseEventKind::Moved, 0, 14), now);
        assert!(app.tilt.is_neutral());
        assert!(!app.hover.is_active());
    }

    #[test]
    fn click_leaves_a_pulse_that_expires() {
        let (mut app, now) = showcase((80, 24));
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 3, 3), now);
        assert_eq!(app.pulses.len(), 1);
        app.update(now + PULSE_LIFETIME);
        assert!(app.pulses.is_empty());
    }

    #[test]
    fn cursor_snaps_to_the_first_pointer_then_eases() {
        let (mut app, now) = showcase((80, 24));
        app.handle_mouse(mouse(MouseEventKind::Moved, 10, 10), now);
        assert_eq!(app.cursor.position(), app.pointer_px(10, 10));

        app.handle_mouse(mouse(MouseEventKind::Moved, 20, 10), now);
        let before = app.cursor.position();
        let target = app.pointer_px(20, 10);
        let after = app.cursor.step();
        assert!(after.x > before.x && after.x < target.x);
    }

    #[test]
    fn quit_keys() {
        let (mut app, _) = showcase((80, 24));
        assert!(app.handle_key(key(KeyCode::Esc)));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!app.handle_key(key(KeyCode::Char('q'))));
    }

    #[test]
    fn composed_frame_shows_nav_and_prompt() {
        let (app, now) = showcase((80, 24));
        let mut grid = CellGrid::new(1, 1);
        app.compose(&mut grid, now);
        assert_eq!(grid.cols(), 80);
        assert!(grid.row_text(0).contains("ABOUT"));
        assert!(grid.row_text(23).contains(PROMPT));
        assert!(grid.row_text(16).starts_with("── console"));
    }
}
