use std::time::{Duration, Instant};

use portfolio_fx::effects::cursor::CURSOR_EASE;
use portfolio_fx::effects::pulse::PULSE_LIFETIME;
use portfolio_fx::effects::rain::{CELL_PX, RAIN_ALPHABET, glyph_color};
use portfolio_fx::effects::scramble::SCRAMBLE_ALPHABET;
use portfolio_fx::effects::status::{format_utc_clock, format_utc_datetime, CLOCK_PLACEHOLDER};
use portfolio_fx::effects::{
    ACCENT, CardRect, GLITCH, Gauge, GlyphRain, HoverTracker, Point, PulseField, RevealTriggers,
    Rgba, Scramble, ScrambleBoard, StatusReadout, TRAIL_FADE, Tilt, TrailingCursor,
};
use portfolio_fx::surface::GlyphSurface;
use portfolio_fx::timer::{Interval, MAX_CATCH_UP};
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Rect { fill: Rgba, x: f32, y: f32, w: f32, h: f32 },
    Glyph { fill: Rgba, ch: char, x: f32, y: f32 },
}

/// Records draw calls instead of rasterizing them.
struct RecordingSurface {
    w: f32,
    h: f32,
    fill: Rgba,
    font_px: f32,
    ops: Vec<Op>,
}

impl RecordingSurface {
    fn new(w: f32, h: f32) -> Self {
        Self {
            w,
            h,
            fill: Rgba::opaque(0, 0, 0),
            font_px: 0.0,
            ops: Vec::new(),
        }
    }

    fn glyphs(&self) -> Vec<(Rgba, char, f32, f32)> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                Op::Glyph { fill, ch, x, y } => Some((fill, ch, x, y)),
                Op::Rect { .. } => None,
            })
            .collect()
    }
}

impl GlyphSurface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.w, self.h)
    }

    fn set_fill(&mut self, color: Rgba) {
        self.fill = color;
    }

    fn set_font_px(&mut self, px: f32) {
        self.font_px = px;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ops.push(Op::Rect { fill: self.fill, x, y, w, h });
    }

    fn fill_glyph(&mut self, ch: char, x: f32, y: f32) {
        self.ops.push(Op::Glyph { fill: self.fill, ch, x, y });
    }
}

fn seeded(seed: u64) -> fastrand::Rng {
    fastrand::Rng::with_seed(seed)
}

// ── Glyph rain ──────────────────────────────────────────────────────────────

#[test]
fn rain_resize_sets_columns_and_staggers_offsets_above_the_top() {
    let mut rain = GlyphRain::new(seeded(7));
    rain.resize(1000.0, 600.0);
    assert_eq!(rain.columns(), 62);
    assert!(rain.offsets().iter().all(|&o| o <= 0.0 && o > -100.0));

    // Run a while, then resize again: every column restarts above the top edge.
    let mut surface = RecordingSurface::new(1000.0, 600.0);
    for _ in 0..150 {
        rain.draw(&mut surface);
    }
    assert!(rain.offsets().iter().any(|&o| o > 0.0));
    rain.resize(333.0, 200.0);
    assert_eq!(rain.columns(), 20);
    assert!(rain.offsets().iter().all(|&o| o <= 0.0));
}

#[test]
fn rain_resize_to_zero_width_has_no_columns() {
    let mut rain = GlyphRain::new(seeded(1));
    rain.resize(15.0, 100.0);
    assert_eq!(rain.columns(), 0);
    let mut surface = RecordingSurface::new(15.0, 100.0);
    rain.draw(&mut surface);
    assert!(surface.glyphs().is_empty());
}

#[test]
fn rain_frame_fades_then_draws_one_glyph_per_column() {
    let mut rain = GlyphRain::new(seeded(3));
    rain.resize(320.0, 240.0);
    let before = rain.offsets().to_vec();

    let mut surface = RecordingSurface::new(320.0, 240.0);
    rain.draw(&mut surface);

    assert_eq!(
        surface.ops[0],
        Op::Rect { fill: TRAIL_FADE, x: 0.0, y: 0.0, w: 320.0, h: 240.0 }
    );
    assert_eq!(surface.font_px, CELL_PX);

    let glyphs = surface.glyphs();
    assert_eq!(glyphs.len(), 20);
    for (i, (_, ch, x, y)) in glyphs.iter().enumerate() {
        assert!(RAIN_ALPHABET.contains(&(*ch as u8)), "unexpected glyph {ch:?}");
        assert_eq!(*x, i as f32 * CELL_PX);
        assert_eq!(*y, before[i] * CELL_PX);
    }
    // Nothing is below the bottom yet, so every column simply advanced.
    for (after, before) in rain.offsets().iter().zip(&before) {
        assert_eq!(*after, before + 1.0);
    }
}

#[test]
fn rain_recolors_glyphs_near_the_pointer() {
    let mut rain = GlyphRain::new(seeded(11));
    rain.resize(640.0, 480.0);
    let offsets = rain.offsets().to_vec();
    let near = 10usize;
    rain.pointer_moved(Point::new(near as f32 * CELL_PX + 5.0, offsets[near] * CELL_PX));

    let mut surface = RecordingSurface::new(640.0, 480.0);
    rain.draw(&mut surface);
    let glyphs = surface.glyphs();

    assert_eq!(glyphs[near].0, GLITCH);
    // Four columns away is 64 px, outside the 50 px box.
    assert_eq!(glyphs[near + 4].0, ACCENT);
    assert_eq!(glyphs[0].0, ACCENT);
}

#[test]
fn rain_columns_past_the_bottom_eventually_respawn() {
    let mut rain = GlyphRain::new(seeded(5));
    rain.resize(160.0, 32.0);
    let mut surface = RecordingSurface::new(160.0, 32.0);
    for _ in 0..3000 {
        rain.draw(&mut surface);
        surface.ops.clear();
    }
    // Never resetting would leave offsets near 3000.
    assert!(rain.offsets().iter().all(|&o| o < 2500.0), "{:?}", rain.offsets());
}

proptest! {
    #[test]
    fn glyph_color_is_glitch_exactly_inside_the_box(
        x in -200.0f32..2000.0,
        y in -200.0f32..2000.0,
        px in -200.0f32..2000.0,
        py in -200.0f32..2000.0,
    ) {
        let inside = (x - px).abs() < 50.0 && (y - py).abs() < 50.0;
        let color = glyph_color(x, y, Point::new(px, py));
        prop_assert_eq!(color == GLITCH, inside);
        prop_assert_eq!(color == ACCENT, !inside);
    }
}

// ── Scramble ────────────────────────────────────────────────────────────────

#[test]
fn scramble_settles_on_target_after_twice_its_length() {
    let target = "ACCESS GRANTED";
    let len = target.chars().count();
    let mut rng = seeded(42);
    let mut s = Scramble::new(target);

    for k in 1..2 * len {
        let frame = s.tick(&mut rng);
        assert!(!frame.done, "done early at tick {k}");
        let chars: Vec<char> = frame.text.chars().collect();
        assert_eq!(chars.len(), len);
        let revealed = k / 2;
        assert_eq!(&frame.text.chars().take(revealed).collect::<String>(), &target[..revealed]);
        for ch in &chars[revealed..] {
            assert!(SCRAMBLE_ALPHABET.contains(&(*ch as u8)), "noise {ch:?} at tick {k}");
        }
    }

    let last = s.tick(&mut rng);
    assert!(last.done);
    assert_eq!(last.text, target);
    assert_eq!(s.ticks(), 2 * len);

    // Extra ticks are harmless and stay settled.
    assert_eq!(s.tick(&mut rng).text, target);
}

#[test]
fn scramble_counts_characters_not_bytes() {
    let mut rng = seeded(9);
    let mut s = Scramble::new("héllo");
    let mut last = None;
    for _ in 0..10 {
        last = Some(s.tick(&mut rng));
    }
    let last = last.unwrap();
    assert!(last.done);
    assert_eq!(last.text, "héllo");
}

#[test]
fn scramble_of_empty_target_finishes_on_first_tick() {
    let mut rng = seeded(0);
    let mut s = Scramble::new("");
    let frame = s.tick(&mut rng);
    assert!(frame.done);
    assert_eq!(frame.text, "");
}

#[test]
fn board_restart_cancels_the_in_flight_scramble() {
    let mut rng = seeded(17);
    let mut board = ScrambleBoard::new();
    assert!(!board.start("nav", "ABC"));
    for _ in 0..3 {
        board.tick_all(&mut rng);
    }
    assert!(board.start("nav", "ABC"), "restart should report a cancellation");
    assert_eq!(board.len(), 1);

    for _ in 0..5 {
        let frames = board.tick_all(&mut rng);
        assert_eq!(frames.len(), 1);
        assert!(!frames[0].1.done);
    }
    let frames = board.tick_all(&mut rng);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].0, "nav");
    assert!(frames[0].1.done);
    assert_eq!(frames[0].1.text, "ABC");
    assert!(board.is_idle());
}

#[test]
fn board_runs_independent_keys_side_by_side() {
    let mut rng = seeded(23);
    let mut board = ScrambleBoard::new();
    board.start(1u8, "AB");
    board.start(2u8, "ABCDEF");
    for _ in 0..4 {
        board.tick_all(&mut rng);
    }
    assert!(!board.is_running(&1));
    assert!(board.is_running(&2));
    assert!(board.cancel(&2));
    assert!(board.is_idle());
}

#[test]
fn visibility_trigger_fires_once_at_half_visible() {
    let mut triggers = RevealTriggers::new();
    assert!(!triggers.on_visible(&"hero", 0.49));
    assert!(triggers.on_visible(&"hero", 0.5));
    assert!(!triggers.on_visible(&"hero", 1.0));
    assert!(triggers.has_fired(&"hero"));
}

#[test]
fn hover_trigger_refires_for_nav_links_only() {
    let mut triggers = RevealTriggers::new();
    triggers.register_nav_link("nav");
    assert!(triggers.on_hover(&"nav"));
    assert!(triggers.on_hover(&"nav"));
    assert!(!triggers.on_hover(&"hero"));

    // Visibility and hover are independent.
    assert!(triggers.on_visible(&"nav", 1.0));
    assert!(triggers.on_hover(&"nav"));
}

// ── Tilt ────────────────────────────────────────────────────────────────────

#[test]
fn tilt_at_the_corner_reaches_the_cap() {
    let rect = CardRect { left: 100.0, top: 50.0, width: 200.0, height: 100.0 };
    let t = Tilt::for_pointer(rect, Point::new(100.0, 50.0));
    assert_eq!(t.rotate_x, 5.0);
    assert_eq!(t.rotate_y, -5.0);
    assert_eq!(t.scale, 1.02);
    assert_eq!(
        t.to_css(),
        "perspective(1000px) rotateX(5deg) rotateY(-5deg) scale3d(1.02, 1.02, 1.02)"
    );
}

#[test]
fn tilt_is_capped_outside_the_card() {
    let rect = CardRect { left: 0.0, top: 0.0, width: 100.0, height: 100.0 };
    let t = Tilt::for_pointer(rect, Point::new(1000.0, -1000.0));
    assert_eq!(t.rotate_x, 5.0);
    assert_eq!(t.rotate_y, 5.0);
}

#[test]
fn tilt_resets_to_neutral() {
    let t = Tilt::NEUTRAL;
    assert_eq!(t.rotate_x, 0.0);
    assert_eq!(t.rotate_y, 0.0);
    assert_eq!(t.scale, 1.0);
    assert_eq!(
        t.to_css(),
        "perspective(1000px) rotateX(0deg) rotateY(0deg) scale3d(1, 1, 1)"
    );
}

#[test]
fn tilt_of_degenerate_card_is_neutral() {
    let rect = CardRect { left: 0.0, top: 0.0, width: 0.0, height: 40.0 };
    assert!(Tilt::for_pointer(rect, Point::new(3.0, 3.0)).is_neutral());
}

proptest! {
    #[test]
    fn tilt_matches_the_offset_formula(
        w in 10.0f32..2000.0,
        h in 10.0f32..2000.0,
        fx in 0.0f32..1.0,
        fy in 0.0f32..1.0,
    ) {
        let rect = CardRect { left: 0.0, top: 0.0, width: w, height: h };
        let (x, y) = (fx * w, fy * h);
        let t = Tilt::for_pointer(rect, Point::new(x, y));
        prop_assert_eq!(t.rotate_x, ((y - h / 2.0) / (h / 2.0)) * -5.0);
        prop_assert_eq!(t.rotate_y, ((x - w / 2.0) / (w / 2.0)) * 5.0);
        prop_assert!(t.rotate_x.abs() <= 5.0 && t.rotate_y.abs() <= 5.0);
    }
}

// ── Trailing cursor ─────────────────────────────────────────────────────────

#[test]
fn cursor_keeps_85_percent_of_the_error_each_frame() {
    let mut c = TrailingCursor::new(Point::new(0.0, 0.0));
    c.pointer_moved(Point::new(100.0, -40.0));
    let p = c.step();
    assert!((p.x - 15.0).abs() < 1e-4);
    assert!((p.y + 6.0).abs() < 1e-4);
    assert_eq!(c.target(), Point::new(100.0, -40.0));
    assert_eq!(CURSOR_EASE, 0.15);
}

proptest! {
    #[test]
    fn cursor_converges_geometrically_without_overshoot(
        sx in -2000.0f32..2000.0,
        sy in -2000.0f32..2000.0,
        tx in -2000.0f32..2000.0,
        ty in -2000.0f32..2000.0,
    ) {
        let mut c = TrailingCursor::new(Point::new(sx, sy));
        c.pointer_moved(Point::new(tx, ty));
        let mut err = (tx - sx, ty - sy);
        for _ in 0..60 {
            let p = c.step();
            let next = (tx - p.x, ty - p.y);
            for (old, new) in [(err.0, next.0), (err.1, next.1)] {
                prop_assert!((new - 0.85 * old).abs() <= 1e-3 * (1.0 + old.abs()));
                // Same side of the target, never past it.
                prop_assert!(new * old >= 0.0);
                prop_assert!(new.abs() <= old.abs());
            }
            err = next;
        }
    }
}

#[test]
fn hover_marker_is_active_while_anything_is_hovered() {
    let mut hover = HoverTracker::new();
    assert!(!hover.is_active());
    assert!(hover.enter("link"));
    assert!(!hover.enter("link"));
    assert!(hover.enter("card"));
    assert!(hover.leave(&"link"));
    assert!(hover.is_active());
    assert!(hover.leave(&"card"));
    assert!(!hover.is_active());
    assert!(!hover.leave(&"card"));
}

// ── Click pulses ────────────────────────────────────────────────────────────

#[test]
fn pulses_expire_after_their_lifetime() {
    let t0 = Instant::now();
    let mut field = PulseField::default();
    let a = field.click(Point::new(10.0, 10.0), t0);
    let b = field.click(Point::new(20.0, 20.0), t0 + Duration::from_millis(100));
    assert_eq!(a.evicted, None);

    assert!(field.expire(t0 + Duration::from_millis(599)).is_empty());
    assert_eq!(field.expire(t0 + PULSE_LIFETIME), vec![a.id]);
    assert_eq!(field.len(), 1);
    assert_eq!(field.expire(t0 + Duration::from_millis(700)), vec![b.id]);
    assert!(field.is_empty());
}

#[test]
fn pulse_field_is_capped_and_evicts_oldest() {
    let t0 = Instant::now();
    let mut field = PulseField::new(PULSE_LIFETIME, 3);
    let first = field.click(Point::default(), t0);
    field.click(Point::default(), t0);
    field.click(Point::default(), t0);
    let fourth = field.click(Point::default(), t0);
    assert_eq!(fourth.evicted, Some(first.id));
    assert_eq!(field.len(), 3);
    assert!(field.live().all(|p| p.id != first.id));
}

#[test]
fn pulse_progress_runs_from_zero_to_one() {
    let t0 = Instant::now();
    let mut field = PulseField::default();
    field.click(Point::new(1.0, 2.0), t0);
    let pulse = *field.live().next().unwrap();
    assert_eq!(field.progress(&pulse, t0), 0.0);
    assert!((field.progress(&pulse, t0 + Duration::from_millis(300)) - 0.5).abs() < 1e-3);
    assert_eq!(field.progress(&pulse, t0 + Duration::from_secs(5)), 1.0);
}

// ── Status readout ──────────────────────────────────────────────────────────

#[test]
fn clock_formats_utc_time_of_day() {
    assert_eq!(format_utc_clock(0), "00:00:00 UTC");
    assert_eq!(format_utc_clock(86_399), "23:59:59 UTC");
    assert_eq!(format_utc_clock(1_700_000_000), "22:13:20 UTC");
}

#[test]
fn datetime_formats_civil_dates() {
    assert_eq!(format_utc_datetime(0), "1970-01-01 00:00:00 UTC");
    assert_eq!(format_utc_datetime(951_782_400), "2000-02-29 00:00:00 UTC");
    assert_eq!(format_utc_datetime(1_700_000_000), "2023-11-14 22:13:20 UTC");
}

#[test]
fn gauge_samples_stay_in_range() {
    let mut rng = seeded(99);
    let gauge = Gauge::MEMORY;
    let mut seen_min = u32::MAX;
    let mut seen_max = 0;
    for _ in 0..2000 {
        let v = gauge.sample(&mut rng);
        assert!((30..=49).contains(&v));
        seen_min = seen_min.min(v);
        seen_max = seen_max.max(v);
    }
    assert_eq!((seen_min, seen_max), (30, 49));
    assert_eq!(gauge.render(37), "37%");
    assert!(Gauge::LOAD.period < Gauge::MEMORY.period);
}

#[test]
fn status_readout_refreshes_each_display_on_its_own_period() {
    let t0 = Instant::now();
    let mut rng = seeded(4);
    let mut status = StatusReadout::new(Gauge::MEMORY);
    status.start(t0);
    assert_eq!(status.clock_text(), CLOCK_PLACEHOLDER);
    assert_eq!(status.gauge_text(), "--%");

    assert!(!status.poll(t0 + Duration::from_millis(500), 5, &mut rng));
    assert!(status.poll(t0 + Duration::from_secs(1), 5, &mut rng));
    assert_eq!(status.clock_text(), "00:00:05 UTC");
    assert_eq!(status.gauge_text(), "--%");

    status.poll(t0 + Duration::from_secs(2), 6, &mut rng);
    assert_eq!(status.clock_text(), "00:00:06 UTC");
    let gauge = status.gauge_text().trim_end_matches('%').parse::<u32>().unwrap();
    assert!((30..=49).contains(&gauge));
}

// ── Interval ────────────────────────────────────────────────────────────────

#[test]
fn interval_ticks_on_a_fixed_grid_and_caps_catch_up() {
    let t0 = Instant::now();
    let mut iv = Interval::new(Duration::from_millis(30));
    iv.start(t0);
    assert_eq!(iv.poll(t0 + Duration::from_millis(29)), 0);
    assert_eq!(iv.poll(t0 + Duration::from_millis(30)), 1);
    assert_eq!(iv.poll(t0 + Duration::from_millis(95)), 2);
    assert_eq!(iv.poll(t0 + Duration::from_millis(100)), 0);
    assert_eq!(iv.poll(t0 + Duration::from_millis(120)), 1);
    assert_eq!(iv.poll(t0 + Duration::from_secs(10)), MAX_CATCH_UP);
}

#[test]
fn interval_starts_on_first_poll() {
    let t0 = Instant::now();
    let mut iv = Interval::new(Duration::from_secs(1));
    assert_eq!(iv.poll(t0), 0);
    assert_eq!(iv.poll(t0 + Duration::from_millis(999)), 0);
    assert_eq!(iv.poll(t0 + Duration::from_secs(1)), 1);
}
