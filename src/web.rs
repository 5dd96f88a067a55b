//! Browser wiring: the effect objects bound to DOM elements and browser timers.
//!
//! Every effect is optional. If the element it decorates is missing from the page the
//! effect is skipped without error.

use crate::effects::console::{BANNER, ConsoleHost, LineKind};
use crate::effects::pulse::{MAX_LIVE_PULSES, PULSE_LIFETIME, PulseId};
use crate::effects::scramble::{SCRAMBLE_TICK, VISIBILITY_THRESHOLD};
use crate::effects::status::{CLOCK_PERIOD, Gauge, format_utc_clock};
use crate::effects::{
    CardRect, CommandTable, Console, GlyphRain, HoverTracker, Point, PulseField, RevealTriggers,
    Rgba, ScrambleBoard, Tilt, TrailingCursor,
};
use crate::surface::GlyphSurface;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, HtmlInputElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent,
    MouseEvent, ScrollBehavior, ScrollIntoViewOptions, Window,
};

const TILT_SELECTOR: &str = ".project-card, .timeline__card, .hero__terminal, .terminal-card";
const HOVER_SELECTOR: &str = "a, button, .project-card, .timeline__card";
const FONT_FAMILY: &str = "\"JetBrains Mono\", monospace";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    init_rain(&window, &document)?;
    init_scramble(&window, &document)?;
    init_tilt(&document)?;
    init_cursor(&window, &document)?;
    init_status(&window, &document)?;
    init_console(&document)?;
    init_pulses(&window, &document)?;
    init_nav_toggle(&document)?;

    web_sys::console::log_2(
        &JsValue::from_str(&format!("%c {BANNER} ")),
        &JsValue::from_str(
            "background: #000; color: #00ffcc; font-size: 14px; padding: 10px; border: 1px solid #00ffcc;",
        ),
    );
    Ok(())
}

fn seeded_rng() -> fastrand::Rng {
    fastrand::Rng::with_seed((js_sys::Math::random() * u64::MAX as f64) as u64)
}

fn millis(d: Duration) -> i32 {
    i32::try_from(d.as_millis()).unwrap_or(i32::MAX)
}

fn listen<E: 'static + wasm_bindgen::convert::FromWasmAbi>(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

fn every(window: &Window, period: Duration, tick: impl FnMut() + 'static) -> Result<i32, JsValue> {
    let closure = Closure::<dyn FnMut()>::new(tick);
    let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        millis(period),
    )?;
    closure.forget();
    Ok(id)
}

/// Run `frame` on every animation frame, forever.
fn animate(window: &Window, mut frame: impl FnMut() + 'static) -> Result<(), JsValue> {
    let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = slot.clone();
    let win = window.clone();
    *slot.borrow_mut() = Some(Closure::new(move || {
        frame();
        if let Some(cb) = next.borrow().as_ref() {
            let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }));
    let first = slot.borrow();
    if let Some(cb) = first.as_ref() {
        window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }
    Ok(())
}

fn html_elements(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, JsValue> {
    let nodes = document.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|n| n.dyn_into::<HtmlElement>().ok())
        .collect())
}

fn viewport(window: &Window) -> (f32, f32) {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w as f32, h as f32)
}

// ── Glyph rain ──

struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl GlyphSurface for CanvasSurface {
    fn size(&self) -> (f32, f32) {
        (self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn set_fill(&mut self, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_string());
    }

    fn set_font_px(&mut self, px: f32) {
        self.ctx.set_font(&format!("{px}px {FONT_FAMILY}"));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.fill_rect(f64::from(x), f64::from(y), f64::from(w), f64::from(h));
    }

    fn fill_glyph(&mut self, ch: char, x: f32, y: f32) {
        let mut buf = [0u8; 4];
        let _ = self
            .ctx
            .fill_text(ch.encode_utf8(&mut buf), f64::from(x), f64::from(y));
    }
}

fn init_rain(window: &Window, document: &Document) -> Result<(), JsValue> {
    let Some(canvas) = document
        .get_element_by_id("matrixCanvas")
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
    else {
        return Ok(());
    };
    let Some(ctx) = canvas
        .get_context("2d")?
        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
    else {
        return Ok(());
    };

    let surface = Rc::new(RefCell::new(CanvasSurface { canvas, ctx }));
    let rain = Rc::new(RefCell::new(GlyphRain::new(seeded_rng())));

    let resize = {
        let (window, surface, rain) = (window.clone(), surface.clone(), rain.clone());
        move || {
            let (w, h) = viewport(&window);
            let s = surface.borrow();
            s.canvas.set_width(w as u32);
            s.canvas.set_height(h as u32);
            rain.borrow_mut().resize(w, h);
        }
    };
    resize();
    listen(window, "resize", move |_: web_sys::Event| resize())?;

    listen(window, "mousemove", {
        let rain = rain.clone();
        move |e: MouseEvent| {
            rain.borrow_mut()
                .pointer_moved(Point::new(e.client_x() as f32, e.client_y() as f32));
        }
    })?;

    animate(window, move || {
        rain.borrow_mut().draw(&mut *surface.borrow_mut());
    })
}

// ── Scramble reveal ──

struct ScrambleState {
    elements: Vec<HtmlElement>,
    board: ScrambleBoard<usize>,
    triggers: RevealTriggers<usize>,
    rng: fastrand::Rng,
    ticker: Option<i32>,
}

type Ticker = Rc<Closure<dyn FnMut()>>;

fn init_scramble(window: &Window, document: &Document) -> Result<(), JsValue> {
    let elements = html_elements(document, "[data-decrypt]")?;
    if elements.is_empty() {
        return Ok(());
    }

    let mut triggers = RevealTriggers::new();
    for (i, el) in elements.iter().enumerate() {
        if el.class_list().contains("nav__link") {
            triggers.register_nav_link(i);
        }
    }
    let state = Rc::new(RefCell::new(ScrambleState {
        elements: elements.clone(),
        board: ScrambleBoard::new(),
        triggers,
        rng: seeded_rng(),
        ticker: None,
    }));

    // One shared 30 ms ticker drives every in-flight scramble; it stops when none are left.
    let tick: Ticker = {
        let (state, window) = (state.clone(), window.clone());
        Rc::new(Closure::new(move || {
            let s = &mut *state.borrow_mut();
            for (i, frame) in s.board.tick_all(&mut s.rng) {
                if let Some(el) = s.elements.get(i) {
                    el.set_inner_text(&frame.text);
                }
            }
            if s.board.is_idle() {
                if let Some(id) = s.ticker.take() {
                    window.clear_interval_with_handle(id);
                }
            }
        }))
    };

    let begin = {
        let (state, window, tick) = (state.clone(), window.clone(), tick.clone());
        Rc::new(move |i: usize| {
            let s = &mut *state.borrow_mut();
            let Some(target) = s.elements.get(i).and_then(|el| el.get_attribute("data-decrypt"))
            else {
                return;
            };
            s.board.start(i, &target);
            if s.ticker.is_none() {
                s.ticker = window
                    .set_interval_with_callback_and_timeout_and_arguments_0(
                        (*tick).as_ref().unchecked_ref(),
                        millis(SCRAMBLE_TICK),
                    )
                    .ok();
            }
        })
    };

    let on_intersect = {
        let (state, begin) = (state.clone(), begin.clone());
        Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target: Element = entry.target();
                    let fired = {
                        let s = &mut *state.borrow_mut();
                        let node: &web_sys::Node = &target;
                        s.elements
                            .iter()
                            .position(|el| el.is_same_node(Some(node)))
                            .filter(|i| s.triggers.on_visible(i, entry.intersection_ratio() as f32))
                    };
                    if let Some(i) = fired {
                        observer.unobserve(&target);
                        (*begin)(i);
                    }
                }
            },
        )
    };
    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(f64::from(VISIBILITY_THRESHOLD)));
    let observer =
        IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &init)?;
    on_intersect.forget();

    for (i, el) in elements.iter().enumerate() {
        observer.observe(el);
        if state.borrow().triggers.on_hover(&i) {
            let (state, begin) = (state.clone(), begin.clone());
            listen(el, "mouseenter", move |_: MouseEvent| {
                if state.borrow().triggers.on_hover(&i) {
                    (*begin)(i);
                }
            })?;
        }
    }
    Ok(())
}

// ── Tilt ──

fn init_tilt(document: &Document) -> Result<(), JsValue> {
    for card in html_elements(document, TILT_SELECTOR)? {
        listen(&card, "mousemove", {
            let card = card.clone();
            move |e: MouseEvent| {
                let r = card.get_bounding_client_rect();
                let rect = CardRect {
                    left: r.left() as f32,
                    top: r.top() as f32,
                    width: r.width() as f32,
                    height: r.height() as f32,
                };
                let tilt = Tilt::for_pointer(rect, Point::new(e.client_x() as f32, e.client_y() as f32));
                let _ = card.style().set_property("transform", &tilt.to_css());
            }
        })?;
        listen(&card, "mouseleave", {
            let card = card.clone();
            move |_: MouseEvent| {
                let _ = card.style().set_property("transform", &Tilt::NEUTRAL.to_css());
            }
        })?;
    }
    Ok(())
}

// ── Trailing cursor ──

fn init_cursor(window: &Window, document: &Document) -> Result<(), JsValue> {
    let Some(marker) = document
        .get_element_by_id("cursor")
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return Ok(());
    };
    let cursor = Rc::new(RefCell::new(TrailingCursor::default()));

    listen(window, "mousemove", {
        let cursor = cursor.clone();
        move |e: MouseEvent| {
            cursor
                .borrow_mut()
                .pointer_moved(Point::new(e.client_x() as f32, e.client_y() as f32));
        }
    })?;

    let hover = Rc::new(RefCell::new(HoverTracker::<usize>::new()));
    let body = document.body();
    for (i, el) in html_elements(document, HOVER_SELECTOR)?.iter().enumerate() {
        for (event, entering) in [("mouseenter", true), ("mouseleave", false)] {
            let (hover, body) = (hover.clone(), body.clone());
            listen(el, event, move |_: MouseEvent| {
                let mut h = hover.borrow_mut();
                if entering {
                    h.enter(i);
                } else {
                    h.leave(&i);
                }
                if let Some(body) = &body {
                    let _ = body
                        .class_list()
                        .toggle_with_force("hover-active", h.is_active());
                }
            })?;
        }
    }

    animate(window, move || {
        let pos = cursor.borrow_mut().step();
        let style = marker.style();
        let _ = style.set_property("left", &format!("{}px", pos.x));
        let _ = style.set_property("top", &format!("{}px", pos.y));
    })
}

// ── Status readout ──

fn init_status(window: &Window, document: &Document) -> Result<(), JsValue> {
    let html = |id: &str| {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    };

    if let Some(clock) = html("hudTime") {
        every(window, CLOCK_PERIOD, move || {
            let secs = (js_sys::Date::now() / 1000.0) as u64;
            clock.set_inner_text(&format_utc_clock(secs));
        })?;
    }

    if let Some(mem) = html("hudMem") {
        let gauge = Gauge::MEMORY;
        let mut rng = seeded_rng();
        every(window, gauge.period, move || {
            mem.set_inner_text(&gauge.render(gauge.sample(&mut rng)));
        })?;
    }
    Ok(())
}

// ── Console ──

struct PageHost {
    document: Document,
}

impl ConsoleHost for PageHost {
    fn scroll_to(&mut self, section: &str) -> bool {
        let Some(el) = self.document.get_element_by_id(section) else {
            return false;
        };
        let opts = ScrollIntoViewOptions::new();
        opts.set_behavior(ScrollBehavior::Smooth);
        el.scroll_into_view_with_scroll_into_view_options(&opts);
        true
    }

    fn now_unix_secs(&self) -> u64 {
        (js_sys::Date::now() / 1000.0) as u64
    }
}

fn render_log(document: &Document, output: &Element, console: &Console) -> Result<(), JsValue> {
    output.set_inner_html("");
    for line in console.log().lines() {
        let row = document.create_element("div")?;
        row.set_class_name(match line.kind {
            LineKind::System => "terminal__line terminal__line--system",
            LineKind::Echo => "terminal__line terminal__line--echo",
            LineKind::Output => "terminal__line",
            LineKind::Error => "terminal__line terminal__line--error",
        });
        row.set_text_content(Some(&line.text));
        output.append_child(&row)?;
    }
    // Follow the newest line.
    output.set_scroll_top(output.scroll_height());
    Ok(())
}

fn init_console(document: &Document) -> Result<(), JsValue> {
    let Some(input) = document
        .get_element_by_id("terminalInput")
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    else {
        return Ok(());
    };
    let Some(output) = document.get_element_by_id("terminalOutput") else {
        return Ok(());
    };

    let mut console = Console::new(CommandTable::standard());
    let mut host = PageHost {
        document: document.clone(),
    };
    let document = document.clone();
    listen(&input.clone(), "keydown", move |e: KeyboardEvent| {
        if e.key() != "Enter" {
            return;
        }
        let line = input.value();
        input.set_value("");
        if console.submit(&line, &mut host) {
            let _ = render_log(&document, &output, &console);
        }
    })
}

// ── Click pulses ──

fn init_pulses(window: &Window, document: &Document) -> Result<(), JsValue> {
    let Some(body) = document.body() else {
        return Ok(());
    };
    let field = Rc::new(RefCell::new(PulseField::new(PULSE_LIFETIME, MAX_LIVE_PULSES)));
    let nodes: Rc<RefCell<HashMap<PulseId, Element>>> = Rc::new(RefCell::new(HashMap::new()));
    let document = document.clone();
    let window = window.clone();

    listen(&body.clone(), "click", move |e: MouseEvent| {
        let Ok(el) = document.create_element("div") else {
            return;
        };
        el.set_class_name("click-pulse");
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            let style = html.style();
            let _ = style.set_property("left", &format!("{}px", e.client_x()));
            let _ = style.set_property("top", &format!("{}px", e.client_y()));
        }
        if body.append_child(&el).is_err() {
            return;
        }

        let now = web_time::Instant::now();
        let spawned = field
            .borrow_mut()
            .click(Point::new(e.client_x() as f32, e.client_y() as f32), now);
        let mut live = nodes.borrow_mut();
        if let Some(old) = spawned.evicted.and_then(|id| live.remove(&id)) {
            old.remove();
        }
        live.insert(spawned.id, el);
        drop(live);

        let (field, nodes) = (field.clone(), nodes.clone());
        let expire = Closure::once_into_js(move || {
            let gone = field.borrow_mut().expire(web_time::Instant::now() + Duration::from_millis(1));
            let mut live = nodes.borrow_mut();
            for id in gone {
                if let Some(el) = live.remove(&id) {
                    el.remove();
                }
            }
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            expire.unchecked_ref(),
            millis(PULSE_LIFETIME),
        );
    })
}

// ── Nav toggle ──

fn init_nav_toggle(document: &Document) -> Result<(), JsValue> {
    let (Some(toggle), Some(mobile)) = (
        document.get_element_by_id("navToggle"),
        document.get_element_by_id("navMobile"),
    ) else {
        return Ok(());
    };
    listen(&toggle, "click", move |_: MouseEvent| {
        let _ = mobile.class_list().toggle("nav__mobile--open");
    })
}
