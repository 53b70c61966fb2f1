//! WASM bridge — exposes the annotator engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host page owns the
//! `<img>`/background and the overlay `<canvas>`; it forwards the container's
//! `mousedown`, image load/error, and resize notifications here. Page-wide
//! `mousemove`/`mouseup` listeners are registered by the widget itself and
//! removed again on `unmount()` or when the widget is freed.

mod console;
mod observers;
mod render2d;

use ann_core::{AnnotatorConfig, ChangeQueue, EntryId, Point, Size, Status};
use ann_editor::{Annotator, InputEvent, label_requested};
use observers::{JsChangeCallback, LocalStorageMirror};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, MouseEvent};

/// One mounted annotator.
///
/// All interaction from the page goes through this struct. Every export
/// takes `&self`, so the host's `onChange` may call back into the widget.
#[wasm_bindgen]
pub struct AnnotatorWidget {
    bridge: Rc<Bridge>,
    listeners: Option<WindowListeners>,
    theme: render2d::OverlayTheme,
}

#[wasm_bindgen]
impl AnnotatorWidget {
    /// Create a widget from a JSON config object (see `AnnotatorConfig`).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<AnnotatorWidget, JsError> {
        console::console_error_panic_hook_setup();
        let config = AnnotatorConfig::from_json(config_json)?;
        Ok(Self {
            bridge: Rc::new(Bridge::new(config)),
            listeners: None,
            theme: render2d::OverlayTheme::default(),
        })
    }

    /// Register `onChange(entries)`. Called with the full list, in natural
    /// image pixels, after every add, remove, and reset.
    pub fn set_on_change(&self, callback: js_sys::Function) {
        *self.bridge.on_change.borrow_mut() = Some(JsChangeCallback(callback));
    }

    /// Mirror selection bookkeeping into `localStorage`. Returns `false` if
    /// storage is unavailable.
    pub fn enable_storage_mirror(&self) -> bool {
        match LocalStorageMirror::new() {
            Some(mirror) => {
                self.bridge.update(|a| a.set_selection_observer(mirror));
                true
            }
            None => false,
        }
    }

    // ─── Image geometry ──────────────────────────────────────────────────

    /// The image loaded. `container_width <= 0` means the container is not
    /// laid out yet. Returns `{"multiplier", "width", "height"}` for sizing
    /// the container and canvas.
    pub fn image_loaded(&self, natural_width: f64, natural_height: f64, container_width: f64) -> String {
        let scale = self.bridge.update(|a| {
            a.image_loaded(
                Size::new(natural_width, natural_height),
                known_width(container_width),
            )
        });
        json!({
            "multiplier": scale.multiplier,
            "width": scale.display.width,
            "height": scale.display.height,
        })
        .to_string()
    }

    /// The image failed to load. Always throws, naming the URL.
    pub fn image_failed(&self) -> Result<(), JsError> {
        Err(self.bridge.read(Annotator::image_error).into())
    }

    /// The container was resized. Returns `true` if the image was refitted.
    pub fn resize(&self, container_width: f64) -> bool {
        self.bridge
            .update(|a| a.container_resized(known_width(container_width)))
            .is_some()
    }

    /// Page offset of the container (`offsetLeft`, `offsetTop`).
    pub fn set_container_origin(&self, left: f64, top: f64) {
        self.bridge
            .update(|a| a.set_container_origin(Point::new(left, top)));
    }

    // ─── Pointer events ──────────────────────────────────────────────────

    /// Container `mousedown`. Returns true if a redraw is needed.
    pub fn handle_mouse_down(&self, page_x: f64, page_y: f64, button: i16) -> bool {
        let event = InputEvent::from_mouse_down(page_x, page_y, button);
        let now = js_sys::Date::now();
        self.bridge.update(|a| a.handle(&event, now))
    }

    /// Page `mousemove`, for hosts that forward events themselves.
    pub fn handle_mouse_move(&self, page_x: f64, page_y: f64) -> bool {
        handle_move(&self.bridge, page_x, page_y)
    }

    /// Page `mouseup`. Returns a JSON string:
    /// `{"changed":bool, "status":"<status>", "focusLabel":bool}`
    ///
    /// `focusLabel` is set when the drag ended and a label input should now
    /// receive focus.
    pub fn handle_mouse_up(&self, page_x: f64, page_y: f64) -> String {
        handle_up(&self.bridge, page_x, page_y)
    }

    /// Submit the label for the pending rectangle. Returns true if an entry
    /// was committed.
    pub fn submit_label(&self, label: &str) -> bool {
        self.bridge.update(|a| a.submit_label(label))
    }

    /// Pointer hovering over the overlay. Returns true if any close button
    /// appeared or disappeared.
    pub fn handle_hover(&self, page_x: f64, page_y: f64) -> bool {
        self.bridge.update(|a| a.hover_at(Point::new(page_x, page_y)))
    }

    /// Click on the overlay. Returns the removed entry id, or an empty string.
    pub fn handle_click(&self, page_x: f64, page_y: f64) -> String {
        self.bridge
            .update(|a| a.click_at(Point::new(page_x, page_y)))
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    // ─── Entry control ───────────────────────────────────────────────────

    /// Remove an entry by id. Unknown ids leave the list as is, but the
    /// change callback still fires.
    pub fn remove_entry(&self, id: &str) -> bool {
        self.bridge.update(|a| a.remove_named(id))
    }

    pub fn hover_entry(&self, id: &str, show: bool) -> bool {
        match EntryId::lookup(id) {
            Some(id) => self.bridge.update(|a| a.hover(id, show)),
            None => false,
        }
    }

    /// Clear all entries and any drag in progress.
    pub fn reset(&self) {
        self.bridge.update(Annotator::reset);
    }

    // ─── Read-back ───────────────────────────────────────────────────────

    /// Current entries as the consumer sees them.
    pub fn entries_json(&self) -> String {
        let snapshot = self.bridge.read(|a| a.entries().snapshot());
        serde_json::to_string(&snapshot).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn status(&self) -> String {
        self.bridge.read(|a| a.status().as_str().to_string())
    }

    pub fn can_add(&self) -> bool {
        self.bridge.read(Annotator::can_add)
    }

    /// `{"current":n, "max":n|null, "canAdd":bool}`
    pub fn counts_json(&self) -> String {
        self.bridge.read(|a| {
            let (current, max) = a.counts();
            json!({ "current": current, "max": max, "canAdd": a.can_add() }).to_string()
        })
    }

    /// Banner text when the selection cap is reached.
    pub fn limit_message(&self) -> Option<String> {
        self.bridge.read(Annotator::limit_message)
    }

    /// The label control to render as JSON, or `null` when no label is
    /// awaited. Throws for an unrecognized input method.
    pub fn label_control_json(&self) -> Result<String, JsError> {
        let control = self.bridge.read(Annotator::label_control)?;
        Ok(serde_json::to_string(&control)?)
    }

    /// `data:` URI of the highlight mask, for CSS `mask-image`.
    pub fn mask_data_uri(&self) -> Option<String> {
        let svg = self.bridge.read(Annotator::mask_svg)?;
        let encoded = web_sys::window()?.btoa(&svg).ok()?;
        Some(format!("data:image/svg+xml;base64,{encoded}"))
    }

    /// Draw the overlay onto a canvas sized to the displayed image.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        self.bridge.read(|a| {
            let display = a.scale().display;
            render2d::render_overlay(
                ctx,
                display.width,
                display.height,
                a.entries().entries(),
                a.live_rect(),
                a.config().border_width,
                &self.theme,
            );
        });
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Listen to page-wide `mousemove`/`mouseup` while mounted. `on_redraw`
    /// is called whenever an event changed what is drawn; it receives the
    /// same JSON as `handle_mouse_up` for releases and `null` for moves.
    pub fn attach_window_listeners(&mut self, on_redraw: js_sys::Function) -> Result<(), JsError> {
        self.listeners = None;
        self.listeners = Some(WindowListeners::attach(self.bridge.clone(), on_redraw)?);
        Ok(())
    }

    /// Tear down the page listeners. Freeing the widget does the same.
    pub fn unmount(&mut self) {
        self.listeners = None;
        log::debug!("annotator unmounted");
    }
}

/// Route `log` output to the browser console at `level` (e.g. `"debug"`).
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    console::init_logger(console::parse_level(level));
}

// ─── Engine sharing ──────────────────────────────────────────────────────

/// The engine plus the host callback, shared by the widget and its window
/// listeners.
struct Bridge {
    annotator: RefCell<Annotator>,
    changes: ChangeQueue,
    on_change: RefCell<Option<JsChangeCallback>>,
}

impl Bridge {
    fn new(config: AnnotatorConfig) -> Self {
        let changes = ChangeQueue::new();
        let mut annotator = Annotator::new(config);
        annotator.set_entries_observer(changes.clone());
        Self {
            annotator: RefCell::new(annotator),
            changes,
            on_change: RefCell::new(None),
        }
    }

    fn read<R>(&self, f: impl FnOnce(&Annotator) -> R) -> R {
        f(&*self.annotator.borrow())
    }

    /// Run `f` on the engine, then hand queued changes to the host once the
    /// engine is released again.
    fn update<R>(&self, f: impl FnOnce(&mut Annotator) -> R) -> R {
        let result = f(&mut *self.annotator.borrow_mut());
        self.flush();
        result
    }

    fn flush(&self) {
        let batch = self.changes.drain();
        if batch.is_empty() {
            return;
        }
        let Some(callback) = self.on_change.borrow().clone() else {
            return;
        };
        for entries in &batch {
            callback.deliver(entries);
        }
    }
}

// ─── Shared event handling ───────────────────────────────────────────────

fn known_width(width: f64) -> Option<f64> {
    (width > 0.0).then_some(width)
}

fn handle_move(bridge: &Bridge, page_x: f64, page_y: f64) -> bool {
    let event = InputEvent::from_mouse_move(page_x, page_y);
    let now = js_sys::Date::now();
    bridge.update(|a| a.handle(&event, now))
}

fn handle_up(bridge: &Bridge, page_x: f64, page_y: f64) -> String {
    let event = InputEvent::from_mouse_up(page_x, page_y);
    let now = js_sys::Date::now();
    let (before, changed, after) = bridge.update(|a| {
        let before = a.status();
        let changed = a.handle(&event, now);
        (before, changed, a.status())
    });
    release_json(changed, before, after)
}

fn release_json(changed: bool, before: Status, after: Status) -> String {
    json!({
        "changed": changed,
        "status": after.as_str(),
        "focusLabel": label_requested(before, after),
    })
    .to_string()
}

// ─── Window listeners ────────────────────────────────────────────────────

/// Page-wide mouse listeners, removed on drop.
struct WindowListeners {
    window: web_sys::Window,
    on_move: Closure<dyn FnMut(MouseEvent)>,
    on_up: Closure<dyn FnMut(MouseEvent)>,
}

impl WindowListeners {
    fn attach(bridge: Rc<Bridge>, on_redraw: js_sys::Function) -> Result<Self, JsError> {
        let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;

        let move_target = bridge.clone();
        let move_redraw = on_redraw.clone();
        let on_move = Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
            if handle_move(&move_target, f64::from(e.page_x()), f64::from(e.page_y())) {
                let _ = move_redraw.call1(&JsValue::NULL, &JsValue::NULL);
            }
        });

        let on_up = Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
            let result = handle_up(&bridge, f64::from(e.page_x()), f64::from(e.page_y()));
            let _ = on_redraw.call1(&JsValue::NULL, &JsValue::from_str(&result));
        });

        window
            .add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())
            .map_err(|_| JsError::new("failed to add mousemove listener"))?;
        window
            .add_event_listener_with_callback("mouseup", on_up.as_ref().unchecked_ref())
            .map_err(|_| JsError::new("failed to add mouseup listener"))?;
        log::debug!("window listeners attached");

        Ok(Self {
            window,
            on_move,
            on_up,
        })
    }
}

impl Drop for WindowListeners {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("mousemove", self.on_move.as_ref().unchecked_ref());
        let _ = self
            .window
            .remove_event_listener_with_callback("mouseup", self.on_up.as_ref().unchecked_ref());
        log::debug!("window listeners removed");
    }
}
