//! Canvas2D overlay renderer.
//!
//! Draws committed entries, their close buttons, and the live selection on
//! a transparent `<canvas>` stacked over the image. The image itself is a
//! CSS background owned by the host page.

use ann_core::config::CLOSE_BUTTON_RADIUS;
use ann_core::hit::close_button_center;
use ann_core::{BorderWidth, Entry, Rect};
use web_sys::CanvasRenderingContext2d;

/// Overlay colors.
pub struct OverlayTheme {
    pub entry: &'static str,
    pub selection: &'static str,
    pub close_bg: &'static str,
    pub close_fg: &'static str,
}

impl Default for OverlayTheme {
    fn default() -> Self {
        Self {
            entry: "#EF4444",
            selection: "#4ADE80",
            close_bg: "#166534",
            close_fg: "#FFFFFF",
        }
    }
}

/// Render the whole overlay.
pub fn render_overlay(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    entries: &[Entry],
    live: Option<Rect>,
    border: BorderWidth,
    theme: &OverlayTheme,
) {
    ctx.clear_rect(0.0, 0.0, width, height);

    for entry in entries {
        draw_entry(ctx, entry, border, theme);
    }
    // Close buttons go on top of every outline.
    for entry in entries.iter().filter(|e| e.show_close_button) {
        draw_close_button(ctx, entry, theme);
    }

    if let Some(rect) = live {
        draw_selection(ctx, rect, border, theme);
    }
}

fn draw_entry(ctx: &CanvasRenderingContext2d, entry: &Entry, border: BorderWidth, theme: &OverlayTheme) {
    let r = entry.rect;
    let bw = border.px();

    ctx.save();
    ctx.set_stroke_style_str(theme.entry);
    ctx.set_line_width(bw);
    // Outline sits just outside the region, like a CSS border.
    ctx.stroke_rect(r.left - bw / 2.0, r.top - bw / 2.0, r.width + bw, r.height + bw);

    // Clip the label to the box.
    ctx.begin_path();
    ctx.rect(r.left, r.top, r.width, r.height);
    ctx.clip();
    ctx.set_fill_style_str(theme.entry);
    ctx.set_font("14px ui-monospace, monospace");
    ctx.set_text_align("left");
    ctx.set_text_baseline("top");
    let _ = ctx.fill_text(&entry.label, r.left + 2.0, r.top + 2.0);
    ctx.restore();
}

fn draw_close_button(ctx: &CanvasRenderingContext2d, entry: &Entry, theme: &OverlayTheme) {
    let c = close_button_center(entry);

    ctx.save();
    ctx.begin_path();
    let _ = ctx.arc(c.x, c.y, CLOSE_BUTTON_RADIUS, 0.0, std::f64::consts::TAU);
    ctx.set_fill_style_str(theme.close_bg);
    ctx.fill();
    ctx.set_stroke_style_str(theme.close_fg);
    ctx.set_line_width(2.0);
    ctx.stroke();

    ctx.set_fill_style_str(theme.close_fg);
    ctx.set_font("bold 12px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let _ = ctx.fill_text("×", c.x, c.y);
    ctx.restore();
}

fn draw_selection(ctx: &CanvasRenderingContext2d, r: Rect, border: BorderWidth, theme: &OverlayTheme) {
    if r.width < 1.0 && r.height < 1.0 {
        return;
    }
    let bw = border.px();

    ctx.save();
    ctx.set_stroke_style_str(theme.selection);
    ctx.set_line_width(bw);
    let _ = ctx.set_line_dash(&js_sys::Array::of2(
        &wasm_bindgen::JsValue::from_f64(bw),
        &wasm_bindgen::JsValue::from_f64(bw * 2.0),
    ));
    ctx.stroke_rect(r.left, r.top, r.width, r.height);
    ctx.restore();
}
