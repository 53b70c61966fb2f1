//! Hit testing: point → entry lookup.
//!
//! Entries are painted in insertion order, so the last one containing a
//! point is the one on top.

use crate::config::CLOSE_BUTTON_RADIUS;
use crate::geometry::Point;
use crate::id::EntryId;
use crate::model::Entry;

/// Find the topmost entry at display position (px, py).
pub fn entry_at(entries: &[Entry], px: f64, py: f64) -> Option<EntryId> {
    entries
        .iter()
        .rev()
        .find(|e| e.rect.contains(px, py))
        .map(|e| e.id)
}

/// Centre of an entry's close button: its top-right corner.
pub fn close_button_center(entry: &Entry) -> Point {
    Point::new(entry.rect.right(), entry.rect.top)
}

/// Find a visible close button at (px, py). Only entries currently showing
/// their button (hovered) are considered.
pub fn close_button_at(entries: &[Entry], px: f64, py: f64) -> Option<EntryId> {
    entries
        .iter()
        .rev()
        .filter(|e| e.show_close_button)
        .find(|e| {
            let c = close_button_center(e);
            let (dx, dy) = (px - c.x, py - c.y);
            dx * dx + dy * dy <= CLOSE_BUTTON_RADIUS * CLOSE_BUTTON_RADIUS
        })
        .map(|e| e.id)
}
