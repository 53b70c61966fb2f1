//! Input abstraction layer.
//!
//! Normalizes DOM mouse events into a unified `InputEvent` consumed by the
//! interaction controller. Coordinates are page-space; the controller crops
//! them into the image.

use ann_core::Point;

/// Which mouse button was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Auxiliary,
    Secondary,
    Other(i16),
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            n => Self::Other(n),
        }
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse pressed inside the widget.
    PointerDown { x: f64, y: f64, button: PointerButton },

    /// Mouse moved anywhere on the page.
    PointerMove { x: f64, y: f64 },

    /// Mouse released anywhere on the page.
    PointerUp { x: f64, y: f64 },
}

impl InputEvent {
    /// Create a PointerDown from DOM `pageX`, `pageY`, `button`.
    pub fn from_mouse_down(x: f64, y: f64, button: i16) -> Self {
        Self::PointerDown {
            x,
            y,
            button: PointerButton::from_dom(button),
        }
    }

    pub fn from_mouse_move(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn from_mouse_up(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn position(&self) -> Point {
        match self {
            Self::PointerDown { x, y, .. } | Self::PointerMove { x, y } | Self::PointerUp { x, y } => {
                Point::new(*x, *y)
            }
        }
    }
}
