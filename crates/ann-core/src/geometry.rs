//! Coordinate transforms between page, display, and natural image space.
//!
//! Pointer events arrive in page coordinates. They are cropped into the
//! rendered image (display space), turned into rectangles while the user
//! drags, and finally rescaled by the image's multiplier into natural
//! pixel space before anything leaves the widget.

use crate::config::{FALLBACK_MAX_WIDTH, MIN_CONTAINER_WIDTH};
use serde::{Deserialize, Serialize};

/// A 2D position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width × height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True if either dimension is zero, negative, or not a number.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Axis-aligned rectangle in a single coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        left: 0.0,
        top: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Inclusive containment, matching how the overlay boxes are hovered.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.left && px <= self.right() && py >= self.top && py <= self.bottom()
    }

    /// Point just below the rectangle's bottom edge, horizontally centered.
    /// The label input is anchored here.
    pub fn bottom_center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.bottom())
    }
}

/// Result of fitting an image into its container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayScale {
    /// natural width / displayed width.
    pub multiplier: f64,
    /// Size the image is rendered at.
    pub display: Size,
}

impl DisplayScale {
    /// Scale used before any image has loaded.
    pub const UNLOADED: DisplayScale = DisplayScale {
        multiplier: 1.0,
        display: Size {
            width: 0.0,
            height: 0.0,
        },
    };
}

/// How an image wider or narrower than its container is fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalePolicy {
    /// Shrink wide images to the container; narrower images keep their
    /// natural size (`multiplier = 1`).
    #[default]
    Downscale,
    /// Always stretch or shrink to exactly the container width.
    Fit,
}

/// Translate a page-space pointer into container-local coordinates and
/// clamp it into `[0, w-1] × [0, h-1]`.
///
/// Returns the origin when the rendered bounds are not known yet, so a
/// press before the image loads can never produce an out-of-image point.
pub fn crop_to_container(pointer: Point, origin: Point, bounds: Option<Size>) -> Point {
    let Some(bounds) = bounds.filter(|b| !b.is_empty()) else {
        return Point::ORIGIN;
    };
    let max_x = (bounds.width - 1.0).round().max(0.0);
    let max_y = (bounds.height - 1.0).round().max(0.0);
    Point {
        x: (pointer.x - origin.x).round().clamp(0.0, max_x),
        y: (pointer.y - origin.y).round().clamp(0.0, max_y),
    }
}

/// Bounding box of an anchor and the live pointer.
///
/// Width and height carry a `+1` so a click without movement still yields a
/// 1×1 box. Either side missing means no drag is active: `Rect::ZERO`.
pub fn rect_from_anchor(anchor: Option<Point>, pointer: Option<Point>) -> Rect {
    let (Some(a), Some(p)) = (anchor, pointer) else {
        return Rect::ZERO;
    };
    Rect {
        left: a.x.min(p.x),
        top: a.y.min(p.y),
        width: (a.x - p.x).abs() + 1.0,
        height: (a.y - p.y).abs() + 1.0,
    }
}

/// Fit an image of `natural` size into a container `max_display_width` wide.
pub fn scale_dimensions(natural: Size, max_display_width: f64, policy: ScalePolicy) -> DisplayScale {
    if natural.is_empty() || !(max_display_width > 0.0) || !max_display_width.is_finite() {
        return DisplayScale {
            multiplier: 1.0,
            display: natural,
        };
    }
    let multiplier = match policy {
        ScalePolicy::Downscale if natural.width <= max_display_width => 1.0,
        _ => natural.width / max_display_width,
    };
    DisplayScale {
        multiplier,
        display: Size {
            width: natural.width / multiplier,
            height: natural.height / multiplier,
        },
    }
}

/// Container width to fit against. Unknown or very narrow containers
/// (not yet laid out) fall back to a fixed width.
pub fn effective_max_width(container_width: Option<f64>) -> f64 {
    match container_width {
        Some(w) if w > MIN_CONTAINER_WIDTH => w,
        _ => FALLBACK_MAX_WIDTH,
    }
}

/// Multiply every component by `multiplier` and round to whole pixels.
pub fn rescale(rect: Rect, multiplier: f64) -> Rect {
    Rect {
        left: (rect.left * multiplier).round(),
        top: (rect.top * multiplier).round(),
        width: (rect.width * multiplier).round(),
        height: (rect.height * multiplier).round(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_translates_and_clamps() {
        let origin = Point::new(50.0, 20.0);
        let bounds = Some(Size::new(800.0, 400.0));

        let p = crop_to_container(Point::new(150.4, 120.6), origin, bounds);
        assert_eq!(p, Point::new(100.0, 101.0));

        let p = crop_to_container(Point::new(0.0, 0.0), origin, bounds);
        assert_eq!(p, Point::ORIGIN);

        let p = crop_to_container(Point::new(5000.0, 5000.0), origin, bounds);
        assert_eq!(p, Point::new(799.0, 399.0));
    }

    #[test]
    fn crop_without_bounds_is_origin() {
        let p = crop_to_container(Point::new(300.0, 300.0), Point::ORIGIN, None);
        assert_eq!(p, Point::ORIGIN);
        let p = crop_to_container(Point::new(300.0, 300.0), Point::ORIGIN, Some(Size::default()));
        assert_eq!(p, Point::ORIGIN);
    }

    #[test]
    fn rect_is_min_corner_plus_one() {
        let samples = [
            (Point::new(10.0, 10.0), Point::new(30.0, 50.0)),
            (Point::new(30.0, 50.0), Point::new(10.0, 10.0)),
            (Point::new(5.0, 90.0), Point::new(60.0, 2.0)),
            (Point::new(7.0, 7.0), Point::new(7.0, 7.0)),
        ];
        for (a, p) in samples {
            let r = rect_from_anchor(Some(a), Some(p));
            assert_eq!(r.left, a.x.min(p.x));
            assert_eq!(r.top, a.y.min(p.y));
            assert!(r.width >= 1.0 && r.height >= 1.0, "degenerate rect {r:?}");
            assert_eq!(r.width, (a.x - p.x).abs() + 1.0);
            assert_eq!(r.height, (a.y - p.y).abs() + 1.0);
        }
    }

    #[test]
    fn rect_without_drag_is_zero() {
        let p = Some(Point::new(3.0, 4.0));
        assert_eq!(rect_from_anchor(None, p), Rect::ZERO);
        assert_eq!(rect_from_anchor(p, None), Rect::ZERO);
        assert_eq!(rect_from_anchor(None, None), Rect::ZERO);
    }

    #[test]
    fn downscale_wide_image() {
        let s = scale_dimensions(Size::new(2000.0, 1000.0), 800.0, ScalePolicy::Downscale);
        assert_eq!(s.multiplier, 2.5);
        assert_eq!(s.display, Size::new(800.0, 400.0));
    }

    #[test]
    fn downscale_keeps_narrow_image_natural() {
        let s = scale_dimensions(Size::new(400.0, 300.0), 800.0, ScalePolicy::Downscale);
        assert_eq!(s.multiplier, 1.0);
        assert_eq!(s.display, Size::new(400.0, 300.0));
    }

    #[test]
    fn fit_upscales_narrow_image() {
        let s = scale_dimensions(Size::new(400.0, 300.0), 800.0, ScalePolicy::Fit);
        assert_eq!(s.multiplier, 0.5);
        assert_eq!(s.display, Size::new(800.0, 600.0));
    }

    #[test]
    fn scale_ignores_unusable_container() {
        let natural = Size::new(640.0, 480.0);
        for max in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let s = scale_dimensions(natural, max, ScalePolicy::Downscale);
            assert_eq!(s.multiplier, 1.0);
            assert_eq!(s.display, natural);
        }
    }

    #[test]
    fn narrow_container_falls_back() {
        assert_eq!(effective_max_width(None), FALLBACK_MAX_WIDTH);
        assert_eq!(effective_max_width(Some(150.0)), FALLBACK_MAX_WIDTH);
        assert_eq!(effective_max_width(Some(MIN_CONTAINER_WIDTH)), FALLBACK_MAX_WIDTH);
        assert_eq!(effective_max_width(Some(1024.0)), 1024.0);
    }

    #[test]
    fn rescale_identity_at_one() {
        let r = Rect::new(12.0, 34.0, 56.0, 78.0);
        assert_eq!(rescale(r, 1.0), r);
    }

    #[test]
    fn rescale_rounds_each_component() {
        let r = Rect::new(100.0, 100.0, 201.0, 101.0);
        assert_eq!(rescale(r, 2.5), Rect::new(250.0, 250.0, 503.0, 253.0));
    }
}
