//! SVG highlight mask.
//!
//! Once at least one entry exists the image is dimmed everywhere except
//! inside the committed rectangles. The mask is black over the whole image
//! and white over each rectangle; the host applies it as a CSS mask.

use crate::geometry::{Rect, Size};

/// Build the mask document for display-space `rects` over an image of
/// `display` size. `None` when there is nothing to mask.
pub fn mask_svg<'a>(rects: impl IntoIterator<Item = &'a Rect>, display: Size) -> Option<String> {
    if display.is_empty() {
        return None;
    }
    let holes: String = rects
        .into_iter()
        .map(|r| {
            format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="white"/>"#,
                r.left, r.top, r.width, r.height
            )
        })
        .collect();
    if holes.is_empty() {
        return None;
    }
    Some(format!(
        concat!(
            r#"<svg width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg">"#,
            r#"<defs><mask id="annotator-mask">"#,
            r#"<rect width="100%" height="100%" fill="black"/>{holes}"#,
            "</mask></defs></svg>"
        ),
        w = display.width,
        h = display.height,
        holes = holes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rects_no_mask() {
        assert_eq!(mask_svg(std::iter::empty(), Size::new(800.0, 400.0)), None);
    }

    #[test]
    fn unknown_size_no_mask() {
        let rects = [Rect::new(1.0, 2.0, 3.0, 4.0)];
        assert_eq!(mask_svg(&rects, Size::default()), None);
    }

    #[test]
    fn one_hole_per_rect() {
        let rects = [Rect::new(10.0, 20.0, 30.0, 40.0), Rect::new(1.0, 1.0, 1.0, 1.0)];
        let svg = mask_svg(&rects, Size::new(800.0, 400.0)).unwrap();
        assert!(svg.starts_with(r#"<svg width="800" height="400""#), "{svg}");
        assert!(svg.contains(r#"<rect x="10" y="20" width="30" height="40" fill="white"/>"#));
        assert_eq!(svg.matches(r#"fill="white""#).count(), 2);
        assert_eq!(svg.matches(r#"fill="black""#).count(), 1);
    }
}
