//! Interaction controller: the free → hold → input state machine.
//!
//! The controller turns input events into `EntryMutation`s, the same way
//! the entry list is the only thing that ever applies them.
//!
//! | From | Event | To | Effect |
//! |------|-------|----|--------|
//! | free / input | primary press | hold | anchor = pointer = cropped press |
//! | hold | move | hold | pointer = cropped position |
//! | hold | release | input | pointer updated, wait for label |
//! | hold | release (no labeling) | free | commit with `"none"` |
//! | input | label submitted | free | commit with label |

use crate::input::{InputEvent, PointerButton};
use ann_core::config::NO_LABEL;
use ann_core::geometry::{crop_to_container, rect_from_anchor};
use ann_core::{EntryMutation, Point, Rect, Size, Status};

/// Where the rendered image sits on the page.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    /// Page offset of the image container's top-left corner.
    pub origin: Point,
    /// Rendered image size; `None` until the image has loaded.
    pub display: Option<Size>,
}

impl Frame {
    pub fn crop(&self, page: Point) -> Point {
        crop_to_container(page, self.origin, self.display)
    }
}

#[derive(Debug, Clone)]
pub struct Controller {
    status: Status,
    anchor: Option<Point>,
    pointer: Option<Point>,
    requires_label: bool,
    pub frame: Frame,
}

impl Controller {
    pub fn new(initial: Status, requires_label: bool) -> Self {
        Self {
            status: initial,
            anchor: None,
            pointer: None,
            requires_label,
            frame: Frame::default(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// The selection outline currently being drawn or awaiting a label.
    pub fn live_rect(&self) -> Rect {
        rect_from_anchor(self.anchor, self.pointer)
    }

    /// Handle a pointer event. `can_add` is false once the selection cap is
    /// reached, which blocks new drags.
    pub fn handle(&mut self, event: &InputEvent, can_add: bool) -> Vec<EntryMutation> {
        match event {
            InputEvent::PointerDown { x, y, button } => {
                if !matches!(self.status, Status::Free | Status::Input) {
                    return vec![];
                }
                if *button != PointerButton::Primary {
                    return vec![];
                }
                if !can_add {
                    log::debug!("press ignored: selection limit reached");
                    return vec![];
                }
                let p = self.frame.crop(Point::new(*x, *y));
                self.anchor = Some(p);
                self.pointer = Some(p);
                self.set_status(Status::Hold);
                vec![]
            }
            InputEvent::PointerMove { x, y } => {
                if self.status == Status::Hold {
                    let p = self.frame.crop(Point::new(*x, *y));
                    log::trace!("drag to ({}, {})", p.x, p.y);
                    self.pointer = Some(p);
                }
                vec![]
            }
            InputEvent::PointerUp { x, y } => {
                if self.status != Status::Hold {
                    return vec![];
                }
                self.pointer = Some(self.frame.crop(Point::new(*x, *y)));
                if self.requires_label {
                    self.set_status(Status::Input);
                    vec![]
                } else {
                    self.commit(NO_LABEL)
                }
            }
        }
    }

    /// Submit the label for the pending rectangle. Ignored unless a label
    /// is being awaited.
    pub fn submit_label(&mut self, label: &str) -> Vec<EntryMutation> {
        if self.status != Status::Input {
            return vec![];
        }
        self.commit(label)
    }

    /// Drop any drag or pending label and go back to idle.
    pub fn reset(&mut self) {
        self.anchor = None;
        self.pointer = None;
        self.set_status(Status::Free);
    }

    fn commit(&mut self, label: &str) -> Vec<EntryMutation> {
        let had_anchor = self.anchor.is_some();
        let rect = self.live_rect();
        self.reset();
        // A status restored from config can be hold/input with no drag behind it.
        if !had_anchor {
            log::debug!("nothing to commit: no drag anchor");
            return vec![];
        }
        vec![EntryMutation::Add {
            rect,
            label: label.to_string(),
        }]
    }

    fn set_status(&mut self, status: Status) {
        if self.status != status {
            log::debug!("status {} -> {}", self.status.as_str(), status.as_str());
            self.status = status;
        }
    }
}

/// True when a transition means a finished drag now waits for its label,
/// so the host should move focus into the label input.
pub fn label_requested(before: Status, after: Status) -> bool {
    before != after && after == Status::Input
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn loaded(requires_label: bool) -> Controller {
        let mut c = Controller::new(Status::Free, requires_label);
        c.frame = Frame {
            origin: Point::new(10.0, 10.0),
            display: Some(Size::new(800.0, 400.0)),
        };
        c
    }

    fn down(x: f64, y: f64) -> InputEvent {
        InputEvent::from_mouse_down(x, y, 0)
    }

    #[test]
    fn drag_then_label() {
        let mut c = loaded(true);
        assert!(c.handle(&down(110.0, 110.0), true).is_empty());
        assert_eq!(c.status(), Status::Hold);
        assert_eq!(c.anchor(), Some(Point::new(100.0, 100.0)));

        c.handle(&InputEvent::from_mouse_move(210.0, 160.0), true);
        assert_eq!(c.live_rect(), Rect::new(100.0, 100.0, 101.0, 51.0));

        assert!(c.handle(&InputEvent::from_mouse_up(310.0, 210.0), true).is_empty());
        assert_eq!(c.status(), Status::Input);
        assert_eq!(c.live_rect(), Rect::new(100.0, 100.0, 201.0, 101.0));

        let mutations = c.submit_label("Mama cow");
        assert_eq!(
            mutations,
            vec![EntryMutation::Add {
                rect: Rect::new(100.0, 100.0, 201.0, 101.0),
                label: "Mama cow".into(),
            }]
        );
        assert_eq!(c.status(), Status::Free);
        assert_eq!(c.anchor(), None);
        assert_eq!(c.live_rect(), Rect::ZERO);
    }

    #[test]
    fn release_commits_directly_without_labeling() {
        let mut c = loaded(false);
        c.handle(&down(20.0, 20.0), true);
        let mutations = c.handle(&InputEvent::from_mouse_up(30.0, 40.0), true);
        assert_eq!(
            mutations,
            vec![EntryMutation::Add {
                rect: Rect::new(10.0, 10.0, 11.0, 21.0),
                label: NO_LABEL.into(),
            }]
        );
        assert_eq!(c.status(), Status::Free);
    }

    #[test]
    fn only_primary_button_starts_a_drag() {
        let mut c = loaded(true);
        c.handle(&InputEvent::from_mouse_down(50.0, 50.0, 2), true);
        assert_eq!(c.status(), Status::Free);
        c.handle(&InputEvent::from_mouse_down(50.0, 50.0, 1), true);
        assert_eq!(c.status(), Status::Free);
    }

    #[test]
    fn full_list_blocks_new_drag() {
        let mut c = loaded(true);
        c.handle(&down(50.0, 50.0), false);
        assert_eq!(c.status(), Status::Free);
        assert_eq!(c.anchor(), None);
    }

    #[test]
    fn press_while_awaiting_label_restarts_drag() {
        let mut c = loaded(true);
        c.handle(&down(20.0, 20.0), true);
        c.handle(&InputEvent::from_mouse_up(60.0, 60.0), true);
        assert_eq!(c.status(), Status::Input);

        c.handle(&down(200.0, 200.0), true);
        assert_eq!(c.status(), Status::Hold);
        assert_eq!(c.live_rect(), Rect::new(190.0, 190.0, 1.0, 1.0));
    }

    #[test]
    fn moves_outside_a_drag_are_ignored() {
        let mut c = loaded(true);
        c.handle(&InputEvent::from_mouse_move(100.0, 100.0), true);
        assert_eq!(c.pointer(), None);
        assert!(c.handle(&InputEvent::from_mouse_up(100.0, 100.0), true).is_empty());
        assert_eq!(c.status(), Status::Free);
    }

    #[test]
    fn drag_is_cropped_to_image() {
        let mut c = loaded(true);
        c.handle(&down(-50.0, -50.0), true);
        c.handle(&InputEvent::from_mouse_move(5000.0, 5000.0), true);
        assert_eq!(c.live_rect(), Rect::new(0.0, 0.0, 800.0, 400.0));
    }

    #[test]
    fn label_ignored_when_not_awaited() {
        let mut c = loaded(true);
        assert!(c.submit_label("stray").is_empty());
    }

    #[test]
    fn restored_input_status_without_drag_commits_nothing() {
        let mut c = Controller::new(Status::Input, true);
        assert!(c.submit_label("x").is_empty());
        assert_eq!(c.status(), Status::Free);
    }

    #[test]
    fn label_is_requested_only_on_entering_input() {
        assert!(label_requested(Status::Hold, Status::Input));
        assert!(!label_requested(Status::Input, Status::Input));
        assert!(!label_requested(Status::Hold, Status::Free));
        assert!(!label_requested(Status::Input, Status::Hold));
        assert!(!label_requested(Status::Free, Status::Hold));
    }

    #[test]
    fn release_in_text_mode_requests_label() {
        let mut c = loaded(true);
        c.handle(&down(20.0, 20.0), true);
        let before = c.status();
        c.handle(&InputEvent::from_mouse_up(40.0, 40.0), true);
        assert!(label_requested(before, c.status()));

        let mut c = loaded(false);
        c.handle(&down(20.0, 20.0), true);
        let before = c.status();
        c.handle(&InputEvent::from_mouse_up(40.0, 40.0), true);
        assert!(!label_requested(before, c.status()));
    }

    #[test]
    fn reset_clears_pending_drag() {
        let mut c = loaded(true);
        c.handle(&down(20.0, 20.0), true);
        c.reset();
        assert_eq!(c.status(), Status::Free);
        assert_eq!(c.anchor(), None);
        assert_eq!(c.pointer(), None);
    }
}
