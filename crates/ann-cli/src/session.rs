//! Recorded sessions: a config, the image and container geometry, and the
//! host events that followed, replayed through the engine off-browser.

use ann_core::{AnnotatorConfig, AnnotatorError, ChangeQueue, EntryValue, Point, Size};
use ann_editor::{Annotator, InputEvent};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("cannot read session: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed session: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Annotator(#[from] AnnotatorError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub config: AnnotatorConfig,
    /// Natural image size. Absent means the image failed to load.
    #[serde(default)]
    pub image: Option<ImageSize>,
    #[serde(default)]
    pub container: Container,
    #[serde(default)]
    pub events: Vec<SessionEvent>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

/// Container width (`None` when not laid out) and page offset.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Container {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
}

/// One host event. Pointer coordinates are page-space; `t` is the host
/// clock in milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SessionEvent {
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        button: i16,
        #[serde(default)]
        t: f64,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        t: f64,
    },
    Up {
        x: f64,
        y: f64,
        #[serde(default)]
        t: f64,
    },
    Label {
        text: String,
    },
    Hover {
        x: f64,
        y: f64,
    },
    Click {
        x: f64,
        y: f64,
    },
    Remove {
        id: String,
    },
    Resize {
        #[serde(default)]
        width: Option<f64>,
    },
    Reset,
}

impl Session {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Run every event and return each entry-list snapshot in emission
    /// order.
    pub fn replay(&self) -> Result<Vec<Vec<EntryValue>>, ReplayError> {
        let changes = ChangeQueue::new();
        let mut annotator = Annotator::new(self.config.clone());
        annotator.set_entries_observer(changes.clone());

        let Some(image) = self.image else {
            return Err(annotator.image_error().into());
        };
        let scale = annotator.image_loaded(
            Size::new(image.width, image.height),
            self.container.width,
        );
        log::info!(
            "loaded {}x{} at multiplier {}",
            image.width,
            image.height,
            scale.multiplier
        );
        annotator.set_container_origin(Point::new(self.container.left, self.container.top));

        for (i, event) in self.events.iter().enumerate() {
            log::debug!("event {i}: {event:?}");
            apply(&mut annotator, event);
        }
        log::info!(
            "replayed {} events, final status {}",
            self.events.len(),
            annotator.status().as_str()
        );

        Ok(changes.drain())
    }
}

fn apply(annotator: &mut Annotator, event: &SessionEvent) {
    match event {
        SessionEvent::Down { x, y, button, t } => {
            annotator.handle(&InputEvent::from_mouse_down(*x, *y, *button), *t);
        }
        SessionEvent::Move { x, y, t } => {
            annotator.handle(&InputEvent::from_mouse_move(*x, *y), *t);
        }
        SessionEvent::Up { x, y, t } => {
            annotator.handle(&InputEvent::from_mouse_up(*x, *y), *t);
        }
        SessionEvent::Label { text } => {
            if !annotator.submit_label(text) {
                log::warn!("label {text:?} submitted with no pending rectangle");
            }
        }
        SessionEvent::Hover { x, y } => {
            annotator.hover_at(Point::new(*x, *y));
        }
        SessionEvent::Click { x, y } => {
            if let Some(id) = annotator.click_at(Point::new(*x, *y)) {
                log::debug!("close button removed {id}");
            }
        }
        SessionEvent::Remove { id } => {
            annotator.remove_named(id);
        }
        SessionEvent::Resize { width } => {
            annotator.container_resized(*width);
        }
        SessionEvent::Reset => annotator.reset(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn value(left: f64, top: f64, width: f64, height: f64, label: &str) -> EntryValue {
        EntryValue {
            left,
            top,
            width,
            height,
            label: label.to_string(),
        }
    }

    #[test]
    fn drag_on_downscaled_image_emits_natural_pixels() {
        let session = Session::from_json(
            r#"{
                "config": { "url": "cow.jpg", "inputMethod": "none" },
                "image": { "width": 2000, "height": 1000 },
                "container": { "width": 800 },
                "events": [
                    { "type": "down", "x": 100, "y": 100 },
                    { "type": "move", "x": 300, "y": 200 },
                    { "type": "up", "x": 300, "y": 200 }
                ]
            }"#,
        )
        .unwrap();

        let snapshots = session.replay().unwrap();
        assert_eq!(snapshots, vec![vec![value(250.0, 250.0, 503.0, 253.0, "none")]]);
    }

    #[test]
    fn labeled_entry_then_reset() {
        let session = Session::from_json(
            r#"{
                "config": { "url": "a.png", "inputMethod": "text" },
                "image": { "width": 400, "height": 300 },
                "container": { "width": 640, "left": 10, "top": 20 },
                "events": [
                    { "type": "down", "x": 20, "y": 30 },
                    { "type": "up", "x": 60, "y": 50 },
                    { "type": "label", "text": "dog" },
                    { "type": "reset" }
                ]
            }"#,
        )
        .unwrap();

        let snapshots = session.replay().unwrap();
        assert_eq!(
            snapshots,
            vec![vec![value(10.0, 10.0, 41.0, 21.0, "dog")], vec![]]
        );
    }

    #[test]
    fn unknown_remove_id_renotifies_without_interning() {
        let session = Session::from_json(
            r#"{
                "config": { "url": "a.png", "inputMethod": "none" },
                "image": { "width": 400, "height": 300 },
                "container": { "width": 640 },
                "events": [
                    { "type": "down", "x": 0, "y": 0 },
                    { "type": "up", "x": 9, "y": 9 },
                    { "type": "remove", "id": "no-such-entry" }
                ]
            }"#,
        )
        .unwrap();

        let snapshots = session.replay().unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0], snapshots[1]);
        assert_eq!(ann_core::EntryId::lookup("no-such-entry"), None);
    }

    #[test]
    fn missing_image_is_a_load_error() {
        let session = Session::from_json(r#"{ "config": { "url": "gone.png" } }"#).unwrap();
        let err = session.replay().unwrap_err();
        assert_eq!(err.to_string(), "Invalid image URL: gone.png");
    }

    #[test]
    fn unknown_event_type_is_rejected() {
        let err = Session::from_json(
            r#"{ "config": { "url": "a.png" }, "events": [{ "type": "wiggle" }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ReplayError::Json(_)));
    }
}
