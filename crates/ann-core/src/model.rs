//! Annotation data model.
//!
//! An `Entry` is one committed, labeled rectangle. While it lives inside the
//! widget its geometry is in display space; consumers only ever see
//! `EntryValue`s, which are rescaled into natural image pixels.

use crate::config::NO_LABEL;
use crate::error::AnnotatorError;
use crate::geometry::{Rect, rescale};
use crate::id::EntryId;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ─── Entries ─────────────────────────────────────────────────────────────

/// A labeled region as held by the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    /// Display-space geometry.
    pub rect: Rect,
    pub label: String,
    /// Hover-only; never part of the emitted value.
    pub show_close_button: bool,
}

impl Entry {
    /// Build a new entry with a fresh id. An empty label becomes `"none"`.
    pub fn new(rect: Rect, label: impl Into<String>) -> Self {
        let mut label = label.into();
        if label.is_empty() {
            label = NO_LABEL.to_string();
        }
        Self {
            id: EntryId::generate(),
            rect,
            label,
            show_close_button: false,
        }
    }

    /// The value handed to the consumer, in natural image pixels.
    pub fn rescaled(&self, multiplier: f64) -> EntryValue {
        let r = rescale(self.rect, multiplier);
        EntryValue {
            left: r.left,
            top: r.top,
            width: r.width,
            height: r.height,
            label: self.label.clone(),
        }
    }
}

/// The externally visible form of an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryValue {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
}

/// A change to the entry list, produced by the interaction layer and
/// applied by `EntryList::apply_mutation`.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryMutation {
    Add { rect: Rect, label: String },
    Remove { id: EntryId },
    Hover { id: EntryId, show: bool },
    Clear,
}

/// Result of trying to add an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added(EntryId),
    /// The configured maximum was already reached; nothing changed.
    LimitReached,
}

impl AddOutcome {
    pub fn added(self) -> Option<EntryId> {
        match self {
            AddOutcome::Added(id) => Some(id),
            AddOutcome::LimitReached => None,
        }
    }
}

// ─── Interaction status ──────────────────────────────────────────────────

/// Interaction state of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Idle, accepting a new drag.
    #[default]
    Free,
    /// Drag in progress.
    Hold,
    /// Drag finished, waiting for a label.
    Input,
}

impl Status {
    /// Parse a status name. Unknown names normalize to `Free`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "hold" => Status::Hold,
            "input" => Status::Input,
            _ => Status::Free,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Free => "free",
            Status::Hold => "hold",
            Status::Input => "input",
        }
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Anything, including null or a number, is accepted and normalized.
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().map_or(Status::Free, Status::from_name))
    }
}

// ─── Labeling ────────────────────────────────────────────────────────────

/// How the user labels a finished drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    /// No labeling step; entries are committed on release with `"none"`.
    None,
    /// Free-text input, submitted with Enter.
    Text,
    /// Choose one of the configured labels; choosing submits.
    Select,
}

/// The configured input method, kept verbatim so that an unknown method
/// only fails when the label control is actually rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputMethod(pub String);

impl InputMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// True unless the method is `none`. An unknown method still requires a
    /// label; rendering its control is what fails.
    pub fn requires_label(&self) -> bool {
        self.0 != "none"
    }

    pub fn resolve(&self) -> Result<LabelMode, AnnotatorError> {
        match self.0.as_str() {
            "none" => Ok(LabelMode::None),
            "text" | "free-text" => Ok(LabelMode::Text),
            "select" | "choose-from-list" => Ok(LabelMode::Select),
            other => Err(AnnotatorError::InvalidInputMethod(other.to_string())),
        }
    }
}

impl Default for InputMethod {
    fn default() -> Self {
        Self::new("text")
    }
}

impl fmt::Display for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Border width ────────────────────────────────────────────────────────

/// Outline thickness of entries and the live selection, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BorderWidth(u8);

impl BorderWidth {
    pub fn px(self) -> f64 {
        f64::from(self.0)
    }
}

impl Default for BorderWidth {
    fn default() -> Self {
        Self(crate::config::DEFAULT_BORDER_WIDTH)
    }
}

impl TryFrom<u8> for BorderWidth {
    type Error = AnnotatorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1..=4 => Ok(Self(value)),
            other => Err(AnnotatorError::InvalidBorderWidth(other)),
        }
    }
}

impl From<BorderWidth> for u8 {
    fn from(value: BorderWidth) -> Self {
        value.0
    }
}
