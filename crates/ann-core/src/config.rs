//! Widget configuration as supplied by the host page.

use crate::error::AnnotatorError;
use crate::geometry::ScalePolicy;
use crate::model::{BorderWidth, InputMethod, Status};
use serde::{Deserialize, Deserializer, Serialize};

// ─── Constants ────────────────────────────────────────────────────────────

/// Label given to entries committed without a labeling step.
pub const NO_LABEL: &str = "none";

pub const DEFAULT_BORDER_WIDTH: u8 = 2;

/// Offered in select mode when the host supplies no labels.
pub const DEFAULT_LABELS: &[&str] = &["object"];

/// Containers at or below this width are treated as not yet laid out.
pub const MIN_CONTAINER_WIDTH: f64 = 200.0;

pub const FALLBACK_MAX_WIDTH: f64 = 800.0;

/// Radius of the round close button drawn on a hovered entry.
pub const CLOSE_BUTTON_RADIUS: f64 = 8.0;

/// Local-storage key holding whether a drag is in progress.
pub const STORAGE_KEY_SELECTING: &str = "annotator-selecting";

/// Local-storage key holding selection-count bookkeeping.
pub const STORAGE_KEY_DATA: &str = "annotator-data";

// ─── Config ───────────────────────────────────────────────────────────────

/// Configuration for one mounted annotator.
///
/// Deserialized from the JSON object the host page passes in. Every field
/// except `url` has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatorConfig {
    pub url: String,

    #[serde(default)]
    pub input_method: InputMethod,

    /// Candidate labels for select mode. Accepts a single string too.
    #[serde(default = "default_labels", deserialize_with = "one_or_many")]
    pub labels: Vec<String>,

    #[serde(default)]
    pub border_width: BorderWidth,

    #[serde(default)]
    pub max_selections: Option<usize>,

    /// Initial interaction status. Invalid values normalize to `free`.
    #[serde(default)]
    pub status: Status,

    #[serde(default)]
    pub scale_policy: ScalePolicy,
}

impl AnnotatorConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            input_method: InputMethod::default(),
            labels: default_labels(),
            border_width: BorderWidth::default(),
            max_selections: None,
            status: Status::Free,
            scale_policy: ScalePolicy::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, AnnotatorError> {
        let config = serde_json::from_str(json)?;
        log::debug!("annotator config: {config:?}");
        Ok(config)
    }

    pub fn with_input_method(mut self, method: &str) -> Self {
        self.input_method = InputMethod::new(method);
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_selections(mut self, max: usize) -> Self {
        self.max_selections = Some(max);
        self
    }
}

fn default_labels() -> Vec<String> {
    DEFAULT_LABELS.iter().map(|s| s.to_string()).collect()
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = AnnotatorConfig::from_json(r#"{"url":"cows.jpg"}"#).unwrap();
        assert_eq!(config, AnnotatorConfig::new("cows.jpg"));
        assert_eq!(config.labels, vec!["object".to_string()]);
        assert_eq!(config.border_width.px(), 2.0);
    }

    #[test]
    fn full_config() {
        let json = r#"{
            "url": "cows.jpg",
            "inputMethod": "select",
            "labels": ["Mama cow", "Baby cow"],
            "borderWidth": 4,
            "maxSelections": 3,
            "status": "input",
            "scalePolicy": "fit"
        }"#;
        let config = AnnotatorConfig::from_json(json).unwrap();
        let expected = AnnotatorConfig {
            border_width: BorderWidth::try_from(4).unwrap(),
            status: Status::Input,
            scale_policy: ScalePolicy::Fit,
            ..AnnotatorConfig::new("cows.jpg")
                .with_input_method("select")
                .with_labels(["Mama cow", "Baby cow"])
                .with_max_selections(3)
        };
        assert_eq!(config, expected);
    }

    #[test]
    fn single_label_string() {
        let config =
            AnnotatorConfig::from_json(r#"{"url":"a.png","labels":"Baby cow"}"#).unwrap();
        assert_eq!(config.labels, vec!["Baby cow".to_string()]);
    }

    #[test]
    fn invalid_status_is_normalized() {
        let config =
            AnnotatorConfig::from_json(r#"{"url":"a.png","status":"sleeping"}"#).unwrap();
        assert_eq!(config.status, Status::Free);
    }

    #[test]
    fn invalid_border_width_is_rejected() {
        let err = AnnotatorConfig::from_json(r#"{"url":"a.png","borderWidth":7}"#).unwrap_err();
        assert!(matches!(err, AnnotatorError::Config(_)));
        assert!(err.to_string().contains("border width"), "{err}");
    }

    #[test]
    fn unknown_input_method_is_accepted_until_rendered() {
        let config =
            AnnotatorConfig::from_json(r#"{"url":"a.png","inputMethod":"radio"}"#).unwrap();
        assert!(config.input_method.resolve().is_err());
    }
}
