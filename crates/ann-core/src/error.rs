use thiserror::Error;

/// Errors surfaced to the host page.
///
/// Refused operations (adding past the cap, removing an unknown id) are not
/// errors; they show up as return values instead.
#[derive(Debug, Error)]
pub enum AnnotatorError {
    #[error("Invalid image URL: {url}")]
    ImageLoad { url: String },

    #[error("Invalid input method: {0}")]
    InvalidInputMethod(String),

    #[error("Invalid border width: {0} (expected 1, 2, 3 or 4)")]
    InvalidBorderWidth(u8),

    #[error("Invalid annotator config: {0}")]
    Config(#[from] serde_json::Error),
}
