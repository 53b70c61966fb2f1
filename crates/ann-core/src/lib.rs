pub mod config;
pub mod entries;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod id;
pub mod mask;
pub mod model;

pub use config::AnnotatorConfig;
pub use entries::{ChangeQueue, EntriesObserver, EntryList};
pub use error::AnnotatorError;
pub use geometry::{DisplayScale, Point, Rect, ScalePolicy, Size};
pub use id::EntryId;
pub use model::*;
