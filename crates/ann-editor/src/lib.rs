pub mod annotator;
pub mod controller;
pub mod input;
pub mod selection;

pub use annotator::{Annotator, LabelControl};
pub use controller::{Controller, Frame, label_requested};
pub use input::{InputEvent, PointerButton};
pub use selection::{SelectionObserver, SelectionSnapshot, SelectionTracker};
