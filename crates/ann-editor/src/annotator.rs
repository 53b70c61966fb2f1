//! The annotator engine: one mounted widget's worth of state.
//!
//! Owns the interaction controller, the entry list, selection bookkeeping,
//! and the current display scale. Host bridges (browser, replay CLI) feed
//! it events and read back what to draw; the engine itself never touches
//! the DOM.

use crate::controller::Controller;
use crate::input::InputEvent;
use crate::selection::{SelectionObserver, SelectionTracker};
use ann_core::geometry::{effective_max_width, scale_dimensions};
use ann_core::hit::{close_button_at, entry_at};
use ann_core::mask::mask_svg;
use ann_core::{
    AnnotatorConfig, AnnotatorError, DisplayScale, EntriesObserver, EntryId, EntryList,
    EntryMutation, LabelMode, Point, Rect, Size, Status,
};
use serde::Serialize;

/// The label input to show while a finished drag awaits its label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LabelControl {
    /// No labeling step configured.
    None,
    /// Free-text input anchored at `position`.
    Text { position: Point },
    /// Drop-down of `options` anchored at `position`.
    Select {
        position: Point,
        options: Vec<String>,
    },
}

pub struct Annotator {
    config: AnnotatorConfig,
    controller: Controller,
    entries: EntryList,
    selection: SelectionTracker,
    scale: DisplayScale,
    /// Natural size of the loaded image, kept to refit on resize.
    natural: Option<Size>,
}

impl Annotator {
    pub fn new(config: AnnotatorConfig) -> Self {
        let controller = Controller::new(config.status, config.input_method.requires_label());
        let entries = EntryList::new(config.max_selections);
        let selection = SelectionTracker::new(config.max_selections);
        Self {
            config,
            controller,
            entries,
            selection,
            scale: DisplayScale::UNLOADED,
            natural: None,
        }
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Register the consumer's change callback.
    pub fn set_entries_observer(&mut self, observer: impl EntriesObserver + 'static) {
        self.entries.set_observer(observer);
    }

    pub fn set_selection_observer(&mut self, observer: impl SelectionObserver + 'static) {
        self.selection.set_observer(observer);
    }

    // ─── Image geometry ──────────────────────────────────────────────────

    /// The image finished loading at `natural` size inside a container
    /// `container_width` wide (`None` if not laid out yet).
    pub fn image_loaded(&mut self, natural: Size, container_width: Option<f64>) -> DisplayScale {
        self.natural = Some(natural);
        self.refit(container_width)
    }

    /// The container changed size. Refits the image if it has loaded.
    pub fn container_resized(&mut self, container_width: Option<f64>) -> Option<DisplayScale> {
        self.natural?;
        Some(self.refit(container_width))
    }

    /// Error to raise when the image could not be loaded.
    pub fn image_error(&self) -> AnnotatorError {
        log::error!("image failed to load: {}", self.config.url);
        AnnotatorError::ImageLoad {
            url: self.config.url.clone(),
        }
    }

    /// Page offset of the container's top-left corner.
    pub fn set_container_origin(&mut self, origin: Point) {
        self.controller.frame.origin = origin;
    }

    pub fn scale(&self) -> DisplayScale {
        self.scale
    }

    /// Page coordinates to display coordinates, without clamping.
    pub fn to_local(&self, page: Point) -> Point {
        let origin = self.controller.frame.origin;
        Point::new(page.x - origin.x, page.y - origin.y)
    }

    fn refit(&mut self, container_width: Option<f64>) -> DisplayScale {
        let Some(natural) = self.natural else {
            return self.scale;
        };
        let max_width = effective_max_width(container_width);
        let scale = scale_dimensions(natural, max_width, self.config.scale_policy);
        log::debug!(
            "fit {}x{} into {max_width}: multiplier={} display={}x{}",
            natural.width,
            natural.height,
            scale.multiplier,
            scale.display.width,
            scale.display.height
        );
        self.scale = scale;
        self.entries.set_multiplier(scale.multiplier);
        self.controller.frame.display = Some(scale.display);
        scale
    }

    // ─── Interaction ─────────────────────────────────────────────────────

    /// Feed a pointer event. `timestamp` is the host clock in milliseconds.
    /// Returns `true` if anything visible changed.
    pub fn handle(&mut self, event: &InputEvent, timestamp: f64) -> bool {
        let before = self.controller.status();
        let rect_before = self.controller.live_rect();
        let mutations = self.controller.handle(event, self.entries.can_add());
        let after = self.controller.status();

        match event {
            InputEvent::PointerDown { .. } if after == Status::Hold && before != Status::Hold => {
                self.selection.begin(self.controller.live_rect(), timestamp);
            }
            InputEvent::PointerUp { .. } if before == Status::Hold => {
                let final_rect = mutations
                    .iter()
                    .find_map(|m| match m {
                        EntryMutation::Add { rect, .. } => Some(*rect),
                        _ => None,
                    })
                    .unwrap_or_else(|| self.controller.live_rect());
                self.selection.end(final_rect, timestamp);
            }
            _ => {}
        }

        let applied = self.apply_mutations(mutations);
        applied || before != after || rect_before != self.controller.live_rect()
    }

    /// Submit the label for the pending rectangle. Returns `true` if an
    /// entry was committed.
    pub fn submit_label(&mut self, label: &str) -> bool {
        let mutations = self.controller.submit_label(label);
        self.apply_mutations(mutations)
    }

    /// Show or hide the close button of one entry.
    pub fn hover(&mut self, id: EntryId, show: bool) -> bool {
        self.entries.apply_mutation(EntryMutation::Hover { id, show })
    }

    /// Update hover flags for a pointer at page position `page`: the entry
    /// under it (or whose close button is under it) shows its button, every
    /// other entry hides it.
    pub fn hover_at(&mut self, page: Point) -> bool {
        let p = self.to_local(page);
        let list = self.entries.entries();
        let target = close_button_at(list, p.x, p.y).or_else(|| entry_at(list, p.x, p.y));
        let updates: Vec<EntryMutation> = list
            .iter()
            .map(|e| EntryMutation::Hover {
                id: e.id,
                show: Some(e.id) == target,
            })
            .collect();
        updates
            .into_iter()
            .fold(false, |changed, m| self.entries.apply_mutation(m) || changed)
    }

    /// Click at page position `page`: a visible close button removes its
    /// entry. Returns the removed id.
    pub fn click_at(&mut self, page: Point) -> Option<EntryId> {
        let p = self.to_local(page);
        let id = close_button_at(self.entries.entries(), p.x, p.y)?;
        self.remove(id);
        Some(id)
    }

    /// Remove an entry. Unknown ids are ignored.
    pub fn remove(&mut self, id: EntryId) -> bool {
        self.apply_mutations(vec![EntryMutation::Remove { id }])
    }

    /// Remove the entry whose id the host passed back as a string. An id
    /// this widget never issued is not interned; the consumer is still
    /// handed the unchanged list.
    pub fn remove_named(&mut self, id: &str) -> bool {
        match EntryId::lookup(id) {
            Some(id) => self.remove(id),
            None => {
                log::debug!("remove {id:?}: unknown id");
                self.entries.renotify();
                false
            }
        }
    }

    /// Clear every entry and any drag in progress.
    pub fn reset(&mut self) {
        if self.selection.is_selecting() {
            self.selection.cancel();
        }
        self.controller.reset();
        self.apply_mutations(vec![EntryMutation::Clear]);
    }

    fn apply_mutations(&mut self, mutations: Vec<EntryMutation>) -> bool {
        let mut changed = false;
        for m in mutations {
            changed |= self.entries.apply_mutation(m);
        }
        self.selection.set_active(self.entries.len());
        changed
    }

    // ─── Read-back ───────────────────────────────────────────────────────

    pub fn status(&self) -> Status {
        self.controller.status()
    }

    /// Selection outline while dragging or awaiting a label.
    pub fn live_rect(&self) -> Option<Rect> {
        matches!(self.status(), Status::Hold | Status::Input).then(|| self.controller.live_rect())
    }

    pub fn entries(&self) -> &EntryList {
        &self.entries
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// Whether another entry may still be added.
    pub fn can_add(&self) -> bool {
        self.entries.can_add()
    }

    /// Current entry count and configured maximum.
    pub fn counts(&self) -> (usize, Option<usize>) {
        (self.entries.len(), self.entries.max())
    }

    pub fn limit_message(&self) -> Option<String> {
        self.selection.limit_message()
    }

    /// The label control to render, if a label is awaited.
    ///
    /// # Errors
    /// `InvalidInputMethod` when the configured method is not recognized.
    pub fn label_control(&self) -> Result<Option<LabelControl>, AnnotatorError> {
        if self.status() != Status::Input {
            return Ok(None);
        }
        let position = self.controller.live_rect().bottom_center();
        let control = match self.config.input_method.resolve()? {
            LabelMode::None => LabelControl::None,
            LabelMode::Text => LabelControl::Text { position },
            LabelMode::Select => LabelControl::Select {
                position,
                options: self.config.labels.clone(),
            },
        };
        Ok(Some(control))
    }

    /// Highlight mask over the committed entries.
    pub fn mask_svg(&self) -> Option<String> {
        mask_svg(
            self.entries.entries().iter().map(|e| &e.rect),
            self.scale.display,
        )
    }
}
