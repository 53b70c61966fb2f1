//! Entry list manager.
//!
//! `EntryList` is the single source of truth for the committed rectangles of
//! one mounted widget. Every committed change pushes the *full* rescaled list
//! to the observer, never a delta, so the consumer can treat each callback as
//! the new authoritative snapshot. Hover changes are presentation-only and
//! are not reported.

use crate::geometry::Rect;
use crate::id::EntryId;
use crate::model::{AddOutcome, Entry, EntryMutation, EntryValue};
use std::cell::RefCell;
use std::rc::Rc;

/// Receives the full natural-space entry list after every committed change.
pub trait EntriesObserver {
    fn entries_changed(&mut self, entries: &[EntryValue]);
}

impl<F: FnMut(&[EntryValue])> EntriesObserver for F {
    fn entries_changed(&mut self, entries: &[EntryValue]) {
        self(entries)
    }
}

/// Observer that only records snapshots. The owner drains them once it no
/// longer holds the engine, so the real consumer is free to read widget
/// state back while handling a change.
#[derive(Debug, Clone, Default)]
pub struct ChangeQueue(Rc<RefCell<Vec<Vec<EntryValue>>>>);

impl ChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued snapshot, oldest first.
    pub fn drain(&self) -> Vec<Vec<EntryValue>> {
        self.0.take()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl EntriesObserver for ChangeQueue {
    fn entries_changed(&mut self, entries: &[EntryValue]) {
        self.0.borrow_mut().push(entries.to_vec());
    }
}

pub struct EntryList {
    entries: Vec<Entry>,
    /// natural / display; applied when emitting.
    multiplier: f64,
    max: Option<usize>,
    observer: Option<Box<dyn EntriesObserver>>,
}

impl std::fmt::Debug for EntryList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryList")
            .field("entries", &self.entries)
            .field("multiplier", &self.multiplier)
            .field("max", &self.max)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

impl Default for EntryList {
    fn default() -> Self {
        Self::new(None)
    }
}

impl EntryList {
    pub fn new(max: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            multiplier: 1.0,
            max,
            observer: None,
        }
    }

    pub fn set_observer(&mut self, observer: impl EntriesObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Update the display → natural ratio. Takes effect on the next
    /// notification; the consumer is not renotified.
    pub fn set_multiplier(&mut self, multiplier: f64) {
        self.multiplier = multiplier;
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// False once the configured maximum is reached.
    pub fn can_add(&self) -> bool {
        self.max.is_none_or(|max| self.entries.len() < max)
    }

    /// Display-space entries, in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Commit a new entry. Refused silently when the list is full.
    pub fn add(&mut self, rect: Rect, label: impl Into<String>) -> AddOutcome {
        if !self.can_add() {
            log::warn!(
                "entry refused: limit of {} reached",
                self.max.unwrap_or_default()
            );
            return AddOutcome::LimitReached;
        }
        let entry = Entry::new(rect, label);
        let id = entry.id;
        log::debug!("add {id} {:?} label={:?}", entry.rect, entry.label);
        self.entries.push(entry);
        self.notify();
        AddOutcome::Added(id)
    }

    /// Remove an entry by id. Unknown ids are ignored, but the consumer is
    /// still handed the current snapshot. Returns whether anything was removed.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() != before;
        log::debug!("remove {id} (found: {removed})");
        self.notify();
        removed
    }

    /// Toggle the close button of one entry. Not reported to the observer.
    pub fn set_hover(&mut self, id: EntryId, show: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) if entry.show_close_button != show => {
                entry.show_close_button = show;
                true
            }
            _ => false,
        }
    }

    /// Drop every entry and report the empty list.
    pub fn reset(&mut self) {
        self.entries.clear();
        log::debug!("entries reset");
        self.notify();
    }

    /// Apply a mutation produced by the interaction layer.
    /// Returns `true` if the list (or a hover flag) changed.
    pub fn apply_mutation(&mut self, mutation: EntryMutation) -> bool {
        match mutation {
            EntryMutation::Add { rect, label } => self.add(rect, label).added().is_some(),
            EntryMutation::Remove { id } => self.remove(id),
            EntryMutation::Hover { id, show } => self.set_hover(id, show),
            EntryMutation::Clear => {
                let had_entries = !self.entries.is_empty();
                self.reset();
                had_entries
            }
        }
    }

    /// The list as the consumer sees it.
    pub fn snapshot(&self) -> Vec<EntryValue> {
        self.entries
            .iter()
            .map(|e| e.rescaled(self.multiplier))
            .collect()
    }

    /// Hand the observer the current list again without changing it.
    pub fn renotify(&mut self) {
        self.notify();
    }

    fn notify(&mut self) {
        if self.observer.is_none() {
            return;
        }
        let snapshot = self.snapshot();
        if let Some(observer) = self.observer.as_mut() {
            observer.entries_changed(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording(list: &mut EntryList) -> Rc<RefCell<Vec<Vec<EntryValue>>>> {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        list.set_observer(move |entries: &[EntryValue]| sink.borrow_mut().push(entries.to_vec()));
        calls
    }

    #[test]
    fn hover_toggles_without_notifying() {
        let mut list = EntryList::new(None);
        let calls = recording(&mut list);
        let id = list.add(Rect::new(0.0, 0.0, 5.0, 5.0), "a").added().unwrap();
        assert_eq!(calls.borrow().len(), 1);

        assert!(list.set_hover(id, true));
        assert!(list.get(id).unwrap().show_close_button);
        assert!(!list.set_hover(id, true), "no change the second time");
        assert!(list.set_hover(id, false));
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn hover_on_unknown_id_is_ignored() {
        let mut list = EntryList::new(None);
        assert!(!list.set_hover(EntryId::intern("ghost"), true));
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let mut list = EntryList::new(None);
        list.add(Rect::new(0.0, 0.0, 1.0, 1.0), "first");
        list.add(Rect::new(5.0, 5.0, 1.0, 1.0), "second");
        list.add(Rect::new(2.0, 2.0, 1.0, 1.0), "third");
        let labels: Vec<_> = list.snapshot().into_iter().map(|v| v.label).collect();
        assert_eq!(labels, ["first", "second", "third"]);
    }

    #[test]
    fn renotify_repeats_current_list() {
        let mut list = EntryList::new(None);
        let calls = recording(&mut list);
        list.add(Rect::new(1.0, 1.0, 2.0, 2.0), "a");
        list.renotify();
        let calls = calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }

    #[test]
    fn queue_defers_snapshots_until_drained() {
        let queue = ChangeQueue::new();
        let mut list = EntryList::new(None);
        list.set_observer(queue.clone());
        list.add(Rect::new(0.0, 0.0, 1.0, 1.0), "a");
        list.reset();

        let batch = queue.drain();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0][0].label, "a");
        assert!(batch[1].is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn clear_mutation_reports_whether_anything_was_dropped() {
        let mut list = EntryList::new(None);
        assert!(!list.apply_mutation(EntryMutation::Clear));
        list.add(Rect::new(0.0, 0.0, 1.0, 1.0), "x");
        assert!(list.apply_mutation(EntryMutation::Clear));
        assert!(list.is_empty());
    }
}
