//! Selection-count bookkeeping for host feedback.
//!
//! Tracks how many entries exist against the configured maximum, how many
//! drags were ever started, and a short record of each drag. None of this
//! is authoritative: the entry list decides what is committed. The tracker
//! exists so a host page can render a "limit reached" banner and, if it
//! wants, mirror the numbers somewhere for debugging through a
//! `SelectionObserver`.

use ann_core::Rect;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStatus {
    Started,
    Ended,
}

/// One drag gesture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionRecord {
    /// 1-based sequence number of the drag.
    pub id: usize,
    pub rectangle: Rect,
    /// Host clock, milliseconds since the epoch.
    pub timestamp: f64,
    pub status: SelectionStatus,
}

/// Bookkeeping as handed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSnapshot<'a> {
    pub active_selection: usize,
    pub total_selections: usize,
    pub selections: &'a [SelectionRecord],
}

/// Receives bookkeeping updates. The browser bridge mirrors them into
/// local storage.
pub trait SelectionObserver {
    fn selecting_changed(&mut self, selecting: bool);
    fn bookkeeping_changed(&mut self, snapshot: &SelectionSnapshot<'_>);
}

#[derive(Default)]
pub struct SelectionTracker {
    is_selecting: bool,
    active: usize,
    total: usize,
    records: Vec<SelectionRecord>,
    max: Option<usize>,
    observer: Option<Box<dyn SelectionObserver>>,
}

impl SelectionTracker {
    pub fn new(max: Option<usize>) -> Self {
        Self {
            max,
            ..Self::default()
        }
    }

    pub fn set_observer(&mut self, observer: impl SelectionObserver + 'static) {
        self.observer = Some(Box::new(observer));
        self.publish_selecting();
        self.publish_bookkeeping();
    }

    pub fn is_selecting(&self) -> bool {
        self.is_selecting
    }

    /// Number of committed entries.
    pub fn active(&self) -> usize {
        self.active
    }

    /// Number of drags ever started.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }

    pub fn records(&self) -> &[SelectionRecord] {
        &self.records
    }

    pub fn can_add(&self) -> bool {
        self.max.is_none_or(|max| self.active < max)
    }

    /// Banner text once a capped widget is full.
    pub fn limit_message(&self) -> Option<String> {
        match self.max {
            Some(max) if !self.can_add() => {
                Some(format!("Selection limit reached ({}/{max})", self.active))
            }
            _ => None,
        }
    }

    /// A drag started at `rect`.
    pub fn begin(&mut self, rect: Rect, timestamp: f64) {
        self.total += 1;
        self.records.push(SelectionRecord {
            id: self.total,
            rectangle: rect,
            timestamp,
            status: SelectionStatus::Started,
        });
        self.set_selecting(true);
        self.publish_bookkeeping();
    }

    /// The current drag was released with final geometry `rect`.
    pub fn end(&mut self, rect: Rect, timestamp: f64) {
        if let Some(record) = self
            .records
            .iter_mut()
            .rev()
            .find(|r| r.status == SelectionStatus::Started)
        {
            record.rectangle = rect;
            record.timestamp = timestamp;
            record.status = SelectionStatus::Ended;
        }
        self.set_selecting(false);
        self.publish_bookkeeping();
    }

    /// A drag was abandoned (reset mid-gesture).
    pub fn cancel(&mut self) {
        self.set_selecting(false);
    }

    /// Sync the committed entry count.
    pub fn set_active(&mut self, count: usize) {
        if self.active != count {
            self.active = count;
            self.publish_bookkeeping();
        }
    }

    fn set_selecting(&mut self, selecting: bool) {
        if self.is_selecting != selecting {
            self.is_selecting = selecting;
            self.publish_selecting();
        }
    }

    fn publish_selecting(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.selecting_changed(self.is_selecting);
        }
    }

    fn publish_bookkeeping(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.bookkeeping_changed(&SelectionSnapshot {
                active_selection: self.active,
                total_selections: self.total,
                selections: &self.records,
            });
        }
    }
}
