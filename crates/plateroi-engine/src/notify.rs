//! Presentation adapter for rejected region operations.
//!
//! The engine only returns errors. Something on the UI side has to turn them
//! into a transient warning and reset the grid highlight; that something
//! implements [`RegionErrorSink`]. [`NotificationQueue`] is a bounded,
//! in-memory sink that records both effects for a renderer (or a test) to
//! drain.

use std::collections::VecDeque;

use crate::error::{RegionOpError, RegionOpErrorKind};

/// Receives the side effects of a rejected operation.
pub trait RegionErrorSink {
    /// Show a transient warning for `labware`.
    fn warn(&mut self, labware: &str, error: &RegionOpError);
    /// Drop any visual selection highlight on `labware`'s grid.
    fn clear_highlight(&mut self, labware: &str);
}

/// Ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RegionErrorSink for NullSink {
    fn warn(&mut self, _labware: &str, _error: &RegionOpError) {}
    fn clear_highlight(&mut self, _labware: &str) {}
}

/// Warn and clear the highlight, in that order.
pub fn report_failure(sink: &mut dyn RegionErrorSink, labware: &str, error: &RegionOpError) {
    sink.warn(labware, error);
    sink.clear_highlight(labware);
}

/// A queued warning.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Notification {
    /// Monotonic sequence number, unique per queue.
    pub seq: u64,
    pub labware: String,
    pub kind: RegionOpErrorKind,
    pub message: String,
}

/// Bounded FIFO of warnings plus the highlight resets requested.
///
/// When full, the oldest warning is dropped. With `dedupe_consecutive`, a
/// warning identical (labware and kind) to the newest queued one is not
/// queued again.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    capacity: usize,
    dedupe_consecutive: bool,
    next_seq: u64,
    pending: VecDeque<Notification>,
    cleared: Vec<String>,
    dropped: u64,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(32, true)
    }
}

impl NotificationQueue {
    /// `capacity` is clamped to at least 1.
    #[must_use]
    pub fn new(capacity: usize, dedupe_consecutive: bool) -> Self {
        Self {
            capacity: capacity.max(1),
            dedupe_consecutive,
            next_seq: 0,
            pending: VecDeque::new(),
            cleared: Vec::new(),
            dropped: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.pending.iter()
    }

    /// Take all queued warnings, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }

    /// Labware whose highlight was cleared, in request order.
    #[must_use]
    pub fn cleared_highlights(&self) -> &[String] {
        &self.cleared
    }

    /// Warnings evicted because the queue was full.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl RegionErrorSink for NotificationQueue {
    fn warn(&mut self, labware: &str, error: &RegionOpError) {
        let kind = error.kind();
        if self.dedupe_consecutive
            && self
                .pending
                .back()
                .is_some_and(|n| n.labware == labware && n.kind == kind)
        {
            return;
        }
        if self.pending.len() == self.capacity {
            self.pending.pop_front();
            self.dropped += 1;
        }
        self.pending.push_back(Notification {
            seq: self.next_seq,
            labware: labware.to_string(),
            kind,
            message: error.message(),
        });
        self.next_seq += 1;
    }

    fn clear_highlight(&mut self, labware: &str) {
        self.cleared.push(labware.to_string());
    }
}
