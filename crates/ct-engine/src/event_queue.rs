//! Start-ordered queue of pending voices.

use crate::event::VoiceEvent;

/// Voice events sorted by start time.
///
/// During rendering, events are consumed via a cursor that advances
/// forward without removing elements, so the drain path does not allocate.
/// [`compact`](Self::compact) later drops consumed events in place.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Vec<VoiceEvent>,
    /// Next event index to activate.
    cursor: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            cursor: 0,
        }
    }

    /// Create a queue with room for `capacity` pending events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            cursor: 0,
        }
    }

    /// Insert an event, keeping start order. Events with equal start times
    /// keep their insertion order. An event that is already due goes
    /// right at the cursor so it is activated next.
    pub fn push(&mut self, event: VoiceEvent) {
        let pos = self
            .events
            .partition_point(|e| e.start <= event.start)
            .max(self.cursor);
        self.events.insert(pos, event);
    }

    /// Return the index range of events starting at or before `time`
    /// (cursor-based, zero allocation).
    pub fn drain_until(&mut self, time: f64) -> core::ops::Range<usize> {
        let start = self.cursor;
        while self.cursor < self.events.len() && self.events[self.cursor].start <= time {
            self.cursor += 1;
        }
        start..self.cursor
    }

    /// Get an event by index (for use with `drain_until` ranges).
    pub fn get(&self, index: usize) -> Option<&VoiceEvent> {
        self.events.get(index)
    }

    /// Drop consumed events. Shifts in place; does not allocate.
    pub fn compact(&mut self) {
        self.events.drain(..self.cursor);
        self.cursor = 0;
    }

    /// Events not yet activated.
    pub fn pending(&self) -> usize {
        self.events.len() - self.cursor
    }

    /// Clear all events and reset cursor.
    pub fn clear(&mut self) {
        self.events.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
