//! In-memory frame source.
//!
//! Holds a bounded history of frames, newest first, the way the sensor
//! service does. Useful for replaying captured sessions and for tests.
//!
//! # Example
//!
//! ```
//! use leap_bridge::model::Frame;
//! use leap_bridge::source::{FrameSource, RecordedSource};
//!
//! let mut source = RecordedSource::new();
//! source.push(Frame::new(1, 0));
//! source.push(Frame::new(2, 16_000));
//!
//! assert_eq!(source.frame(0).id, 2);
//! assert_eq!(source.frame(1).id, 1);
//! assert!(!source.frame(2).is_valid());
//! ```

use std::collections::VecDeque;

use super::{ConnectionListener, FrameSource};
use crate::model::{Frame, ImageList};

/// History depth kept by default (matches the sensor service).
pub const DEFAULT_HISTORY_LEN: usize = 60;

/// Frame source backed by an in-memory history ring.
pub struct RecordedSource {
    history: VecDeque<Frame>,
    capacity: usize,
    connected: bool,
    flags: u32,
    /// Every flag set applied, oldest first.
    applied: Vec<u32>,
    listeners: Vec<Box<dyn ConnectionListener>>,
}

impl RecordedSource {
    /// Connected source with [`DEFAULT_HISTORY_LEN`] history.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_LEN)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            connected: true,
            flags: super::policy::DEFAULT,
            applied: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Record a new most-recent frame, evicting the oldest beyond capacity.
    pub fn push(&mut self, frame: Frame) {
        self.history.push_front(frame);
        self.history.truncate(self.capacity);
    }

    /// Change connection state. A transition to connected notifies listeners.
    pub fn set_connected(&mut self, connected: bool) {
        let was = self.connected;
        self.connected = connected;
        if connected && !was {
            for listener in &self.listeners {
                listener.on_connect();
            }
        }
    }

    /// Policy flag sets applied so far, oldest first.
    pub fn applied_policies(&self) -> &[u32] {
        &self.applied
    }

    /// Most frames the history can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Default for RecordedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for RecordedSource {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn frame(&self, history: usize) -> Frame {
        self.history.get(history).cloned().unwrap_or_default()
    }

    fn images(&self) -> ImageList {
        self.history
            .front()
            .map(|f| f.images.clone())
            .unwrap_or_default()
    }

    fn history_len(&self) -> usize {
        self.history.len()
    }

    fn set_policy_flags(&mut self, flags: u32) {
        self.flags = flags;
        self.applied.push(flags);
    }

    fn policy_flags(&self) -> u32 {
        self.flags
    }

    fn add_listener(&mut self, listener: Box<dyn ConnectionListener>) {
        self.listeners.push(listener);
    }
}
