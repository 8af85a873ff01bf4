//! Channel-backed sink for handing events to another task.
//!
//! ```text
//! PollController ─► ChannelSink ─► mpsc::Sender<Event> ─► consumer task
//! ```
//!
//! Polls are synchronous, so the sink never waits: a full channel is
//! reported as [`BridgeError::Backpressure`] and the cycle ends there.
//! Image buffers are snapshotted on emission; `Bytes` keeps that cheap for
//! the consumer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use super::{Event, OutputSink};
use crate::error::{BridgeError, Result};
use crate::images::ImageBuffer;
use crate::protocol::{Channel, Record};

/// Default channel capacity (events).
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Sink that forwards events over a bounded tokio channel.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Event>,
    /// Events dropped because the channel was full.
    dropped: Arc<AtomicUsize>,
}

impl ChannelSink {
    /// Create a sink and the receiver its events arrive on.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(capacity);
        let sink = Self {
            tx,
            dropped: Arc::new(AtomicUsize::new(0)),
        };
        (sink, rx)
    }

    /// Create a sink with [`DEFAULT_CHANNEL_CAPACITY`].
    pub fn with_default_capacity() -> (Self, mpsc::Receiver<Event>) {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Number of events rejected because the channel was full.
    #[inline]
    pub fn dropped_count(&self) -> usize {
        self.dropped.load(Ordering::Acquire)
    }

    fn send(&self, event: Event) -> Result<()> {
        self.tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                self.dropped.fetch_add(1, Ordering::AcqRel);
                BridgeError::Backpressure
            }
            mpsc::error::TrySendError::Closed(_) => BridgeError::ChannelClosed,
        })
    }
}

impl OutputSink for ChannelSink {
    fn emit(&mut self, channel: Channel, record: Record) -> Result<()> {
        self.send(Event::Record { channel, record })
    }

    fn emit_image(&mut self, channel: Channel, buffer: &ImageBuffer) -> Result<()> {
        self.send(Event::Image {
            channel,
            image: buffer.snapshot(),
        })
    }
}
