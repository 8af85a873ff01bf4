//! Output sinks - where decomposed records and image buffers go.
//!
//! The host's outlets are abstracted as an [`OutputSink`]. Two sinks ship
//! with the crate:
//! - [`CollectingSink`] - keeps every event in order, in memory
//! - [`ChannelSink`] - forwards events over a bounded tokio channel
//!
//! # Example
//!
//! ```
//! use leap_bridge::protocol::{Channel, Record};
//! use leap_bridge::sink::{CollectingSink, OutputSink};
//!
//! let mut sink = CollectingSink::new();
//! sink.emit(Channel::Message, Record::Connected(true)).unwrap();
//! assert_eq!(sink.selectors(), vec!["connected"]);
//! ```

mod channel;
mod collect;

pub use channel::{ChannelSink, DEFAULT_CHANNEL_CAPACITY};
pub use collect::CollectingSink;

use crate::error::Result;
use crate::images::{ImageBuffer, ImageSnapshot};
use crate::protocol::{Channel, Record};

/// Typed multi-channel emission surface.
pub trait OutputSink {
    /// Emit one record on a channel.
    fn emit(&mut self, channel: Channel, record: Record) -> Result<()>;

    /// Publish an image buffer on an image channel.
    ///
    /// The buffer is borrowed; it is overwritten in place by the next poll.
    fn emit_image(&mut self, channel: Channel, buffer: &ImageBuffer) -> Result<()>;
}

/// One emitted item, as seen by sinks that store or forward events.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Record { channel: Channel, record: Record },
    Image { channel: Channel, image: ImageSnapshot },
}

impl Event {
    pub fn channel(&self) -> Channel {
        match self {
            Event::Record { channel, .. } | Event::Image { channel, .. } => *channel,
        }
    }

    pub fn record(&self) -> Option<&Record> {
        match self {
            Event::Record { record, .. } => Some(record),
            Event::Image { .. } => None,
        }
    }
}
