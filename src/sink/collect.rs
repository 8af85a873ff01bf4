//! In-memory sink that keeps every event in emission order.

use super::{Event, OutputSink};
use crate::error::Result;
use crate::images::{ImageBuffer, ImageSnapshot};
use crate::protocol::{Channel, Record};

/// Sink that records everything it is given.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Vec<Event>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in emission order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// All records in emission order, across channels.
    pub fn records(&self) -> Vec<&Record> {
        self.events.iter().filter_map(Event::record).collect()
    }

    /// Records emitted on one channel.
    pub fn records_on(&self, channel: Channel) -> Vec<&Record> {
        self.events
            .iter()
            .filter(|e| e.channel() == channel)
            .filter_map(Event::record)
            .collect()
    }

    /// Selectors of all records, in emission order.
    pub fn selectors(&self) -> Vec<&'static str> {
        self.records().into_iter().map(Record::selector).collect()
    }

    /// Images emitted, with their channel.
    pub fn images(&self) -> Vec<(Channel, &ImageSnapshot)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Image { channel, image } => Some((*channel, image)),
                Event::Record { .. } => None,
            })
            .collect()
    }

    /// Number of records with the given selector.
    pub fn count(&self, selector: &str) -> usize {
        self.records().iter().filter(|r| r.selector() == selector).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl OutputSink for CollectingSink {
    fn emit(&mut self, channel: Channel, record: Record) -> Result<()> {
        self.events.push(Event::Record { channel, record });
        Ok(())
    }

    fn emit_image(&mut self, channel: Channel, buffer: &ImageBuffer) -> Result<()> {
        self.events.push(Event::Image {
            channel,
            image: buffer.snapshot(),
        });
        Ok(())
    }
}
