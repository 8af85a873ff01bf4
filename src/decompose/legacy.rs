//! Legacy dialect, for patches built against the older external.
//!
//! ```text
//! frame_start
//! frame  id timestamp hands
//! per hand: hand id frame fingers, 5 x finger, palm, ball
//! frame_end
//! ```
//!
//! No motion tracking and no serialization, whatever the settings say.

use super::{emit_hand_body, send, Decompose};
use crate::error::Result;
use crate::model::Frame;
use crate::protocol::Record;
use crate::sink::OutputSink;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacyDialect;

impl Decompose for LegacyDialect {
    fn decompose(
        &self,
        frame: &Frame,
        _previous: Option<&Frame>,
        sink: &mut dyn OutputSink,
    ) -> Result<()> {
        if !frame.is_valid() {
            return Ok(());
        }

        send(sink, Record::FrameStart)?;
        send(sink, Record::legacy_frame(frame))?;

        for hand in &frame.hands {
            send(sink, Record::legacy_hand(hand, frame.id))?;
            emit_hand_body(sink, hand, frame.id)?;
        }

        send(sink, Record::FrameEnd)
    }
}
