//! Native dialect.
//!
//! Per valid frame:
//! ```text
//! [serialized_frame]                               (message, if enabled and it fits)
//! frame  id timestamp hands frontmost
//! [probability, rotate, scale, position]           (tracking, if enabled)
//! per hand: hand, 5 x finger, palm, ball
//! frame_end
//! ```

use super::{emit_hand_body, send, Decompose};
use crate::codec::FrameCodec;
use crate::error::{BridgeError, Result};
use crate::model::{Frame, MotionDelta};
use crate::protocol::Record;
use crate::sink::OutputSink;

/// Full-detail record layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeDialect {
    /// Emit the four motion-tracking records after the frame record.
    pub motion_tracking: bool,
    /// Emit a `serialized_frame` envelope before the frame record.
    pub serialize: bool,
}

impl NativeDialect {
    pub fn new(motion_tracking: bool, serialize: bool) -> Self {
        Self {
            motion_tracking,
            serialize,
        }
    }

    fn emit_serialized(&self, frame: &Frame, sink: &mut dyn OutputSink) -> Result<()> {
        match FrameCodec::encode(frame) {
            Ok(serialized) => send(sink, Record::SerializedFrame(serialized)),
            Err(BridgeError::FrameTooLarge { len, max }) => {
                tracing::debug!(
                    "Frame {} encodes to {} bytes (max {}), not serialized",
                    frame.id,
                    len,
                    max
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

impl Decompose for NativeDialect {
    fn decompose(
        &self,
        frame: &Frame,
        previous: Option<&Frame>,
        sink: &mut dyn OutputSink,
    ) -> Result<()> {
        if !frame.is_valid() {
            return Ok(());
        }

        if self.serialize {
            self.emit_serialized(frame, sink)?;
        }

        send(sink, Record::frame(frame))?;

        if self.motion_tracking {
            let delta = MotionDelta::between(previous, frame);
            for record in Record::motion(&delta) {
                send(sink, record)?;
            }
        }

        for hand in &frame.hands {
            send(sink, Record::hand(hand, frame.id))?;
            emit_hand_body(sink, hand, frame.id)?;
        }

        send(sink, Record::FrameEnd)
    }
}
