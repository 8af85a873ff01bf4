//! Frame decomposition - one frame in, an ordered record sequence out.
//!
//! Two dialects share the [`Decompose`] capability:
//! - [`NativeDialect`] - full records, optional motion tracking and serialization
//! - [`LegacyDialect`] - the reduced `frame_start`-framed layout older patches expect
//!
//! Both emit nothing at all for an invalid frame.
//!
//! # Example
//!
//! ```
//! use leap_bridge::decompose::{Decompose, NativeDialect};
//! use leap_bridge::model::Frame;
//! use leap_bridge::sink::CollectingSink;
//!
//! let mut sink = CollectingSink::new();
//! NativeDialect::default()
//!     .decompose(&Frame::new(42, 1000), None, &mut sink)
//!     .unwrap();
//! assert_eq!(sink.selectors(), vec!["frame", "frame_end"]);
//! ```

mod legacy;
mod native;

pub use legacy::LegacyDialect;
pub use native::NativeDialect;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Frame, Hand};
use crate::protocol::Record;
use crate::sink::OutputSink;

/// Output record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Native,
    Legacy,
}

/// Turns one frame into records on a sink.
pub trait Decompose {
    /// Emit the record sequence for `frame`.
    ///
    /// `previous` is the frame retained from the last poll, used for motion
    /// deltas. Only sink failures are returned.
    fn decompose(
        &self,
        frame: &Frame,
        previous: Option<&Frame>,
        sink: &mut dyn OutputSink,
    ) -> Result<()>;
}

/// Emit a record on the channel its kind belongs to.
#[inline]
pub(crate) fn send(sink: &mut dyn OutputSink, record: Record) -> Result<()> {
    sink.emit(record.channel(), record)
}

/// Emit the five finger slots, palm and ball of one hand.
pub(crate) fn emit_hand_body(sink: &mut dyn OutputSink, hand: &Hand, frame_id: i64) -> Result<()> {
    for finger in hand.finger_slots() {
        send(sink, Record::finger(&finger, hand.id, frame_id))?;
    }
    send(sink, Record::palm(hand, frame_id))?;
    send(sink, Record::ball(hand, frame_id))
}
