//! Source module - the sensor side of the bridge.
//!
//! [`FrameSource`] is the seam to the vendor SDK: connection state, frame
//! history, the latest stereo images and policy flags. [`RecordedSource`]
//! is an in-memory implementation backed by a bounded history.

mod recorded;

pub use recorded::{RecordedSource, DEFAULT_HISTORY_LEN};

use crate::model::{Frame, ImageList};

/// Policy flag constants understood by the sensor.
pub mod policy {
    /// No optional behaviour.
    pub const DEFAULT: u32 = 0;
    /// Keep delivering frames while the host application is unfocused.
    pub const BACKGROUND_FRAMES: u32 = 0b0000_0001;
    /// Deliver raw IR images.
    pub const IMAGES: u32 = 0b0000_0010;
    /// Optimize tracking for a head-mounted sensor.
    pub const OPTIMIZE_HMD: u32 = 0b0000_0100;

    /// Check if a specific flag is set.
    #[inline]
    pub fn has_flag(flags: u32, flag: u32) -> bool {
        flags & flag != 0
    }
}

/// Receives connection notifications from a source.
///
/// Sources may call this from their own thread; implementations must not
/// touch poll state directly.
pub trait ConnectionListener: Send {
    fn on_connect(&self);
}

/// The sensor SDK as seen by the poll controller.
pub trait FrameSource {
    /// Whether the sensor service is connected.
    fn is_connected(&self) -> bool;

    /// Frame `history` steps back; `0` is the most recent frame.
    ///
    /// History the source no longer retains comes back as
    /// [`Frame::invalid`].
    fn frame(&self, history: usize) -> Frame;

    /// The most recent stereo images.
    fn images(&self) -> ImageList;

    /// How many frames of history the source currently holds.
    fn history_len(&self) -> usize;

    /// Apply policy flags (see [`policy`]).
    fn set_policy_flags(&mut self, flags: u32);

    /// Flags most recently applied.
    fn policy_flags(&self) -> u32;

    /// Register for connection notifications. Sources without connection
    /// events may ignore this.
    fn add_listener(&mut self, listener: Box<dyn ConnectionListener>) {
        let _ = listener;
    }
}
