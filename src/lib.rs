//! # leap-bridge
//!
//! Bridge from a Leap Motion hand-tracking sensor to typed output records.
//!
//! Each poll fetches the newest frame (or every frame since the last poll),
//! decomposes it into an ordered sequence of records (frame, hands,
//! fingers, palm, ball, optional motion tracking) and publishes the two
//! stereo IR images. Frames can also travel as fixed-size serialized
//! envelopes and be decomposed again elsewhere.
//!
//! ## Architecture
//!
//! - **Source** ([`source`]): the sensor SDK seam, frames with history
//! - **Decompose** ([`decompose`]): native and legacy record dialects
//! - **Protocol** ([`protocol`]): record shapes, channels, envelopes
//! - **Sink** ([`sink`]): where records go (collecting, tokio channel)
//! - **Controller** ([`PollController`]): the poll state machine
//!
//! ## Example
//!
//! ```
//! use leap_bridge::model::{Frame, Hand, Handedness};
//! use leap_bridge::sink::CollectingSink;
//! use leap_bridge::source::RecordedSource;
//! use leap_bridge::BridgeBuilder;
//!
//! let mut source = RecordedSource::new();
//! source.push(Frame::new(42, 1000).with_hand(Hand::new(1, 42, Handedness::Right)));
//!
//! let mut bridge = BridgeBuilder::new(source).motion_tracking(true).build();
//! let mut sink = CollectingSink::new();
//! bridge.poll(&mut sink).unwrap();
//!
//! assert_eq!(sink.count("frame_end"), 1);
//! assert_eq!(sink.count("finger"), 5);
//! ```

pub mod codec;
pub mod control;
pub mod decompose;
pub mod error;
pub mod images;
pub mod model;
pub mod protocol;
pub mod sink;
pub mod source;

mod controller;

pub use control::BridgeConfig;
pub use controller::{BridgeBuilder, PollController, PollOutcome, PollState};
pub use error::{BridgeError, Result};
