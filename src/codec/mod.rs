//! Codec module - serialization of frames for the serialized-frame outlet.
//!
//! - [`MsgPackCodec`] - MessagePack using `rmp-serde` (`to_vec_named`)
//! - [`FrameCodec`] - bounded frame encoding into a [`SerializedFrame`](crate::protocol::SerializedFrame)
//!
//! # Design
//!
//! Codecs are marker structs with static methods rather than trait objects,
//! so the encoding is fixed at compile time.
//!
//! # Example
//!
//! ```
//! use leap_bridge::codec::FrameCodec;
//! use leap_bridge::model::Frame;
//!
//! let frame = Frame::new(42, 1000);
//! let serialized = FrameCodec::encode(&frame).unwrap();
//! assert_eq!(FrameCodec::decode(&serialized).unwrap(), frame);
//! ```

mod frame;
mod msgpack;

pub use frame::FrameCodec;
pub use msgpack::MsgPackCodec;
