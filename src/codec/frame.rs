//! Frame codec - bounded MsgPack encoding of whole frames.
//!
//! Frames are encoded with [`MsgPackCodec`] and wrapped in a
//! [`SerializedFrame`] envelope. Images never travel in the encoding.

use bytes::Bytes;

use super::MsgPackCodec;
use crate::error::Result;
use crate::model::Frame;
use crate::protocol::SerializedFrame;

/// Encodes frames into envelopes and back.
pub struct FrameCodec;

impl FrameCodec {
    /// Encode a frame.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::FrameTooLarge`](crate::BridgeError::FrameTooLarge)
    /// if the encoding exceeds the envelope payload capacity. Nothing is
    /// truncated.
    pub fn encode(frame: &Frame) -> Result<SerializedFrame> {
        let bytes = MsgPackCodec::encode(frame)?;
        SerializedFrame::new(Bytes::from(bytes))
    }

    /// Decode a frame from an envelope.
    pub fn decode(serialized: &SerializedFrame) -> Result<Frame> {
        MsgPackCodec::decode(serialized.payload())
    }

    /// Decode a frame from a raw envelope buffer (length prefix included).
    pub fn decode_bytes(buf: &[u8]) -> Result<Frame> {
        Self::decode(&SerializedFrame::from_bytes(buf)?)
    }
}
