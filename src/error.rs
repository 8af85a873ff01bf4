//! Error types for leap-bridge.

use thiserror::Error;

use crate::protocol::ElementType;

/// Main error type for all bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// I/O error while reading or writing envelopes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error (configuration surface only).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// MsgPack serialization error.
    #[error("MsgPack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    /// MsgPack deserialization error.
    #[error("MsgPack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),

    /// Protocol error (malformed envelope, bad length prefix, etc.).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Encoded frame does not fit in a serialized-frame envelope.
    #[error("Encoded frame is {len} bytes, envelope holds at most {max}")]
    FrameTooLarge { len: usize, max: usize },

    /// The image source reported a pixel depth the packed buffers can't hold.
    #[error("Unsupported image format: {bytes_per_pixel} bytes per pixel (expected 1)")]
    UnsupportedPixelFormat { bytes_per_pixel: u32 },

    /// Deserialize command received no buffer.
    #[error("Failed to acquire matrix")]
    MissingBuffer,

    /// Deserialize command received a matrix with the wrong plane count.
    #[error("Matrix plane count mismatch: got {0}, expected 1")]
    PlaneMismatch(u32),

    /// Deserialize command received a matrix with the wrong element type.
    #[error("Matrix type mismatch: got {0:?}, expected Char")]
    TypeMismatch(ElementType),

    /// Deserialize command received a matrix with the wrong dimensionality.
    #[error("Matrix dimension mismatch: got {0} dimensions, expected 1")]
    DimMismatch(u32),

    /// Output channel closed by the consumer.
    #[error("Output channel closed")]
    ChannelClosed,

    /// Output channel full.
    #[error("Output channel full")]
    Backpressure,
}

/// Result type alias using BridgeError.
pub type Result<T> = std::result::Result<T, BridgeError>;
