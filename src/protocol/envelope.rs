//! Serialized-frame envelope.
//!
//! A fixed-size, length-prefixed byte buffer carrying one encoded frame:
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Length   │ Payload (zero padded)       │
//! │ 4 bytes  │ 16380 bytes                 │
//! │ int32 LE │                             │
//! └──────────┴─────────────────────────────┘
//! ```
//!
//! The whole envelope is [`ENVELOPE_SIZE`] bytes. Encodings longer than
//! [`MAX_PAYLOAD_SIZE`] never make it into an envelope.

use std::io::{Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{BridgeError, Result};

/// Length prefix size in bytes.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Total envelope size in bytes.
pub const ENVELOPE_SIZE: usize = 16384;

/// Maximum payload size (envelope minus length prefix).
pub const MAX_PAYLOAD_SIZE: usize = ENVELOPE_SIZE - LENGTH_PREFIX_SIZE;

/// One encoded frame, ready to be handed to the host as a byte matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedFrame {
    payload: Bytes,
}

impl SerializedFrame {
    /// Wrap an encoded frame.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::FrameTooLarge`] if the payload exceeds
    /// [`MAX_PAYLOAD_SIZE`].
    pub fn new(payload: Bytes) -> Result<Self> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(BridgeError::FrameTooLarge {
                len: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }
        Ok(Self { payload })
    }

    /// Encoded frame bytes (without prefix or padding).
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Value of the length prefix.
    #[inline]
    pub fn length(&self) -> i32 {
        self.payload.len() as i32
    }

    /// Full [`ENVELOPE_SIZE`]-byte envelope, zero padded.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(ENVELOPE_SIZE);
        buf.put_i32_le(self.length());
        buf.put_slice(&self.payload);
        buf.resize(ENVELOPE_SIZE, 0);
        buf.freeze()
    }

    /// Parse an envelope. Trailing padding is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Protocol`] if the buffer is shorter than the
    /// prefix, the length is negative or exceeds [`MAX_PAYLOAD_SIZE`], or the
    /// buffer ends before the payload does.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() < LENGTH_PREFIX_SIZE {
            return Err(BridgeError::Protocol(format!(
                "Envelope of {} bytes has no length prefix",
                buf.len()
            )));
        }

        let length = i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
        if length < 0 {
            return Err(BridgeError::Protocol(format!(
                "Negative envelope length {}",
                length
            )));
        }

        let length = length as usize;
        if length > MAX_PAYLOAD_SIZE {
            return Err(BridgeError::Protocol(format!(
                "Envelope length {} exceeds maximum {}",
                length, MAX_PAYLOAD_SIZE
            )));
        }

        let end = LENGTH_PREFIX_SIZE + length;
        if buf.len() < end {
            return Err(BridgeError::Protocol(format!(
                "Envelope truncated: length {} but only {} payload bytes",
                length,
                buf.len() - LENGTH_PREFIX_SIZE
            )));
        }

        Ok(Self {
            payload: Bytes::copy_from_slice(&buf[LENGTH_PREFIX_SIZE..end]),
        })
    }

    /// Write the full envelope to a stream.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Read one full envelope from a stream.
    ///
    /// Returns `Ok(None)` at a clean end of stream.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Option<Self>> {
        let mut buf = vec![0u8; ENVELOPE_SIZE];
        let mut filled = 0;
        while filled < ENVELOPE_SIZE {
            match reader.read(&mut buf[filled..])? {
                0 if filled == 0 => return Ok(None),
                0 => {
                    return Err(BridgeError::Protocol(format!(
                        "Stream ended {} bytes into an envelope",
                        filled
                    )))
                }
                n => filled += n,
            }
        }
        Self::from_bytes(&buf).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_size_constants() {
        assert_eq!(ENVELOPE_SIZE, 16384);
        assert_eq!(MAX_PAYLOAD_SIZE, 16380);
    }

    #[test]
    fn test_to_bytes_layout() {
        let frame = SerializedFrame::new(Bytes::from_static(b"abc")).unwrap();
        let bytes = frame.to_bytes();

        assert_eq!(bytes.len(), ENVELOPE_SIZE);
        assert_eq!(&bytes[..4], &3i32.to_le_bytes());
        assert_eq!(&bytes[4..7], b"abc");
        assert!(bytes[7..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_bytes_ignores_padding() {
        let original = SerializedFrame::new(Bytes::from_static(b"payload")).unwrap();
        let parsed = SerializedFrame::from_bytes(&original.to_bytes()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_new_rejects_oversize() {
        let big = Bytes::from(vec![0u8; MAX_PAYLOAD_SIZE + 1]);
        let err = SerializedFrame::new(big).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::FrameTooLarge {
                len: 16381,
                max: 16380
            }
        ));
    }

    #[test]
    fn test_new_accepts_exact_capacity() {
        let exact = Bytes::from(vec![7u8; MAX_PAYLOAD_SIZE]);
        let frame = SerializedFrame::new(exact).unwrap();
        assert_eq!(frame.to_bytes().len(), ENVELOPE_SIZE);
    }

    #[test]
    fn test_from_bytes_too_short() {
        let err = SerializedFrame::from_bytes(&[1, 0]).unwrap_err();
        assert!(err.to_string().contains("no length prefix"));
    }

    #[test]
    fn test_from_bytes_negative_length() {
        let mut buf = vec![0u8; 16];
        buf[..4].copy_from_slice(&(-5i32).to_le_bytes());
        let err = SerializedFrame::from_bytes(&buf).unwrap_err();
        assert!(err.to_string().contains("Negative"));
    }

    #[test]
    fn test_from_bytes_length_over_max() {
        let mut buf = vec![0u8; ENVELOPE_SIZE];
        buf[..4].copy_from_slice(&16381i32.to_le_bytes());
        let err = SerializedFrame::from_bytes(&buf).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_stream_round_trip() {
        let a = SerializedFrame::new(Bytes::from_static(b"first")).unwrap();
        let b = SerializedFrame::new(Bytes::from_static(b"second")).unwrap();

        let mut stream = Vec::new();
        a.write_to(&mut stream).unwrap();
        b.write_to(&mut stream).unwrap();
        assert_eq!(stream.len(), 2 * ENVELOPE_SIZE);

        let mut reader = stream.as_slice();
        assert_eq!(SerializedFrame::read_from(&mut reader).unwrap(), Some(a));
        assert_eq!(SerializedFrame::read_from(&mut reader).unwrap(), Some(b));
        assert_eq!(SerializedFrame::read_from(&mut reader).unwrap(), None);
    }

    #[test]
    fn test_read_from_partial_envelope() {
        let mut reader: &[u8] = &[3, 0, 0, 0, b'a'];
        let err = SerializedFrame::read_from(&mut reader).unwrap_err();
        assert!(err.to_string().contains("Stream ended 5 bytes"));
    }

    #[test]
    fn test_from_bytes_truncated() {
        let mut buf = vec![0u8; 10];
        buf[..4].copy_from_slice(&100i32.to_le_bytes());
        let err = SerializedFrame::from_bytes(&buf).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }
}
