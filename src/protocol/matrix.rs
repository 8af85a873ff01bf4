//! Host byte-matrix descriptor for the deserialize command.
//!
//! The host passes serialized frames around as one-plane, one-dimensional
//! `char` matrices. Only the descriptor fields the command checks are
//! modelled here.

use super::envelope::{SerializedFrame, ENVELOPE_SIZE};
use crate::error::{BridgeError, Result};

/// Matrix cell type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Char,
    Long,
    Float32,
    Float64,
}

/// Matrix layout as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixInfo {
    pub plane_count: u32,
    pub element_type: ElementType,
    pub dims: Vec<usize>,
}

impl MatrixInfo {
    /// One-plane, one-dimensional `char` layout of `len` cells.
    pub fn char_1d(len: usize) -> Self {
        Self {
            plane_count: 1,
            element_type: ElementType::Char,
            dims: vec![len],
        }
    }

    #[inline]
    pub fn dim_count(&self) -> u32 {
        self.dims.len() as u32
    }
}

/// A borrowed matrix handed to the deserialize command.
#[derive(Debug, Clone)]
pub struct MatrixInput<'a> {
    pub info: MatrixInfo,
    /// `None` when the host could not resolve the matrix or its data.
    pub data: Option<&'a [u8]>,
}

impl<'a> MatrixInput<'a> {
    pub fn new(info: MatrixInfo, data: &'a [u8]) -> Self {
        Self {
            info,
            data: Some(data),
        }
    }

    /// A matrix name that resolved to nothing.
    pub fn missing() -> Self {
        Self {
            info: MatrixInfo::char_1d(0),
            data: None,
        }
    }

    /// Wrap a full envelope buffer.
    pub fn envelope(data: &'a [u8]) -> Self {
        Self::new(MatrixInfo::char_1d(ENVELOPE_SIZE), data)
    }

    /// Check the layout and parse the envelope it carries.
    ///
    /// Checks run in a fixed order: buffer present, plane count, element
    /// type, dimension count. The first failure wins.
    pub fn serialized_frame(&self) -> Result<SerializedFrame> {
        let data = self.data.ok_or(BridgeError::MissingBuffer)?;
        if self.info.plane_count != 1 {
            return Err(BridgeError::PlaneMismatch(self.info.plane_count));
        }
        if self.info.element_type != ElementType::Char {
            return Err(BridgeError::TypeMismatch(self.info.element_type));
        }
        if self.info.dim_count() != 1 {
            return Err(BridgeError::DimMismatch(self.info.dim_count()));
        }
        SerializedFrame::from_bytes(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn envelope_bytes() -> Bytes {
        SerializedFrame::new(Bytes::from_static(b"frame"))
            .unwrap()
            .to_bytes()
    }

    #[test]
    fn test_valid_envelope() {
        let bytes = envelope_bytes();
        let frame = MatrixInput::envelope(&bytes).serialized_frame().unwrap();
        assert_eq!(frame.payload(), b"frame");
    }

    #[test]
    fn test_missing_buffer() {
        let err = MatrixInput::missing().serialized_frame().unwrap_err();
        assert!(matches!(err, BridgeError::MissingBuffer));
    }

    #[test]
    fn test_plane_mismatch() {
        let bytes = envelope_bytes();
        let mut input = MatrixInput::envelope(&bytes);
        input.info.plane_count = 4;
        assert!(matches!(
            input.serialized_frame().unwrap_err(),
            BridgeError::PlaneMismatch(4)
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let bytes = envelope_bytes();
        let mut input = MatrixInput::envelope(&bytes);
        input.info.element_type = ElementType::Float32;
        assert!(matches!(
            input.serialized_frame().unwrap_err(),
            BridgeError::TypeMismatch(ElementType::Float32)
        ));
    }

    #[test]
    fn test_dim_mismatch() {
        let bytes = envelope_bytes();
        let mut input = MatrixInput::envelope(&bytes);
        input.info.dims = vec![128, 128];
        assert!(matches!(
            input.serialized_frame().unwrap_err(),
            BridgeError::DimMismatch(2)
        ));
    }

    #[test]
    fn test_plane_checked_before_type() {
        let bytes = envelope_bytes();
        let mut input = MatrixInput::envelope(&bytes);
        input.info.plane_count = 3;
        input.info.element_type = ElementType::Long;
        input.info.dims = vec![1, 2, 3];
        assert!(matches!(
            input.serialized_frame().unwrap_err(),
            BridgeError::PlaneMismatch(3)
        ));
    }
}
