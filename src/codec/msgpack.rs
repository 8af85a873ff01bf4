//! MsgPack codec using `rmp-serde`.
//!
//! Always use `to_vec_named`, never `to_vec`: structs are written as maps
//! keyed by field name, so captures stay decodable when fields are added.
//!
//! # Example
//!
//! ```
//! use leap_bridge::codec::MsgPackCodec;
//! use leap_bridge::model::Vector;
//!
//! let v = Vector::new(1.0, 2.0, 3.0);
//! let encoded = MsgPackCodec::encode(&v).unwrap();
//! let decoded: Vector = MsgPackCodec::decode(&encoded).unwrap();
//! assert_eq!(decoded, v);
//! ```

use crate::error::Result;

/// MessagePack codec for structured data.
pub struct MsgPackCodec;

impl MsgPackCodec {
    /// Encode a value to MsgPack bytes (struct-as-map).
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized.
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    /// Decode MsgPack bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes cannot be deserialized to type T.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}
