//! Protocol module - output records, channels and the serialized-frame envelope.
//!
//! This module defines everything that crosses the host boundary:
//! - [`Record`] / [`Atom`] / [`Channel`] - typed output records and their flat layout
//! - [`SerializedFrame`] - 16384-byte length-prefixed envelope
//! - [`MatrixInput`] - host byte-matrix descriptor for the deserialize command

mod envelope;
mod matrix;
mod record;

pub use envelope::{SerializedFrame, ENVELOPE_SIZE, LENGTH_PREFIX_SIZE, MAX_PAYLOAD_SIZE};
pub use matrix::{ElementType, MatrixInfo, MatrixInput};
pub use record::{selectors, Atom, Channel, Record};
