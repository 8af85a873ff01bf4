//! Data model - value snapshots derived from one sensor frame.
//!
//! - [`Frame`], [`Hand`], [`Finger`] - skeletal tracking data
//! - [`ImageList`], [`Image`] - raw stereo IR images
//! - [`MotionDelta`] - rotation/scale/translation between two frames
//! - [`Vector`] - 3D vector math

mod frame;
mod image;
mod motion;
mod vector;

pub use frame::{Finger, Frame, Hand, Handedness, FINGER_SLOTS, INVALID_ID};
pub use image::{Image, ImageList, LEFT, RIGHT};
pub use motion::MotionDelta;
pub use vector::Vector;
