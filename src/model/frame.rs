//! Frame, hand and finger snapshots.
//!
//! A [`Frame`] is one sensor snapshot. Hands and fingers carry the ids of
//! their parents so records built from them can be regrouped downstream
//! without relying on message adjacency.

use serde::{Deserialize, Serialize};

use super::image::ImageList;
use super::vector::Vector;

/// Id reported by invalid entities (e.g. the frontmost hand of an empty frame).
pub const INVALID_ID: i32 = -1;

/// Number of finger slots emitted per hand (thumb, index, middle, ring, pinky).
pub const FINGER_SLOTS: usize = 5;

/// Which hand a [`Hand`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    #[inline]
    pub fn is_right(self) -> bool {
        self == Handedness::Right
    }
}

/// A tracked finger (or tool).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finger {
    pub id: i32,
    pub hand_id: i32,
    pub frame_id: i64,
    pub tip_position: Vector,
    pub direction: Vector,
    pub tip_velocity: Vector,
    pub width: f32,
    pub length: f32,
    pub is_tool: bool,
    pub valid: bool,
}

impl Finger {
    /// The placeholder finger the source hands out for empty slots.
    pub fn invalid() -> Self {
        Self {
            id: INVALID_ID,
            hand_id: INVALID_ID,
            frame_id: INVALID_ID as i64,
            tip_position: Vector::ZERO,
            direction: Vector::ZERO,
            tip_velocity: Vector::ZERO,
            width: 0.0,
            length: 0.0,
            is_tool: false,
            valid: false,
        }
    }
}

impl Default for Finger {
    fn default() -> Self {
        Self::invalid()
    }
}

/// A tracked hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub id: i32,
    pub frame_id: i64,
    pub handedness: Handedness,
    pub confidence: f32,
    pub grab_strength: f32,
    pub pinch_strength: f32,
    /// Palm width in millimetres.
    pub palm_width: f32,
    pub palm_position: Vector,
    pub direction: Vector,
    pub palm_velocity: Vector,
    pub palm_normal: Vector,
    pub sphere_center: Vector,
    pub sphere_radius: f32,
    /// Physically detected fingers, thumb first. May hold fewer than five.
    pub fingers: Vec<Finger>,
}

impl Hand {
    /// Create a hand with neutral pose values and no fingers.
    pub fn new(id: i32, frame_id: i64, handedness: Handedness) -> Self {
        Self {
            id,
            frame_id,
            handedness,
            confidence: 0.0,
            grab_strength: 0.0,
            pinch_strength: 0.0,
            palm_width: 0.0,
            palm_position: Vector::ZERO,
            direction: Vector::ZERO,
            palm_velocity: Vector::ZERO,
            palm_normal: Vector::ZERO,
            sphere_center: Vector::ZERO,
            sphere_radius: 0.0,
            fingers: Vec::new(),
        }
    }

    /// Palm width converted to metres.
    #[inline]
    pub fn palm_width_meters(&self) -> f64 {
        self.palm_width as f64 * 0.001
    }

    /// Physical finger count.
    #[inline]
    pub fn finger_count(&self) -> usize {
        self.fingers.len()
    }

    /// Exactly [`FINGER_SLOTS`] fingers; missing slots are [`Finger::invalid`].
    pub fn finger_slots(&self) -> impl Iterator<Item = Finger> + '_ {
        (0..FINGER_SLOTS).map(move |i| self.fingers.get(i).cloned().unwrap_or_default())
    }
}

/// One sensor snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: i64,
    /// Capture time in microseconds.
    pub timestamp: i64,
    /// Frame rate measured by the source when this frame was captured.
    pub fps: f32,
    pub hands: Vec<Hand>,
    pub valid: bool,
    /// Stereo IR images captured with this frame. Not serialized.
    #[serde(skip)]
    pub images: ImageList,
}

impl Frame {
    /// Create a valid frame with no hands.
    pub fn new(id: i64, timestamp: i64) -> Self {
        Self {
            id,
            timestamp,
            fps: 0.0,
            hands: Vec::new(),
            valid: true,
            images: ImageList::default(),
        }
    }

    /// The snapshot returned for history the source no longer holds.
    pub fn invalid() -> Self {
        Self {
            id: 0,
            timestamp: 0,
            fps: 0.0,
            hands: Vec::new(),
            valid: false,
            images: ImageList::default(),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Add a hand, stamping it (and its fingers) with this frame's id.
    pub fn with_hand(mut self, mut hand: Hand) -> Self {
        hand.frame_id = self.id;
        for finger in &mut hand.fingers {
            finger.frame_id = self.id;
            finger.hand_id = hand.id;
        }
        self.hands.push(hand);
        self
    }

    /// The hand closest to the viewer (smallest palm z). First wins on ties.
    pub fn frontmost_hand(&self) -> Option<&Hand> {
        self.hands.iter().reduce(|best, hand| {
            if hand.palm_position.z < best.palm_position.z {
                hand
            } else {
                best
            }
        })
    }

    /// Id of [`Frame::frontmost_hand`], or [`INVALID_ID`] with no hands.
    pub fn frontmost_hand_id(&self) -> i32 {
        self.frontmost_hand().map_or(INVALID_ID, |h| h.id)
    }

    pub fn hand(&self, id: i32) -> Option<&Hand> {
        self.hands.iter().find(|h| h.id == id)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::invalid()
    }
}
