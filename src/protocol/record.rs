//! Output records, their channels and their atom layouts.
//!
//! Every record flattens to a selector plus a fixed list of atoms. Field
//! order and count are the compatibility contract with downstream patches:
//! ids, timestamps, counts and 0|1 flags are [`Atom::Long`], everything else
//! is [`Atom::Float`].
//!
//! # Example
//!
//! ```
//! use leap_bridge::protocol::{selectors, Atom, Channel, Record};
//!
//! let record = Record::Scale { factor: 1.5 };
//! assert_eq!(record.selector(), selectors::SCALE);
//! assert_eq!(record.channel(), Channel::Tracking);
//! assert_eq!(record.atoms(), vec![Atom::Float(1.5)]);
//! ```

use bytes::Bytes;

use super::envelope::SerializedFrame;
use crate::model::{Finger, Frame, Hand, MotionDelta, Vector};

/// Selector symbols, one per record kind.
pub mod selectors {
    pub const FRAME_START: &str = "frame_start";
    pub const FRAME_END: &str = "frame_end";
    pub const FRAME: &str = "frame";
    pub const HAND: &str = "hand";
    pub const FINGER: &str = "finger";
    pub const PALM: &str = "palm";
    pub const BALL: &str = "ball";
    pub const PROBABILITY: &str = "probability";
    pub const ROTATE: &str = "rotate";
    pub const SCALE: &str = "scale";
    pub const POSITION: &str = "position";
    pub const CONNECTED: &str = "connected";
    pub const FPS: &str = "fps";
    pub const SERIALIZED_FRAME: &str = "serialized_frame";
}

/// Output channel (one per host outlet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Frame/hand/finger/palm/ball records.
    Frame,
    /// Left IR image buffer.
    ImageLeft,
    /// Right IR image buffer.
    ImageRight,
    /// Motion-tracking records.
    Tracking,
    /// Connectivity, frame rate and serialized-frame messages.
    Message,
}

impl Channel {
    /// Image channel for camera index 0 (left) or 1 (right).
    pub fn image(index: usize) -> Option<Self> {
        match index {
            0 => Some(Channel::ImageLeft),
            1 => Some(Channel::ImageRight),
            _ => None,
        }
    }
}

/// One value in a flattened record.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Long(i64),
    Float(f64),
    Blob(Bytes),
}

impl Atom {
    #[inline]
    fn flag(value: bool) -> Self {
        Atom::Long(value as i64)
    }

    #[inline]
    fn float(value: f32) -> Self {
        Atom::Float(value as f64)
    }
}

fn push_vector(atoms: &mut Vec<Atom>, v: Vector) {
    atoms.extend(v.to_f64().into_iter().map(Atom::Float));
}

/// A typed output record.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// Legacy dialect frame opener.
    FrameStart,
    Frame {
        id: i64,
        timestamp: i64,
        hand_count: i64,
        frontmost_hand_id: i64,
    },
    LegacyFrame {
        id: i64,
        timestamp: i64,
        hand_count: i64,
    },
    Hand {
        id: i64,
        frame_id: i64,
        is_right: bool,
        confidence: f32,
        grab_strength: f32,
        pinch_strength: f32,
        /// Metres.
        palm_width: f64,
    },
    LegacyHand {
        id: i64,
        frame_id: i64,
        finger_count: i64,
    },
    Finger {
        id: i64,
        hand_id: i64,
        frame_id: i64,
        position: Vector,
        direction: Vector,
        velocity: Vector,
        width: f32,
        length: f32,
        is_tool: bool,
    },
    Palm {
        hand_id: i64,
        frame_id: i64,
        position: Vector,
        direction: Vector,
        velocity: Vector,
        normal: Vector,
    },
    Ball {
        hand_id: i64,
        frame_id: i64,
        center: Vector,
        radius: f32,
    },
    Probability {
        rotation: f32,
        scale: f32,
        translation: f32,
    },
    Rotate {
        angle: f32,
        axis: Vector,
    },
    Scale {
        factor: f32,
    },
    Position {
        translation: Vector,
    },
    FrameEnd,
    Connected(bool),
    Fps(f32),
    SerializedFrame(SerializedFrame),
}

impl Record {
    pub fn frame(frame: &Frame) -> Self {
        Record::Frame {
            id: frame.id,
            timestamp: frame.timestamp,
            hand_count: frame.hands.len() as i64,
            frontmost_hand_id: frame.frontmost_hand_id() as i64,
        }
    }

    pub fn legacy_frame(frame: &Frame) -> Self {
        Record::LegacyFrame {
            id: frame.id,
            timestamp: frame.timestamp,
            hand_count: frame.hands.len() as i64,
        }
    }

    pub fn hand(hand: &Hand, frame_id: i64) -> Self {
        Record::Hand {
            id: hand.id as i64,
            frame_id,
            is_right: hand.handedness.is_right(),
            confidence: hand.confidence,
            grab_strength: hand.grab_strength,
            pinch_strength: hand.pinch_strength,
            palm_width: hand.palm_width_meters(),
        }
    }

    pub fn legacy_hand(hand: &Hand, frame_id: i64) -> Self {
        Record::LegacyHand {
            id: hand.id as i64,
            frame_id,
            finger_count: hand.finger_count() as i64,
        }
    }

    /// Finger record. Parent ids come from the enclosing hand and frame,
    /// not from the finger, so padded slots still group correctly.
    pub fn finger(finger: &Finger, hand_id: i32, frame_id: i64) -> Self {
        Record::Finger {
            id: finger.id as i64,
            hand_id: hand_id as i64,
            frame_id,
            position: finger.tip_position,
            direction: finger.direction,
            velocity: finger.tip_velocity,
            width: finger.width,
            length: finger.length,
            is_tool: finger.is_tool,
        }
    }

    pub fn palm(hand: &Hand, frame_id: i64) -> Self {
        Record::Palm {
            hand_id: hand.id as i64,
            frame_id,
            position: hand.palm_position,
            direction: hand.direction,
            velocity: hand.palm_velocity,
            normal: hand.palm_normal,
        }
    }

    pub fn ball(hand: &Hand, frame_id: i64) -> Self {
        Record::Ball {
            hand_id: hand.id as i64,
            frame_id,
            center: hand.sphere_center,
            radius: hand.sphere_radius,
        }
    }

    /// The four motion-tracking records, in emission order.
    pub fn motion(delta: &MotionDelta) -> [Self; 4] {
        [
            Record::Probability {
                rotation: delta.rotation_probability,
                scale: delta.scale_probability,
                translation: delta.translation_probability,
            },
            Record::Rotate {
                angle: delta.rotation_angle,
                axis: delta.rotation_axis,
            },
            Record::Scale {
                factor: delta.scale_factor,
            },
            Record::Position {
                translation: delta.translation,
            },
        ]
    }

    /// Selector symbol for this record kind.
    pub fn selector(&self) -> &'static str {
        match self {
            Record::FrameStart => selectors::FRAME_START,
            Record::Frame { .. } | Record::LegacyFrame { .. } => selectors::FRAME,
            Record::Hand { .. } | Record::LegacyHand { .. } => selectors::HAND,
            Record::Finger { .. } => selectors::FINGER,
            Record::Palm { .. } => selectors::PALM,
            Record::Ball { .. } => selectors::BALL,
            Record::Probability { .. } => selectors::PROBABILITY,
            Record::Rotate { .. } => selectors::ROTATE,
            Record::Scale { .. } => selectors::SCALE,
            Record::Position { .. } => selectors::POSITION,
            Record::FrameEnd => selectors::FRAME_END,
            Record::Connected(_) => selectors::CONNECTED,
            Record::Fps(_) => selectors::FPS,
            Record::SerializedFrame(_) => selectors::SERIALIZED_FRAME,
        }
    }

    /// Channel this record kind is emitted on.
    pub fn channel(&self) -> Channel {
        match self {
            Record::Probability { .. }
            | Record::Rotate { .. }
            | Record::Scale { .. }
            | Record::Position { .. } => Channel::Tracking,
            Record::Connected(_) | Record::Fps(_) | Record::SerializedFrame(_) => Channel::Message,
            _ => Channel::Frame,
        }
    }

    /// Flatten to the wire atom list.
    pub fn atoms(&self) -> Vec<Atom> {
        let mut atoms = Vec::new();
        match self {
            Record::FrameStart | Record::FrameEnd => {}
            Record::Frame {
                id,
                timestamp,
                hand_count,
                frontmost_hand_id,
            } => {
                atoms.extend([
                    Atom::Long(*id),
                    Atom::Long(*timestamp),
                    Atom::Long(*hand_count),
                    Atom::Long(*frontmost_hand_id),
                ]);
            }
            Record::LegacyFrame {
                id,
                timestamp,
                hand_count,
            } => {
                atoms.extend([Atom::Long(*id), Atom::Long(*timestamp), Atom::Long(*hand_count)]);
            }
            Record::Hand {
                id,
                frame_id,
                is_right,
                confidence,
                grab_strength,
                pinch_strength,
                palm_width,
            } => {
                atoms.extend([
                    Atom::Long(*id),
                    Atom::Long(*frame_id),
                    Atom::flag(*is_right),
                    Atom::float(*confidence),
                    Atom::float(*grab_strength),
                    Atom::float(*pinch_strength),
                    Atom::Float(*palm_width),
                ]);
            }
            Record::LegacyHand {
                id,
                frame_id,
                finger_count,
            } => {
                atoms.extend([Atom::Long(*id), Atom::Long(*frame_id), Atom::Long(*finger_count)]);
            }
            Record::Finger {
                id,
                hand_id,
                frame_id,
                position,
                direction,
                velocity,
                width,
                length,
                is_tool,
            } => {
                atoms.extend([Atom::Long(*id), Atom::Long(*hand_id), Atom::Long(*frame_id)]);
                push_vector(&mut atoms, *position);
                push_vector(&mut atoms, *direction);
                push_vector(&mut atoms, *velocity);
                atoms.extend([Atom::float(*width), Atom::float(*length), Atom::flag(*is_tool)]);
            }
            Record::Palm {
                hand_id,
                frame_id,
                position,
                direction,
                velocity,
                normal,
            } => {
                atoms.extend([Atom::Long(*hand_id), Atom::Long(*frame_id)]);
                push_vector(&mut atoms, *position);
                push_vector(&mut atoms, *direction);
                push_vector(&mut atoms, *velocity);
                push_vector(&mut atoms, *normal);
            }
            Record::Ball {
                hand_id,
                frame_id,
                center,
                radius,
            } => {
                atoms.extend([Atom::Long(*hand_id), Atom::Long(*frame_id)]);
                push_vector(&mut atoms, *center);
                atoms.push(Atom::float(*radius));
            }
            Record::Probability {
                rotation,
                scale,
                translation,
            } => {
                atoms.extend([
                    Atom::float(*rotation),
                    Atom::float(*scale),
                    Atom::float(*translation),
                ]);
            }
            Record::Rotate { angle, axis } => {
                atoms.push(Atom::float(*angle));
                push_vector(&mut atoms, *axis);
            }
            Record::Scale { factor } => atoms.push(Atom::float(*factor)),
            Record::Position { translation } => push_vector(&mut atoms, *translation),
            Record::Connected(connected) => atoms.push(Atom::flag(*connected)),
            Record::Fps(fps) => atoms.push(Atom::float(*fps)),
            Record::SerializedFrame(frame) => atoms.push(Atom::Blob(frame.to_bytes())),
        }
        atoms
    }

    /// Number of atoms this record flattens to.
    #[inline]
    pub fn arity(&self) -> usize {
        self.atoms().len()
    }
}
