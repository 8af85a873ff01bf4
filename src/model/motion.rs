//! Coarse global motion between two frames.
//!
//! Estimates the rotation, scale and translation that best explain how the
//! hands present in both frames moved, along with a probability for each
//! kind of motion. Only hands and fingers whose ids appear in both frames
//! contribute; anything else yields the identity transform.

use serde::{Deserialize, Serialize};

use super::frame::Frame;
use super::vector::Vector;

/// Lever arm (mm) used to turn a rotation angle or log-scale into a
/// displacement comparable with the translation.
const REFERENCE_RADIUS: f32 = 100.0;

/// Below this total displacement (mm) no motion is reported.
const MOTION_EPSILON: f32 = 1e-4;

/// Below this mean spread (mm) a point set counts as collapsed.
const SPREAD_EPSILON: f32 = 1e-6;

/// Rotation/scale/translation estimate between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionDelta {
    pub rotation_probability: f32,
    pub scale_probability: f32,
    pub translation_probability: f32,
    /// Radians, non-negative.
    pub rotation_angle: f32,
    /// Unit axis, or zero when there is no rotation.
    pub rotation_axis: Vector,
    pub scale_factor: f32,
    /// Millimetres.
    pub translation: Vector,
}

impl MotionDelta {
    pub const IDENTITY: Self = Self {
        rotation_probability: 0.0,
        scale_probability: 0.0,
        translation_probability: 0.0,
        rotation_angle: 0.0,
        rotation_axis: Vector::ZERO,
        scale_factor: 1.0,
        translation: Vector::ZERO,
    };

    /// Estimate the motion from `previous` to `current`.
    pub fn between(previous: Option<&Frame>, current: &Frame) -> Self {
        let previous = match previous {
            Some(p) if p.is_valid() && current.is_valid() => p,
            _ => return Self::IDENTITY,
        };

        let mut before = Vec::new();
        let mut after = Vec::new();
        let mut axis_sum = Vector::ZERO;
        let mut angle_sum = 0.0f32;
        let mut angle_count = 0u32;

        for hand in &current.hands {
            let Some(old) = previous.hand(hand.id) else {
                continue;
            };

            before.push(old.palm_position);
            after.push(hand.palm_position);
            for finger in hand.fingers.iter().filter(|f| f.valid) {
                let matched = old
                    .fingers
                    .iter()
                    .find(|f| f.valid && f.id == finger.id);
                if let Some(old_finger) = matched {
                    before.push(old_finger.tip_position);
                    after.push(finger.tip_position);
                }
            }

            let pairs = [
                (old.direction, hand.direction),
                (old.palm_normal, hand.palm_normal),
            ];
            for (from, to) in pairs {
                if from.length_sq() < 1e-10 || to.length_sq() < 1e-10 {
                    continue;
                }
                axis_sum = axis_sum + from.normalize().cross(to.normalize());
                angle_sum += from.angle_to(to);
                angle_count += 1;
            }
        }

        if before.is_empty() {
            return Self::IDENTITY;
        }

        let c0 = centroid(&before);
        let c1 = centroid(&after);
        let translation = c1 - c0;

        let s0 = mean_spread(&before, c0);
        let s1 = mean_spread(&after, c1);
        // A spread collapsing to a point has no meaningful ratio.
        let scale_factor = if before.len() >= 2 && s0 > SPREAD_EPSILON && s1 > SPREAD_EPSILON {
            s1 / s0
        } else {
            1.0
        };

        let rotation_axis = axis_sum.normalize();
        let rotation_angle = if angle_count > 0 && rotation_axis != Vector::ZERO {
            angle_sum / angle_count as f32
        } else {
            0.0
        };

        let t = translation.length();
        let r = rotation_angle * REFERENCE_RADIUS;
        let s = scale_factor.ln().abs() * REFERENCE_RADIUS;
        let total = t + r + s;

        let (rotation_probability, scale_probability, translation_probability) =
            if !total.is_finite() || total < MOTION_EPSILON {
                (0.0, 0.0, 0.0)
            } else {
                (r / total, s / total, t / total)
            };

        Self {
            rotation_probability,
            scale_probability,
            translation_probability,
            rotation_angle,
            rotation_axis,
            scale_factor,
            translation,
        }
    }
}

impl Default for MotionDelta {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn centroid(points: &[Vector]) -> Vector {
    let sum = points.iter().fold(Vector::ZERO, |acc, p| acc + *p);
    sum * (1.0 / points.len() as f32)
}

fn mean_spread(points: &[Vector], center: Vector) -> f32 {
    points.iter().map(|p| p.distance(center)).sum::<f32>() / points.len() as f32
}
