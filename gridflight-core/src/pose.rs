use serde::{Deserialize, Serialize};

/// Placement of the drone: world position plus Euler angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: [f32; 3],
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Pose {
    pub fn new(position: [f32; 3], pitch: f32, yaw: f32, roll: f32) -> Self {
        Self {
            position,
            pitch,
            yaw,
            roll,
        }
    }

    pub fn at(position: [f32; 3]) -> Self {
        Self::new(position, 0.0, 0.0, 0.0)
    }

    /// Horizontal offset from `self` to `other`.
    pub fn planar_offset_to(&self, other: &Pose) -> (f32, f32) {
        (
            other.position[0] - self.position[0],
            other.position[1] - self.position[1],
        )
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|value| value.is_finite())
            && self.pitch.is_finite()
            && self.yaw.is_finite()
            && self.roll.is_finite()
    }
}

/// Brings an angle into `[0, 360)` with a single add or subtract of a full turn.
///
/// Only valid for inputs within one turn of the range, which holds for the
/// bounded per-frame deltas used by the animation.
pub fn wrap_degrees_once(angle: f32) -> f32 {
    let wrapped = if angle >= 360.0 {
        angle - 360.0
    } else if angle < 0.0 {
        angle + 360.0
    } else {
        angle
    };
    // -tiny + 360.0 rounds to 360.0 in f32
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
