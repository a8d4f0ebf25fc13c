use serde::{Deserialize, Serialize};

use crate::grid::GridCell;
use crate::motion::{MotionConfig, MotionController};
use crate::pose::Pose;
use crate::propeller::Propeller;
use crate::random::RandomSource;

/// Everything that changes from one frame to the next.
#[derive(Debug, Clone, Default)]
pub struct FlightState {
    pub frame: u64,
    propeller: Propeller,
    motion: MotionController,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSnapshot {
    pub frame: u64,
    pub propeller_angle: f32,
    pub current: Pose,
    pub target: Pose,
    pub move_timer: u32,
}

impl FlightState {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            frame: 0,
            propeller: Propeller::new(),
            motion: MotionController::new(config),
        }
    }

    /// Advances the propellers, then the pose. Returns the new target if one was picked.
    pub fn step<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Option<Pose> {
        self.frame += 1;
        self.propeller.advance();
        self.motion.advance_frame(rng)
    }

    pub fn pose(&self) -> &Pose {
        self.motion.current()
    }

    pub fn target(&self) -> &Pose {
        self.motion.target()
    }

    pub fn target_cell(&self) -> GridCell {
        let [x, y, _] = self.motion.target().position;
        GridCell::nearest(x, y)
    }

    pub fn propeller_angle(&self) -> f32 {
        self.propeller.angle()
    }

    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    pub fn snapshot(&self) -> FlightSnapshot {
        FlightSnapshot {
            frame: self.frame,
            propeller_angle: self.propeller.angle(),
            current: *self.motion.current(),
            target: *self.motion.target(),
            move_timer: self.motion.move_timer(),
        }
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }
}
