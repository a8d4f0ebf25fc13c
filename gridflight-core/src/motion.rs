use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::{GRID_CELLS, GridCell};
use crate::pose::{Pose, wrap_degrees_once};
use crate::random::RandomSource;

pub const START_POSITION: [f32; 3] = [0.0, 0.0, 1.0];

/// Tuning for the target-chasing animation.
///
/// The rates are fractions of the remaining distance covered per frame and are
/// calibrated for a fixed 60 Hz tick. Running the controller at a different
/// rate changes how fast the drone appears to move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    pub dwell_frames: u32,
    pub position_rate: f32,
    pub attitude_rate: f32,
    pub bank_gain: f32,      // degrees of tilt per unit of remaining offset
    pub facing_threshold: f32,
    pub hover_base: f32,
    pub hover_span: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            dwell_frames: 120, // two seconds at 60 fps
            position_rate: 0.02,
            attitude_rate: 0.05,
            bank_gain: 20.0,
            facing_threshold: 0.01,
            hover_base: 1.0,
            hover_span: 0.5,
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dwell_frames == 0 {
            return Err(ConfigError::ZeroDwell);
        }

        for (name, value) in [
            ("position_rate", self.position_rate),
            ("attitude_rate", self.attitude_rate),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::RateOutOfRange { name, value });
            }
        }

        for (name, value) in [
            ("bank_gain", self.bank_gain),
            ("facing_threshold", self.facing_threshold),
            ("hover_base", self.hover_base),
            ("hover_span", self.hover_span),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name });
            }
        }

        if self.hover_span < 0.0 {
            return Err(ConfigError::NegativeSpan(self.hover_span));
        }

        Ok(())
    }
}

/// Moves the drone between random grid cells and derives its attitude from
/// the remaining offset to the current target.
#[derive(Debug, Clone)]
pub struct MotionController {
    config: MotionConfig,
    current: Pose,
    target: Pose,
    move_timer: u32,
}

impl MotionController {
    pub fn new(config: MotionConfig) -> Self {
        let start = Pose::at(START_POSITION);
        Self {
            config,
            current: start,
            target: start,
            move_timer: 0, // pick a target on the first frame
        }
    }

    pub fn current(&self) -> &Pose {
        &self.current
    }

    pub fn target(&self) -> &Pose {
        &self.target
    }

    pub fn move_timer(&self) -> u32 {
        self.move_timer
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Runs one frame of the animation. Returns the new target when the dwell
    /// timer expired during this frame.
    pub fn advance_frame<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Option<Pose> {
        self.move_timer = self.move_timer.saturating_sub(1);
        let selected = if self.move_timer == 0 {
            self.select_target(rng);
            Some(self.target)
        } else {
            None
        };

        let position_rate = self.config.position_rate;
        for axis in 0..3 {
            self.current.position[axis] = approach(
                self.current.position[axis],
                self.target.position[axis],
                position_rate,
            );
        }

        let (dx, dy) = self.current.planar_offset_to(&self.target);
        self.target.pitch = dy * self.config.bank_gain;
        self.target.roll = -dx * self.config.bank_gain;

        let attitude_rate = self.config.attitude_rate;
        self.current.pitch = approach(self.current.pitch, self.target.pitch, attitude_rate);
        self.current.roll = approach(self.current.roll, self.target.roll, attitude_rate);
        self.current.yaw = approach(self.current.yaw, self.target.yaw, attitude_rate);
        self.current.yaw = wrap_degrees_once(self.current.yaw);

        selected
    }

    fn select_target<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        let cell = GridCell::new(rng.cell_index(GRID_CELLS), rng.cell_index(GRID_CELLS));
        let (x, y) = cell.center();
        let ceiling = self.config.hover_base + self.config.hover_span;
        let mut z = self.config.hover_base + rng.unit() * self.config.hover_span;
        if self.config.hover_span > 0.0 && z >= ceiling {
            // base + u * span can round up to the ceiling for u just below 1
            z = float_below(ceiling);
        }
        self.target.position = [x, y, z];
        self.move_timer = self.config.dwell_frames;

        let (dx, dy) = self.current.planar_offset_to(&self.target);
        let threshold = self.config.facing_threshold;
        if dx.abs() > threshold || dy.abs() > threshold {
            // Heading is measured from +Y towards +X, hence (dx, dy).
            self.target.yaw = wrap_degrees_once(dx.atan2(dy).to_degrees());
        }

        debug!(
            "new target cell ({}, {}) at [{:.2}, {:.2}, {:.2}], yaw {:.1}",
            cell.x, cell.y, x, y, z, self.target.yaw
        );
    }
}

impl Default for MotionController {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

fn float_below(value: f32) -> f32 {
    if value > 0.0 {
        f32::from_bits(value.to_bits() - 1)
    } else {
        value - f32::EPSILON * value.abs().max(1.0)
    }
}

/// First-order step from `current` towards `target`.
pub fn approach(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate
}
