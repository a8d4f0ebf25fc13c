use crate::pose::wrap_degrees_once;

pub const PROPELLER_STEP_DEGREES: f32 = 15.0;

/// Shared rotation of all four propellers. They turn in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Propeller {
    angle: f32,
}

impl Propeller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn advance(&mut self) {
        self.angle = wrap_degrees_once(self.angle + PROPELLER_STEP_DEGREES);
    }
}
