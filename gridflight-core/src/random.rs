use fastrand::Rng;

/// Source of randomness for target selection.
pub trait RandomSource {
    /// Uniform integer in `0..cells`.
    fn cell_index(&mut self, cells: u32) -> u32;
    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f32;
}

impl RandomSource for Rng {
    fn cell_index(&mut self, cells: u32) -> u32 {
        self.u32(0..cells)
    }

    fn unit(&mut self) -> f32 {
        self.f32()
    }
}
