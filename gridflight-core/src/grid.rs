//! Ground grid shared by the target sampler and the renderer.
//!
//! The drone picks targets at cell centers while the renderer draws the
//! lattice lines between cells; both come from the constants below so the
//! two can never drift apart.

pub const GRID_CELLS: u32 = 4;
pub const GRID_SPACING: f32 = 1.0;
pub const GRID_HALF_EXTENT: f32 = GRID_CELLS as f32 * GRID_SPACING * 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub x: u32,
    pub y: u32,
}

impl GridCell {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn center(&self) -> (f32, f32) {
        (cell_center(self.x), cell_center(self.y))
    }

    /// Cell whose center lies closest to a world position, clamped to the grid.
    pub fn nearest(x: f32, y: f32) -> Self {
        Self::new(nearest_index(x), nearest_index(y))
    }
}

pub fn cell_center(index: u32) -> f32 {
    -GRID_HALF_EXTENT + GRID_SPACING * (index as f32 + 0.5)
}

/// Coordinate of lattice line `index`, for `index` in `0..=GRID_CELLS`.
pub fn lattice_line(index: u32) -> f32 {
    -GRID_HALF_EXTENT + GRID_SPACING * index as f32
}

pub fn lattice_lines() -> impl Iterator<Item = f32> {
    (0..=GRID_CELLS).map(lattice_line)
}

pub fn cells() -> impl Iterator<Item = GridCell> {
    (0..GRID_CELLS).flat_map(|x| (0..GRID_CELLS).map(move |y| GridCell::new(x, y)))
}

fn nearest_index(coord: f32) -> u32 {
    let raw = ((coord + GRID_HALF_EXTENT) / GRID_SPACING).floor();
    raw.clamp(0.0, (GRID_CELLS - 1) as f32) as u32
}
