//! Triangle meshes for the GLU-style quadrics used by the scene.

use macroquad::prelude::{Vec3, vec3};
use std::f32::consts::{PI, TAU};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceVertex {
    pub position: Vec3,
    pub normal: Vec3,
}

#[derive(Debug, Clone, Default)]
pub struct Surface {
    pub vertices: Vec<SurfaceVertex>,
    pub indices: Vec<u16>,
}

impl Surface {
    fn with_grid(columns: u32, rows: u32) -> Self {
        let vertex_count = ((columns + 1) * (rows + 1)) as usize;
        Self {
            vertices: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity((columns * rows * 6) as usize),
        }
    }

    /// Connects a `(columns + 1) x (rows + 1)` vertex lattice, row-major, into triangles.
    fn stitch(&mut self, columns: u32, rows: u32) {
        let stride = columns + 1;
        for row in 0..rows {
            for column in 0..columns {
                let a = (row * stride + column) as u16;
                let b = a + 1;
                let c = a + stride as u16;
                let d = c + 1;
                self.indices.extend_from_slice(&[a, b, d, a, d, c]);
            }
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Open tube from `z = 0` to `z = height`, radius blending from `base` to `top`.
pub fn cylinder(base: f32, top: f32, height: f32, slices: u32, stacks: u32) -> Surface {
    let slices = slices.max(3);
    let stacks = stacks.max(1);
    let mut surface = Surface::with_grid(slices, stacks);
    let slope = if height.abs() > f32::EPSILON {
        (base - top) / height
    } else {
        0.0
    };

    for stack in 0..=stacks {
        let t = stack as f32 / stacks as f32;
        let radius = base + (top - base) * t;
        let z = height * t;
        for slice in 0..=slices {
            let angle = TAU * slice as f32 / slices as f32;
            let (sin, cos) = angle.sin_cos();
            surface.vertices.push(SurfaceVertex {
                position: vec3(radius * cos, radius * sin, z),
                normal: vec3(cos, sin, slope).normalize_or_zero(),
            });
        }
    }

    surface.stitch(slices, stacks);
    surface
}

/// Flat annulus in the `z = 0` plane facing +Z.
pub fn disk(inner: f32, outer: f32, slices: u32, loops: u32) -> Surface {
    let slices = slices.max(3);
    let loops = loops.max(1);
    let mut surface = Surface::with_grid(slices, loops);

    for ring in 0..=loops {
        let radius = inner + (outer - inner) * ring as f32 / loops as f32;
        for slice in 0..=slices {
            let angle = TAU * slice as f32 / slices as f32;
            let (sin, cos) = angle.sin_cos();
            surface.vertices.push(SurfaceVertex {
                position: vec3(radius * cos, radius * sin, 0.0),
                normal: Vec3::Z,
            });
        }
    }

    surface.stitch(slices, loops);
    surface
}

pub fn sphere(radius: f32, slices: u32, stacks: u32) -> Surface {
    let slices = slices.max(3);
    let stacks = stacks.max(2);
    let mut surface = Surface::with_grid(slices, stacks);

    for stack in 0..=stacks {
        // from the south pole up
        let polar = PI - PI * stack as f32 / stacks as f32;
        let (ring_sin, ring_cos) = polar.sin_cos();
        for slice in 0..=slices {
            let angle = TAU * slice as f32 / slices as f32;
            let (sin, cos) = angle.sin_cos();
            let normal = vec3(ring_sin * cos, ring_sin * sin, ring_cos);
            surface.vertices.push(SurfaceVertex {
                position: normal * radius,
                normal,
            });
        }
    }

    surface.stitch(slices, stacks);
    surface
}
