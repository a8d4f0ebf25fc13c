use gridflight_core::{Rgb, SceneBackend, SceneView};
use log::warn;
use macroquad::prelude::*;

use crate::tessellate::{self, Surface};

/// Model matrix stack with fixed-function push/translate/rotate/pop semantics.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    stack: Vec<Mat4>,
}

impl MatrixStack {
    pub fn new() -> Self {
        Self {
            stack: vec![Mat4::IDENTITY],
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn top(&self) -> Mat4 {
        self.stack.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    pub fn push(&mut self) {
        let top = self.top();
        self.stack.push(top);
    }

    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        } else {
            warn!("matrix stack underflow ignored");
        }
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.apply(Mat4::from_translation(offset));
    }

    pub fn rotate(&mut self, degrees: f32, axis: Vec3) {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        self.apply(Mat4::from_axis_angle(axis, degrees.to_radians()));
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.top().transform_point3(point)
    }

    pub fn transform_normal(&self, normal: Vec3) -> Vec3 {
        self.top().transform_vector3(normal).normalize_or_zero()
    }

    pub fn reset(&mut self) {
        self.stack.clear();
        self.stack.push(Mat4::IDENTITY);
    }

    fn apply(&mut self, matrix: Mat4) {
        let top = self.top();
        if let Some(last) = self.stack.last_mut() {
            *last = top * matrix;
        }
    }
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

/// One point light with ambient and diffuse terms; material color tracks the current color.
#[derive(Debug, Clone, Copy)]
pub struct Lighting {
    pub position: Vec3,
    pub diffuse: f32,
    pub ambient: f32,
}

impl Lighting {
    pub fn from_view(view: &SceneView) -> Self {
        Self {
            position: Vec3::from(view.light_position),
            diffuse: view.light_diffuse,
            ambient: view.ambient,
        }
    }

    pub fn shade(&self, base: Rgb, point: Vec3, normal: Vec3) -> Color {
        let to_light = (self.position - point).normalize_or_zero();
        let lambert = normal.dot(to_light).max(0.0);
        let factor = (self.ambient + self.diffuse * lambert).min(1.0);
        Color::new(base.r * factor, base.g * factor, base.b * factor, 1.0)
    }
}

pub fn to_color(rgb: Rgb) -> Color {
    Color::new(rgb.r, rgb.g, rgb.b, 1.0)
}

/// Draws scene primitives through macroquad's 3D mesh and line calls. Geometry
/// is transformed on the CPU so macroquad only ever sees world coordinates.
pub struct MacroquadBackend {
    matrices: MatrixStack,
    lighting: Lighting,
    color: Rgb,
}

impl MacroquadBackend {
    pub fn new(view: &SceneView) -> Self {
        Self {
            matrices: MatrixStack::new(),
            lighting: Lighting::from_view(view),
            color: Rgb::gray(1.0),
        }
    }

    /// Called at the start of each frame; a non-zero depth means a draw call leaked a push.
    pub fn begin_frame(&mut self) {
        if self.matrices.depth() != 0 {
            warn!(
                "matrix stack left at depth {} by previous frame",
                self.matrices.depth()
            );
            self.matrices.reset();
        }
    }

    fn vertex(&self, local: Vec3, local_normal: Vec3) -> Vertex {
        let world = self.matrices.transform_point(local);
        let normal = self.matrices.transform_normal(local_normal);
        let color = self.lighting.shade(self.color, world, normal);
        Vertex::new(world.x, world.y, world.z, 0.0, 0.0, color)
    }

    fn draw_surface(&self, surface: &Surface) {
        let vertices = surface
            .vertices
            .iter()
            .map(|v| self.vertex(v.position, v.normal))
            .collect();
        draw_mesh(&Mesh {
            vertices,
            indices: surface.indices.clone(),
            texture: None,
        });
    }

    fn draw_polygon(&self, corners: &[Vec3], indices: &[u16]) {
        let normal = face_normal(corners);
        let vertices = corners.iter().map(|&p| self.vertex(p, normal)).collect();
        draw_mesh(&Mesh {
            vertices,
            indices: indices.to_vec(),
            texture: None,
        });
    }
}

impl SceneBackend for MacroquadBackend {
    fn push_matrix(&mut self) {
        self.matrices.push();
    }

    fn pop_matrix(&mut self) {
        self.matrices.pop();
    }

    fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.matrices.translate(vec3(x, y, z));
    }

    fn rotate(&mut self, degrees: f32, axis: [f32; 3]) {
        self.matrices.rotate(degrees, Vec3::from(axis));
    }

    fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    fn line(&mut self, from: [f32; 3], to: [f32; 3]) {
        // lines take the default +Z normal, as in fixed-function GL
        let start = self.matrices.transform_point(Vec3::from(from));
        let end = self.matrices.transform_point(Vec3::from(to));
        let normal = self.matrices.transform_normal(Vec3::Z);
        let color = self.lighting.shade(self.color, (start + end) * 0.5, normal);
        draw_line_3d(start, end, color);
    }

    fn triangle(&mut self, vertices: [[f32; 3]; 3]) {
        let corners = vertices.map(Vec3::from);
        self.draw_polygon(&corners, &[0, 1, 2]);
    }

    fn quad(&mut self, vertices: [[f32; 3]; 4]) {
        let corners = vertices.map(Vec3::from);
        self.draw_polygon(&corners, &[0, 1, 2, 0, 2, 3]);
    }

    fn cylinder(
        &mut self,
        base_radius: f32,
        top_radius: f32,
        height: f32,
        slices: u32,
        stacks: u32,
    ) {
        let surface = tessellate::cylinder(base_radius, top_radius, height, slices, stacks);
        self.draw_surface(&surface);
    }

    fn disk(&mut self, inner_radius: f32, outer_radius: f32, slices: u32, loops: u32) {
        let surface = tessellate::disk(inner_radius, outer_radius, slices, loops);
        self.draw_surface(&surface);
    }

    fn sphere(&mut self, radius: f32, slices: u32, stacks: u32) {
        let surface = tessellate::sphere(radius, slices, stacks);
        self.draw_surface(&surface);
    }
}

fn face_normal(corners: &[Vec3]) -> Vec3 {
    match corners {
        [a, b, c, ..] => (*b - *a).cross(*c - *a).normalize_or_zero(),
        _ => Vec3::Z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_vec_close(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).length() < EPS,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn translate_then_rotate_composes_like_fixed_function() {
        let mut stack = MatrixStack::new();
        stack.translate(vec3(1.0, 0.0, 0.0));
        stack.rotate(90.0, Vec3::Z);

        // Rotation applies to the local point first, then the translation.
        assert_vec_close(stack.transform_point(vec3(1.0, 0.0, 0.0)), vec3(1.0, 1.0, 0.0));
    }

    #[test]
    fn pop_restores_parent_transform() {
        let mut stack = MatrixStack::new();
        stack.translate(vec3(0.0, 0.0, 2.0));
        stack.push();
        stack.translate(vec3(5.0, 0.0, 0.0));
        assert_eq!(stack.depth(), 1);
        stack.pop();

        assert_eq!(stack.depth(), 0);
        assert_vec_close(stack.transform_point(Vec3::ZERO), vec3(0.0, 0.0, 2.0));
    }

    #[test]
    fn underflow_keeps_base_matrix() {
        let mut stack = MatrixStack::new();
        stack.pop();
        stack.pop();
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.top(), Mat4::IDENTITY);
    }

    #[test]
    fn zero_axis_rotation_is_ignored() {
        let mut stack = MatrixStack::new();
        stack.rotate(45.0, Vec3::ZERO);
        assert_eq!(stack.top(), Mat4::IDENTITY);
    }

    #[test]
    fn normals_follow_rotation_only() {
        let mut stack = MatrixStack::new();
        stack.translate(vec3(3.0, 3.0, 3.0));
        stack.rotate(90.0, Vec3::Y);
        assert_vec_close(stack.transform_normal(Vec3::Z), Vec3::X);
    }

    #[test]
    fn shading_mixes_ambient_and_diffuse() {
        let lighting = Lighting::from_view(&SceneView::default());
        let base = Rgb::new(0.5, 0.5, 0.5);
        let point = vec3(0.0, 0.0, 0.0);

        let towards = (lighting.position - point).normalize();
        let lit = lighting.shade(base, point, towards);
        assert!((lit.r - 0.5).abs() < EPS);

        let dark = lighting.shade(base, point, -towards);
        assert!((dark.r - 0.1).abs() < EPS);
        assert_eq!(dark.a, 1.0);
    }

    #[test]
    fn face_normal_follows_winding() {
        let corners = [Vec3::ZERO, Vec3::X, Vec3::Y];
        assert_vec_close(face_normal(&corners), Vec3::Z);
        assert_eq!(face_normal(&[Vec3::ZERO]), Vec3::Z);
    }
}
