//! Immediate-mode description of the ground grid and the quadcopter model.
//!
//! Drawing goes through [`SceneBackend`], a fixed-function style contract with a
//! matrix stack and GLU-like quadrics (cylinders grow along local +Z from the
//! origin). The functions here hold no state of their own.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::flight::FlightState;
use crate::grid::{self, GRID_HALF_EXTENT};
use crate::pose::Pose;

pub const X_AXIS: [f32; 3] = [1.0, 0.0, 0.0];
pub const Y_AXIS: [f32; 3] = [0.0, 1.0, 0.0];
pub const Z_AXIS: [f32; 3] = [0.0, 0.0, 1.0];

pub const ARM_LENGTH: f32 = 1.0;
pub const ARM_RADIUS: f32 = 0.1;
pub const HUB_RADIUS: f32 = 0.4;
pub const MOTOR_RADIUS: f32 = 0.15;
pub const MOTOR_HEIGHT: f32 = 0.1;
pub const BLADE_COUNT: u32 = 3;
pub const BLADE_LENGTH: f32 = 0.5;
pub const BLADE_HALF_WIDTH: f32 = 0.1;
pub const MARKER_HALF_SIZE: f32 = 0.05;
pub const MARKER_LIFT: f32 = 0.01;

pub const GRID_LINE_COLOR: Rgb = Rgb::gray(0.5);
pub const MARKER_COLOR: Rgb = Rgb::gray(0.8);
pub const HUB_COLOR: Rgb = Rgb::new(0.3, 0.3, 0.8);
pub const ARM_COLOR: Rgb = Rgb::new(0.7, 0.3, 0.3);
pub const SENSOR_COLOR: Rgb = Rgb::gray(0.2);
pub const MOTOR_COLOR: Rgb = Rgb::gray(0.2);
pub const CAP_COLOR: Rgb = Rgb::gray(0.5);
pub const BLADE_COLOR: Rgb = Rgb::gray(0.7);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(level: f32) -> Self {
        Self::new(level, level, level)
    }
}

pub trait SceneBackend {
    fn push_matrix(&mut self);
    fn pop_matrix(&mut self);
    fn translate(&mut self, x: f32, y: f32, z: f32);
    /// Rotates the current matrix by `degrees` about `axis`.
    fn rotate(&mut self, degrees: f32, axis: [f32; 3]);
    fn set_color(&mut self, color: Rgb);
    fn line(&mut self, from: [f32; 3], to: [f32; 3]);
    fn triangle(&mut self, vertices: [[f32; 3]; 3]);
    fn quad(&mut self, vertices: [[f32; 3]; 4]);
    fn cylinder(
        &mut self,
        base_radius: f32,
        top_radius: f32,
        height: f32,
        slices: u32,
        stacks: u32,
    );
    fn disk(&mut self, inner_radius: f32, outer_radius: f32, slices: u32, loops: u32);
    fn sphere(&mut self, radius: f32, slices: u32, stacks: u32);
}

/// Pushes the backend's matrix stack on creation and pops it when dropped.
pub struct TransformScope<'a, B: SceneBackend + ?Sized> {
    backend: &'a mut B,
}

impl<'a, B: SceneBackend + ?Sized> TransformScope<'a, B> {
    pub fn new(backend: &'a mut B) -> Self {
        backend.push_matrix();
        Self { backend }
    }
}

impl<B: SceneBackend + ?Sized> Deref for TransformScope<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.backend
    }
}

impl<B: SceneBackend + ?Sized> DerefMut for TransformScope<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.backend
    }
}

impl<B: SceneBackend + ?Sized> Drop for TransformScope<'_, B> {
    fn drop(&mut self) {
        self.backend.pop_matrix();
    }
}

pub fn draw_scene<B: SceneBackend + ?Sized>(backend: &mut B, state: &FlightState) {
    draw_grid(backend);
    draw_drone(backend, state.pose(), state.propeller_angle());
}

/// Lattice lines between cells plus a small marker on every cell center.
pub fn draw_grid<B: SceneBackend + ?Sized>(backend: &mut B) {
    let mut scope = TransformScope::new(backend);
    scope.set_color(GRID_LINE_COLOR);

    for offset in grid::lattice_lines() {
        scope.line(
            [-GRID_HALF_EXTENT, offset, 0.0],
            [GRID_HALF_EXTENT, offset, 0.0],
        );
        scope.line(
            [offset, -GRID_HALF_EXTENT, 0.0],
            [offset, GRID_HALF_EXTENT, 0.0],
        );
    }

    for cell in grid::cells() {
        let (x, y) = cell.center();
        let mut marker = TransformScope::new(&mut *scope);
        marker.translate(x, y, MARKER_LIFT);
        marker.set_color(MARKER_COLOR);
        let h = MARKER_HALF_SIZE;
        marker.quad([[-h, -h, 0.0], [h, -h, 0.0], [h, h, 0.0], [-h, h, 0.0]]);
    }
}

/// Draws the whole drone at `pose`. Rotations apply pitch, then yaw, then roll.
pub fn draw_drone<B: SceneBackend + ?Sized>(backend: &mut B, pose: &Pose, propeller_angle: f32) {
    let mut scope = TransformScope::new(backend);
    let [x, y, z] = pose.position;
    scope.translate(x, y, z);
    scope.rotate(pose.pitch, X_AXIS);
    scope.rotate(pose.yaw, Y_AXIS);
    scope.rotate(pose.roll, Z_AXIS);

    draw_drone_body(&mut *scope);

    for mount in [
        [ARM_LENGTH, 0.0, 0.0],
        [-ARM_LENGTH, 0.0, 0.0],
        [0.0, ARM_LENGTH, 0.0],
        [0.0, -ARM_LENGTH, 0.0],
    ] {
        draw_motor(&mut *scope, mount, propeller_angle);
    }
}

pub fn draw_drone_body<B: SceneBackend + ?Sized>(backend: &mut B) {
    let mut scope = TransformScope::new(backend);
    scope.set_color(HUB_COLOR);
    scope.sphere(HUB_RADIUS, 16, 16);

    scope.set_color(ARM_COLOR);
    for arm in 0..4 {
        let mut heading = TransformScope::new(&mut *scope);
        heading.rotate(arm as f32 * 90.0, Z_AXIS);

        let mut tube = TransformScope::new(&mut *heading);
        tube.rotate(90.0, Y_AXIS);
        tube.cylinder(ARM_RADIUS, ARM_RADIUS, ARM_LENGTH, 8, 4);
    }

    // camera pod under the hub
    scope.set_color(SENSOR_COLOR);
    scope.translate(0.0, 0.0, -HUB_RADIUS);
    scope.cylinder(0.2, 0.1, 0.2, 16, 4);
}

/// Motor housing, cap and blades at `position` in drone space.
pub fn draw_motor<B: SceneBackend + ?Sized>(
    backend: &mut B,
    position: [f32; 3],
    propeller_angle: f32,
) {
    let mut scope = TransformScope::new(backend);
    let [x, y, z] = position;
    scope.translate(x, y, z);
    scope.set_color(MOTOR_COLOR);
    scope.cylinder(MOTOR_RADIUS, MOTOR_RADIUS, MOTOR_HEIGHT, 16, 8);

    scope.translate(0.0, 0.0, MOTOR_HEIGHT);
    scope.set_color(CAP_COLOR);
    scope.disk(0.0, MOTOR_RADIUS, 16, 1);

    scope.rotate(propeller_angle, Z_AXIS);
    scope.set_color(BLADE_COLOR);
    let spacing = 360.0 / BLADE_COUNT as f32;
    for _ in 0..BLADE_COUNT {
        scope.rotate(spacing, Z_AXIS);
        scope.triangle([
            [0.0, 0.0, 0.0],
            [BLADE_LENGTH, BLADE_HALF_WIDTH, 0.0],
            [BLADE_LENGTH, -BLADE_HALF_WIDTH, 0.0],
        ]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    #[derive(Debug, Clone, PartialEq)]
    enum Command {
        Push,
        Pop,
        Translate([f32; 3]),
        Rotate(f32, [f32; 3]),
        Color(Rgb),
        Line,
        Triangle,
        Quad,
        Cylinder(f32, f32, f32),
        Disk(f32),
        Sphere(f32),
    }

    #[derive(Default)]
    struct Recorder {
        commands: Vec<Command>,
        depth: i32,
        max_depth: i32,
        fail_on_sphere: bool,
    }

    impl Recorder {
        fn count(&self, wanted: fn(&Command) -> bool) -> usize {
            self.commands.iter().filter(|command| wanted(command)).count()
        }
    }

    impl SceneBackend for Recorder {
        fn push_matrix(&mut self) {
            self.depth += 1;
            self.max_depth = self.max_depth.max(self.depth);
            self.commands.push(Command::Push);
        }

        fn pop_matrix(&mut self) {
            self.depth -= 1;
            self.commands.push(Command::Pop);
        }

        fn translate(&mut self, x: f32, y: f32, z: f32) {
            self.commands.push(Command::Translate([x, y, z]));
        }

        fn rotate(&mut self, degrees: f32, axis: [f32; 3]) {
            self.commands.push(Command::Rotate(degrees, axis));
        }

        fn set_color(&mut self, color: Rgb) {
            self.commands.push(Command::Color(color));
        }

        fn line(&mut self, _from: [f32; 3], _to: [f32; 3]) {
            self.commands.push(Command::Line);
        }

        fn triangle(&mut self, _vertices: [[f32; 3]; 3]) {
            self.commands.push(Command::Triangle);
        }

        fn quad(&mut self, _vertices: [[f32; 3]; 4]) {
            self.commands.push(Command::Quad);
        }

        fn cylinder(&mut self, base: f32, top: f32, height: f32, _slices: u32, _stacks: u32) {
            self.commands.push(Command::Cylinder(base, top, height));
        }

        fn disk(&mut self, _inner: f32, outer: f32, _slices: u32, _loops: u32) {
            self.commands.push(Command::Disk(outer));
        }

        fn sphere(&mut self, radius: f32, _slices: u32, _stacks: u32) {
            if self.fail_on_sphere {
                panic!("sphere unavailable");
            }
            self.commands.push(Command::Sphere(radius));
        }
    }

    #[test]
    fn grid_draws_lattice_and_markers() {
        let mut recorder = Recorder::default();
        draw_grid(&mut recorder);

        assert_eq!(recorder.depth, 0);
        assert_eq!(recorder.count(|c| matches!(c, Command::Line)), 10);
        assert_eq!(recorder.count(|c| matches!(c, Command::Quad)), 16);
        assert!(recorder.commands.contains(&Command::Translate([-1.5, -1.5, 0.01])));
        assert!(recorder.commands.contains(&Command::Translate([1.5, 1.5, 0.01])));
    }

    #[test]
    fn drone_transform_order_is_translate_pitch_yaw_roll() {
        let mut recorder = Recorder::default();
        let pose = Pose::new([0.5, -0.5, 1.2], 3.0, 200.0, -4.0);
        draw_drone(&mut recorder, &pose, 45.0);

        assert_eq!(
            &recorder.commands[..5],
            &[
                Command::Push,
                Command::Translate([0.5, -0.5, 1.2]),
                Command::Rotate(3.0, X_AXIS),
                Command::Rotate(200.0, Y_AXIS),
                Command::Rotate(-4.0, Z_AXIS),
            ]
        );
        assert_eq!(recorder.commands.last(), Some(&Command::Pop));
    }

    #[test]
    fn drone_has_hub_arms_sensor_and_four_motors() {
        let mut recorder = Recorder::default();
        draw_drone(&mut recorder, &Pose::at([0.0, 0.0, 1.0]), 0.0);

        assert_eq!(recorder.count(|c| matches!(c, Command::Sphere(_))), 1);
        let arms = recorder.count(
            |c| matches!(c, Command::Cylinder(r, _, l) if *r == ARM_RADIUS && *l == ARM_LENGTH),
        );
        assert_eq!(arms, 4);
        assert_eq!(
            recorder.count(|c| matches!(c, Command::Cylinder(r, _, _) if *r == MOTOR_RADIUS)),
            4
        );
        assert!(recorder.commands.contains(&Command::Cylinder(0.2, 0.1, 0.2)));
        assert_eq!(recorder.count(|c| matches!(c, Command::Disk(_))), 4);
        assert_eq!(recorder.count(|c| matches!(c, Command::Triangle)), 12);
        for mount in [[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, -1.0, 0.0]] {
            assert!(recorder.commands.contains(&Command::Translate(mount)));
        }
    }

    #[test]
    fn motor_spins_blades_from_shared_angle() {
        let mut recorder = Recorder::default();
        draw_motor(&mut recorder, [1.0, 0.0, 0.0], 75.0);

        let rotations: Vec<f32> = recorder
            .commands
            .iter()
            .filter_map(|c| match c {
                Command::Rotate(degrees, axis) if *axis == Z_AXIS => Some(*degrees),
                _ => None,
            })
            .collect();
        assert_eq!(rotations, vec![75.0, 120.0, 120.0, 120.0]);
    }

    #[test]
    fn every_draw_call_leaves_stack_depth_unchanged() {
        let pose = Pose::new([1.0, 1.0, 1.3], 10.0, 90.0, 5.0);
        let draws: [fn(&mut Recorder); 4] = [
            |r| draw_grid(r),
            |r| draw_drone_body(r),
            |r| draw_motor(r, [0.0, 1.0, 0.0], 30.0),
            |r| draw_drone(r, &Pose::at([0.0, 0.0, 1.0]), 15.0),
        ];
        for draw in draws {
            let mut recorder = Recorder::default();
            draw(&mut recorder);
            assert_eq!(recorder.depth, 0);
            assert_eq!(
                recorder.count(|c| matches!(c, Command::Push)),
                recorder.count(|c| matches!(c, Command::Pop))
            );
        }

        let mut recorder = Recorder::default();
        draw_drone(&mut recorder, &pose, 0.0);
        assert_eq!(recorder.max_depth, 4);
    }

    #[test]
    fn stack_unwinds_when_backend_panics() {
        let mut recorder = Recorder {
            fail_on_sphere: true,
            ..Recorder::default()
        };
        let result = catch_unwind(AssertUnwindSafe(|| {
            draw_drone(&mut recorder, &Pose::at([0.0, 0.0, 1.0]), 0.0)
        }));

        assert!(result.is_err());
        assert_eq!(recorder.depth, 0);
    }

    #[test]
    fn scene_draws_grid_before_drone() {
        let mut recorder = Recorder::default();
        let state = FlightState::default();
        draw_scene(&mut recorder, &state);

        let first_line = recorder.commands.iter().position(|c| *c == Command::Line);
        let first_sphere = recorder
            .commands
            .iter()
            .position(|c| matches!(c, Command::Sphere(_)));
        assert!(first_line < first_sphere);
        assert_eq!(recorder.depth, 0);
    }
}
