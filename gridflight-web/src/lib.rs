use fastrand::Rng;
use gridflight_core::{FlightState, MotionConfig, SceneView, draw_scene};
use log::{Level, debug, error, info, log_enabled, warn};
#[cfg(target_arch = "wasm32")]
use macroquad::miniquad;
use macroquad::prelude::*;

use crate::backend::{MacroquadBackend, to_color};

mod backend;
mod tessellate;

const FIXED_STEP_SECONDS: f32 = 1.0 / 60.0;
const MAX_STEPS_PER_FRAME: u32 = 4;
const FPS_LOG_INTERVAL_SECS: f64 = 5.0;
const OVERLAY_FONT_SIZE: f32 = 20.0;

pub fn window_conf() -> Conf {
    let view = SceneView::default();
    Conf {
        window_title: view.title.clone(),
        window_width: view.window_width as i32,
        window_height: view.window_height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

pub struct App {
    state: FlightState,
    rng: Rng,
    view: SceneView,
    camera: Camera3D,
    backend: MacroquadBackend,
    running: bool,
    fps: f32,
    fps_frame_count: u32,
    fps_last_update_time: f64,
    fps_last_log_time: f64,
}

impl App {
    pub fn new(view: SceneView, motion: MotionConfig, rng: Rng) -> Self {
        let camera = camera_for(&view);
        let backend = MacroquadBackend::new(&view);
        let now = get_time();
        Self {
            state: FlightState::new(motion),
            rng,
            view,
            camera,
            backend,
            running: true,
            fps: 0.0,
            fps_frame_count: 0,
            fps_last_update_time: now,
            fps_last_log_time: now,
        }
    }

    pub fn running(&self) -> bool {
        self.running
    }

    fn handle_input(&mut self) {
        if is_quit_requested() {
            self.stop("window close requested");
        } else if is_key_pressed(KeyCode::Escape) {
            self.stop("escape pressed");
        }
    }

    fn stop(&mut self, reason: &str) {
        if self.running {
            info!("stopping after {} frames: {}", self.state.frame, reason);
        }
        self.running = false;
    }

    fn fixed_update(&mut self) {
        let retargeted = self.state.step(&mut self.rng).is_some();
        if retargeted && log_enabled!(Level::Debug) {
            match self.state.snapshot_json() {
                Ok(json) => debug!("retarget {}", json),
                Err(err) => warn!("failed to serialize flight snapshot: {}", err),
            }
        }
    }

    fn update_fps_if_due(&mut self) {
        let now = get_time();
        self.fps_frame_count += 1;
        let elapsed = now - self.fps_last_update_time;
        if elapsed >= 1.0 {
            self.fps = self.fps_frame_count as f32 / elapsed as f32;
            self.fps_frame_count = 0;
            self.fps_last_update_time = now;
        }
        if now - self.fps_last_log_time >= FPS_LOG_INTERVAL_SECS {
            info!("frame {} at {:.1} fps", self.state.frame, self.fps);
            self.fps_last_log_time = now;
        }
    }

    fn render(&mut self) {
        clear_background(to_color(self.view.clear_color));

        set_camera(&self.camera);
        self.backend.begin_frame();
        draw_scene(&mut self.backend, &self.state);

        set_default_camera();
        self.draw_overlay();
    }

    fn draw_overlay(&self) {
        let cell = self.state.target_cell();
        let pose = self.state.pose();
        draw_text(
            &format!(
                "frame: {}  fps: {:.0}  target cell: {}, {}  yaw: {:.0}",
                self.state.frame, self.fps, cell.x, cell.y, pose.yaw
            ),
            16.0,
            28.0,
            OVERLAY_FONT_SIZE,
            LIGHTGRAY,
        );
    }
}

fn camera_for(view: &SceneView) -> Camera3D {
    Camera3D {
        position: Vec3::from(view.eye),
        target: Vec3::from(view.look_at),
        up: Vec3::from(view.up),
        fovy: view.fovy_degrees.to_radians(),
        aspect: Some(view.aspect()),
        projection: Projection::Perspective,
        z_near: view.z_near,
        z_far: view.z_far,
        ..Default::default()
    }
}

pub async fn run() {
    install_panic_hook();
    init_logging();

    let view = SceneView::default();
    let motion = MotionConfig::default();
    if let Err(err) = view.validate().and_then(|()| motion.validate()) {
        error!("invalid configuration: {}", err);
        return;
    }

    prevent_quit();
    let mut app = App::new(view, motion, Rng::new());
    info!(
        "starting {}x{} scene",
        app.view.window_width, app.view.window_height
    );
    let mut accumulator = 0.0_f32;

    while app.running() {
        app.handle_input();

        // Consume real elapsed time in fixed-size simulation steps.
        accumulator += get_frame_time();
        let mut steps = 0;
        while accumulator >= FIXED_STEP_SECONDS && steps < MAX_STEPS_PER_FRAME {
            app.fixed_update();
            accumulator -= FIXED_STEP_SECONDS;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_FRAME {
            // Drop the backlog after a stall instead of fast-forwarding through it.
            accumulator = accumulator.min(FIXED_STEP_SECONDS);
        }

        app.update_fps_if_due();
        app.render();

        next_frame().await;
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[cfg(target_arch = "wasm32")]
fn init_logging() {}

#[cfg(target_arch = "wasm32")]
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let msg = info.to_string();
        if let Some(location) = info.location() {
            miniquad::error!("panic at {}:{}: {}", location.file(), location.line(), msg);
        } else {
            miniquad::error!("panic: {}", msg);
        }
    }));
}

#[cfg(not(target_arch = "wasm32"))]
fn install_panic_hook() {}
