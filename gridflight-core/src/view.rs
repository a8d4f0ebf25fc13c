use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scene::Rgb;

/// Window, camera and lighting used to present the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneView {
    pub title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub fovy_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub eye: [f32; 3],
    pub look_at: [f32; 3],
    pub up: [f32; 3],
    pub clear_color: Rgb,
    pub light_position: [f32; 3],
    pub light_diffuse: f32,
    pub ambient: f32,
}

impl Default for SceneView {
    fn default() -> Self {
        Self {
            title: "3D Drone Simulation - Random Grid Flight".to_string(),
            window_width: 800,
            window_height: 600,
            fovy_degrees: 45.0,
            z_near: 0.1,
            z_far: 50.0,
            eye: [0.0, -6.0, 4.0],
            look_at: [0.0, 0.0, 1.0],
            up: [0.0, 0.0, 1.0],
            clear_color: Rgb::gray(0.1),
            light_position: [5.0, 5.0, 5.0],
            light_diffuse: 1.0,
            ambient: 0.2,
        }
    }
}

impl SceneView {
    pub fn aspect(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::EmptyViewport {
                width: self.window_width,
                height: self.window_height,
            });
        }
        if !(self.z_near > 0.0 && self.z_near < self.z_far) {
            return Err(ConfigError::InvalidClipRange {
                near: self.z_near,
                far: self.z_far,
            });
        }
        if !self.fovy_degrees.is_finite() {
            return Err(ConfigError::NotFinite {
                name: "fovy_degrees",
            });
        }
        Ok(())
    }
}
