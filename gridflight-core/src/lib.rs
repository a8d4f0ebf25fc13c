pub mod error;
pub mod flight;
pub mod grid;
pub mod motion;
pub mod pose;
pub mod propeller;
pub mod random;
pub mod scene;
pub mod view;

pub use error::ConfigError;
pub use flight::{FlightSnapshot, FlightState};
pub use grid::{GRID_CELLS, GRID_HALF_EXTENT, GRID_SPACING, GridCell};
pub use motion::{MotionConfig, MotionController};
pub use pose::Pose;
pub use propeller::{PROPELLER_STEP_DEGREES, Propeller};
pub use random::RandomSource;
pub use scene::{Rgb, SceneBackend, TransformScope, draw_scene};
pub use view::SceneView;
