use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroDwell,
    RateOutOfRange { name: &'static str, value: f32 },
    NotFinite { name: &'static str },
    NegativeSpan(f32),
    EmptyViewport { width: u32, height: u32 },
    InvalidClipRange { near: f32, far: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroDwell => write!(f, "dwell time must be at least one frame"),
            ConfigError::RateOutOfRange { name, value } => {
                write!(f, "{name} must be in (0, 1], got {value}")
            }
            ConfigError::NotFinite { name } => write!(f, "{name} must be finite"),
            ConfigError::NegativeSpan(span) => {
                write!(f, "hover span must not be negative, got {span}")
            }
            ConfigError::EmptyViewport { width, height } => {
                write!(f, "window size {width}x{height} has no area")
            }
            ConfigError::InvalidClipRange { near, far } => {
                write!(f, "clip range requires 0 < near < far, got near {near} far {far}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
