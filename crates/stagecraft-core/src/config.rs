use crate::errors::ConfigError;
use crate::types::Color;
use serde::{Deserialize, Serialize};

/// Director settings. Every field has a default, so partial JSON is accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    pub width: u32,
    pub height: u32,
    /// Frame rate used when the clock is driven in fixed steps.
    pub fps: u32,
    /// Track changed screen regions and skip painting untouched actors.
    pub dirty_rects: bool,
    pub clear_color: Color,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fps: 60,
            dirty_rects: false,
            clear_color: Color::BLACK,
        }
    }
}

impl DirectorConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "viewport must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be positive".into()));
        }
        Ok(())
    }

    /// Milliseconds per fixed step.
    pub fn frame_duration(&self) -> f64 {
        1000.0 / f64::from(self.fps.max(1))
    }
}
