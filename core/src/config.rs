use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings of a viewer session.
///
/// Every field has a default, so a JSON file only needs to name what it changes:
///
/// ```
/// use modeller::ViewerConfig;
///
/// let config = ViewerConfig::from_json_str(r#"{ "width": 1024, "fovy": 60.0 }"#).unwrap();
/// assert_eq!(config.width, 1024);
/// assert_eq!(config.height, 480);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Initial viewport width in pixels.
    pub width: u32,
    /// Initial viewport height in pixels.
    pub height: u32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Distance the eye sits back from the scene origin.
    pub eye_distance: f32,
    /// Initial trackball tilt in degrees.
    pub trackball_theta: f32,
    pub trackball_distance: f32,
    /// Pixels of middle-button drag per unit of camera pan.
    pub pan_sensitivity: f32,
    /// Camera translation along z per wheel step.
    pub wheel_step: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fovy: 70.0,
            znear: 0.1,
            zfar: 1000.0,
            eye_distance: 15.0,
            trackball_theta: -25.0,
            trackball_distance: 15.0,
            pan_sensitivity: 60.0,
            wheel_step: 1.0,
        }
    }
}

impl ViewerConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::debug!("loaded viewer config from {:?}", path);
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the values a perspective projection and the pan mapping rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} has no area",
                self.width, self.height
            )));
        }
        if !(self.fovy > 0.0 && self.fovy < 180.0) {
            return Err(ConfigError::Invalid(format!("fovy {} is outside (0, 180)", self.fovy)));
        }
        if !(self.znear > 0.0 && self.zfar > self.znear) {
            return Err(ConfigError::Invalid(format!(
                "clip planes need 0 < znear < zfar, got {} and {}",
                self.znear, self.zfar
            )));
        }
        if !(self.eye_distance.is_finite() && self.eye_distance > self.znear) {
            return Err(ConfigError::Invalid(format!(
                "eye distance {} must be finite and beyond znear {}",
                self.eye_distance, self.znear
            )));
        }
        if !self.zfar.is_finite() {
            return Err(ConfigError::Invalid(format!("zfar {} must be finite", self.zfar)));
        }
        if !(self.trackball_theta.is_finite() && self.trackball_distance.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "trackball theta {} and distance {} must be finite",
                self.trackball_theta, self.trackball_distance
            )));
        }
        if !self.wheel_step.is_finite() {
            return Err(ConfigError::Invalid(format!("wheel step {} must be finite", self.wheel_step)));
        }
        if !(self.pan_sensitivity.is_finite() && self.pan_sensitivity != 0.0) {
            return Err(ConfigError::Invalid(format!(
                "pan sensitivity {} must be finite and non-zero",
                self.pan_sensitivity
            )));
        }
        Ok(())
    }
}
