//! Viewer configuration
//!
//! Loaded from a TOML file. Every field has a default, so an empty file (or
//! no file at all) gives the stock viewer.
//!
//! ```toml
//! [camera]
//! fov_degrees = 45.0
//! distance = 20.0
//! projection = "perspective"
//!
//! [controls]
//! translate_step = 0.1
//! scale_up = 1.01
//! scale_down = 0.99
//! rotate_step = 1.0
//!
//! [parser]
//! face_policy = "first-triangle"   # or "fan"
//!
//! [render]
//! mode = "wireframe"               # or "shaded"
//! target_fps = 30
//!
//! [logging]
//! level = "info"
//! file = "objview.log"
//! ```

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::parser::ParserOptions;
use crate::projection::{Camera, ProjectionMode};
use crate::transform::TransformSteps;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub controls: TransformSteps,
    pub parser: ParserOptions,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    /// Distance from the eye to the origin along +Z
    pub distance: f32,
    pub near: f32,
    pub far: f32,
    pub projection: ProjectionMode,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            distance: 20.0,
            near: 0.1,
            far: 100.0,
            projection: ProjectionMode::Perspective,
        }
    }
}

impl CameraConfig {
    /// Build a camera for a viewport of the given size
    pub fn camera(&self, width: u32, height: u32) -> Camera {
        let mut camera = Camera::new(width, height);
        camera.position = Point3::new(0.0, 0.0, self.distance);
        camera.fov = self.fov_degrees.to_radians();
        camera.near = self.near;
        camera.far = self.far;
        camera.mode = self.projection;
        camera
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Wireframe,
    Shaded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub mode: RenderMode,
    pub target_fps: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Wireframe,
            target_fps: 30,
        }
    }
}

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: "objview.log".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        let controls = &self.controls;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", "must be between 0 and 180"));
        }
        if !(camera.distance.is_finite() && camera.distance != 0.0) {
            return Err(invalid("camera.distance", "must be finite and non-zero"));
        }
        if !camera.far.is_finite() {
            return Err(invalid("camera.far", "must be finite"));
        }
        if !(camera.near > 0.0 && camera.near < camera.far) {
            return Err(invalid(
                "camera.near",
                "must be positive and less than camera.far",
            ));
        }
        if !controls.translate_step.is_finite() {
            return Err(invalid("controls.translate_step", "must be finite"));
        }
        if !controls.rotate_step.is_finite() {
            return Err(invalid("controls.rotate_step", "must be finite"));
        }
        if !(controls.scale_up > 0.0 && controls.scale_up.is_finite()) {
            return Err(invalid("controls.scale_up", "must be positive and finite"));
        }
        if !(controls.scale_down > 0.0 && controls.scale_down.is_finite()) {
            return Err(invalid("controls.scale_down", "must be positive and finite"));
        }
        if self.render.target_fps == 0 {
            return Err(invalid("render.target_fps", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::FacePolicy;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ViewerConfig::from_toml("").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.controls, TransformSteps::default());
        assert_eq!(config.parser.face_policy, FacePolicy::FirstTriangle);
    }

    #[test]
    fn test_partial_sections() {
        let config = ViewerConfig::from_toml(
            r#"
            [controls]
            rotate_step = 30.0

            [parser]
            face_policy = "fan"

            [render]
            mode = "shaded"

            [camera]
            projection = "orthographic"
            "#,
        )
        .unwrap();

        assert_eq!(config.controls.rotate_step, 30.0);
        assert_eq!(config.controls.translate_step, 0.1);
        assert_eq!(config.parser.face_policy, FacePolicy::Fan);
        assert_eq!(config.render.mode, RenderMode::Shaded);
        assert_eq!(config.camera.projection, ProjectionMode::Orthographic);
        assert_eq!(config.camera.distance, 20.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let cases = [
            ("[camera]\nnear = 10.0\nfar = 1.0\n", "camera.near"),
            ("[camera]\ndistance = 0.0\n", "camera.distance"),
            ("[camera]\ndistance = nan\n", "camera.distance"),
            ("[camera]\nfar = inf\n", "camera.far"),
            ("[controls]\ntranslate_step = nan\n", "controls.translate_step"),
            ("[controls]\nrotate_step = inf\n", "controls.rotate_step"),
            ("[controls]\nscale_up = inf\n", "controls.scale_up"),
            ("[controls]\nscale_down = 0.0\n", "controls.scale_down"),
            ("[render]\ntarget_fps = 0\n", "render.target_fps"),
        ];

        for (text, expected) in cases {
            match ViewerConfig::from_toml(text) {
                Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, expected),
                other => panic!("{} was not rejected: {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_negative_distance_is_allowed() {
        let config = ViewerConfig::from_toml("[camera]\ndistance = -20.0\n").unwrap();
        let view = config.camera.camera(80, 40).view_matrix();
        assert!(view.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_parse_error() {
        let err = ViewerConfig::from_toml("[camera\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_camera_from_config() {
        let config = CameraConfig {
            distance: 5.0,
            fov_degrees: 90.0,
            ..CameraConfig::default()
        };
        let camera = config.camera(100, 50);
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 5.0));
        assert!((camera.fov - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
    }
}
