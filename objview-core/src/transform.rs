/// Model transform state and matrix builders
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

/// Discrete input commands that adjust the model transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Command {
    TranslateUp,
    TranslateDown,
    TranslateLeft,
    TranslateRight,
    ScaleUp,
    ScaleDown,
    Rotate,
    RotateBack,
}

/// Per-command increments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformSteps {
    /// Translation per command, in model units
    pub translate_step: f32,
    /// Scale multiplier for ScaleUp
    pub scale_up: f32,
    /// Scale multiplier for ScaleDown
    pub scale_down: f32,
    /// Rotation per command, in degrees
    pub rotate_step: f32,
}

impl Default for TransformSteps {
    fn default() -> Self {
        Self {
            translate_step: 0.1,
            scale_up: 1.01,
            scale_down: 0.99,
            rotate_step: 1.0,
        }
    }
}

/// Translation, rotation about Z (degrees) and scale of the model.
///
/// Nothing is clamped or normalized: translation and angle accumulate
/// without bound and scale compounds geometrically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub translation: Vector3<f32>,
    pub rotation_degrees: f32,
    pub scale: Vector3<f32>,
    steps: TransformSteps,
}

impl TransformState {
    pub fn new(steps: TransformSteps) -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation_degrees: 0.0,
            scale: Vector3::new(1.0, 1.0, 1.0),
            steps,
        }
    }

    pub fn steps(&self) -> &TransformSteps {
        &self.steps
    }

    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.translation += delta;
    }

    pub fn scale_by(&mut self, factor: f32) {
        self.scale *= factor;
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.rotation_degrees += degrees;
    }

    pub fn apply(&mut self, command: Command) {
        let step = self.steps.translate_step;
        match command {
            Command::TranslateUp => self.translate(Vector3::new(0.0, step, 0.0)),
            Command::TranslateDown => self.translate(Vector3::new(0.0, -step, 0.0)),
            Command::TranslateLeft => self.translate(Vector3::new(-step, 0.0, 0.0)),
            Command::TranslateRight => self.translate(Vector3::new(step, 0.0, 0.0)),
            Command::ScaleUp => self.scale_by(self.steps.scale_up),
            Command::ScaleDown => self.scale_by(self.steps.scale_down),
            Command::Rotate => self.rotate(self.steps.rotate_step),
            Command::RotateBack => self.rotate(-self.steps.rotate_step),
        }
    }

    /// `T * R * S`: scale first, then rotate, then translate
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Transform::translation_matrix(self.translation.x, self.translation.y, self.translation.z)
            * Transform::rotation_z_matrix(self.rotation_degrees)
            * Transform::scale_matrix(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::new(TransformSteps::default())
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation about the Z axis
    pub fn rotation_z_matrix(degrees: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(0.0, 0.0, degrees.to_radians()))
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}
