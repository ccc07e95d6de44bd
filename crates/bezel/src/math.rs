//! Math types, glam re-exports, and the model-view transform.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. [`TransformParameters`] holds the seven interactive
//! scalars and [`model_view_matrix`] turns them into the matrix the vertex
//! shader receives every frame.
//!
//! ## Composition Order
//!
//! ```text
//! M = T(camera) · T(position) · Rz · Ry · Rx · S(scale)
//! ```
//!
//! Read right to left for what happens to a model-space point: scale first,
//! then rotate about X, Y, Z, then translate. Rotations do not commute, so
//! this order is part of the viewer's behavior, not an implementation detail.

use serde::{Deserialize, Serialize};

pub use glam::{Mat4, Vec2, Vec3, Vec4};

/// Fixed offset that moves the model in front of the camera.
pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -3.0);

/// One of the seven interactive scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Parameter {
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
    Scale,
}

impl Parameter {
    /// All parameters, in control-panel order.
    pub const ALL: [Parameter; 7] = [
        Parameter::Scale,
        Parameter::PositionX,
        Parameter::PositionY,
        Parameter::PositionZ,
        Parameter::RotationX,
        Parameter::RotationY,
        Parameter::RotationZ,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Parameter::PositionX => "Position X",
            Parameter::PositionY => "Position Y",
            Parameter::PositionZ => "Position Z",
            Parameter::RotationX => "Rotation X",
            Parameter::RotationY => "Rotation Y",
            Parameter::RotationZ => "Rotation Z",
            Parameter::Scale => "Scale",
        }
    }

    pub fn is_rotation(self) -> bool {
        matches!(
            self,
            Parameter::RotationX | Parameter::RotationY | Parameter::RotationZ
        )
    }

    /// Slider range.
    pub fn range(self) -> std::ops::RangeInclusive<f32> {
        match self {
            Parameter::PositionX | Parameter::PositionY => -1.0..=1.0,
            Parameter::PositionZ => -2.0..=2.0,
            Parameter::RotationX | Parameter::RotationY | Parameter::RotationZ => 0.0..=360.0,
            Parameter::Scale => 0.1..=3.0,
        }
    }

    /// Digits after the decimal point when the value is displayed.
    pub fn decimals(self) -> usize {
        if self.is_rotation() { 0 } else { 2 }
    }

    /// Units per second a held key moves this parameter.
    pub fn nudge_rate(self) -> f32 {
        if self.is_rotation() { 90.0 } else { 1.0 }
    }

    /// Display text for `value` at this parameter's precision.
    pub fn format(self, value: f32) -> String {
        format!("{:.*}", self.decimals(), value)
    }
}

/// Position, rotation (degrees), and uniform scale of the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformParameters {
    pub position: Vec3,
    /// Euler angles in degrees, applied X then Y then Z.
    pub rotation: Vec3,
    pub scale: f32,
}

impl TransformParameters {
    /// Origin, no rotation, scale 1.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: 1.0,
    };

    pub fn get(&self, parameter: Parameter) -> f32 {
        match parameter {
            Parameter::PositionX => self.position.x,
            Parameter::PositionY => self.position.y,
            Parameter::PositionZ => self.position.z,
            Parameter::RotationX => self.rotation.x,
            Parameter::RotationY => self.rotation.y,
            Parameter::RotationZ => self.rotation.z,
            Parameter::Scale => self.scale,
        }
    }

    pub fn set(&mut self, parameter: Parameter, value: f32) {
        match parameter {
            Parameter::PositionX => self.position.x = value,
            Parameter::PositionY => self.position.y = value,
            Parameter::PositionZ => self.position.z = value,
            Parameter::RotationX => self.rotation.x = value,
            Parameter::RotationY => self.rotation.y = value,
            Parameter::RotationZ => self.rotation.z = value,
            Parameter::Scale => self.scale = value,
        }
    }

    /// Return a copy with `parameter` replaced.
    pub fn with(mut self, parameter: Parameter, value: f32) -> Self {
        self.set(parameter, value);
        self
    }

    /// Replace every non-finite component with its identity value.
    ///
    /// Returns the parameters that had to be replaced.
    pub fn sanitize(&mut self) -> Vec<Parameter> {
        let mut replaced = Vec::new();
        for parameter in Parameter::ALL {
            if !self.get(parameter).is_finite() {
                self.set(parameter, Self::IDENTITY.get(parameter));
                replaced.push(parameter);
            }
        }
        replaced
    }

    /// Compute the model-view matrix for these parameters.
    pub fn matrix(&self) -> Mat4 {
        model_view_matrix(self)
    }
}

impl Default for TransformParameters {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `T(camera) · T(position) · Rz · Ry · Rx · S`, angles in degrees.
pub fn model_view_matrix(params: &TransformParameters) -> Mat4 {
    let rotation = params.rotation;
    Mat4::IDENTITY
        * Mat4::from_translation(CAMERA_OFFSET)
        * Mat4::from_translation(params.position)
        * Mat4::from_rotation_z(rotation.z.to_radians())
        * Mat4::from_rotation_y(rotation.y.to_radians())
        * Mat4::from_rotation_x(rotation.x.to_radians())
        * Mat4::from_scale(Vec3::splat(params.scale))
}

/// Perspective projection with a vertical field of view in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub const DEFAULT: Self = Self {
        fov_y_degrees: 50.0,
        near: 0.1,
        far: 100.0,
    };

    /// Projection matrix for a `width × height` viewport (wgpu clip space).
    pub fn matrix(&self, width: u32, height: u32) -> Mat4 {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec3_eq(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "expected {b:?}, got {a:?}");
    }

    fn shifted_turned_doubled() -> TransformParameters {
        TransformParameters::IDENTITY
            .with(Parameter::PositionX, 1.0)
            .with(Parameter::RotationY, 90.0)
            .with(Parameter::Scale, 2.0)
    }

    #[test]
    fn origin_lands_at_translation() {
        let m = model_view_matrix(&shifted_turned_doubled());
        assert_vec3_eq(m.transform_point3(Vec3::ZERO), Vec3::new(1.0, 0.0, -3.0));
    }

    #[test]
    fn scale_then_rotate_then_translate() {
        let m = model_view_matrix(&shifted_turned_doubled());
        // (1,0,0) → scale 2 → (2,0,0) → 90° about Y → (0,0,-2) → + (1,0,-3)
        assert_vec3_eq(m.transform_point3(Vec3::X), Vec3::new(1.0, 0.0, -5.0));
    }

    #[test]
    fn matches_explicit_product() {
        let params = TransformParameters {
            position: Vec3::new(0.2, -0.4, 0.5),
            rotation: Vec3::new(30.0, 45.0, 60.0),
            scale: 1.5,
        };
        let translate = |t: Vec3| Mat4::from_cols(Vec4::X, Vec4::Y, Vec4::Z, t.extend(1.0));
        let expected = translate(CAMERA_OFFSET)
            * translate(params.position)
            * Mat4::from_axis_angle(Vec3::Z, 60f32.to_radians())
            * Mat4::from_axis_angle(Vec3::Y, 45f32.to_radians())
            * Mat4::from_axis_angle(Vec3::X, 30f32.to_radians())
            * Mat4::from_diagonal(Vec4::new(1.5, 1.5, 1.5, 1.0));
        assert!(model_view_matrix(&params).abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn rotation_order_is_observable() {
        let params = TransformParameters {
            rotation: Vec3::new(90.0, 90.0, 0.0),
            ..TransformParameters::IDENTITY
        };
        let p = model_view_matrix(&params).transform_point3(Vec3::Y) - CAMERA_OFFSET;
        // Rx first: Y → Z; then Ry: Z → X.
        assert_vec3_eq(p, Vec3::X);
    }

    #[test]
    fn identity_is_only_camera_offset() {
        let m = model_view_matrix(&TransformParameters::default());
        assert!(m.abs_diff_eq(Mat4::from_translation(CAMERA_OFFSET), 1e-6));
    }

    #[test]
    fn get_set_round_trip_each_parameter() {
        let mut params = TransformParameters::default();
        for (i, parameter) in Parameter::ALL.into_iter().enumerate() {
            params.set(parameter, i as f32 + 0.5);
        }
        for (i, parameter) in Parameter::ALL.into_iter().enumerate() {
            assert_eq!(params.get(parameter), i as f32 + 0.5);
        }
    }

    #[test]
    fn sanitize_replaces_non_finite() {
        let mut params = TransformParameters::IDENTITY
            .with(Parameter::Scale, f32::NAN)
            .with(Parameter::PositionZ, f32::INFINITY)
            .with(Parameter::RotationX, 12.0);
        let replaced = params.sanitize();
        assert_eq!(replaced, vec![Parameter::Scale, Parameter::PositionZ]);
        assert_eq!(params.scale, 1.0);
        assert_eq!(params.position.z, 0.0);
        assert_eq!(params.rotation.x, 12.0);
    }

    #[test]
    fn display_precision() {
        assert_eq!(Parameter::RotationY.format(49.6), "50");
        assert_eq!(Parameter::Scale.format(1.1234), "1.12");
        assert_eq!(Parameter::PositionY.format(-0.3), "-0.30");
    }

    #[test]
    fn projection_uses_fov_and_aspect() {
        let proj = Projection::default();
        let m = proj.matrix(800, 400);
        let expected = Mat4::perspective_rh(50f32.to_radians(), 2.0, 0.1, 100.0);
        assert!(m.abs_diff_eq(expected, 1e-6));
        // Zero-height viewport must not divide by zero.
        assert!(proj.matrix(800, 0).is_finite());
    }

    #[test]
    fn parameters_deserialize_with_defaults() {
        let params: TransformParameters = serde_json::from_str(r#"{ "scale": 2.0 }"#).unwrap();
        assert_eq!(params.scale, 2.0);
        assert_eq!(params.position, Vec3::ZERO);
    }
}
