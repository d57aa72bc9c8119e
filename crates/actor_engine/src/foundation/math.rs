//! Math utilities and types
//!
//! Provides the 2D math types used by the transform graph and the collision
//! shapes. Transforms are 3x3 homogeneous matrices acting on column vectors,
//! so `parent * child` applies the child first.

pub use nalgebra::{Matrix3, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// 3x3 homogeneous matrix for 2D affine transforms
pub type Mat3 = Matrix3<f32>;

/// Constructors and queries for 2D affine matrices
pub trait Mat3Ext {
    /// Pure translation
    fn translation(x: f32, y: f32) -> Mat3;

    /// Counter-clockwise rotation around the origin (radians)
    fn rotation(angle: f32) -> Mat3;

    /// Non-uniform scaling around the origin
    fn scaling(sx: f32, sy: f32) -> Mat3;

    /// Translation, then rotation, then scale, composed in TRS order
    fn from_trs(translation: Vec2, angle: f32, scale: Vec2) -> Mat3;

    /// Translation column of the matrix
    fn translation_part(&self) -> Vec2;

    /// Transform a point, applying translation
    fn apply_point(&self, x: f32, y: f32) -> Point2;
}

impl Mat3Ext for Mat3 {
    fn translation(x: f32, y: f32) -> Mat3 {
        Mat3::new_translation(&Vec2::new(x, y))
    }

    fn rotation(angle: f32) -> Mat3 {
        Mat3::new_rotation(angle)
    }

    fn scaling(sx: f32, sy: f32) -> Mat3 {
        Mat3::new_nonuniform_scaling(&Vec2::new(sx, sy))
    }

    fn from_trs(translation: Vec2, angle: f32, scale: Vec2) -> Mat3 {
        Mat3::new_translation(&translation)
            * Mat3::new_rotation(angle)
            * Mat3::new_nonuniform_scaling(&scale)
    }

    fn translation_part(&self) -> Vec2 {
        Vec2::new(self.m13, self.m23)
    }

    fn apply_point(&self, x: f32, y: f32) -> Point2 {
        self.transform_point(&Point2::new(x, y))
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}
