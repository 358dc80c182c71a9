/// Model transform helpers.
///
/// Operations compose on the right (`m * op`), so each one acts in the
/// object's local frame, the way a model-view matrix accumulates.
use nalgebra::{Matrix4, Unit, Vector3};

/// Column-major position of the translation Y component (element 13).
pub const TRANSLATION_Y: (usize, usize) = (1, 3);

const AXIS_EPSILON: f64 = 1e-6;

pub struct Transform;

impl Transform {
    /// Identity moved to `translation`
    pub fn placed_at(translation: &Vector3<f64>) -> Matrix4<f64> {
        Matrix4::new_translation(translation)
    }

    /// Compose a rotation of `angle` radians about `axis`.
    ///
    /// The axis is normalized; a zero-length axis leaves `m` unchanged.
    pub fn rotate(m: &Matrix4<f64>, angle: f64, axis: &Vector3<f64>) -> Matrix4<f64> {
        match Unit::try_new(*axis, AXIS_EPSILON) {
            Some(axis) => m * Matrix4::from_axis_angle(&axis, angle),
            None => *m,
        }
    }

    pub fn translation(m: &Matrix4<f64>) -> Vector3<f64> {
        Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
    }

    pub fn translation_y(m: &Matrix4<f64>) -> f64 {
        m[TRANSLATION_Y]
    }

    /// Narrow to the precision uploaded as a uniform
    pub fn to_gpu(m: &Matrix4<f64>) -> Matrix4<f32> {
        m.cast::<f32>()
    }
}
