#![warn(missing_docs)]

//! Math types for the fieldcam SDF kernel.
//!
//! Thin wrappers around nalgebra providing the coordinate, transform and
//! bounding-box types shared by every pipeline stage.

mod bbox;

pub use bbox::{BoundingBox2, BoundingBox3};

use nalgebra::{Matrix3, Matrix4, Rotation3, Unit, Vector2, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in a 2D profile plane.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// Affine map in homogeneous coordinates.
///
/// Used to carry node bounds through the tree; field evaluation applies the
/// inverse mappings directly and never builds a matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Homogeneous 4x4 matrix, last row `[0, 0, 0, 1]`.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// The identity map.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Shift by `offset`.
    pub fn translation(offset: &Vec3) -> Self {
        Self {
            matrix: Matrix4::new_translation(offset),
        }
    }

    /// Per-axis scale about the origin.
    pub fn scale(factors: &Vec3) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(factors),
        }
    }

    /// Right-handed rotation by `angle` radians about `axis` through the origin.
    pub fn rotation_about_axis(axis: &Dir3, angle: f64) -> Self {
        Self {
            matrix: Rotation3::from_axis_angle(axis, angle).to_homogeneous(),
        }
    }

    /// Mirror across the plane through the origin with unit `normal`.
    pub fn reflection(normal: &Dir3) -> Self {
        let n = normal.into_inner();
        let householder = Matrix3::identity() - n * n.transpose() * 2.0;
        Self {
            matrix: householder.to_homogeneous(),
        }
    }

    /// `self` applied after `other`.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Map a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        self.matrix.transform_point(p)
    }

    /// Map a direction; translation is ignored.
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        self.matrix.transform_vector(v)
    }

    /// The inverse map, or `None` for a singular transform.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
