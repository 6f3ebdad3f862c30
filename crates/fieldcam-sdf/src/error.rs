//! Validation errors raised while constructing SDF nodes.

use thiserror::Error;

use fieldcam_math::{Point2, Vec3};

/// Errors from node and profile construction.
///
/// Evaluation never fails; every malformed parameter is rejected here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SdfError {
    /// A length parameter (radius, height, thickness) is zero, negative or NaN.
    #[error("{name} must be positive, got {value}")]
    NonPositive {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A parameter that may be zero is negative.
    #[error("{name} must not be negative, got {value}")]
    Negative {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A parameter is infinite or NaN.
    #[error("{0} must be finite")]
    NonFinite(&'static str),

    /// A direction (axis, normal) has zero length.
    #[error("{0} must have non-zero length")]
    ZeroVector(&'static str),

    /// A stored direction is not unit length.
    #[error("{0} must be a unit vector")]
    NotUnit(&'static str),

    /// A parameter lies outside its allowed range.
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Exclusive lower limit.
        min: f64,
        /// Exclusive upper limit.
        max: f64,
    },

    /// A polygon loop has too few vertices.
    #[error("polygon needs at least 3 vertices, got {0}")]
    EmptyPolygon(usize),
}

/// Result type for node construction.
pub type Result<T> = std::result::Result<T, SdfError>;

pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() && !value.is_nan() {
        return Err(SdfError::NonFinite(name));
    }
    if value > 0.0 {
        Ok(value)
    } else {
        Err(SdfError::NonPositive { name, value })
    }
}

pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(SdfError::NonFinite(name));
    }
    if value < 0.0 {
        return Err(SdfError::Negative { name, value });
    }
    Ok(value)
}

pub(crate) fn finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SdfError::NonFinite(name))
    }
}

pub(crate) fn finite_vec(name: &'static str, v: Vec3) -> Result<Vec3> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(v)
    } else {
        Err(SdfError::NonFinite(name))
    }
}

pub(crate) fn finite_point2(name: &'static str, p: Point2) -> Result<Point2> {
    if p.x.is_finite() && p.y.is_finite() {
        Ok(p)
    } else {
        Err(SdfError::NonFinite(name))
    }
}

/// Normalize a direction, rejecting zero and non-finite vectors.
pub(crate) fn unit(name: &'static str, v: Vec3) -> Result<Vec3> {
    let v = finite_vec(name, v)?;
    let len = v.norm();
    if len <= f64::EPSILON {
        return Err(SdfError::ZeroVector(name));
    }
    Ok(v / len)
}

/// Check an already-normalised direction.
pub(crate) fn unit_length(name: &'static str, v: &Vec3) -> Result<()> {
    finite_vec(name, *v)?;
    if (v.norm() - 1.0).abs() > UNIT_TOLERANCE {
        return Err(SdfError::NotUnit(name));
    }
    Ok(())
}

const UNIT_TOLERANCE: f64 = 1e-9;
