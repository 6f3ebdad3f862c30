//! Validating constructors and chainable builders for [`SdfNode`].
//!
//! Booleans and tagging cannot fail. Every other builder checks its
//! parameters and returns [`SdfError`](crate::SdfError) on malformed input.

use fieldcam_math::Vec3;

use crate::error::{
    finite, finite_vec, non_negative, positive, unit, unit_length, Result, SdfError,
};
use crate::profile::Profile2D;
use crate::topology::Feature;
use crate::SdfNode;

impl SdfNode {
    /// Sphere of `radius` at the origin.
    pub fn sphere(radius: f64) -> Result<Self> {
        Ok(Self::Sphere {
            radius: positive("sphere radius", radius)?,
        })
    }

    /// Box with full edge lengths `size`, centred at the origin.
    pub fn cuboid(size: Vec3) -> Result<Self> {
        let size = finite_vec("box size", size)?;
        for s in size.iter() {
            positive("box size", *s)?;
        }
        Ok(Self::Box {
            half_extents: size * 0.5,
        })
    }

    /// Cylinder along Z centred at the origin.
    pub fn cylinder(radius: f64, height: f64) -> Result<Self> {
        Ok(Self::Cylinder {
            radius: positive("cylinder radius", radius)?,
            height: positive("cylinder height", height)?,
        })
    }

    /// Cone along Z with its base on z = 0.
    pub fn cone(radius: f64, height: f64) -> Result<Self> {
        Ok(Self::Cone {
            radius: positive("cone radius", radius)?,
            height: positive("cone height", height)?,
        })
    }

    /// Torus in the XY plane.
    pub fn torus(major: f64, minor: f64) -> Result<Self> {
        Ok(Self::Torus {
            major: positive("torus major radius", major)?,
            minor: positive("torus minor radius", minor)?,
        })
    }

    /// Half-space below the plane `normal · p = offset`. `normal` is normalised.
    pub fn plane(normal: Vec3, offset: f64) -> Result<Self> {
        Ok(Self::Plane {
            normal: unit("plane normal", normal)?,
            offset: finite("plane offset", offset)?,
        })
    }

    /// Extrude an XY profile along Z by `height`, centred on z = 0.
    pub fn extrude(profile: Profile2D, height: f64) -> Result<Self> {
        Ok(Self::Extrude {
            profile,
            height: positive("extrude height", height)?,
        })
    }

    /// Revolve a (radius, z) profile around the Z axis.
    pub fn revolve(profile: Profile2D) -> Result<Self> {
        revolve_radius(&profile)?;
        Ok(Self::Revolve { profile })
    }

    /// Union with `other`.
    pub fn union(self, other: SdfNode) -> Self {
        Self::Union {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// Remove `other` from this solid.
    pub fn subtract(self, other: SdfNode) -> Self {
        Self::Subtract {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// Intersection with `other`.
    pub fn intersect(self, other: SdfNode) -> Self {
        Self::Intersect {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// Union blended over radius `k`. `k = 0` is the hard union.
    pub fn smooth_union(self, other: SdfNode, k: f64) -> Result<Self> {
        Ok(Self::SmoothUnion {
            left: Box::new(self),
            right: Box::new(other),
            k: non_negative("smoothing radius", k)?,
        })
    }

    /// Subtraction blended over radius `k`.
    pub fn smooth_subtract(self, other: SdfNode, k: f64) -> Result<Self> {
        Ok(Self::SmoothSubtract {
            left: Box::new(self),
            right: Box::new(other),
            k: non_negative("smoothing radius", k)?,
        })
    }

    /// Intersection blended over radius `k`.
    pub fn smooth_intersect(self, other: SdfNode, k: f64) -> Result<Self> {
        Ok(Self::SmoothIntersect {
            left: Box::new(self),
            right: Box::new(other),
            k: non_negative("smoothing radius", k)?,
        })
    }

    /// Move by `offset`.
    pub fn translate(self, offset: Vec3) -> Result<Self> {
        Ok(Self::Translate {
            child: Box::new(self),
            offset: finite_vec("translation", offset)?,
        })
    }

    /// Rotate by `angle` radians about `axis` through the origin.
    pub fn rotate(self, axis: Vec3, angle: f64) -> Result<Self> {
        Ok(Self::Rotate {
            child: Box::new(self),
            axis: unit("rotation axis", axis)?,
            angle: finite("rotation angle", angle)?,
        })
    }

    /// Scale about the origin. Negative factors mirror; zero is rejected.
    pub fn scale(self, factors: Vec3) -> Result<Self> {
        let factors = finite_vec("scale factors", factors)?;
        for f in factors.iter() {
            positive("scale factor magnitude", f.abs())?;
        }
        Ok(Self::Scale {
            child: Box::new(self),
            factors,
        })
    }

    /// Reflect across the plane through the origin with `normal`.
    pub fn mirror(self, normal: Vec3) -> Result<Self> {
        Ok(Self::Mirror {
            child: Box::new(self),
            normal: unit("mirror normal", normal)?,
        })
    }

    /// Hollow into a wall of `thickness` centred on the surface.
    pub fn shell(self, thickness: f64) -> Result<Self> {
        Ok(Self::Shell {
            child: Box::new(self),
            thickness: positive("shell thickness", thickness)?,
        })
    }

    /// Inflate by `radius`, rounding convex edges.
    pub fn round(self, radius: f64) -> Result<Self> {
        Ok(Self::Round {
            child: Box::new(self),
            radius: positive("round radius", radius)?,
        })
    }

    /// Stretch by `2 * extent` along each axis.
    pub fn elongate(self, extent: Vec3) -> Result<Self> {
        let extent = finite_vec("elongation", extent)?;
        for e in extent.iter() {
            non_negative("elongation", *e)?;
        }
        Ok(Self::Elongate {
            child: Box::new(self),
            extent,
        })
    }

    /// Attach a named-topology descriptor to this subtree.
    pub fn tagged(self, feature: Feature) -> Self {
        Self::Tagged {
            child: Box::new(self),
            feature,
        }
    }

    /// Check every parameter in the tree against the rules the constructors
    /// enforce.
    ///
    /// Trees built through the constructors always pass. Deserialized trees
    /// must be validated before evaluation, since serde bypasses the checks.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Sphere { radius } => positive("sphere radius", *radius).map(drop),
            Self::Box { half_extents } => {
                finite_vec("box size", *half_extents)?;
                half_extents
                    .iter()
                    .try_for_each(|h| positive("box size", *h).map(drop))
            }
            Self::Cylinder { radius, height } => {
                positive("cylinder radius", *radius)?;
                positive("cylinder height", *height).map(drop)
            }
            Self::Cone { radius, height } => {
                positive("cone radius", *radius)?;
                positive("cone height", *height).map(drop)
            }
            Self::Torus { major, minor } => {
                positive("torus major radius", *major)?;
                positive("torus minor radius", *minor).map(drop)
            }
            Self::Plane { normal, offset } => {
                unit_length("plane normal", normal)?;
                finite("plane offset", *offset).map(drop)
            }
            Self::Union { left, right }
            | Self::Subtract { left, right }
            | Self::Intersect { left, right } => {
                left.validate()?;
                right.validate()
            }
            Self::SmoothUnion { left, right, k }
            | Self::SmoothSubtract { left, right, k }
            | Self::SmoothIntersect { left, right, k } => {
                non_negative("smoothing radius", *k)?;
                left.validate()?;
                right.validate()
            }
            Self::Translate { child, offset } => {
                finite_vec("translation", *offset)?;
                child.validate()
            }
            Self::Rotate { child, axis, angle } => {
                unit_length("rotation axis", axis)?;
                finite("rotation angle", *angle)?;
                child.validate()
            }
            Self::Scale { child, factors } => {
                finite_vec("scale factors", *factors)?;
                for f in factors.iter() {
                    positive("scale factor magnitude", f.abs())?;
                }
                child.validate()
            }
            Self::Mirror { child, normal } => {
                unit_length("mirror normal", normal)?;
                child.validate()
            }
            Self::Shell { child, thickness } => {
                positive("shell thickness", *thickness)?;
                child.validate()
            }
            Self::Round { child, radius } => {
                positive("round radius", *radius)?;
                child.validate()
            }
            Self::Elongate { child, extent } => {
                finite_vec("elongation", *extent)?;
                for e in extent.iter() {
                    non_negative("elongation", *e)?;
                }
                child.validate()
            }
            Self::Extrude { profile, height } => {
                profile.validate()?;
                positive("extrude height", *height).map(drop)
            }
            Self::Revolve { profile } => {
                profile.validate()?;
                revolve_radius(profile).map(drop)
            }
            Self::Tagged { child, .. } => child.validate(),
        }
    }
}

fn revolve_radius(profile: &Profile2D) -> Result<f64> {
    let radius = profile.bounds().max.x;
    if radius <= 0.0 {
        return Err(SdfError::NonPositive {
            name: "revolve profile radius",
            value: radius,
        });
    }
    Ok(radius)
}
