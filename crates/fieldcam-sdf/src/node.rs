//! The SDF expression tree and its evaluator.

use serde::{Deserialize, Serialize};

use fieldcam_math::{BoundingBox3, Dir3, Point3, Transform, Vec3};

use crate::primitives;
use crate::profile::Profile2D;
use crate::topology::Feature;

/// A node of the SDF expression tree.
///
/// Each node exclusively owns its children, so a tree is acyclic by
/// construction. Build nodes through the validating constructors on
/// `SdfNode` (for example [`SdfNode::sphere`]); evaluation assumes valid
/// parameters and never fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SdfNode {
    /// Sphere centred at the origin.
    Sphere {
        /// Radius.
        radius: f64,
    },
    /// Axis-aligned box centred at the origin.
    Box {
        /// Half size along each axis.
        half_extents: Vec3,
    },
    /// Capped cylinder along Z, centred at the origin.
    Cylinder {
        /// Radius.
        radius: f64,
        /// Full height.
        height: f64,
    },
    /// Cone along Z, base on z = 0, apex at z = `height`.
    Cone {
        /// Base radius.
        radius: f64,
        /// Height of the apex.
        height: f64,
    },
    /// Torus in the XY plane, centred at the origin.
    Torus {
        /// Distance from the centre to the tube centre.
        major: f64,
        /// Tube radius.
        minor: f64,
    },
    /// Half-space `normal · p <= offset`.
    Plane {
        /// Unit outward normal.
        normal: Vec3,
        /// Signed distance of the plane from the origin.
        offset: f64,
    },
    /// `min(left, right)`.
    Union {
        /// First operand.
        left: Box<SdfNode>,
        /// Second operand.
        right: Box<SdfNode>,
    },
    /// `max(left, -right)`.
    Subtract {
        /// Base solid.
        left: Box<SdfNode>,
        /// Solid removed from the base.
        right: Box<SdfNode>,
    },
    /// `max(left, right)`.
    Intersect {
        /// First operand.
        left: Box<SdfNode>,
        /// Second operand.
        right: Box<SdfNode>,
    },
    /// Union blended over radius `k`.
    SmoothUnion {
        /// First operand.
        left: Box<SdfNode>,
        /// Second operand.
        right: Box<SdfNode>,
        /// Blend radius.
        k: f64,
    },
    /// Subtraction blended over radius `k`.
    SmoothSubtract {
        /// Base solid.
        left: Box<SdfNode>,
        /// Solid removed from the base.
        right: Box<SdfNode>,
        /// Blend radius.
        k: f64,
    },
    /// Intersection blended over radius `k`.
    SmoothIntersect {
        /// First operand.
        left: Box<SdfNode>,
        /// Second operand.
        right: Box<SdfNode>,
        /// Blend radius.
        k: f64,
    },
    /// Child moved by `offset`.
    Translate {
        /// Transformed subtree.
        child: Box<SdfNode>,
        /// Translation.
        offset: Vec3,
    },
    /// Child rotated about an axis through the origin.
    Rotate {
        /// Transformed subtree.
        child: Box<SdfNode>,
        /// Unit rotation axis.
        axis: Vec3,
        /// Angle in radians, right-handed about `axis`.
        angle: f64,
    },
    /// Child scaled per axis about the origin.
    Scale {
        /// Transformed subtree.
        child: Box<SdfNode>,
        /// Non-zero scale factors.
        factors: Vec3,
    },
    /// Child reflected across the plane through the origin with `normal`.
    Mirror {
        /// Transformed subtree.
        child: Box<SdfNode>,
        /// Unit plane normal.
        normal: Vec3,
    },
    /// Hollow wall of `thickness` centred on the child's surface.
    Shell {
        /// Hollowed subtree.
        child: Box<SdfNode>,
        /// Wall thickness.
        thickness: f64,
    },
    /// Child inflated by `radius`, rounding its convex edges.
    Round {
        /// Rounded subtree.
        child: Box<SdfNode>,
        /// Rounding radius.
        radius: f64,
    },
    /// Child split at the origin planes and stretched by `2 * extent`.
    Elongate {
        /// Stretched subtree.
        child: Box<SdfNode>,
        /// Half stretch along each axis.
        extent: Vec3,
    },
    /// XY profile swept along Z, centred on z = 0.
    Extrude {
        /// Swept profile.
        profile: Profile2D,
        /// Full extrusion height.
        height: f64,
    },
    /// Profile in the (radius, z) half-plane revolved around Z.
    Revolve {
        /// Revolved profile.
        profile: Profile2D,
    },
    /// Child carrying a named-topology descriptor. Evaluates as the child.
    Tagged {
        /// Tagged subtree.
        child: Box<SdfNode>,
        /// Attached feature.
        feature: Feature,
    },
}

impl SdfNode {
    /// Signed distance from `p` to the surface (negative inside).
    pub fn eval(&self, p: &Point3) -> f64 {
        match self {
            Self::Sphere { radius } => primitives::sphere(p, *radius),
            Self::Box { half_extents } => primitives::cuboid(p, half_extents),
            Self::Cylinder { radius, height } => primitives::cylinder(p, *radius, *height),
            Self::Cone { radius, height } => primitives::cone(p, *radius, *height),
            Self::Torus { major, minor } => primitives::torus(p, *major, *minor),
            Self::Plane { normal, offset } => primitives::plane(p, normal, *offset),

            Self::Union { left, right } => left.eval(p).min(right.eval(p)),
            Self::Subtract { left, right } => left.eval(p).max(-right.eval(p)),
            Self::Intersect { left, right } => left.eval(p).max(right.eval(p)),
            Self::SmoothUnion { left, right, k } => {
                primitives::smooth_min(left.eval(p), right.eval(p), *k)
            }
            Self::SmoothSubtract { left, right, k } => {
                primitives::smooth_max(left.eval(p), -right.eval(p), *k)
            }
            Self::SmoothIntersect { left, right, k } => {
                primitives::smooth_max(left.eval(p), right.eval(p), *k)
            }

            Self::Translate { child, offset } => child.eval(&(p - offset)),
            Self::Rotate { child, axis, angle } => {
                child.eval(&Point3::from(rotate_vec(axis, -*angle, &p.coords)))
            }
            Self::Scale { child, factors } => {
                let local = p.coords.component_div(factors);
                child.eval(&Point3::from(local)) * min_abs_factor(factors)
            }
            Self::Mirror { child, normal } => {
                let v = p.coords - normal * (2.0 * normal.dot(&p.coords));
                child.eval(&Point3::from(v))
            }

            Self::Shell { child, thickness } => child.eval(p).abs() - thickness * 0.5,
            Self::Round { child, radius } => child.eval(p) - radius,
            Self::Elongate { child, extent } => {
                let clamped = Vec3::new(
                    p.x.clamp(-extent.x, extent.x),
                    p.y.clamp(-extent.y, extent.y),
                    p.z.clamp(-extent.z, extent.z),
                );
                child.eval(&(p - clamped))
            }

            Self::Extrude { profile, height } => {
                let d = profile.eval(&p.xy());
                primitives::box_2d(d, p.z.abs() - height * 0.5)
            }
            Self::Revolve { profile } => {
                let q = fieldcam_math::Point2::new(p.x.hypot(p.y), p.z);
                profile.eval(&q)
            }

            Self::Tagged { child, .. } => child.eval(p),
        }
    }

    /// Conservative bounding box of the solid.
    ///
    /// Unbounded nodes report infinite extent along their open axes.
    pub fn bounds(&self) -> BoundingBox3 {
        match self {
            Self::Sphere { radius } => {
                BoundingBox3::from_center(Point3::origin(), Vec3::repeat(*radius))
            }
            Self::Box { half_extents } => BoundingBox3::from_center(Point3::origin(), *half_extents),
            Self::Cylinder { radius, height } => BoundingBox3::from_center(
                Point3::origin(),
                Vec3::new(*radius, *radius, height * 0.5),
            ),
            Self::Cone { radius, height } => BoundingBox3::new(
                Point3::new(-radius, -radius, 0.0),
                Point3::new(*radius, *radius, *height),
            ),
            Self::Torus { major, minor } => {
                let r = major + minor;
                BoundingBox3::from_center(Point3::origin(), Vec3::new(r, r, *minor))
            }
            Self::Plane { normal, offset } => plane_bounds(normal, *offset),

            Self::Union { left, right } => left.bounds().union(&right.bounds()),
            Self::Subtract { left, .. } | Self::SmoothSubtract { left, .. } => left.bounds(),
            Self::Intersect { left, right } | Self::SmoothIntersect { left, right, .. } => {
                left.bounds().intersection(&right.bounds())
            }
            Self::SmoothUnion { left, right, k } => {
                left.bounds().union(&right.bounds()).expanded(k * 0.25)
            }

            Self::Translate { child, offset } => {
                child.bounds().transformed(&Transform::translation(offset))
            }
            Self::Rotate { child, axis, angle } => {
                let axis = Dir3::new_normalize(*axis);
                child
                    .bounds()
                    .transformed(&Transform::rotation_about_axis(&axis, *angle))
            }
            Self::Scale { child, factors } => child.bounds().transformed(&Transform::scale(factors)),
            Self::Mirror { child, normal } => {
                let normal = Dir3::new_normalize(*normal);
                child.bounds().transformed(&Transform::reflection(&normal))
            }

            Self::Shell { child, thickness } => child.bounds().expanded(thickness * 0.5),
            Self::Round { child, radius } => child.bounds().expanded(*radius),
            Self::Elongate { child, extent } => child.bounds().expanded_by(extent),

            Self::Extrude { profile, height } => {
                let b = profile.bounds();
                if b.is_empty() {
                    return BoundingBox3::empty();
                }
                BoundingBox3::new(
                    Point3::new(b.min.x, b.min.y, -height * 0.5),
                    Point3::new(b.max.x, b.max.y, height * 0.5),
                )
            }
            Self::Revolve { profile } => {
                let b = profile.bounds();
                if b.is_empty() {
                    return BoundingBox3::empty();
                }
                let r = b.max_abs_x();
                BoundingBox3::new(Point3::new(-r, -r, b.min.y), Point3::new(r, r, b.max.y))
            }

            Self::Tagged { child, .. } => child.bounds(),
        }
    }

    /// Central-difference gradient of the field at `p` with step `h`.
    ///
    /// Not normalised. Approximately unit length away from creases.
    pub fn gradient(&self, p: &Point3, h: f64) -> Vec3 {
        let dx = Vec3::new(h, 0.0, 0.0);
        let dy = Vec3::new(0.0, h, 0.0);
        let dz = Vec3::new(0.0, 0.0, h);
        Vec3::new(
            self.eval(&(p + dx)) - self.eval(&(p - dx)),
            self.eval(&(p + dy)) - self.eval(&(p - dy)),
            self.eval(&(p + dz)) - self.eval(&(p - dz)),
        ) / (2.0 * h)
    }

    /// Outward unit normal at `p`, or +Z where the gradient vanishes.
    pub fn normal(&self, p: &Point3, h: f64) -> Vec3 {
        let g = self.gradient(p, h);
        let len = g.norm();
        if len > f64::EPSILON && len.is_finite() {
            g / len
        } else {
            Vec3::z()
        }
    }

    /// Direct children in left-to-right order.
    pub fn children(&self) -> Vec<&SdfNode> {
        match self {
            Self::Sphere { .. }
            | Self::Box { .. }
            | Self::Cylinder { .. }
            | Self::Cone { .. }
            | Self::Torus { .. }
            | Self::Plane { .. }
            | Self::Extrude { .. }
            | Self::Revolve { .. } => Vec::new(),

            Self::Union { left, right }
            | Self::Subtract { left, right }
            | Self::Intersect { left, right }
            | Self::SmoothUnion { left, right, .. }
            | Self::SmoothSubtract { left, right, .. }
            | Self::SmoothIntersect { left, right, .. } => vec![left.as_ref(), right.as_ref()],

            Self::Translate { child, .. }
            | Self::Rotate { child, .. }
            | Self::Scale { child, .. }
            | Self::Mirror { child, .. }
            | Self::Shell { child, .. }
            | Self::Round { child, .. }
            | Self::Elongate { child, .. }
            | Self::Tagged { child, .. } => vec![child.as_ref()],
        }
    }

    /// Number of nodes in the tree rooted here.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// True for nodes that remap space before evaluating their child.
    pub(crate) fn is_positional(&self) -> bool {
        matches!(
            self,
            Self::Translate { .. }
                | Self::Rotate { .. }
                | Self::Scale { .. }
                | Self::Mirror { .. }
                | Self::Elongate { .. }
        )
    }

    /// Apply this node's space mapping to `inner` in place of its child.
    ///
    /// Returns `inner` unchanged for nodes that do not remap space.
    pub(crate) fn rewrap(&self, inner: SdfNode) -> SdfNode {
        let child = Box::new(inner);
        match self {
            Self::Translate { offset, .. } => Self::Translate {
                child,
                offset: *offset,
            },
            Self::Rotate { axis, angle, .. } => Self::Rotate {
                child,
                axis: *axis,
                angle: *angle,
            },
            Self::Scale { factors, .. } => Self::Scale {
                child,
                factors: *factors,
            },
            Self::Mirror { normal, .. } => Self::Mirror {
                child,
                normal: *normal,
            },
            Self::Elongate { extent, .. } => Self::Elongate {
                child,
                extent: *extent,
            },
            _ => *child,
        }
    }
}

/// Rotate `v` about unit `axis` by `angle` (Rodrigues).
fn rotate_vec(axis: &Vec3, angle: f64, v: &Vec3) -> Vec3 {
    let (s, c) = angle.sin_cos();
    v * c + axis.cross(v) * s + axis * (axis.dot(v) * (1.0 - c))
}

fn min_abs_factor(factors: &Vec3) -> f64 {
    factors.x.abs().min(factors.y.abs()).min(factors.z.abs())
}

/// Half-space bounds: infinite, except along the normal's axis when it is
/// axis-aligned.
fn plane_bounds(normal: &Vec3, offset: f64) -> BoundingBox3 {
    let mut b = BoundingBox3::infinite();
    for axis in 0..3 {
        let others_zero = (0..3).filter(|&i| i != axis).all(|i| normal[i] == 0.0);
        if !others_zero || normal[axis] == 0.0 {
            continue;
        }
        if normal[axis] > 0.0 {
            b.max[axis] = offset / normal[axis];
        } else {
            b.min[axis] = offset / normal[axis];
        }
    }
    b
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use fieldcam_math::Point2;
    use std::f64::consts::FRAC_PI_2;

    fn samples() -> Vec<Point3> {
        let mut pts = Vec::new();
        for i in 0..5 {
            for j in 0..5 {
                for k in 0..5 {
                    pts.push(Point3::new(
                        -2.0 + i as f64,
                        -1.7 + 0.9 * j as f64,
                        -2.2 + 1.1 * k as f64,
                    ));
                }
            }
        }
        pts
    }

    fn pair() -> (SdfNode, SdfNode) {
        let a = SdfNode::sphere(1.2).unwrap();
        let b = SdfNode::cuboid(Vec3::new(2.0, 1.0, 1.5))
            .unwrap()
            .translate(Vec3::new(0.8, 0.0, 0.0))
            .unwrap();
        (a, b)
    }

    #[test]
    fn test_booleans_are_min_max() {
        let (a, b) = pair();
        let u = a.clone().union(b.clone());
        let s = a.clone().subtract(b.clone());
        let i = a.clone().intersect(b.clone());
        for p in samples() {
            let (da, db) = (a.eval(&p), b.eval(&p));
            assert_eq!(u.eval(&p), da.min(db));
            assert_eq!(s.eval(&p), da.max(-db));
            assert_eq!(i.eval(&p), da.max(db));
        }
    }

    #[test]
    fn test_smooth_booleans_converge_to_hard() {
        let (a, b) = pair();
        let u = a.clone().union(b.clone());
        let s = a.clone().subtract(b.clone());
        let i = a.clone().intersect(b.clone());
        for k in [1e-3, 1e-6] {
            let su = a.clone().smooth_union(b.clone(), k).unwrap();
            let ss = a.clone().smooth_subtract(b.clone(), k).unwrap();
            let si = a.clone().smooth_intersect(b.clone(), k).unwrap();
            for p in samples() {
                assert!((su.eval(&p) - u.eval(&p)).abs() <= k * 0.25 + 1e-12);
                assert!((ss.eval(&p) - s.eval(&p)).abs() <= k * 0.25 + 1e-12);
                assert!((si.eval(&p) - i.eval(&p)).abs() <= k * 0.25 + 1e-12);
            }
        }
        // Zero radius is exactly the hard operator
        let su = a.clone().smooth_union(b.clone(), 0.0).unwrap();
        for p in samples() {
            assert_eq!(su.eval(&p), u.eval(&p));
        }
    }

    #[test]
    fn test_translate_and_uniform_scale() {
        let s = SdfNode::sphere(1.0)
            .unwrap()
            .translate(Vec3::new(3.0, 0.0, 0.0))
            .unwrap();
        assert_abs_diff_eq!(s.eval(&Point3::new(4.0, 0.0, 0.0)), 0.0, epsilon = 1e-12);

        let scaled = SdfNode::sphere(1.0).unwrap().scale(Vec3::repeat(2.0)).unwrap();
        assert_abs_diff_eq!(scaled.eval(&Point3::new(5.0, 0.0, 0.0)), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scaled.eval(&Point3::origin()), -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_moves_geometry() {
        let shifted = SdfNode::sphere(0.5)
            .unwrap()
            .translate(Vec3::new(2.0, 0.0, 0.0))
            .unwrap();
        let rotated = shifted.rotate(Vec3::z(), FRAC_PI_2).unwrap();
        // The sphere at +X ends up at +Y
        assert_abs_diff_eq!(rotated.eval(&Point3::new(0.0, 2.0, 0.0)), -0.5, epsilon = 1e-12);
        let b = rotated.bounds();
        assert!(b.contains(&Point3::new(0.0, 2.4, 0.0)));
        assert!(!b.contains(&Point3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_mirror_reflects() {
        let cone = SdfNode::cone(1.0, 2.0).unwrap().mirror(Vec3::z()).unwrap();
        assert_abs_diff_eq!(cone.eval(&Point3::new(0.0, 0.0, -2.0)), 0.0, epsilon = 1e-12);
        let b = cone.bounds();
        assert_abs_diff_eq!(b.min.z, -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.max.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_modifiers() {
        let sphere = SdfNode::sphere(2.0).unwrap();
        let shell = sphere.clone().shell(0.4).unwrap();
        assert_abs_diff_eq!(shell.eval(&Point3::new(2.0, 0.0, 0.0)), -0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(shell.eval(&Point3::origin()), 1.8, epsilon = 1e-12);

        let rounded = SdfNode::cuboid(Vec3::repeat(2.0)).unwrap().round(0.5).unwrap();
        assert_abs_diff_eq!(rounded.eval(&Point3::new(1.5, 0.0, 0.0)), 0.0, epsilon = 1e-12);

        let capsule = sphere.elongate(Vec3::new(0.0, 0.0, 3.0)).unwrap();
        assert_abs_diff_eq!(capsule.eval(&Point3::new(2.0, 0.0, 2.5)), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(capsule.eval(&Point3::new(0.0, 0.0, 5.0)), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(capsule.bounds().max.z, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extrude_rect_equals_box() {
        let rect = Profile2D::rect(Point2::origin(), 2.0, 4.0).unwrap();
        let extruded = SdfNode::extrude(rect, 6.0).unwrap();
        let cuboid = SdfNode::cuboid(Vec3::new(2.0, 4.0, 6.0)).unwrap();
        for p in samples() {
            assert_abs_diff_eq!(extruded.eval(&p), cuboid.eval(&p), epsilon = 1e-12);
        }
        assert_eq!(extruded.bounds(), cuboid.bounds());
    }

    #[test]
    fn test_revolve_circle_equals_torus() {
        let circle = Profile2D::circle(Point2::new(2.0, 0.0), 0.5).unwrap();
        let revolved = SdfNode::revolve(circle).unwrap();
        let torus = SdfNode::torus(2.0, 0.5).unwrap();
        for p in samples() {
            assert_abs_diff_eq!(revolved.eval(&p), torus.eval(&p), epsilon = 1e-12);
        }
        let b = revolved.bounds();
        assert_abs_diff_eq!(b.max.x, 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(b.min.z, -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_bounds_contain_surface_points() {
        let shapes = vec![
            SdfNode::sphere(1.5).unwrap(),
            SdfNode::cuboid(Vec3::new(1.0, 2.0, 3.0)).unwrap(),
            SdfNode::cylinder(0.7, 2.0).unwrap(),
            SdfNode::cone(1.0, 1.5).unwrap(),
            SdfNode::torus(1.5, 0.4).unwrap(),
        ];
        for shape in shapes {
            let b = shape.bounds().expanded(1e-9);
            // March from the origin outwards along a fan of rays to the surface
            for i in 0..16 {
                let theta = i as f64 * 0.4;
                let dir = Vec3::new(theta.cos(), theta.sin(), (theta * 0.7).sin()).normalize();
                let mut t = 0.0;
                while t < 10.0 {
                    let p = Point3::from(dir * t);
                    if shape.eval(&p) > 0.0 {
                        break;
                    }
                    t += 1e-3;
                }
                assert!(b.contains(&Point3::from(dir * (t - 1e-3))));
            }
        }
    }

    #[test]
    fn test_plane_bounds() {
        let floor = SdfNode::plane(Vec3::z(), 1.0).unwrap();
        assert_abs_diff_eq!(floor.eval(&Point3::new(5.0, -3.0, 4.0)), 3.0, epsilon = 1e-12);
        let b = floor.bounds();
        assert!(!b.is_finite());
        assert_abs_diff_eq!(b.max.z, 1.0, epsilon = 1e-12);

        let clipped = SdfNode::cuboid(Vec3::repeat(4.0)).unwrap().intersect(floor);
        let cb = clipped.bounds();
        assert!(cb.is_finite());
        assert_abs_diff_eq!(cb.max.z, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cb.min.z, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_moved_plane_keeps_its_cap() {
        let floor = SdfNode::plane(Vec3::z(), 0.0).unwrap();
        let raised = floor.clone().translate(Vec3::new(0.0, 0.0, 3.0)).unwrap();
        assert_abs_diff_eq!(raised.bounds().max.z, 3.0, epsilon = 1e-12);

        let clipped = SdfNode::cuboid(Vec3::repeat(10.0)).unwrap().intersect(raised);
        assert_abs_diff_eq!(clipped.bounds().max.z, 3.0, epsilon = 1e-12);

        let flipped = floor.mirror(Vec3::z()).unwrap();
        assert_abs_diff_eq!(flipped.bounds().min.z, 0.0, epsilon = 1e-12);
        assert_eq!(flipped.bounds().max.z, f64::INFINITY);
    }

    #[test]
    fn test_gradient_and_normal() {
        let s = SdfNode::sphere(1.0).unwrap();
        let n = s.normal(&Point3::new(0.0, 1.0, 0.0), 1e-5);
        assert_abs_diff_eq!(n.y, 1.0, epsilon = 1e-6);
        let g = s.gradient(&Point3::new(2.0, 0.0, 0.0), 1e-5);
        assert_abs_diff_eq!(g.norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_serde_roundtrip() {
        let tree = SdfNode::cuboid(Vec3::repeat(2.0))
            .unwrap()
            .smooth_union(SdfNode::sphere(1.3).unwrap(), 0.2)
            .unwrap()
            .translate(Vec3::new(1.0, 2.0, 3.0))
            .unwrap();
        let json = serde_json::to_string(&tree).unwrap();
        let back: SdfNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
        assert_eq!(tree.node_count(), 4);
    }
}
