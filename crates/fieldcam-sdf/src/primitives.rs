//! Closed-form signed distance functions and blend operators.
//!
//! All functions follow the kernel convention: negative inside, zero on the
//! surface, positive outside.

use fieldcam_math::{Point3, Vec2, Vec3};

/// Sphere of radius `r` centred at the origin.
pub fn sphere(p: &Point3, r: f64) -> f64 {
    p.coords.norm() - r
}

/// Axis-aligned box with half extents `h` centred at the origin.
pub fn cuboid(p: &Point3, h: &Vec3) -> f64 {
    let q = p.coords.abs() - h;
    let outside = q.map(|c| c.max(0.0)).norm();
    let inside = q.max().min(0.0);
    outside + inside
}

/// Capped cylinder along Z, centred at the origin.
pub fn cylinder(p: &Point3, r: f64, height: f64) -> f64 {
    let rho = p.x.hypot(p.y);
    box_2d(rho - r, p.z.abs() - height * 0.5)
}

/// Cone along Z with base radius `r` at z = 0 and apex at z = `height`.
///
/// Exact distance computed in the (ρ, z) half-plane against the triangle
/// (0,0), (r,0), (0,h). The edge on the axis is not part of the 3D surface,
/// so interior distances ignore it.
pub fn cone(p: &Point3, r: f64, height: f64) -> f64 {
    let q = Vec2::new(p.x.hypot(p.y), p.z);
    let base = segment_distance(&q, &Vec2::new(0.0, 0.0), &Vec2::new(r, 0.0));
    let slant = segment_distance(&q, &Vec2::new(r, 0.0), &Vec2::new(0.0, height));
    let inside = q.y >= 0.0 && q.y <= height && q.x <= r * (1.0 - q.y / height);
    if inside {
        -base.min(slant)
    } else {
        let axis = segment_distance(&q, &Vec2::new(0.0, height), &Vec2::new(0.0, 0.0));
        base.min(slant).min(axis)
    }
}

/// Torus in the XY plane with major radius `major` and tube radius `minor`.
pub fn torus(p: &Point3, major: f64, minor: f64) -> f64 {
    let q = Vec2::new(p.x.hypot(p.y) - major, p.z);
    q.norm() - minor
}

/// Half-space `n·p <= offset` with unit normal `n`.
pub fn plane(p: &Point3, n: &Vec3, offset: f64) -> f64 {
    n.dot(&p.coords) - offset
}

/// Signed distance to a 2D box given per-axis distances `(dx, dy)` to its walls.
///
/// Shared by the capped cylinder and the extrusion end caps.
pub fn box_2d(dx: f64, dy: f64) -> f64 {
    let outside = dx.max(0.0).hypot(dy.max(0.0));
    let inside = dx.max(dy).min(0.0);
    outside + inside
}

/// Unsigned distance from `p` to the segment `a`–`b`.
pub fn segment_distance(p: &Vec2, a: &Vec2, b: &Vec2) -> f64 {
    let pa = p - a;
    let ba = b - a;
    let len_sq = ba.norm_squared();
    if len_sq <= f64::EPSILON {
        return pa.norm();
    }
    let t = (pa.dot(&ba) / len_sq).clamp(0.0, 1.0);
    (pa - ba * t).norm()
}

/// Polynomial smooth minimum with blend radius `k`.
///
/// C¹ continuous; equal to `min(a, b)` once `|a - b| >= k`, and exactly
/// `min(a, b)` for `k` at or below machine epsilon.
pub fn smooth_min(a: f64, b: f64, k: f64) -> f64 {
    if k <= f64::EPSILON {
        return a.min(b);
    }
    let h = (0.5 + 0.5 * (b - a) / k).clamp(0.0, 1.0);
    b * (1.0 - h) + a * h - k * h * (1.0 - h)
}

/// Polynomial smooth maximum with blend radius `k`.
pub fn smooth_max(a: f64, b: f64, k: f64) -> f64 {
    -smooth_min(-a, -b, k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sphere_surface() {
        assert_abs_diff_eq!(sphere(&Point3::new(1.0, 0.0, 0.0), 1.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sphere(&Point3::origin(), 1.0), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cuboid_inside_and_corner() {
        let h = Vec3::new(1.0, 1.0, 1.0);
        assert_abs_diff_eq!(cuboid(&Point3::origin(), &h), -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cuboid(&Point3::new(1.0, 0.5, 0.0), &h), 0.0, epsilon = 1e-12);
        // Distance to the corner is Euclidean outside
        let d = cuboid(&Point3::new(2.0, 2.0, 1.0), &h);
        assert_abs_diff_eq!(d, 2.0f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_cylinder_caps_and_wall() {
        assert_abs_diff_eq!(cylinder(&Point3::new(2.0, 0.0, 0.0), 2.0, 4.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cylinder(&Point3::new(0.0, 0.0, 2.0), 2.0, 4.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cylinder(&Point3::new(0.0, 0.0, 3.0), 2.0, 4.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cone_surface_points() {
        // Base rim, apex and a point on the slant all lie on the surface
        assert_abs_diff_eq!(cone(&Point3::new(1.0, 0.0, 0.0), 1.0, 2.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cone(&Point3::new(0.0, 0.0, 2.0), 1.0, 2.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cone(&Point3::new(0.0, 0.5, 1.0), 1.0, 2.0), 0.0, epsilon = 1e-12);
        // Point on the axis just above the base is inside, close to the base
        let d = cone(&Point3::new(0.0, 0.0, 0.1), 1.0, 2.0);
        assert_abs_diff_eq!(d, -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_torus_surface() {
        assert_abs_diff_eq!(torus(&Point3::new(3.0, 0.0, 0.0), 2.0, 1.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(torus(&Point3::new(0.0, 2.0, 1.0), 2.0, 1.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(torus(&Point3::new(0.0, 2.0, 0.0), 2.0, 1.0), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_smooth_min_matches_min_outside_blend() {
        assert_abs_diff_eq!(smooth_min(0.0, 5.0, 1.0), 0.0, epsilon = 1e-12);
        assert!(smooth_min(0.0, 0.0, 1.0) < 0.0);
        assert_abs_diff_eq!(smooth_min(0.3, 0.2, 0.0), 0.2, epsilon = 1e-15);
        assert_abs_diff_eq!(smooth_max(0.3, 0.2, 0.0), 0.3, epsilon = 1e-15);
    }

    #[test]
    fn test_smooth_min_is_continuous_across_blend() {
        // The value must not jump across the edge of the blend band.
        let k = 0.5;
        let below = smooth_min(0.0, k - 1e-9, k);
        let above = smooth_min(0.0, k + 1e-9, k);
        assert!((below - above).abs() < 1e-6);
    }
}
