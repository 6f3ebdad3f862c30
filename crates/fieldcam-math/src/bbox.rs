//! Axis-aligned bounding boxes in 3D and 2D.
//!
//! Boxes may be empty (inverted, the identity for [`BoundingBox3::union`]) or
//! infinite (unbounded primitives such as planes). Both states survive
//! composition: union with an infinite box is infinite, intersection with an
//! empty box is empty.

use serde::{Deserialize, Serialize};

use crate::{Point2, Point3, Transform, Vec3};

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl BoundingBox3 {
    /// Create a box from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Box centred at `center` with the given half extents.
    pub fn from_center(center: Point3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Create an empty (inverted) box suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// A box covering all of space.
    pub fn infinite() -> Self {
        Self {
            min: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            max: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
        }
    }

    /// True if the box contains no points.
    pub fn is_empty(&self) -> bool {
        !(self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z)
    }

    /// True if the box is non-empty and every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        !self.is_empty()
            && self.min.coords.iter().all(|v| v.is_finite())
            && self.max.coords.iter().all(|v| v.is_finite())
    }

    /// True if the box has zero extent along some axis (or is empty).
    pub fn is_degenerate(&self) -> bool {
        self.is_empty() || self.size().iter().any(|&s| s <= 0.0)
    }

    /// Expand this box to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox3) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Overlap of both boxes; empty if they are disjoint.
    pub fn intersection(&self, other: &BoundingBox3) -> Self {
        let result = Self {
            min: Point3::new(
                self.min.x.max(other.min.x),
                self.min.y.max(other.min.y),
                self.min.z.max(other.min.z),
            ),
            max: Point3::new(
                self.max.x.min(other.max.x),
                self.max.y.min(other.max.y),
                self.max.z.min(other.max.z),
            ),
        };
        if result.is_empty() {
            Self::empty()
        } else {
            result
        }
    }

    /// Box grown by `margin` in every direction. Empty boxes stay empty.
    pub fn expanded(&self, margin: f64) -> Self {
        if self.is_empty() {
            return *self;
        }
        let m = Vec3::new(margin, margin, margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Box grown by a per-axis margin.
    pub fn expanded_by(&self, margin: &Vec3) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self {
            min: self.min - *margin,
            max: self.max + *margin,
        }
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Center point.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Largest extent over the three axes.
    pub fn longest_side(&self) -> f64 {
        self.size().max()
    }

    /// Test whether a point lies inside or on the box.
    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// The eight corners, x varying fastest.
    pub fn corners(&self) -> [Point3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(a.x, b.y, b.z),
            Point3::new(b.x, b.y, b.z),
        ]
    }

    /// Conservative box of this box mapped through `transform`.
    ///
    /// Unbounded boxes keep their finite sides through transforms that map
    /// each axis onto one axis (translation, axis scaling, axis mirrors).
    /// Under any other transform they become infinite.
    pub fn transformed(&self, transform: &Transform) -> Self {
        if self.is_empty() {
            return *self;
        }
        if !self.is_finite() {
            return self
                .transformed_per_axis(transform)
                .unwrap_or_else(Self::infinite);
        }
        let mut out = Self::empty();
        for corner in self.corners() {
            out.include_point(&transform.apply_point(&corner));
        }
        out
    }

    fn transformed_per_axis(&self, transform: &Transform) -> Option<Self> {
        let m = &transform.matrix;
        let mut out = Self::infinite();
        for row in 0..3 {
            let mut source = (0..3).filter(|&col| m[(row, col)] != 0.0);
            let col = source.next()?;
            if source.next().is_some() {
                return None;
            }
            let (s, t) = (m[(row, col)], m[(row, 3)]);
            let (a, b) = (self.min[col] * s + t, self.max[col] * s + t);
            out.min[row] = a.min(b);
            out.max[row] = a.max(b);
        }
        Some(out)
    }

    /// Projection onto the XY plane.
    pub fn xy(&self) -> BoundingBox2 {
        BoundingBox2 {
            min: Point2::new(self.min.x, self.min.y),
            max: Point2::new(self.max.x, self.max.y),
        }
    }
}

impl Default for BoundingBox3 {
    fn default() -> Self {
        Self::empty()
    }
}

/// Axis-aligned bounding box in 2D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    /// Minimum corner.
    pub min: Point2,
    /// Maximum corner.
    pub max: Point2,
}

impl BoundingBox2 {
    /// Create a box from min and max corners.
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) box suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::INFINITY, f64::INFINITY),
            max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// True if the box contains no points.
    pub fn is_empty(&self) -> bool {
        !(self.min.x <= self.max.x && self.min.y <= self.max.y)
    }

    /// Expand this box to include a point.
    pub fn include_point(&mut self, p: &Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox2) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Test whether a point lies inside or on the box.
    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Largest absolute X coordinate (radial extent of a revolve profile).
    pub fn max_abs_x(&self) -> f64 {
        self.min.x.abs().max(self.max.x.abs())
    }
}

impl Default for BoundingBox2 {
    fn default() -> Self {
        Self::empty()
    }
}
