//! 2D profiles lifted into 3D by [`SdfNode::extrude`](crate::SdfNode::extrude)
//! and [`SdfNode::revolve`](crate::SdfNode::revolve).

use serde::{Deserialize, Serialize};

use fieldcam_math::{BoundingBox2, Point2, Vec2};

use crate::error::{finite_point2, positive, Result, SdfError};
use crate::primitives::{box_2d, segment_distance};

/// A closed 2D region with a signed distance function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Profile2D {
    /// Closed polygon. The last vertex connects back to the first.
    Polygon {
        /// Vertex loop, either orientation.
        vertices: Vec<Point2>,
    },
    /// Circle.
    Circle {
        /// Centre of the circle.
        center: Point2,
        /// Radius.
        radius: f64,
    },
    /// Axis-aligned rectangle.
    Rect {
        /// Centre of the rectangle.
        center: Point2,
        /// Half width and half height.
        half_extents: Vec2,
    },
}

impl Profile2D {
    /// Polygon from a vertex loop.
    ///
    /// Self-intersecting loops are accepted but produce an inconsistent sign.
    pub fn polygon(vertices: Vec<Point2>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(SdfError::EmptyPolygon(vertices.len()));
        }
        for v in &vertices {
            finite_point2("polygon vertex", *v)?;
        }
        Ok(Self::Polygon { vertices })
    }

    /// Circle of `radius` around `center`.
    pub fn circle(center: Point2, radius: f64) -> Result<Self> {
        Ok(Self::Circle {
            center: finite_point2("circle center", center)?,
            radius: positive("circle radius", radius)?,
        })
    }

    /// Rectangle of `width` × `height` around `center`.
    pub fn rect(center: Point2, width: f64, height: f64) -> Result<Self> {
        let w = positive("rect width", width)?;
        let h = positive("rect height", height)?;
        Ok(Self::Rect {
            center: finite_point2("rect center", center)?,
            half_extents: Vec2::new(w * 0.5, h * 0.5),
        })
    }

    /// Check the profile against the rules its constructors enforce.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return Err(SdfError::EmptyPolygon(vertices.len()));
                }
                vertices
                    .iter()
                    .try_for_each(|v| finite_point2("polygon vertex", *v).map(drop))
            }
            Self::Circle { center, radius } => {
                finite_point2("circle center", *center)?;
                positive("circle radius", *radius).map(drop)
            }
            Self::Rect {
                center,
                half_extents,
            } => {
                finite_point2("rect center", *center)?;
                positive("rect width", half_extents.x)?;
                positive("rect height", half_extents.y).map(drop)
            }
        }
    }

    /// Signed distance from `p` to the profile boundary.
    pub fn eval(&self, p: &Point2) -> f64 {
        match self {
            Self::Polygon { vertices } => polygon_distance(vertices, p),
            Self::Circle { center, radius } => (p - center).norm() - radius,
            Self::Rect {
                center,
                half_extents,
            } => {
                let q = p - center;
                box_2d(q.x.abs() - half_extents.x, q.y.abs() - half_extents.y)
            }
        }
    }

    /// Bounding rectangle.
    pub fn bounds(&self) -> BoundingBox2 {
        match self {
            Self::Polygon { vertices } => {
                let mut b = BoundingBox2::empty();
                for v in vertices {
                    b.include_point(v);
                }
                b
            }
            Self::Circle { center, radius } => {
                let r = Vec2::new(*radius, *radius);
                BoundingBox2::new(center - r, center + r)
            }
            Self::Rect {
                center,
                half_extents,
            } => BoundingBox2::new(center - half_extents, center + half_extents),
        }
    }
}

/// Exact polygon distance with the sign taken from the crossing-number test.
fn polygon_distance(vertices: &[Point2], p: &Point2) -> f64 {
    let n = vertices.len();
    if n == 0 {
        return f64::INFINITY;
    }
    let q = p.coords;
    let mut dist = f64::INFINITY;
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = vertices[i].coords;
        let b = vertices[j].coords;
        dist = dist.min(segment_distance(&q, &a, &b));

        // Half-open rule on y so shared vertices are counted once
        if (a.y > q.y) != (b.y > q.y) {
            let x_cross = a.x + (q.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if q.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    if inside {
        -dist
    } else {
        dist
    }
}
