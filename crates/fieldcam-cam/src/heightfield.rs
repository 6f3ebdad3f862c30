//! Drop-cutter height queries against a distance field.
//!
//! The tool is modelled as its radius envelope: a tool centre `c` is clear of
//! material when `root.eval(c) - r >= 0`. Dropping the tool at (x, y) means
//! finding the highest centre height where that offset field reaches zero.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use fieldcam_math::{Point2, Point3, Vec2};
use fieldcam_sdf::SdfNode;

use crate::error::Result;
use crate::params::{Setup, ToolpathParams};
use crate::tool::ToolDefinition;

const MAX_MARCH_STEPS: usize = 4096;

/// Tool-tip heights on a square grid anchored at `origin`.
///
/// Heights are stored row by row, one row per Y step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightField {
    /// XY of the first sample.
    pub origin: Point2,
    /// Distance between neighbouring samples along X and Y.
    pub spacing: f64,
    /// Samples per row.
    pub nx: usize,
    /// Number of rows.
    pub ny: usize,
    /// Tip heights.
    pub heights: Vec<f64>,
}

impl HeightField {
    /// Fill an `nx` × `ny` grid by evaluating `height` at every sample, rows in parallel.
    pub fn from_fn(
        origin: Point2,
        spacing: f64,
        nx: usize,
        ny: usize,
        height: impl Fn(Point2) -> f64 + Sync,
    ) -> Self {
        let height = &height;
        let heights = (0..ny)
            .into_par_iter()
            .flat_map_iter(|iy| {
                (0..nx).map(move |ix| height(origin + Vec2::new(ix as f64, iy as f64) * spacing))
            })
            .collect();
        Self {
            origin,
            spacing,
            nx,
            ny,
            heights,
        }
    }

    /// A grid with no samples.
    pub fn empty() -> Self {
        Self {
            origin: Point2::origin(),
            spacing: 0.0,
            nx: 0,
            ny: 0,
            heights: Vec::new(),
        }
    }

    /// XY of sample (`ix`, `iy`).
    pub fn point(&self, ix: usize, iy: usize) -> Point2 {
        self.origin + Vec2::new(ix as f64, iy as f64) * self.spacing
    }

    /// Height of sample (`ix`, `iy`), `None` off the grid.
    pub fn height(&self, ix: usize, iy: usize) -> Option<f64> {
        (ix < self.nx && iy < self.ny).then(|| self.heights[iy * self.nx + ix])
    }

    /// Highest sample.
    pub fn max_height(&self) -> Option<f64> {
        self.heights.iter().copied().reduce(f64::max)
    }

    /// Bilinear height at `p`; `None` outside the grid.
    pub fn interpolate(&self, p: &Point2) -> Option<f64> {
        if self.heights.is_empty() {
            return None;
        }
        let cell = |offset: f64, n: usize| -> Option<(usize, f64)> {
            let f = if self.spacing > 0.0 { offset / self.spacing } else { 0.0 };
            let last = (n - 1) as f64;
            if !(0.0..=last).contains(&f) {
                return None;
            }
            let i = (f.floor() as usize).min(n.saturating_sub(2));
            Some((i, f - i as f64))
        };
        let (ix, tx) = cell(p.x - self.origin.x, self.nx)?;
        let (iy, ty) = cell(p.y - self.origin.y, self.ny)?;

        let at = |dx: usize, dy: usize| {
            let (x, y) = ((ix + dx).min(self.nx - 1), (iy + dy).min(self.ny - 1));
            self.heights[y * self.nx + x]
        };
        let near = at(0, 0) + (at(1, 0) - at(0, 0)) * tx;
        let far = at(0, 1) + (at(1, 1) - at(0, 1)) * tx;
        Some(near + (far - near) * ty)
    }
}

/// Drop a tool of `radius` at (x, y) onto `root`.
///
/// The tip starts at `top` and descends no lower than `floor`. Returns the tip
/// height of first contact within `tolerance`, or `None` when the column is
/// clear of material down to the floor. Material reaching above `top` pins
/// the tip at `top`.
pub fn drop_cutter(
    root: &SdfNode,
    radius: f64,
    x: f64,
    y: f64,
    top: f64,
    floor: f64,
    tolerance: f64,
) -> Option<f64> {
    let clearance = |z: f64| root.eval(&Point3::new(x, y, z)) - radius;
    let (z_top, z_floor) = (top + radius, floor + radius);

    if clearance(z_top) <= tolerance {
        return Some(top);
    }

    // Sphere-trace down; a minimum step keeps grazing columns from stalling.
    let min_step = tolerance
        .max(radius * 0.05)
        .max((z_top - z_floor) / 1024.0);
    let mut above = z_top;
    for _ in 0..MAX_MARCH_STEPS {
        let d = clearance(above);
        let z = above - d.max(min_step);
        if z <= z_floor {
            return (clearance(z_floor) <= tolerance)
                .then(|| bisect(&clearance, z_floor, above, tolerance) - radius);
        }
        let dz = clearance(z);
        if dz < 0.0 {
            return Some(bisect(&clearance, z, above, tolerance) - radius);
        }
        if dz <= tolerance {
            return Some(z - radius);
        }
        above = z;
    }
    None
}

/// Narrow a contact bracket `[below, above]` to `tolerance`, keeping the clear side.
fn bisect(clearance: &impl Fn(f64) -> f64, mut below: f64, mut above: f64, tolerance: f64) -> f64 {
    if clearance(below) >= 0.0 {
        return below;
    }
    while above - below > tolerance {
        let mid = 0.5 * (below + above);
        if clearance(mid) < 0.0 {
            below = mid;
        } else {
            above = mid;
        }
    }
    above
}

/// Sample tool-tip heights over the stock on a grid spaced by the resolution.
///
/// The grid starts at the stock's minimum corner and reaches at least its
/// maximum corner. Columns that never meet material hold the stock floor.
pub fn sample_height_field(
    root: &SdfNode,
    tool: &ToolDefinition,
    params: &ToolpathParams,
) -> Result<HeightField> {
    let Some(setup) = Setup::resolve(root, tool, params)? else {
        return Ok(HeightField::empty());
    };
    let size = setup.stock.size();
    let count = |extent: f64| (extent / setup.resolution - 1e-9).ceil().max(0.0) as usize + 1;
    let (nx, ny) = (count(size.x), count(size.y));

    let field = HeightField::from_fn(setup.stock.xy().min, setup.resolution, nx, ny, |p| {
        setup.tip_height(root, p.x, p.y)
    });
    tracing::debug!(nx, ny, spacing = field.spacing, "sampled height field");
    Ok(field)
}
