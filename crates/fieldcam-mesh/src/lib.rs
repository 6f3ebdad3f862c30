#![warn(missing_docs)]

//! Marching-cubes mesh extraction for fieldcam SDF trees.
//!
//! Samples a tree on a regular grid covering its bounding box and extracts
//! the zero level set as an indexed [`TriangleMesh`]:
//! 1. Sample every lattice point (parallel per Z slab)
//! 2. Classify cells and triangulate them from the case table
//! 3. Place vertices by linear interpolation on the crossed edges
//! 4. Share one vertex per grid edge and compute normals from the field gradient
//!
//! Subtrees tagged with a feature label the faces they produced.
//!
//! # Example
//!
//! ```
//! use fieldcam_mesh::{mesh, Resolution};
//! use fieldcam_sdf::SdfNode;
//!
//! let sphere = SdfNode::sphere(5.0).unwrap();
//! let m = mesh(&sphere, Resolution::Cells(24));
//! assert!(m.is_watertight());
//! ```

mod marching;
mod mesh;
mod tables;

pub use marching::{MAX_CELLS, MIN_CELLS};
pub use mesh::{EdgeFeature, TriangleMesh};

use serde::{Deserialize, Serialize};

use fieldcam_math::BoundingBox3;
use fieldcam_sdf::SdfNode;

/// Grid density along the longest axis of the meshed region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Number of cells along the longest axis.
    Cells(usize),
    /// Edge length of a cell.
    CellSize(f64),
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::Cells(64)
    }
}

/// Mesher settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshParams {
    /// Grid density. Clamped to `MIN_CELLS..=MAX_CELLS` along the longest axis.
    pub resolution: Resolution,
    /// Distance tolerance for feature tagging; defaults to 5% of the cell size.
    pub tagging_tolerance: Option<f64>,
    /// Flip triangles whose normal disagrees with the field gradient.
    pub validate_winding: bool,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            tagging_tolerance: None,
            validate_winding: true,
        }
    }
}

impl MeshParams {
    /// Default settings at the given resolution.
    pub fn with_resolution(resolution: Resolution) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }
}

/// Mesh `root` over its own bounding box.
///
/// Empty, degenerate or unbounded trees produce an empty mesh.
pub fn mesh(root: &SdfNode, resolution: Resolution) -> TriangleMesh {
    mesh_with_params(root, &MeshParams::with_resolution(resolution))
}

/// Mesh `root` over its own bounding box with explicit settings.
pub fn mesh_with_params(root: &SdfNode, params: &MeshParams) -> TriangleMesh {
    marching::extract(root, &root.bounds(), params)
}

/// Mesh `root` inside `bounds`, which may clip the surface.
///
/// Use this for unbounded fields such as half-spaces. Where the surface
/// reaches the region boundary the mesh is open.
pub fn mesh_in_bounds(root: &SdfNode, bounds: &BoundingBox3, params: &MeshParams) -> TriangleMesh {
    marching::extract(root, bounds, params)
}
