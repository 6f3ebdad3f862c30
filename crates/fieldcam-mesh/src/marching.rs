//! Marching-cubes extraction over a regular sample grid.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use fieldcam_math::{lerp, BoundingBox3, Point3, Vec3};
use fieldcam_sdf::{collect_features, FeatureRegion, SdfNode};

use crate::mesh::TriangleMesh;
use crate::tables::{case_table, CORNERS, EDGES};
use crate::{MeshParams, Resolution};

/// Fewest cells allowed along the longest grid axis.
pub const MIN_CELLS: usize = 4;
/// Most cells allowed along the longest grid axis.
pub const MAX_CELLS: usize = 1024;

/// Sampled field values on the lattice points of the grid.
struct Grid {
    origin: Point3,
    cell: f64,
    /// Cell counts per axis.
    dims: [usize; 3],
    values: Vec<f64>,
}

impl Grid {
    fn sample(root: &SdfNode, origin: Point3, cell: f64, dims: [usize; 3]) -> Self {
        let (px, py) = (dims[0] + 1, dims[1] + 1);
        let slabs: Vec<Vec<f64>> = (0..=dims[2])
            .into_par_iter()
            .map(|k| {
                let mut slab = Vec::with_capacity(px * py);
                for j in 0..py {
                    for i in 0..px {
                        let p = origin + Vec3::new(i as f64, j as f64, k as f64) * cell;
                        slab.push(root.eval(&p));
                    }
                }
                slab
            })
            .collect();
        Self {
            origin,
            cell,
            dims,
            values: slabs.concat(),
        }
    }

    fn point_index(&self, i: usize, j: usize, k: usize) -> usize {
        (k * (self.dims[1] + 1) + j) * (self.dims[0] + 1) + i
    }

    fn point(&self, i: usize, j: usize, k: usize) -> Point3 {
        self.origin + Vec3::new(i as f64, j as f64, k as f64) * self.cell
    }

    /// Lattice coordinates of a point index.
    fn unflatten(&self, index: usize) -> [usize; 3] {
        let px = self.dims[0] + 1;
        let py = self.dims[1] + 1;
        [index % px, (index / px) % py, index / (px * py)]
    }

    /// Global key of a cell edge: lower lattice point times three plus axis.
    fn edge_key(&self, cell: [usize; 3], edge: usize) -> usize {
        let [a, b] = EDGES[edge];
        let (ca, cb) = (CORNERS[a], CORNERS[b]);
        let lower = [
            cell[0] + ca[0].min(cb[0]),
            cell[1] + ca[1].min(cb[1]),
            cell[2] + ca[2].min(cb[2]),
        ];
        let axis = (0..3).find(|&d| ca[d] != cb[d]).unwrap_or(0);
        self.point_index(lower[0], lower[1], lower[2]) * 3 + axis
    }

    /// Zero crossing on the edge identified by `key`.
    fn edge_vertex(&self, key: usize) -> Point3 {
        let axis = key % 3;
        let [i, j, k] = self.unflatten(key / 3);
        let mut far = [i, j, k];
        far[axis] += 1;
        let d0 = self.values[self.point_index(i, j, k)];
        let d1 = self.values[self.point_index(far[0], far[1], far[2])];
        let denom = d0 - d1;
        let t = if denom.abs() > f64::EPSILON {
            (d0 / denom).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let mut p = self.point(i, j, k);
        p[axis] = lerp(p[axis], p[axis] + self.cell, t);
        p
    }
}

/// A triangle from one cell before vertex indices are assigned.
struct RawTriangle {
    edges: [usize; 3],
    feature: Option<usize>,
}

/// Grid placement derived from the bounds and the requested resolution.
pub(crate) fn grid_layout(bounds: &BoundingBox3, resolution: Resolution) -> (Point3, f64, [usize; 3]) {
    let longest = bounds.longest_side();
    let requested = match resolution {
        Resolution::Cells(n) => n,
        Resolution::CellSize(h) if h > 0.0 && h.is_finite() => (longest / h).ceil() as usize,
        Resolution::CellSize(h) => {
            warn!(cell_size = h, "invalid cell size, using minimum resolution");
            MIN_CELLS
        }
    };
    let cells = requested.clamp(MIN_CELLS, MAX_CELLS);
    if cells != requested {
        warn!(requested, used = cells, "mesh resolution clamped");
    }
    let cell = match resolution {
        Resolution::CellSize(h) if cells == requested => h,
        _ => longest / cells as f64,
    };

    let margin = cell + 1e-6 * longest;
    let origin = bounds.min - Vec3::repeat(margin);
    let size = bounds.size() + Vec3::repeat(2.0 * margin);
    let dims = [
        ((size.x / cell).ceil() as usize).max(1),
        ((size.y / cell).ceil() as usize).max(1),
        ((size.z / cell).ceil() as usize).max(1),
    ];
    (origin, cell, dims)
}

/// Extract the zero level set of `root` inside `bounds`.
pub(crate) fn extract(root: &SdfNode, bounds: &BoundingBox3, params: &MeshParams) -> TriangleMesh {
    if bounds.is_degenerate() {
        debug!("empty or degenerate bounds, nothing to mesh");
        return TriangleMesh::new();
    }
    if !bounds.is_finite() {
        warn!("field is unbounded; mesh it with mesh_in_bounds and an explicit region");
        return TriangleMesh::new();
    }

    let (origin, cell, dims) = grid_layout(bounds, params.resolution);
    debug!(nx = dims[0], ny = dims[1], nz = dims[2], cell, "sampling grid");
    let grid = Grid::sample(root, origin, cell, dims);

    let regions = collect_features(root);
    let tolerance = params.tagging_tolerance.unwrap_or(0.05 * cell);
    let step = 1e-3 * cell;

    let layers: Vec<Vec<RawTriangle>> = (0..dims[2])
        .into_par_iter()
        .map(|k| extract_layer(root, &grid, &regions, tolerance, step, params, k))
        .collect();

    let mut mesh = TriangleMesh::new();
    let mut vertex_of: HashMap<usize, u32> = HashMap::new();
    let tagged = !regions.is_empty();
    for tri in layers.into_iter().flatten() {
        let mut face = [0u32; 3];
        for (slot, key) in face.iter_mut().zip(tri.edges) {
            *slot = *vertex_of.entry(key).or_insert_with(|| {
                mesh.positions.push(grid.edge_vertex(key));
                (mesh.positions.len() - 1) as u32
            });
        }
        mesh.faces.push(face);
        if tagged {
            mesh.face_features
                .push(tri.feature.map(|f| regions[f].feature.id));
        }
    }

    mesh.normals = mesh
        .positions
        .par_iter()
        .map(|p| root.normal(p, step))
        .collect();

    if tagged {
        mesh.features = regions.iter().map(|r| r.feature.clone()).collect();
        mesh.compute_edge_features();
    }

    info!(
        triangles = mesh.num_triangles(),
        vertices = mesh.num_vertices(),
        features = mesh.features.len(),
        "mesh extracted"
    );
    mesh
}

fn extract_layer(
    root: &SdfNode,
    grid: &Grid,
    regions: &[FeatureRegion],
    tolerance: f64,
    step: f64,
    params: &MeshParams,
    k: usize,
) -> Vec<RawTriangle> {
    let table = case_table();
    let mut out = Vec::new();
    let mut flipped = 0usize;

    for j in 0..grid.dims[1] {
        for i in 0..grid.dims[0] {
            let mut corner_values = [0.0f64; 8];
            let mut case = 0usize;
            for (c, offset) in CORNERS.iter().enumerate() {
                let v = grid.values[grid.point_index(i + offset[0], j + offset[1], k + offset[2])];
                corner_values[c] = v;
                if v < 0.0 {
                    case |= 1 << c;
                }
            }
            if table.edge_mask[case] == 0 {
                continue;
            }

            let cell = [i, j, k];
            let candidates = if regions.is_empty() {
                Vec::new()
            } else {
                matching_features(grid, cell, &corner_values, regions, tolerance)
            };

            for tri in &table.triangles[case] {
                let mut edges = [
                    grid.edge_key(cell, tri[0] as usize),
                    grid.edge_key(cell, tri[1] as usize),
                    grid.edge_key(cell, tri[2] as usize),
                ];
                let [a, b, c] = edges.map(|e| grid.edge_vertex(e));
                let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);

                if params.validate_winding {
                    let normal = (b - a).cross(&(c - a));
                    if normal.norm_squared() > f64::EPSILON * grid.cell * grid.cell {
                        let gradient = root.gradient(&centroid, step);
                        if normal.dot(&gradient) < 0.0 {
                            edges.swap(1, 2);
                            flipped += 1;
                        }
                    }
                }

                let feature = nearest_feature(&candidates, regions, &centroid);
                out.push(RawTriangle { edges, feature });
            }
        }
    }

    if flipped > 0 {
        debug!(layer = k, flipped, "triangles flipped to match field gradient");
    }
    out
}

/// Indices of the regions responsible for the whole cell.
fn matching_features(
    grid: &Grid,
    cell: [usize; 3],
    corner_values: &[f64; 8],
    regions: &[FeatureRegion],
    tolerance: f64,
) -> Vec<usize> {
    regions
        .iter()
        .enumerate()
        .filter(|(_, region)| {
            CORNERS.iter().zip(corner_values).all(|(offset, root_value)| {
                let p = grid.point(cell[0] + offset[0], cell[1] + offset[1], cell[2] + offset[2]);
                (region.field.eval(&p).abs() - root_value.abs()).abs() <= tolerance
            })
        })
        .map(|(index, _)| index)
        .collect()
}

/// Break ties by distance from the triangle to each feature centre, then by
/// collection order.
fn nearest_feature(candidates: &[usize], regions: &[FeatureRegion], centroid: &Point3) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &index in candidates {
        let d = (regions[index].center - centroid).norm_squared();
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((index, d)),
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_layout_clamps_resolution() {
        let b = BoundingBox3::new(Point3::origin(), Point3::new(10.0, 5.0, 2.0));
        let (_, cell, _) = grid_layout(&b, Resolution::Cells(1));
        assert!((cell - 10.0 / MIN_CELLS as f64).abs() < 1e-12);
        let (_, cell, _) = grid_layout(&b, Resolution::Cells(1_000_000));
        assert!((cell - 10.0 / MAX_CELLS as f64).abs() < 1e-12);
    }

    #[test]
    fn test_grid_layout_covers_bounds_with_margin() {
        let b = BoundingBox3::new(Point3::new(-1.0, -2.0, -3.0), Point3::new(1.0, 2.0, 3.0));
        let (origin, cell, dims) = grid_layout(&b, Resolution::CellSize(0.5));
        assert!((cell - 0.5).abs() < 1e-12);
        assert!(origin.x < b.min.x - 0.49 && origin.z < b.min.z - 0.49);
        let far = origin + Vec3::new(dims[0] as f64, dims[1] as f64, dims[2] as f64) * cell;
        assert!(far.x > b.max.x + 0.49 && far.y > b.max.y + 0.49 && far.z > b.max.z + 0.49);
    }

    #[test]
    fn test_edge_keys_shared_between_neighbours() {
        let grid = Grid {
            origin: Point3::origin(),
            cell: 1.0,
            dims: [2, 2, 2],
            values: vec![1.0; 27],
        };
        // Edge 1 of cell (0,0,0) is edge 3 of cell (1,0,0)
        assert_eq!(grid.edge_key([0, 0, 0], 1), grid.edge_key([1, 0, 0], 3));
        // Edge 5 of cell (0,0,0) is edge 1 of cell (0,0,1)
        assert_eq!(grid.edge_key([0, 0, 0], 5), grid.edge_key([0, 0, 1], 1));
    }

    #[test]
    fn test_edge_vertex_interpolates() {
        let mut values = vec![1.0; 8];
        values[0] = -1.0;
        values[1] = 3.0;
        let grid = Grid {
            origin: Point3::origin(),
            cell: 2.0,
            dims: [1, 1, 1],
            values,
        };
        let p = grid.edge_vertex(grid.edge_key([0, 0, 0], 0));
        assert!((p.x - 0.5).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12 && p.z.abs() < 1e-12);
    }
}
